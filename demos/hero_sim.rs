//! Minimal presenter walkthrough: the load is gated on the page-ready
//! signal, then readiness arrives well before the deadline.
//!
//! Run with: cargo run --example hero_sim

use std::sync::{mpsc, Arc};
use std::time::Duration;

use heromedia::page::analytics::RecordingAnalytics;
use heromedia::page::lifecycle::{parse_ready_state, ReadyGate};
use heromedia::page::media::SimulatedMedia;
use heromedia::page::styling::RecordingStyling;
use heromedia::{LoaderConfig, Presenter, ReadinessLevel};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let media = Arc::new(SimulatedMedia::new());
    let styling = Arc::new(RecordingStyling::new());
    let analytics = Arc::new(RecordingAnalytics::new());

    let presenter = Presenter::new(
        LoaderConfig {
            media_url: "https://example.com/hero.mp4".to_string(),
            fallback_url: "https://example.com/hero.jpg".to_string(),
            deadline_ms: 3000,
            ..Default::default()
        },
        media.clone(),
        styling.clone(),
        Some(analytics.clone()),
    )
    .await?;

    // The document is still parsing, so the kickoff waits behind the gate
    // until the host reports ready.
    let (kick_tx, kick_rx) = mpsc::channel();
    let mut gate = ReadyGate::with_state(parse_ready_state("loading")?);
    gate.schedule(move || {
        let _ = kick_tx.send(());
    });
    gate.signal_ready();
    kick_rx.recv()?;

    let cycle = presenter.begin_load().await?;
    println!("loading ({})...", cycle);

    // The network is kind today: a presentable frame after 50ms.
    std::thread::sleep(Duration::from_millis(50));
    media.set_readiness(ReadinessLevel::CURRENT_DATA);
    presenter.report_readiness(cycle, ReadinessLevel::CURRENT_DATA)?;

    let snap = presenter.snapshot().await?;
    println!("phase: {:?}", snap.phase);
    println!("media visible: {}", styling.media_visible());
    println!("playing: {}", media.is_playing());
    for event in analytics.events() {
        println!("analytics: {} ({:?})", event.name, event.label);
    }

    presenter.shutdown().await?;
    Ok(())
}
