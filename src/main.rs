//! Simulation harness for the hero media presenter.
//!
//! Replays a scripted load timeline (readiness improvements, an optional
//! failure) against a presenter with a real deadline timer and prints the
//! resulting state, styling mutations, and analytics events as JSON.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;

use heromedia::page::analytics::{AnalyticsEvent, RecordingAnalytics};
use heromedia::page::media::SimulatedMedia;
use heromedia::page::styling::{RecordingStyling, StyleOp};
use heromedia::{LoaderConfig, LoaderSnapshot, Presenter, ReadinessLevel, TimeoutPolicy};

#[derive(Parser)]
#[command(
    name = "heromedia",
    about = "Replay a scripted hero-media load timeline and report the outcome"
)]
struct Args {
    /// Deadline budget in milliseconds
    #[arg(long, default_value_t = 3000)]
    deadline_ms: u64,

    /// Readiness events as `offset_ms:level` pairs, e.g. `--readiness 50:2`
    #[arg(long = "readiness", value_parser = parse_timed_readiness)]
    readiness: Vec<TimedReadiness>,

    /// Report a media load failure at this offset (ms)
    #[arg(long)]
    fail_at_ms: Option<u64>,

    /// Require full presentable readiness at the deadline instead of the
    /// lenient soft-success policy
    #[arg(long)]
    strict: bool,

    /// Simulate an autoplay policy rejection on the success path
    #[arg(long)]
    reject_playback: bool,
}

#[derive(Clone, Debug)]
struct TimedReadiness {
    at_ms: u64,
    level: u8,
}

fn parse_timed_readiness(s: &str) -> Result<TimedReadiness, String> {
    let (at, level) = s
        .split_once(':')
        .ok_or_else(|| format!("expected `offset_ms:level`, got `{}`", s))?;
    Ok(TimedReadiness {
        at_ms: at.parse().map_err(|e| format!("bad offset: {}", e))?,
        level: level.parse().map_err(|e| format!("bad level: {}", e))?,
    })
}

#[derive(Serialize)]
struct Report {
    snapshot: LoaderSnapshot,
    styling_ops: Vec<StyleOp>,
    analytics: Vec<AnalyticsEvent>,
}

enum SimEvent {
    Readiness(ReadinessLevel),
    Fail,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let media = Arc::new(SimulatedMedia::new());
    media.reject_playback(args.reject_playback);
    let styling = Arc::new(RecordingStyling::new());
    let analytics = Arc::new(RecordingAnalytics::new());

    let config = LoaderConfig {
        deadline_ms: args.deadline_ms,
        timeout_policy: if args.strict {
            TimeoutPolicy::Strict
        } else {
            TimeoutPolicy::Lenient
        },
        ..Default::default()
    };

    let presenter = Presenter::new(
        config,
        media.clone(),
        styling.clone(),
        Some(analytics.clone()),
    )
    .await?;
    let cycle = presenter.begin_load().await?;

    let mut timeline: Vec<(u64, SimEvent)> = args
        .readiness
        .iter()
        .map(|r| (r.at_ms, SimEvent::Readiness(ReadinessLevel(r.level))))
        .collect();
    if let Some(at) = args.fail_at_ms {
        timeline.push((at, SimEvent::Fail));
    }
    timeline.sort_by_key(|(at, _)| *at);

    let mut now_ms = 0u64;
    for (at_ms, event) in timeline {
        thread::sleep(Duration::from_millis(at_ms.saturating_sub(now_ms)));
        now_ms = now_ms.max(at_ms);
        match event {
            SimEvent::Readiness(level) => {
                media.set_readiness(level);
                presenter.report_readiness(cycle, level)?;
            }
            SimEvent::Fail => presenter.report_failure(cycle, "error")?,
        }
    }

    // Let the deadline timer settle before reading the outcome.
    let settle_ms = args.deadline_ms + 100;
    thread::sleep(Duration::from_millis(settle_ms.saturating_sub(now_ms)));

    let report = Report {
        snapshot: presenter.snapshot().await?,
        styling_ops: styling.ops(),
        analytics: analytics.events(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    presenter.shutdown().await?;
    Ok(())
}
