//! Serialized event dispatch for the loader
//!
//! The [`Presenter`] owns a [`MediaLoader`] on a dedicated worker thread and
//! funnels every signal through one command channel, so media events and
//! deadline expiry are totally ordered no matter which thread reports them.
//! Callers get an async interface without the loader needing to be `Send`
//! across awaits.
//!
//! Deadline timers are detached sleeper threads holding the cycle's
//! [`DeadlineHandle`]; a cancelled handle makes the sleeper drop its expiry
//! on the floor instead of delivering it. The worker exits when the last
//! [`Presenter`] handle drops (and any in-flight sleepers finish), so an
//! explicit [`Presenter::shutdown`] is a courtesy, not a requirement.

use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;

use tokio::sync::oneshot;

use crate::loader::{CycleId, LoaderSnapshot, MediaLoader, ReadinessLevel};
use crate::page::analytics::AnalyticsSink;
use crate::page::media::MediaSource;
use crate::page::styling::StylingSurface;
use crate::{Error, LoaderConfig, Result};

enum Command {
    Begin(oneshot::Sender<CycleId>, Sender<Command>),
    Readiness(CycleId, ReadinessLevel),
    Failed(CycleId, String),
    Deadline(CycleId),
    Snapshot(oneshot::Sender<LoaderSnapshot>),
    Shutdown(oneshot::Sender<()>),
}

/// Async handle to a loader running on its own worker thread
#[derive(Clone)]
pub struct Presenter {
    cmd_tx: Sender<Command>,
}

impl Presenter {
    /// Create a presenter (spawns the worker thread that owns the loader).
    pub async fn new(
        config: LoaderConfig,
        media: Arc<dyn MediaSource>,
        styling: Arc<dyn StylingSurface>,
        analytics: Option<Arc<dyn AnalyticsSink>>,
    ) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx): (oneshot::Sender<Result<()>>, oneshot::Receiver<Result<()>>) =
            oneshot::channel();

        thread::spawn(move || {
            let mut loader = match MediaLoader::new(config, media, styling, analytics) {
                Ok(l) => l,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };
            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Begin(resp, tx) => {
                        let (cycle, deadline) = loader.begin_load();
                        thread::spawn(move || {
                            thread::sleep(deadline.duration());
                            if !deadline.is_cancelled() {
                                let _ = tx.send(Command::Deadline(cycle));
                            }
                        });
                        let _ = resp.send(cycle);
                    }
                    Command::Readiness(cycle, level) => {
                        loader.on_readiness_improved(cycle, level);
                    }
                    Command::Failed(cycle, reason) => {
                        loader.on_load_failed(cycle, &reason);
                    }
                    Command::Deadline(cycle) => {
                        loader.on_deadline_elapsed(cycle);
                    }
                    Command::Snapshot(resp) => {
                        let _ = resp.send(loader.snapshot());
                    }
                    Command::Shutdown(resp) => {
                        let _ = resp.send(());
                        break;
                    }
                }
            }
        });

        init_rx
            .await
            .map_err(|e| Error::Worker(format!("init canceled: {}", e)))??;

        Ok(Self { cmd_tx })
    }

    /// Start a load cycle; returns the cycle id events must carry. The
    /// deadline timer is armed before this returns.
    pub async fn begin_load(&self) -> Result<CycleId> {
        let (tx, rx) = oneshot::channel();
        // The sleeper gets its own sender, so the worker never holds a clone
        // of its command channel and exits once all presenter handles drop.
        self.send(Command::Begin(tx, self.cmd_tx.clone()))?;
        rx.await
            .map_err(|e| Error::Worker(format!("begin canceled: {}", e)))
    }

    /// Deliver a readiness-improved signal. Fire and forget; stale cycles
    /// are discarded by the loader.
    pub fn report_readiness(&self, cycle: CycleId, level: ReadinessLevel) -> Result<()> {
        self.send(Command::Readiness(cycle, level))
    }

    /// Deliver a load-failure signal
    pub fn report_failure(&self, cycle: CycleId, reason: &str) -> Result<()> {
        self.send(Command::Failed(cycle, reason.to_string()))
    }

    /// Read the loader state as of all signals delivered so far
    pub async fn snapshot(&self) -> Result<LoaderSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx))?;
        rx.await
            .map_err(|e| Error::Worker(format!("snapshot canceled: {}", e)))
    }

    /// Stop the worker thread
    pub async fn shutdown(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Shutdown(tx))?;
        rx.await
            .map_err(|e| Error::Worker(format!("shutdown canceled: {}", e)))
    }

    fn send(&self, cmd: Command) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| Error::Worker("worker thread is gone".to_string()))
    }
}
