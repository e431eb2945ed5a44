//! Media presentation loader
//!
//! The loader decides, for a single page region, whether to present a media
//! resource or its static fallback, within a bounded time budget. It is a
//! pure event machine: callers (or the [`crate::driver::Presenter`]) deliver
//! readiness, failure, and deadline events, and the loader mutates its own
//! state and the styling surface in response. No event may fire the success
//! transition more than once per cycle, and no load cycle may remain in
//! LOADING forever; the deadline timer is the sole guarantee of the latter.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde::Serialize;

use crate::page::analytics::{AnalyticsEvent, AnalyticsSink};
use crate::page::media::MediaSource;
use crate::page::styling::StylingSurface;
use crate::{Error, LoaderConfig, Result, TimeoutPolicy};

/// Coarse readiness of the underlying media resource, as reported by the
/// media subsystem: 0 = nothing, 1 = metadata known, 2 = enough data to
/// render the current frame, higher = progressively more buffered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ReadinessLevel(pub u8);

impl ReadinessLevel {
    pub const NOTHING: ReadinessLevel = ReadinessLevel(0);
    pub const METADATA: ReadinessLevel = ReadinessLevel(1);
    pub const CURRENT_DATA: ReadinessLevel = ReadinessLevel(2);
    pub const FUTURE_DATA: ReadinessLevel = ReadinessLevel(3);
    pub const ENOUGH_DATA: ReadinessLevel = ReadinessLevel(4);
}

/// Identifier of one load cycle. Every externally delivered event carries the
/// cycle it belongs to; events from a discarded cycle are ignored so a late
/// callback cannot corrupt the current cycle's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CycleId(u64);

impl CycleId {
    fn next(self) -> CycleId {
        CycleId(self.0 + 1)
    }
}

impl std::fmt::Display for CycleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cycle#{}", self.0)
    }
}

/// Phase of the presentation state machine. SHOWN and FAILED are terminal
/// for a cycle, with one exception: a late failure report still forces
/// SHOWN into FAILED, because the fallback must be authoritative whenever
/// the media subsystem reports an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MediaPhase {
    Init,
    Loading,
    Ready,
    Shown,
    Failed,
}

impl MediaPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MediaPhase::Shown | MediaPhase::Failed)
    }
}

/// Cancellable handle to a pending deadline. The timer side checks
/// [`is_cancelled`](Self::is_cancelled) after sleeping and drops the event
/// instead of delivering it, so no expiry from a finished cycle is ever
/// observed.
#[derive(Debug, Clone)]
pub struct DeadlineHandle {
    cancelled: Arc<AtomicBool>,
    cycle: CycleId,
    duration: Duration,
}

impl DeadlineHandle {
    fn new(cycle: CycleId, duration: Duration) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            cycle,
            duration,
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn cycle(&self) -> CycleId {
        self.cycle
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// The single mutable entity behind a load cycle. Owned exclusively by the
/// [`MediaLoader`]; external collaborators only signal events.
#[derive(Debug)]
pub struct MediaPresentationState {
    phase: MediaPhase,
    attempted_success: bool,
    deadline: Option<DeadlineHandle>,
    readiness: ReadinessLevel,
    cycle: CycleId,
}

impl MediaPresentationState {
    fn initial() -> Self {
        Self {
            phase: MediaPhase::Init,
            attempted_success: false,
            deadline: None,
            readiness: ReadinessLevel::NOTHING,
            cycle: CycleId(0),
        }
    }

    pub fn phase(&self) -> MediaPhase {
        self.phase
    }

    pub fn attempted_success(&self) -> bool {
        self.attempted_success
    }

    pub fn readiness(&self) -> ReadinessLevel {
        self.readiness
    }

    pub fn cycle(&self) -> CycleId {
        self.cycle
    }

    pub fn deadline_armed(&self) -> bool {
        self.deadline.as_ref().is_some_and(|d| !d.is_cancelled())
    }
}

/// Plain-data view of the loader state, for queries across the driver
/// boundary and for simulation reports
#[derive(Debug, Clone, Serialize)]
pub struct LoaderSnapshot {
    pub phase: MediaPhase,
    pub readiness: ReadinessLevel,
    pub attempted_success: bool,
    pub cycle: CycleId,
    pub deadline_armed: bool,
}

/// The media presentation loader state machine
pub struct MediaLoader {
    config: LoaderConfig,
    state: MediaPresentationState,
    media: Arc<dyn MediaSource>,
    styling: Arc<dyn StylingSurface>,
    analytics: Option<Arc<dyn AnalyticsSink>>,
}

impl MediaLoader {
    /// Create a loader over the given page surfaces. Fails if the
    /// configuration is invalid.
    pub fn new(
        config: LoaderConfig,
        media: Arc<dyn MediaSource>,
        styling: Arc<dyn StylingSurface>,
        analytics: Option<Arc<dyn AnalyticsSink>>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: MediaPresentationState::initial(),
            media,
            styling,
            analytics,
        })
    }

    /// Start a load cycle. Any prior cycle's deadline is cancelled and its
    /// events invalidated first. The containing region is given stable
    /// dimensions before the media is asked to load, so nothing that arrives
    /// later can shift the layout.
    ///
    /// Returns the new cycle id together with the armed deadline handle; the
    /// caller is responsible for delivering
    /// [`on_deadline_elapsed`](Self::on_deadline_elapsed) when the handle's
    /// duration passes, unless the handle was cancelled in the meantime.
    pub fn begin_load(&mut self) -> (CycleId, DeadlineHandle) {
        if let Some(prior) = self.state.deadline.take() {
            prior.cancel();
        }
        let cycle = self.state.cycle.next();
        self.state = MediaPresentationState {
            phase: MediaPhase::Loading,
            attempted_success: false,
            deadline: None,
            readiness: ReadinessLevel::NOTHING,
            cycle,
        };

        // Layout first: stable dimensions must be in place before any
        // asynchronous signal can arrive.
        self.styling.stabilize_region(self.config.region);
        self.styling.prepare(self.config.fade_ms);

        self.media.begin_load(&self.config.media_url);
        // Capture whatever the source already knows; a fully cached resource
        // still transitions through an explicit readiness event.
        self.state.readiness = self.media.readiness();

        let handle = DeadlineHandle::new(cycle, Duration::from_millis(self.config.deadline_ms));
        self.state.deadline = Some(handle.clone());
        debug!("{} loading, deadline {}ms", cycle, self.config.deadline_ms);
        (cycle, handle)
    }

    /// The media subsystem reported a readiness increase. Redundant and
    /// out-of-order reports are tolerated: once the success path has fired,
    /// further reports are no-ops.
    pub fn on_readiness_improved(&mut self, cycle: CycleId, level: ReadinessLevel) {
        if cycle != self.state.cycle {
            debug!("ignoring readiness from stale {}", cycle);
            return;
        }
        if level > self.state.readiness {
            self.state.readiness = level;
        }
        if self.state.attempted_success || self.state.phase != MediaPhase::Loading {
            return;
        }
        if level >= self.config.presentable {
            self.transition_shown(false);
        }
    }

    /// The media subsystem reported a load failure. Deliberately not guarded
    /// by the success flag: if an error is reported after a nominal success,
    /// the fallback still becomes authoritative. Idempotent once FAILED.
    pub fn on_load_failed(&mut self, cycle: CycleId, reason: &str) {
        if cycle != self.state.cycle {
            debug!("ignoring failure from stale {}", cycle);
            return;
        }
        if self.state.phase == MediaPhase::Failed {
            return;
        }
        self.fail(reason);
    }

    /// The deadline elapsed without a terminal transition. Readiness is
    /// re-polled from the source, then the timeout policy decides: under
    /// [`TimeoutPolicy::Lenient`] any data at all is a soft success, under
    /// [`TimeoutPolicy::Strict`] only full presentable readiness passes.
    pub fn on_deadline_elapsed(&mut self, cycle: CycleId) {
        if cycle != self.state.cycle {
            debug!("ignoring deadline from stale {}", cycle);
            return;
        }
        if self.state.attempted_success || self.state.phase.is_terminal() {
            return;
        }
        // The timer fired; the handle is spent either way.
        self.state.deadline = None;

        let polled = self.media.readiness();
        if polled > self.state.readiness {
            self.state.readiness = polled;
        }
        let threshold = match self.config.timeout_policy {
            TimeoutPolicy::Lenient => ReadinessLevel::METADATA,
            TimeoutPolicy::Strict => self.config.presentable,
        };
        if self.state.readiness >= threshold {
            debug!(
                "{} deadline reached with readiness {:?}, soft success",
                cycle, self.state.readiness
            );
            self.transition_shown(true);
        } else {
            self.fail("timeout");
        }
    }

    /// Borrow the presentation state (read-only; events are the only way in)
    pub fn state(&self) -> &MediaPresentationState {
        &self.state
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn snapshot(&self) -> LoaderSnapshot {
        LoaderSnapshot {
            phase: self.state.phase,
            readiness: self.state.readiness,
            attempted_success: self.state.attempted_success,
            cycle: self.state.cycle,
            deadline_armed: self.state.deadline_armed(),
        }
    }

    fn transition_shown(&mut self, soft: bool) {
        if let Some(deadline) = self.state.deadline.take() {
            deadline.cancel();
        }
        self.state.attempted_success = true;
        self.state.phase = MediaPhase::Ready;

        self.styling.hide_fallback();
        self.styling.show_media();
        self.state.phase = MediaPhase::Shown;

        // Best effort: autoplay policy may refuse, and a paused first frame
        // is acceptable.
        if let Err(reason) = self.media.attempt_playback() {
            warn!("{} {}", self.state.cycle, Error::PlaybackRejected(reason));
        }

        self.emit(
            AnalyticsEvent::new("hero_media_shown")
                .with_category("media")
                .with_label(if soft { "soft" } else { "full" }),
        );
    }

    fn fail(&mut self, reason: &str) {
        if let Some(deadline) = self.state.deadline.take() {
            deadline.cancel();
        }
        let err = match reason {
            "timeout" => Error::Timeout(self.config.deadline_ms),
            other => Error::Load(other.to_string()),
        };
        warn!("{} {}", self.state.cycle, err);
        self.state.phase = MediaPhase::Failed;

        self.styling.hide_media();
        self.styling.show_fallback();
        self.styling.mark_error();

        self.emit(
            AnalyticsEvent::new("hero_media_failed")
                .with_category("media")
                .with_label(reason),
        );
    }

    // Fire-and-forget: a sink error is logged and never reaches the caller.
    fn emit(&self, event: AnalyticsEvent) {
        if let Some(sink) = &self.analytics {
            if let Err(e) = sink.track(event) {
                warn!("analytics sink dropped event: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::analytics::{FailingAnalytics, RecordingAnalytics};
    use crate::page::media::SimulatedMedia;
    use crate::page::styling::{RecordingStyling, StyleOp};

    struct Harness {
        media: Arc<SimulatedMedia>,
        styling: Arc<RecordingStyling>,
        analytics: Arc<RecordingAnalytics>,
        loader: MediaLoader,
    }

    fn harness(config: LoaderConfig) -> Harness {
        let media = Arc::new(SimulatedMedia::new());
        let styling = Arc::new(RecordingStyling::new());
        let analytics = Arc::new(RecordingAnalytics::new());
        let loader = MediaLoader::new(
            config,
            media.clone(),
            styling.clone(),
            Some(analytics.clone()),
        )
        .expect("config should validate");
        Harness {
            media,
            styling,
            analytics,
            loader,
        }
    }

    #[test]
    fn readiness_at_threshold_shows_media_and_cancels_deadline() {
        let mut h = harness(LoaderConfig::default());
        let (cycle, deadline) = h.loader.begin_load();

        h.media.set_readiness(ReadinessLevel::CURRENT_DATA);
        h.loader
            .on_readiness_improved(cycle, ReadinessLevel::CURRENT_DATA);

        assert_eq!(h.loader.state().phase(), MediaPhase::Shown);
        assert!(deadline.is_cancelled());
        assert!(!h.loader.state().deadline_armed());
        assert!(h.styling.media_visible());
        assert!(!h.styling.fallback_visible());
        assert!(h.media.is_playing());

        let events = h.analytics.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "hero_media_shown");
        assert_eq!(events[0].label.as_deref(), Some("full"));
    }

    #[test]
    fn redundant_readiness_signals_fire_success_once() {
        let mut h = harness(LoaderConfig::default());
        let (cycle, _) = h.loader.begin_load();

        // The original page wired four DOM events to the same handler; any
        // repetition or ordering must collapse to one success.
        for level in [
            ReadinessLevel::CURRENT_DATA,
            ReadinessLevel::ENOUGH_DATA,
            ReadinessLevel::METADATA,
            ReadinessLevel::CURRENT_DATA,
        ] {
            h.loader.on_readiness_improved(cycle, level);
        }

        let shows = h
            .styling
            .ops()
            .iter()
            .filter(|op| **op == StyleOp::ShowMedia)
            .count();
        assert_eq!(shows, 1);
        assert_eq!(h.analytics.events().len(), 1);
        assert_eq!(h.loader.state().readiness(), ReadinessLevel::ENOUGH_DATA);
    }

    #[test]
    fn failure_makes_fallback_authoritative_despite_prior_success() {
        let mut h = harness(LoaderConfig::default());
        let (cycle, _) = h.loader.begin_load();

        h.loader
            .on_readiness_improved(cycle, ReadinessLevel::CURRENT_DATA);
        assert_eq!(h.loader.state().phase(), MediaPhase::Shown);

        h.loader.on_load_failed(cycle, "decode error");

        assert_eq!(h.loader.state().phase(), MediaPhase::Failed);
        assert!(!h.styling.media_visible());
        assert!(h.styling.fallback_visible());
        assert!(h.styling.error_marked());
    }

    #[test]
    fn failure_is_idempotent() {
        let mut h = harness(LoaderConfig::default());
        let (cycle, _) = h.loader.begin_load();

        h.loader.on_load_failed(cycle, "network");
        h.loader.on_load_failed(cycle, "network");

        let marks = h
            .styling
            .ops()
            .iter()
            .filter(|op| **op == StyleOp::MarkError)
            .count();
        assert_eq!(marks, 1);
        assert_eq!(h.analytics.events().len(), 1);
    }

    #[test]
    fn deadline_with_no_data_fails_with_timeout_reason() {
        let mut h = harness(LoaderConfig::default());
        let (cycle, _) = h.loader.begin_load();

        h.loader.on_deadline_elapsed(cycle);

        assert_eq!(h.loader.state().phase(), MediaPhase::Failed);
        assert!(h.styling.fallback_visible());
        let events = h.analytics.events();
        assert_eq!(events[0].name, "hero_media_failed");
        assert_eq!(events[0].label.as_deref(), Some("timeout"));
    }

    #[test]
    fn deadline_with_partial_data_is_a_soft_success() {
        let mut h = harness(LoaderConfig::default());
        let (cycle, _) = h.loader.begin_load();

        // Metadata arrived but no readiness event was delivered; the expiry
        // handler re-polls the source.
        h.media.set_readiness(ReadinessLevel::METADATA);
        h.loader.on_deadline_elapsed(cycle);

        assert_eq!(h.loader.state().phase(), MediaPhase::Shown);
        assert!(h.styling.media_visible());
        let events = h.analytics.events();
        assert_eq!(events[0].label.as_deref(), Some("soft"));
    }

    #[test]
    fn strict_policy_rejects_partial_data_at_deadline() {
        let mut h = harness(LoaderConfig {
            timeout_policy: TimeoutPolicy::Strict,
            ..Default::default()
        });
        let (cycle, _) = h.loader.begin_load();

        h.media.set_readiness(ReadinessLevel::METADATA);
        h.loader.on_deadline_elapsed(cycle);

        assert_eq!(h.loader.state().phase(), MediaPhase::Failed);
        assert_eq!(h.analytics.events()[0].label.as_deref(), Some("timeout"));
    }

    #[test]
    fn new_cycle_cancels_prior_deadline_and_invalidates_stale_events() {
        let mut h = harness(LoaderConfig::default());
        let (old_cycle, old_deadline) = h.loader.begin_load();
        let (new_cycle, _) = h.loader.begin_load();

        assert!(old_deadline.is_cancelled());
        assert_ne!(old_cycle, new_cycle);

        // Late callbacks from the discarded cycle must not touch the new one.
        h.loader
            .on_readiness_improved(old_cycle, ReadinessLevel::ENOUGH_DATA);
        h.loader.on_load_failed(old_cycle, "stale");
        h.loader.on_deadline_elapsed(old_cycle);

        assert_eq!(h.loader.state().phase(), MediaPhase::Loading);
        assert_eq!(h.loader.state().cycle(), new_cycle);
        assert_eq!(h.loader.state().readiness(), ReadinessLevel::NOTHING);
    }

    #[test]
    fn playback_rejection_still_counts_as_shown() {
        let mut h = harness(LoaderConfig::default());
        h.media.reject_playback(true);
        let (cycle, _) = h.loader.begin_load();

        h.loader
            .on_readiness_improved(cycle, ReadinessLevel::CURRENT_DATA);

        assert_eq!(h.loader.state().phase(), MediaPhase::Shown);
        assert!(!h.media.is_playing());
        assert!(h.styling.media_visible());
    }

    #[test]
    fn sink_failure_never_affects_loader_state() {
        let media = Arc::new(SimulatedMedia::new());
        let styling = Arc::new(RecordingStyling::new());
        let mut loader = MediaLoader::new(
            LoaderConfig::default(),
            media,
            styling.clone(),
            Some(Arc::new(FailingAnalytics)),
        )
        .unwrap();

        let (cycle, _) = loader.begin_load();
        loader.on_readiness_improved(cycle, ReadinessLevel::CURRENT_DATA);

        assert_eq!(loader.state().phase(), MediaPhase::Shown);
        assert!(styling.media_visible());
    }

    #[test]
    fn region_is_stabilized_before_load_begins() {
        let mut h = harness(LoaderConfig::default());
        h.loader.begin_load();

        let ops = h.styling.ops();
        assert!(matches!(ops[0], StyleOp::Stabilize(_)));
        assert_eq!(h.media.load_requests(), 1);
    }

    #[test]
    fn readiness_before_begin_load_is_ignored() {
        let mut h = harness(LoaderConfig::default());
        h.loader
            .on_readiness_improved(CycleId(1), ReadinessLevel::ENOUGH_DATA);
        assert_eq!(h.loader.state().phase(), MediaPhase::Init);
    }
}
