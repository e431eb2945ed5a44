//! Page surface traits: media source, styling layer, analytics sink, lifecycle
//!
//! This module contains the traits through which the loader touches the page,
//! together with deterministic noop/recording implementations used in tests.
//! The loader owns all presentation state; these surfaces only receive
//! mutations or deliver signals.

pub mod analytics;
pub mod lifecycle;
pub mod media;
pub mod styling;

use std::sync::Arc;

pub use analytics::{AnalyticsEvent, AnalyticsSink, NoopAnalytics, RecordingAnalytics};
pub use lifecycle::{DocumentReadyState, ReadyGate};
pub use media::{MediaSource, SimulatedMedia};
pub use styling::{NoopStyling, RecordingStyling, StyleOp, StylingSurface};

/// A composite surface a host can offer so consumers obtain all page
/// primitives in a typed way.
///
/// Hosts without a real surface for some concern can hand out the noop
/// implementations, which keep enough state for tests to assert against.
pub trait PageApi: Send + Sync {
    fn media(&self) -> Arc<dyn MediaSource>;
    fn styling(&self) -> Arc<dyn StylingSurface>;
    fn analytics(&self) -> Option<Arc<dyn AnalyticsSink>>;
}

/// Noop page used in unit tests and as a safe default: simulated media,
/// recording styling, no analytics.
pub struct NoopPage {
    media: Arc<SimulatedMedia>,
    styling: Arc<RecordingStyling>,
}

impl NoopPage {
    pub fn new() -> Self {
        Self {
            media: Arc::new(SimulatedMedia::new()),
            styling: Arc::new(RecordingStyling::new()),
        }
    }
}

impl Default for NoopPage {
    fn default() -> Self {
        Self::new()
    }
}

impl PageApi for NoopPage {
    fn media(&self) -> Arc<dyn MediaSource> {
        self.media.clone()
    }

    fn styling(&self) -> Arc<dyn StylingSurface> {
        self.styling.clone()
    }

    fn analytics(&self) -> Option<Arc<dyn AnalyticsSink>> {
        None
    }
}
