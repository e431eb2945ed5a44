/// Styling surface: the small set of presentation mutations the loader emits
use std::sync::Mutex;

use serde::Serialize;

use crate::RegionBounds;

/// One presentation mutation. The contract for hosts is that applying any of
/// these never grows the region past its stabilized bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StyleOp {
    /// Pin the containing region to fixed dimensions
    Stabilize(RegionBounds),
    /// Initial state: media visible with a fade transition armed, fallback
    /// kept behind it
    Prepare { fade_ms: u64 },
    ShowMedia,
    HideMedia,
    ShowFallback,
    HideFallback,
    MarkError,
}

/// Receiver for the loader's presentation mutations
pub trait StylingSurface: Send + Sync {
    fn stabilize_region(&self, bounds: RegionBounds);
    fn prepare(&self, fade_ms: u64);
    fn show_media(&self);
    fn hide_media(&self);
    fn show_fallback(&self);
    fn hide_fallback(&self);
    fn mark_error(&self);
}

/// Records every mutation and tracks the resulting visibility, so tests can
/// assert on the final visible state of the region
pub struct RecordingStyling {
    inner: Mutex<RecordingState>,
}

struct RecordingState {
    ops: Vec<StyleOp>,
    media_visible: bool,
    fallback_visible: bool,
    error_marked: bool,
}

impl RecordingStyling {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RecordingState {
                ops: Vec::new(),
                media_visible: false,
                // The fallback image is in the document from the start.
                fallback_visible: true,
                error_marked: false,
            }),
        }
    }

    pub fn ops(&self) -> Vec<StyleOp> {
        self.inner.lock().unwrap().ops.clone()
    }

    pub fn media_visible(&self) -> bool {
        self.inner.lock().unwrap().media_visible
    }

    pub fn fallback_visible(&self) -> bool {
        self.inner.lock().unwrap().fallback_visible
    }

    pub fn error_marked(&self) -> bool {
        self.inner.lock().unwrap().error_marked
    }

    fn record(&self, op: StyleOp) {
        let mut s = self.inner.lock().unwrap();
        match op {
            StyleOp::Prepare { .. } | StyleOp::ShowMedia => s.media_visible = true,
            StyleOp::HideMedia => s.media_visible = false,
            StyleOp::ShowFallback => s.fallback_visible = true,
            StyleOp::HideFallback => s.fallback_visible = false,
            StyleOp::MarkError => s.error_marked = true,
            StyleOp::Stabilize(_) => {}
        }
        s.ops.push(op);
    }
}

impl Default for RecordingStyling {
    fn default() -> Self {
        Self::new()
    }
}

impl StylingSurface for RecordingStyling {
    fn stabilize_region(&self, bounds: RegionBounds) {
        self.record(StyleOp::Stabilize(bounds));
    }

    fn prepare(&self, fade_ms: u64) {
        self.record(StyleOp::Prepare { fade_ms });
    }

    fn show_media(&self) {
        self.record(StyleOp::ShowMedia);
    }

    fn hide_media(&self) {
        self.record(StyleOp::HideMedia);
    }

    fn show_fallback(&self) {
        self.record(StyleOp::ShowFallback);
    }

    fn hide_fallback(&self) {
        self.record(StyleOp::HideFallback);
    }

    fn mark_error(&self) {
        self.record(StyleOp::MarkError);
    }
}

/// Discards every mutation
pub struct NoopStyling;

impl NoopStyling {
    pub fn new() -> Self {
        NoopStyling
    }
}

impl Default for NoopStyling {
    fn default() -> Self {
        Self::new()
    }
}

impl StylingSurface for NoopStyling {
    fn stabilize_region(&self, _bounds: RegionBounds) {}
    fn prepare(&self, _fade_ms: u64) {}
    fn show_media(&self) {}
    fn hide_media(&self) {}
    fn show_fallback(&self) {}
    fn hide_fallback(&self) {}
    fn mark_error(&self) {}
}
