//! Layout stability heuristics
//!
//! Pre-assigning fixed bounds to regions whose content arrives late is what
//! keeps the page from reflowing under the user. [`stabilization_plan`]
//! produces those assignments for a viewport; [`LayoutShiftMonitor`]
//! accumulates observed shift scores and surfaces the significant ones.

use serde::Serialize;

use crate::{RegionBounds, Viewport};

/// Page regions that get fixed dimensions before their content loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegionTarget {
    /// The full-viewport hero section
    Hero,
    /// The media container inside the hero, pinned to the hero's bounds
    VideoContainer,
    /// Top navigation bar, fixed height so late fonts cannot grow it
    Navbar,
    /// Image cards below the fold
    ImageCard,
}

/// One region-to-bounds assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionPreset {
    pub target: RegionTarget,
    pub bounds: RegionBounds,
}

const NAVBAR_HEIGHT: u32 = 80;
const IMAGE_CARD_HEIGHT: u32 = 250;

/// Fixed bounds for every late-loading region of the page, derived from the
/// viewport. The hero and its media container always span the full viewport.
pub fn stabilization_plan(viewport: Viewport) -> Vec<RegionPreset> {
    let full = RegionBounds {
        width: viewport.width,
        height: viewport.height,
    };
    vec![
        RegionPreset {
            target: RegionTarget::Hero,
            bounds: full,
        },
        RegionPreset {
            target: RegionTarget::VideoContainer,
            bounds: full,
        },
        RegionPreset {
            target: RegionTarget::Navbar,
            bounds: RegionBounds {
                width: viewport.width,
                height: NAVBAR_HEIGHT,
            },
        },
        RegionPreset {
            target: RegionTarget::ImageCard,
            bounds: RegionBounds {
                width: viewport.width,
                height: IMAGE_CARD_HEIGHT,
            },
        },
    ]
}

/// One observed layout shift, as hosts report them
#[derive(Debug, Clone, Copy)]
pub struct ShiftEntry {
    /// Shift score for this entry
    pub value: f64,
    /// Whether the shift was caused by recent user input (those are expected
    /// and not counted)
    pub had_recent_input: bool,
}

/// Accumulates layout shift scores and flags significant ones
pub struct LayoutShiftMonitor {
    threshold: f64,
    cumulative: f64,
}

impl LayoutShiftMonitor {
    /// Default significance threshold of 0.1 per entry
    pub fn new() -> Self {
        Self::with_threshold(0.1)
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            cumulative: 0.0,
        }
    }

    /// Record a shift entry. Returns the entry's score when it exceeds the
    /// significance threshold, so the caller can log or report it.
    /// Input-caused shifts are ignored entirely.
    pub fn observe(&mut self, entry: ShiftEntry) -> Option<f64> {
        if entry.had_recent_input {
            return None;
        }
        self.cumulative += entry.value;
        if entry.value > self.threshold {
            Some(entry.value)
        } else {
            None
        }
    }

    /// Total shift score of all counted entries
    pub fn cumulative(&self) -> f64 {
        self.cumulative
    }
}

impl Default for LayoutShiftMonitor {
    fn default() -> Self {
        Self::new()
    }
}
