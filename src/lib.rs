//! Hero Media Presentation Runtime
//!
//! A deterministic, headless reimplementation of the hero-media loading
//! behavior found on media-heavy landing pages: given a media resource that
//! may load fully, partially, or not at all, decide within a bounded time
//! budget whether to present the media or a static fallback, exactly once,
//! without layout disruption.
//!
//! # Features
//!
//! - **Single-owner state machine**: one [`MediaLoader`] owns the whole
//!   presentation state; collaborators only signal events
//! - **Deterministic surfaces**: styling, analytics, and media are traits
//!   with recording/simulated implementations for tests
//! - **Serialized dispatch**: the [`driver::Presenter`] funnels media events
//!   and deadline expiry through one worker thread, so correctness holds
//!   under any event interleaving
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use heromedia::{LoaderConfig, MediaLoader, ReadinessLevel};
//! use heromedia::page::media::SimulatedMedia;
//! use heromedia::page::styling::RecordingStyling;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let media = Arc::new(SimulatedMedia::new());
//! let styling = Arc::new(RecordingStyling::new());
//! let mut loader = MediaLoader::new(LoaderConfig::default(), media, styling.clone(), None)?;
//!
//! let (cycle, _deadline) = loader.begin_load();
//! loader.on_readiness_improved(cycle, ReadinessLevel::CURRENT_DATA);
//! assert!(styling.media_visible());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod loader;
pub use loader::{
    CycleId, DeadlineHandle, LoaderSnapshot, MediaLoader, MediaPhase, MediaPresentationState,
    ReadinessLevel,
};

// Serialized event dispatch on a dedicated worker thread
pub mod driver;
pub use driver::Presenter;

// Page surface traits (media, styling, analytics, lifecycle)
pub mod page;

// Analytics taxonomy helpers (device class, page category, scroll depth)
pub mod taxonomy;

// Layout stability heuristics
pub mod stability;

// Reviews carousel state
pub mod carousel;

// Form field validation
pub mod forms;

use serde::Serialize;

/// Configuration for a presentation load cycle
///
/// The media and fallback URLs are plain inputs handed to the page surfaces;
/// the loader itself never fetches anything. Defaults follow the behavior a
/// hero region typically wants: a 3 second budget, readiness 2 ("enough data
/// to render a frame") as presentable, and the lenient timeout policy that
/// prefers showing partially loaded motion over a static image.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// URL of the media resource to load
    pub media_url: String,
    /// URL of the static fallback visual
    pub fallback_url: String,
    /// Deadline budget in milliseconds; the sole guarantee against an
    /// indefinite LOADING phase
    pub deadline_ms: u64,
    /// Readiness level at which the media is considered presentable
    pub presentable: ReadinessLevel,
    /// What to do when the deadline elapses with partial data
    pub timeout_policy: TimeoutPolicy,
    /// Fade duration hint passed to the styling surface, in milliseconds
    pub fade_ms: u64,
    /// Stable dimensions assigned to the containing region before any
    /// asynchronous signal can arrive
    pub region: RegionBounds,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            media_url: String::new(),
            fallback_url: String::new(),
            deadline_ms: 3000,
            presentable: ReadinessLevel::CURRENT_DATA,
            timeout_policy: TimeoutPolicy::Lenient,
            fade_ms: 500,
            region: RegionBounds::default(),
        }
    }
}

impl LoaderConfig {
    /// Validate the configuration. A zero deadline would disarm the only
    /// guarantee against an indefinite LOADING phase.
    pub fn validate(&self) -> Result<()> {
        if self.deadline_ms == 0 {
            return Err(Error::Config("deadline_ms must be non-zero".to_string()));
        }
        if self.region.width == 0 || self.region.height == 0 {
            return Err(Error::Config("region bounds must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Policy applied when the deadline elapses before a terminal transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimeoutPolicy {
    /// Any data at all (readiness >= 1) counts as a soft success
    Lenient,
    /// Only full presentable readiness counts; anything less is a timeout
    Strict,
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Fixed bounds assigned to a page region to keep layout stable while
/// asynchronous content loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionBounds {
    pub width: u32,
    pub height: u32,
}

impl Default for RegionBounds {
    fn default() -> Self {
        let v = Viewport::default();
        Self {
            width: v.width,
            height: v.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoaderConfig::default();
        assert_eq!(config.deadline_ms, 3000);
        assert_eq!(config.presentable, ReadinessLevel::CURRENT_DATA);
        assert_eq!(config.timeout_policy, TimeoutPolicy::Lenient);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_deadline_rejected() {
        let config = LoaderConfig {
            deadline_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_default_region_matches_viewport() {
        let region = RegionBounds::default();
        assert_eq!(region.width, 1280);
        assert_eq!(region.height, 720);
    }
}
