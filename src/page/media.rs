/// Media source surface for deterministic load control in tests
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use crate::ReadinessLevel;

/// The loader's handle onto the underlying media element.
///
/// Implementations report readiness levels and accept a best-effort playback
/// request; they never mutate presentation state themselves.
pub trait MediaSource: Send + Sync {
    /// Ask the media subsystem to start fetching the resource
    fn begin_load(&self, url: &str);

    /// Current readiness level as known to the media subsystem
    fn readiness(&self) -> ReadinessLevel;

    /// Try to start playback. An `Err` means playback was refused (autoplay
    /// policy); the caller treats that as non-fatal.
    fn attempt_playback(&self) -> Result<(), String>;
}

/// In-memory media source whose readiness is scripted by the test
pub struct SimulatedMedia {
    readiness: Mutex<ReadinessLevel>,
    last_url: Mutex<Option<String>>,
    reject_playback: AtomicBool,
    playing: AtomicBool,
    load_requests: AtomicU32,
}

impl SimulatedMedia {
    pub fn new() -> Self {
        Self {
            readiness: Mutex::new(ReadinessLevel::NOTHING),
            last_url: Mutex::new(None),
            reject_playback: AtomicBool::new(false),
            playing: AtomicBool::new(false),
            load_requests: AtomicU32::new(0),
        }
    }

    /// Script the readiness the source will report from now on
    pub fn set_readiness(&self, level: ReadinessLevel) {
        let mut r = self.readiness.lock().unwrap();
        *r = level;
    }

    /// Make subsequent playback attempts fail, simulating autoplay policy
    pub fn reject_playback(&self, reject: bool) {
        self.reject_playback.store(reject, Ordering::SeqCst);
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    /// Number of times a load was requested
    pub fn load_requests(&self) -> u32 {
        self.load_requests.load(Ordering::SeqCst)
    }

    /// URL passed to the most recent load request
    pub fn last_url(&self) -> Option<String> {
        self.last_url.lock().unwrap().clone()
    }
}

impl Default for SimulatedMedia {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaSource for SimulatedMedia {
    fn begin_load(&self, url: &str) {
        self.load_requests.fetch_add(1, Ordering::SeqCst);
        let mut u = self.last_url.lock().unwrap();
        *u = Some(url.to_string());
        self.playing.store(false, Ordering::SeqCst);
    }

    fn readiness(&self) -> ReadinessLevel {
        *self.readiness.lock().unwrap()
    }

    fn attempt_playback(&self) -> Result<(), String> {
        if self.reject_playback.load(Ordering::SeqCst) {
            return Err("autoplay prevented".to_string());
        }
        self.playing.store(true, Ordering::SeqCst);
        Ok(())
    }
}
