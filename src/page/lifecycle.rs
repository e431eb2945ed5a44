/// Page lifecycle gate: defer work until the document is ready
use crate::{Error, Result};

/// Document parse/load progress, as hosts typically report it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentReadyState {
    Loading,
    Interactive,
    Complete,
}

/// Queues callbacks until the page signals ready, then runs them in
/// registration order. Callbacks registered after the signal run immediately.
/// Repeat ready signals are no-ops, so redundant notifications from the host
/// cannot re-run work.
pub struct ReadyGate {
    ready: bool,
    pending: Vec<Box<dyn FnOnce() + Send>>,
}

impl ReadyGate {
    pub fn new() -> Self {
        Self {
            ready: false,
            pending: Vec::new(),
        }
    }

    /// Gate that is already open unless the document is still loading
    pub fn with_state(state: DocumentReadyState) -> Self {
        Self {
            ready: state != DocumentReadyState::Loading,
            pending: Vec::new(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Run `f` now if the page is ready, otherwise defer it
    pub fn schedule<F>(&mut self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.ready {
            f();
        } else {
            self.pending.push(Box::new(f));
        }
    }

    /// The host's ready notification. Drains deferred callbacks exactly once.
    pub fn signal_ready(&mut self) {
        if self.ready {
            return;
        }
        self.ready = true;
        for f in self.pending.drain(..) {
            f();
        }
    }

    /// Number of callbacks still waiting for the signal
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl Default for ReadyGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a host-reported ready state string
pub fn parse_ready_state(s: &str) -> Result<DocumentReadyState> {
    match s {
        "loading" => Ok(DocumentReadyState::Loading),
        "interactive" => Ok(DocumentReadyState::Interactive),
        "complete" => Ok(DocumentReadyState::Complete),
        other => Err(Error::Other(format!("unknown ready state: {}", other))),
    }
}
