//! Readiness gate for the Discord session.
//!
//! Starts closed. The background connect task opens it exactly once by
//! handing over the session; it never closes again.

use std::sync::{Arc, OnceLock};

use log::warn;

use crate::error::ToolError;

pub struct ReadinessGate<S> {
    session: OnceLock<Arc<S>>,
}

impl<S> Default for ReadinessGate<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> ReadinessGate<S> {
    pub fn new() -> Self {
        Self {
            session: OnceLock::new(),
        }
    }

    /// A gate that is already open, for tests and embedders.
    pub fn ready(session: Arc<S>) -> Self {
        let gate = Self::new();
        gate.open(session);
        gate
    }

    pub fn is_ready(&self) -> bool {
        self.session.get().is_some()
    }

    /// Capture the session. Returns false if the gate was already open,
    /// in which case the original session is kept.
    pub fn open(&self, session: Arc<S>) -> bool {
        if self.session.set(session).is_err() {
            warn!("Readiness gate already open; ignoring second session");
            return false;
        }
        true
    }

    pub fn session(&self) -> Result<Arc<S>, ToolError> {
        self.session.get().cloned().ok_or(ToolError::ClientNotReady)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_starts_closed() {
        let gate: ReadinessGate<u8> = ReadinessGate::new();
        assert!(!gate.is_ready());
        assert!(matches!(gate.session(), Err(ToolError::ClientNotReady)));
    }

    #[test]
    fn test_gate_opens_once() {
        let gate = ReadinessGate::new();
        assert!(gate.open(Arc::new(1u8)));
        assert!(gate.is_ready());
        assert!(!gate.open(Arc::new(2u8)));
        assert_eq!(*gate.session().unwrap(), 1);
    }
}
