//! Append-only run log
//!
//! Every decision and action taken in a run lands here, in order. The log
//! is rendered to text at run end and optionally uploaded to durable
//! storage for review.

use std::sync::{Mutex, PoisonError};

use keyrotor_domain::{RunEvent, RunEventKind};

/// Append-only record of a rotation run
///
/// Appends are serialized behind a single writer, so the sequential
/// pipeline and any future per-principal parallelism share the same sink.
#[derive(Default)]
pub struct RunLog {
    events: Mutex<Vec<RunEvent>>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event, mirroring it to the tracing log.
    pub fn record(&self, account: &str, principal: &str, kind: RunEventKind) {
        tracing::info!(account, principal, "{}", kind);
        let event = RunEvent::now(account, principal, kind);
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the recorded events, in append order.
    pub fn events(&self) -> Vec<RunEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Render the log as upload-ready text, one line per event.
    pub fn render(&self) -> String {
        let events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        let mut out = String::new();
        for event in events.iter() {
            out.push_str(&event.render());
            out.push('\n');
        }
        out
    }
}
