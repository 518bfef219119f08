//! Preview state with last-write-wins by initiation order.
//!
//! Spec edits trigger one execution each without cancelling whatever is in
//! flight, so a slow stale response can resolve after a fast fresh one.
//! Each execution takes a monotonically increasing sequence number at
//! initiation; a response is applied only if its number is still the latest
//! issued, so completion order cannot make the preview flicker backwards.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::report::QuerySpec;

use super::executor::QueryExecutor;
use super::row::Row;

/// The preview currently on display.
#[derive(Debug, Clone, Default)]
pub struct PreviewState {
    /// Sequence number of the execution that produced this state.
    pub seq: u64,
    /// Result rows; empty after a failed execution.
    pub rows: Vec<Row>,
    /// Inline error message from a failed execution.
    pub error: Option<String>,
}

/// Serializes preview updates for one builder session.
pub struct PreviewSession {
    executor: Arc<QueryExecutor>,
    issued: AtomicU64,
    state: Mutex<PreviewState>,
}

impl PreviewSession {
    pub fn new(executor: Arc<QueryExecutor>) -> Self {
        Self {
            executor,
            issued: AtomicU64::new(0),
            state: Mutex::new(PreviewState::default()),
        }
    }

    /// Execute `spec` and apply the result if no newer execution has been
    /// initiated meanwhile. Returns the applied state, or `None` when the
    /// response was stale and discarded.
    pub async fn refresh(&self, spec: &QuerySpec) -> Option<PreviewState> {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.executor.execute(spec).await;

        let mut state = self.state.lock().await;
        if self.issued.load(Ordering::SeqCst) != seq || state.seq > seq {
            tracing::debug!(seq, "stale preview response discarded");
            return None;
        }

        *state = match result {
            Ok(rows) => PreviewState {
                seq,
                rows,
                error: None,
            },
            Err(e) => {
                tracing::warn!(seq, error = %e, "preview execution failed");
                PreviewState {
                    seq,
                    rows: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        };
        Some(state.clone())
    }

    /// The preview currently on display.
    pub async fn current(&self) -> PreviewState {
        self.state.lock().await.clone()
    }
}
