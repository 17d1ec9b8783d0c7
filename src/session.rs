//! Per-send byte counters and state machine.
//!
//! A [`TransferSession`] is created by a transport at the start of a send and
//! dropped when the send returns. It is never shared: each send owns its own
//! counters. State changes and progress are forwarded to the sink as
//! [`TransferEvent`]s.
//!
//! ```text
//! Preparing → Connecting → Sending → Completed
//!      └───────────┴──────────┴────→ Failed
//! ```
//!
//! Terminal states absorb: once `Completed` or `Failed`, further transitions
//! are ignored, so a session reports exactly one terminal event.

use crate::error::TransferError;
use crate::types::{ProgressSink, TransferEvent, TransferState};

pub struct TransferSession<'a> {
    total_bytes: u64,
    bytes_sent: u64,
    state: TransferState,
    sink: &'a dyn ProgressSink,
}

impl<'a> TransferSession<'a> {
    pub fn new(total_bytes: u64, sink: &'a dyn ProgressSink) -> Self {
        Self {
            total_bytes,
            bytes_sent: 0,
            state: TransferState::Preparing,
            sink,
        }
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    pub fn connecting(&mut self, endpoint: String) {
        if self.enter(TransferState::Connecting) {
            self.sink.emit(TransferEvent::Connecting { endpoint });
        }
    }

    pub fn sending(&mut self) {
        if self.enter(TransferState::Sending) {
            self.sink.emit(TransferEvent::Sending {
                total_bytes: self.total_bytes,
            });
        }
    }

    /// Count `n` more bytes as written and report progress.
    pub fn record(&mut self, n: usize) {
        if self.state != TransferState::Sending {
            return;
        }
        self.bytes_sent = (self.bytes_sent + n as u64).min(self.total_bytes);
        self.sink.emit(TransferEvent::Progress {
            bytes_sent: self.bytes_sent,
            total_bytes: self.total_bytes,
            percent: percent(self.bytes_sent, self.total_bytes),
        });
    }

    /// Close the session according to the send's outcome.
    pub fn finish<T>(&mut self, outcome: &Result<T, TransferError>) {
        match outcome {
            Ok(_) => {
                if self.enter(TransferState::Completed) {
                    self.sink.emit(TransferEvent::Completed {
                        bytes_sent: self.bytes_sent,
                    });
                }
            }
            Err(err) => {
                if self.enter(TransferState::Failed) {
                    self.sink.emit(TransferEvent::Failed {
                        reason: err.to_string(),
                    });
                }
            }
        }
    }

    fn enter(&mut self, next: TransferState) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = next;
        true
    }
}

/// `sent / total * 100`, rounded to one decimal. An empty payload is 100 %.
pub fn percent(sent: u64, total: u64) -> f32 {
    if total == 0 {
        return 100.0;
    }
    ((sent as f64 / total as f64 * 1000.0).round() / 10.0) as f32
}
