//! Shared types passed between the processor, transports, coordinator and
//! whoever drives them.

use crate::error::TransferError;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;

static NEXT_ASSET_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an [`ImageAsset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(u64);

/// An encoded image ready to send.
///
/// Immutable: processing builds a new asset instead of changing one, and
/// each new asset gets a fresh [`AssetId`].
#[derive(Debug)]
pub struct ImageAsset {
    id: AssetId,
    bytes: Vec<u8>,
    width: u32,
    height: u32,
    mime: &'static str,
}

impl ImageAsset {
    pub fn new(bytes: Vec<u8>, width: u32, height: u32, mime: &'static str) -> Self {
        Self {
            id: AssetId(NEXT_ASSET_ID.fetch_add(1, Ordering::Relaxed)),
            bytes,
            width,
            height,
            mime,
        }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }
}

/// Lifecycle of one send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    Preparing,
    Connecting,
    Sending,
    Completed,
    Failed,
}

impl TransferState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TransferState::Completed | TransferState::Failed)
    }
}

/// Progress notification delivered to the initiating context.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferEvent {
    /// The send was accepted and the capture is being processed.
    Preparing,
    /// Processing finished; the payload that will go on the wire.
    ImageReady {
        width: u32,
        height: u32,
        encoded_bytes: usize,
    },
    Connecting {
        endpoint: String,
    },
    Sending {
        total_bytes: u64,
    },
    Progress {
        bytes_sent: u64,
        total_bytes: u64,
        /// Percentage rounded to one decimal place.
        percent: f32,
    },
    Completed {
        bytes_sent: u64,
    },
    Failed {
        reason: String,
    },
}

/// Where a running send reports its events.
///
/// Implementations must not block: the sender is the worker thread and the
/// receiver lives in another context.
pub trait ProgressSink: Sync {
    fn emit(&self, event: TransferEvent);
}

impl ProgressSink for mpsc::Sender<TransferEvent> {
    fn emit(&self, event: TransferEvent) {
        // A dropped receiver just means nobody is watching anymore.
        let _ = self.send(event);
    }
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn emit(&self, _event: TransferEvent) {}
}

/// Terminal outcome of one send.
#[derive(Debug)]
pub enum TransferResult {
    Success {
        bytes_sent: u64,
        /// Name the receiver stored the photo under, when it said so.
        filename: Option<String>,
    },
    Failure(TransferError),
}

impl TransferResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferResult::Success { .. })
    }

    pub fn filename(&self) -> Option<&str> {
        match self {
            TransferResult::Success { filename, .. } => filename.as_deref(),
            TransferResult::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&TransferError> {
        match self {
            TransferResult::Success { .. } => None,
            TransferResult::Failure(err) => Some(err),
        }
    }
}

impl fmt::Display for TransferResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferResult::Success {
                filename: Some(name),
                ..
            } => write!(f, "photo sent, stored as {name}"),
            TransferResult::Success { filename: None, .. } => f.write_str("photo sent"),
            TransferResult::Failure(err) => write!(f, "send failed: {err}"),
        }
    }
}
