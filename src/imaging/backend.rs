//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the processor needs:
//! identify (read dimensions from the header) and encode (decode, resize,
//! re-encode as JPEG). Both work on in-memory buffers; captures never touch
//! the filesystem on their way to the wire.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::EncodeParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Send + Sync` so one backend can serve every worker thread.
pub trait ImageBackend: Send + Sync {
    /// Read image dimensions without decoding pixel data.
    fn identify(&self, source: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode `params.source`, scale to the requested size, and encode as JPEG.
    fn encode(&self, params: &EncodeParams<'_>) -> Result<Vec<u8>, BackendError>;
}
