//! High-level image operations.
//!
//! [`ImageProcessor`] combines the dimension math with backend execution:
//! identify the capture, decide the bounded output size, ask the backend to
//! produce the JPEG, and wrap the result in an [`ImageAsset`].

use super::backend::{BackendError, ImageBackend};
use super::calculations::calculate_bounded_dimensions;
use super::params::{EncodeParams, Quality};
use super::rust_backend::{OUTPUT_MIME, RustBackend};
use crate::config::ImageConfig;
use crate::error::TransferError;
use crate::types::ImageAsset;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

impl From<BackendError> for TransferError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Io(e) => TransferError::ImageDecode(e.to_string()),
            BackendError::Decode(msg) | BackendError::ProcessingFailed(msg) => {
                TransferError::ImageDecode(msg)
            }
        }
    }
}

/// Configuration for capture preprocessing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessConfig {
    pub max_width: u32,
    pub quality: Quality,
}

impl ProcessConfig {
    pub fn from_image_config(config: &ImageConfig) -> Self {
        Self {
            max_width: config.max_width,
            quality: Quality::new(config.quality),
        }
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self::from_image_config(&ImageConfig::default())
    }
}

/// Plan an encode without executing it.
///
/// Useful for testing parameter generation.
pub fn plan_encode<'a>(
    source: &'a [u8],
    original: (u32, u32),
    config: &ProcessConfig,
) -> EncodeParams<'a> {
    let (width, height) = calculate_bounded_dimensions(original, config.max_width);
    EncodeParams {
        source,
        width,
        height,
        quality: config.quality,
    }
}

/// Turns capture bytes into a bounded-size JPEG [`ImageAsset`].
pub struct ImageProcessor<B: ImageBackend = RustBackend> {
    backend: B,
    config: ProcessConfig,
}

impl ImageProcessor<RustBackend> {
    pub fn new(config: ProcessConfig) -> Self {
        Self::with_backend(RustBackend::new(), config)
    }
}

impl Default for ImageProcessor<RustBackend> {
    fn default() -> Self {
        Self::new(ProcessConfig::default())
    }
}

impl<B: ImageBackend> ImageProcessor<B> {
    pub fn with_backend(backend: B, config: ProcessConfig) -> Self {
        Self { backend, config }
    }

    /// Decode, downscale if wider than the bound, and re-encode.
    pub fn process(&self, capture: &[u8]) -> Result<ImageAsset> {
        let dims = self.backend.identify(capture)?;
        let params = plan_encode(capture, (dims.width, dims.height), &self.config);
        let encoded = self.backend.encode(&params)?;
        Ok(ImageAsset::new(
            encoded,
            params.width,
            params.height,
            OUTPUT_MIME,
        ))
    }
}

/// Read a capture from disk.
pub fn read_capture(path: &Path) -> std::result::Result<Vec<u8>, TransferError> {
    std::fs::read(path).map_err(|source| TransferError::UnreadableSource {
        path: path.to_path_buf(),
        source,
    })
}
