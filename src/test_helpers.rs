//! Shared test utilities for the snapcourier test suite.
//!
//! Provides synthetic capture buffers (real encoded images built in memory)
//! and a sink that records every event it receives.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let capture = synthetic_jpeg(1600, 1200);
//! let sink = RecordingSink::default();
//! // ... run a send with &sink ...
//! assert!(sink.events().contains(&TransferEvent::Preparing));
//! ```

use std::io::Cursor;
use std::sync::Mutex;

use image::{ImageEncoder, RgbImage, RgbaImage};

use crate::types::{ProgressSink, TransferEvent};

// =========================================================================
// Synthetic captures
// =========================================================================

/// Encode a gradient of the given size as JPEG bytes.
pub fn synthetic_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// Encode a half-transparent gradient as PNG bytes (exercises alpha dropping).
pub fn synthetic_png_rgba(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 64, 128])
    });
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(Cursor::new(&mut buf))
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgba8)
        .unwrap();
    buf
}

/// Dimensions of an encoded buffer, panicking if it doesn't decode.
pub fn decoded_dimensions(bytes: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(bytes).expect("buffer should decode");
    (img.width(), img.height())
}

// =========================================================================
// Event recording
// =========================================================================

/// Sink that keeps every event, in order.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<TransferEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<TransferEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Percentages of all `Progress` events, in order.
    pub fn percents(&self) -> Vec<f32> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                TransferEvent::Progress { percent, .. } => Some(percent),
                _ => None,
            })
            .collect()
    }

    /// Number of `Completed` plus `Failed` events.
    pub fn terminal_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    TransferEvent::Completed { .. } | TransferEvent::Failed { .. }
                )
            })
            .count()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: TransferEvent) {
        self.events.lock().unwrap().push(event);
    }
}
