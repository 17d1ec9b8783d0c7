//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how*. They are the interface
//! between [`operations`](super::operations), which decides the output size,
//! and the [`backend`](super::backend), which does the pixel work.
//!
//! - [`Quality`]: JPEG quality (1–100, default 80). Clamped on construction.
//! - [`EncodeParams`]: source buffer, target dimensions, quality.

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// Parameters for a decode → resize → JPEG encode pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeParams<'a> {
    /// Encoded capture bytes, any supported input format.
    pub source: &'a [u8],
    /// Output dimensions. Equal to the source's when no downscale is needed.
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}
