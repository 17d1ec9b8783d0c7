//! Capture preprocessing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Bound** | [`calculate_bounded_dimensions`] (width ≤ 1280 by default) |
//! | **Re-encode** | `image` resize + JPEG encoder at quality 80 |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: [`ImageProcessor`], combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::calculate_bounded_dimensions;
pub use operations::{ImageProcessor, ProcessConfig, plan_encode, read_capture};
pub use params::{EncodeParams, Quality};
pub use rust_backend::RustBackend;
