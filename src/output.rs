//! CLI output formatting for transfers.
//!
//! # Output Format
//!
//! ## Send
//!
//! ```text
//! Processing image...
//! Image ready: 1280x960 (211 KB)
//! Connecting to 192.168.0.10:5000...
//! Sending image (211 KB)...
//! Sending: 10.0%
//! Sending: 20.1%
//! ...
//! Sending: 100.0%
//! Photo sent successfully
//!     Stored as: photo_20240101_120000.jpg
//! ```
//!
//! ## Prepare
//!
//! ```text
//! Prepared 1280x960 JPEG (211 KB)
//!     Output: out.jpg
//! ```
//!
//! # Architecture
//!
//! Each piece has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects. Logs go through `tracing`
//! to stderr and never mix with these lines.

use crate::types::{ImageAsset, TransferEvent, TransferResult};
use std::path::Path;

/// Progress lines are printed at most once per this many percent.
const PROGRESS_STEP: f32 = 10.0;

/// Whole kilobytes, rounded down.
fn kb(bytes: u64) -> u64 {
    bytes / 1024
}

// ============================================================================
// Transfer events
// ============================================================================

/// Format a single transfer event as display lines.
pub fn format_event(event: &TransferEvent) -> Vec<String> {
    match event {
        TransferEvent::Preparing => vec!["Processing image...".to_string()],
        TransferEvent::ImageReady {
            width,
            height,
            encoded_bytes,
        } => vec![format!(
            "Image ready: {}x{} ({} KB)",
            width,
            height,
            kb(*encoded_bytes as u64)
        )],
        TransferEvent::Connecting { endpoint } => vec![format!("Connecting to {}...", endpoint)],
        TransferEvent::Sending { total_bytes } => {
            vec![format!("Sending image ({} KB)...", kb(*total_bytes))]
        }
        TransferEvent::Progress { percent, .. } => vec![format!("Sending: {:.1}%", percent)],
        // The final result line covers both outcomes.
        TransferEvent::Completed { .. } | TransferEvent::Failed { .. } => Vec::new(),
    }
}

/// Drops progress lines that don't advance by at least [`PROGRESS_STEP`].
///
/// A raw send of a 1 MB photo emits ~250 progress events; the terminal only
/// needs a handful. The last (100 %) event always gets through.
#[derive(Debug, Default)]
pub struct EventPrinter {
    last_printed: Option<f32>,
}

impl EventPrinter {
    pub fn format(&mut self, event: &TransferEvent) -> Vec<String> {
        if let TransferEvent::Progress { percent, .. } = event {
            let due = match self.last_printed {
                None => true,
                Some(last) => *percent >= 100.0 || *percent - last >= PROGRESS_STEP,
            };
            if !due {
                return Vec::new();
            }
            self.last_printed = Some(*percent);
        }
        format_event(event)
    }

    pub fn print(&mut self, event: &TransferEvent) {
        for line in self.format(event) {
            println!("{}", line);
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// Format the final outcome of a send.
pub fn format_result(result: &TransferResult) -> Vec<String> {
    match result {
        TransferResult::Success { filename, .. } => {
            let mut lines = vec!["Photo sent successfully".to_string()];
            if let Some(name) = filename {
                lines.push(format!("    Stored as: {}", name));
            }
            lines
        }
        TransferResult::Failure(err) => vec![format!("Send failed: {}", err)],
    }
}

pub fn print_result(result: &TransferResult) {
    for line in format_result(result) {
        println!("{}", line);
    }
}

/// Format the summary of a local `prepare` run.
pub fn format_prepare_output(asset: &ImageAsset, out: &Path) -> Vec<String> {
    vec![
        format!(
            "Prepared {}x{} JPEG ({} KB)",
            asset.width(),
            asset.height(),
            kb(asset.len() as u64)
        ),
        format!("    Output: {}", out.display()),
    ]
}

pub fn print_prepare_output(asset: &ImageAsset, out: &Path) {
    for line in format_prepare_output(asset, out) {
        println!("{}", line);
    }
}
