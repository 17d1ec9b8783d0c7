//! Delivery strategies.
//!
//! Both transports implement [`Transport`] and are picked by the target's
//! [`Scheme`](crate::address::Scheme):
//!
//! | Scheme | Transport | Wire |
//! |---|---|---|
//! | `raw` | [`RawSocketTransport`] | `[u32 BE length][payload]` over TCP |
//! | `http` | [`HttpMultipartTransport`] | `POST /upload`, multipart field `file` |
//!
//! A transport owns the [`TransferSession`](crate::session::TransferSession)
//! for the duration of one `send` and always leaves it terminal, so every
//! call reports exactly one `Completed` or `Failed` event.

pub mod http;
pub mod raw;

pub use http::HttpMultipartTransport;
pub use raw::RawSocketTransport;

use crate::address::TransferTarget;
use crate::error::TransferError;
use crate::types::ProgressSink;

/// What a successful send reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub bytes_sent: u64,
    /// Filename the receiver reported, if any.
    pub filename: Option<String>,
}

/// One way of getting a payload to a receiver.
///
/// Implementations make a single attempt and block until it finishes.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        target: &TransferTarget,
        payload: &[u8],
        sink: &dyn ProgressSink,
    ) -> Result<Delivery, TransferError>;
}
