//! Error taxonomy for a send attempt.
//!
//! Every failure that can happen between "here are some capture bytes" and
//! "the receiver has the photo" is one [`TransferError`] variant. Module-local
//! errors ([`BackendError`](crate::imaging::BackendError),
//! [`ConfigError`](crate::config::ConfigError)) stay where they are raised and
//! convert into this type at the coordinator boundary, where they end up as a
//! [`TransferResult::Failure`](crate::types::TransferResult::Failure).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransferError {
    /// The address string does not describe a usable endpoint.
    #[error("invalid address format: {0}")]
    InvalidAddressFormat(String),

    /// The capture could not be decoded or re-encoded.
    #[error("image decode error: {0}")]
    ImageDecode(String),

    /// The receiver could not be reached (resolution, refusal, timeout).
    #[error("could not connect to {endpoint}: {reason}")]
    Connection { endpoint: String, reason: String },

    /// The connection was established but a read or write failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The HTTP receiver answered with a non-2xx status.
    #[error("{}", http_status_message(.status, .body))]
    HttpStatus { status: u16, body: String },

    /// The capture source could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    UnreadableSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Another send of the same image is still running.
    #[error("a transfer of this image is already in progress")]
    Busy,
}

fn http_status_message(status: &u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("server responded with HTTP {status}")
    } else {
        format!("server responded with HTTP {status}: {body}")
    }
}

impl TransferError {
    /// HTTP status code, when the receiver produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransferError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_message_includes_body() {
        let err = TransferError::HttpStatus {
            status: 400,
            body: "{\"error\": \"no file\"}\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "server responded with HTTP 400: {\"error\": \"no file\"}"
        );
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn http_status_message_without_body() {
        let err = TransferError::HttpStatus {
            status: 503,
            body: "   ".to_string(),
        };
        assert_eq!(err.to_string(), "server responded with HTTP 503");
    }

    #[test]
    fn status_is_none_for_other_errors() {
        assert_eq!(TransferError::Busy.status(), None);
    }

    #[test]
    fn unreadable_source_names_the_path() {
        let err = TransferError::UnreadableSource {
            path: PathBuf::from("/photos/missing.jpg"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file"),
        };
        assert_eq!(err.to_string(), "cannot read /photos/missing.jpg: No such file");
    }
}
