//! Multipart HTTP upload transport.
//!
//! Sends the payload as one `multipart/form-data` part:
//!
//! ```text
//! POST http://{host}:{port}/upload
//! Content-Disposition: form-data; name="file"; filename="foto.jpg"
//! Content-Type: image/jpeg
//! ```
//!
//! Any 2xx status is success. Everything else, redirects included, is a
//! failure carrying the status code. A success body may carry
//! `{"filename": "..."}`, the name the receiver stored the photo under; a
//! body that isn't that shape is ignored rather than failing an upload the
//! server already accepted.
//!
//! The request body is handed to reqwest in one piece, so progress is coarse:
//! `Sending` when the request starts and a single 100 % event once the
//! server has answered with 2xx.

use std::io;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::redirect::Policy;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{Delivery, Transport};
use crate::address::TransferTarget;
use crate::config::CourierConfig;
use crate::error::TransferError;
use crate::imaging::rust_backend::OUTPUT_MIME;
use crate::session::TransferSession;
use crate::types::ProgressSink;

#[derive(Debug, Clone)]
pub struct HttpMultipartTransport {
    timeout: Duration,
    upload_path: String,
    field_name: String,
    filename: String,
}

impl Default for HttpMultipartTransport {
    fn default() -> Self {
        Self::from_config(&CourierConfig::default())
    }
}

/// Success body shape. Other fields are allowed and ignored.
#[derive(Debug, Deserialize)]
struct UploadReply {
    filename: Option<String>,
}

/// Extract the stored filename from a success body, if there is one.
pub fn parse_filename(body: &str) -> Option<String> {
    match serde_json::from_str::<UploadReply>(body) {
        Ok(reply) => reply.filename,
        Err(e) => {
            debug!(error = %e, "upload response is not the expected JSON");
            None
        }
    }
}

impl HttpMultipartTransport {
    pub fn from_config(config: &CourierConfig) -> Self {
        Self {
            timeout: config.network.http_timeout(),
            upload_path: config.http.upload_path.clone(),
            field_name: config.http.field_name.clone(),
            filename: config.http.filename.clone(),
        }
    }

    fn upload(&self, target: &TransferTarget, payload: &[u8]) -> Result<Option<String>, TransferError> {
        let endpoint = target.endpoint();
        let request_error = |e: reqwest::Error| {
            if e.is_connect() || e.is_timeout() {
                TransferError::Connection {
                    endpoint: endpoint.clone(),
                    reason: e.to_string(),
                }
            } else {
                TransferError::Io(io::Error::other(e))
            }
        };

        // Redirects are not followed: a 3xx is reported as its status.
        let client = Client::builder()
            .connect_timeout(self.timeout)
            .timeout(self.timeout)
            .redirect(Policy::none())
            .no_proxy()
            .build()
            .map_err(&request_error)?;

        let part = Part::bytes(payload.to_vec())
            .file_name(self.filename.clone())
            .mime_str(OUTPUT_MIME)
            .map_err(&request_error)?;
        let form = Form::new().part(self.field_name.clone(), part);

        let url = target.upload_url(&self.upload_path);
        debug!(%url, bytes = payload.len(), "posting upload");
        let response = client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(&request_error)?;

        let status = response.status();
        // An unreadable body only costs the filename on success.
        let body = response.text().unwrap_or_default();
        if status.is_success() {
            Ok(parse_filename(&body))
        } else {
            Err(TransferError::HttpStatus {
                status: status.as_u16(),
                body,
            })
        }
    }
}

impl Transport for HttpMultipartTransport {
    fn send(
        &self,
        target: &TransferTarget,
        payload: &[u8],
        sink: &dyn ProgressSink,
    ) -> Result<Delivery, TransferError> {
        let mut session = TransferSession::new(payload.len() as u64, sink);
        session.connecting(target.endpoint());
        session.sending();

        let outcome = self.upload(target, payload).map(|filename| {
            session.record(payload.len());
            Delivery {
                bytes_sent: payload.len() as u64,
                filename,
            }
        });

        match &outcome {
            Ok(delivery) => info!(
                endpoint = %target.endpoint(),
                bytes = delivery.bytes_sent,
                filename = delivery.filename.as_deref().unwrap_or("-"),
                "upload complete"
            ),
            Err(e) => warn!(endpoint = %target.endpoint(), error = %e, "upload failed"),
        }
        session.finish(&outcome);
        outcome
    }
}
