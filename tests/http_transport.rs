//! HTTP multipart transport against a minimal loopback responder.

mod common;

use std::sync::mpsc;

use common::{closed_port, http_responder, http_responder_with_headers};
use snapcourier::address::{AddressParser, Scheme, TransferTarget};
use snapcourier::error::TransferError;
use snapcourier::transport::{HttpMultipartTransport, Transport};
use snapcourier::types::{NoProgress, TransferEvent};

fn target(port: u16) -> TransferTarget {
    AddressParser::default()
        .parse(&format!("127.0.0.1:{port}/"), Scheme::Http)
        .unwrap()
}

const PAYLOAD: &[u8] = b"\xFF\xD8\xFF\xE0 pretend jpeg \xFF\xD9";

#[test]
fn success_with_filename() {
    let (port, server) = http_responder("200 OK", r#"{"filename": "abc.jpg"}"#);

    let delivery = HttpMultipartTransport::default()
        .send(&target(port), PAYLOAD, &NoProgress)
        .unwrap();

    assert_eq!(delivery.filename.as_deref(), Some("abc.jpg"));
    assert_eq!(delivery.bytes_sent, PAYLOAD.len() as u64);
    server.join().unwrap();
}

#[test]
fn request_is_one_multipart_file_part() {
    let (port, server) = http_responder("201 Created", "{}");

    HttpMultipartTransport::default()
        .send(&target(port), PAYLOAD, &NoProgress)
        .unwrap();
    let request = server.join().unwrap();

    assert!(
        request.request_line().starts_with("POST /upload HTTP/1.1"),
        "{}",
        request.request_line()
    );
    let content_type = request.header("content-type").unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));

    let body = request.body_text();
    assert!(body.contains(r#"name="file""#), "{body}");
    assert!(body.contains(r#"filename="foto.jpg""#), "{body}");
    assert!(body.contains("image/jpeg"), "{body}");
    assert!(request.body_contains(PAYLOAD));
}

#[test]
fn server_error_is_http_status_failure() {
    let (port, server) = http_responder("500 Internal Server Error", r#"{"error": "disk full"}"#);

    let err = HttpMultipartTransport::default()
        .send(&target(port), PAYLOAD, &NoProgress)
        .unwrap_err();
    server.join().unwrap();

    assert_eq!(err.status(), Some(500));
    match err {
        TransferError::HttpStatus { body, .. } => assert!(body.contains("disk full")),
        other => panic!("expected HTTP status error, got {other:?}"),
    }
}

#[test]
fn redirect_is_a_failure_not_followed() {
    let (port, server) =
        http_responder_with_headers("302 Found", &[("Location", "/elsewhere")], "");
    let (tx, rx) = mpsc::channel();

    let err = HttpMultipartTransport::default()
        .send(&target(port), PAYLOAD, &tx)
        .unwrap_err();
    drop(tx);
    let request = server.join().unwrap();

    assert_eq!(err.status(), Some(302), "{err:?}");
    assert!(request.request_line().starts_with("POST /upload "));
    let events: Vec<TransferEvent> = rx.iter().collect();
    assert!(matches!(events.last(), Some(TransferEvent::Failed { .. })));
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, TransferEvent::Completed { .. } | TransferEvent::Progress { .. }))
    );
}

#[test]
fn malformed_success_body_still_succeeds() {
    let (port, server) = http_responder("200 OK", "stored, thanks");

    let delivery = HttpMultipartTransport::default()
        .send(&target(port), PAYLOAD, &NoProgress)
        .unwrap();
    server.join().unwrap();

    assert_eq!(delivery.filename, None);
}

#[test]
fn progress_is_sending_then_complete() {
    let (port, server) = http_responder("200 OK", r#"{"filename": "x.jpg"}"#);
    let (tx, rx) = mpsc::channel();

    HttpMultipartTransport::default()
        .send(&target(port), PAYLOAD, &tx)
        .unwrap();
    drop(tx);
    server.join().unwrap();

    let total = PAYLOAD.len() as u64;
    let events: Vec<TransferEvent> = rx.iter().collect();
    assert!(matches!(events[0], TransferEvent::Connecting { .. }));
    assert_eq!(
        &events[1..],
        &[
            TransferEvent::Sending { total_bytes: total },
            TransferEvent::Progress {
                bytes_sent: total,
                total_bytes: total,
                percent: 100.0
            },
            TransferEvent::Completed { bytes_sent: total },
        ]
    );
}

#[test]
fn nothing_listening_is_connection_error() {
    let err = HttpMultipartTransport::default()
        .send(&target(closed_port()), PAYLOAD, &NoProgress)
        .unwrap_err();
    assert!(matches!(err, TransferError::Connection { .. }), "{err:?}");
}
