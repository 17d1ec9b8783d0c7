//! Loopback receivers shared by the integration tests.
//!
//! Each receiver accepts exactly one connection on an ephemeral port and
//! hands back what it saw through a join handle.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use image::{ImageEncoder, RgbImage};

/// Encode a gradient of the given size as JPEG bytes.
pub fn synthetic_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 96])
    });
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

fn bind() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

/// A port with nothing listening on it.
pub fn closed_port() -> u16 {
    let (_listener, port) = bind();
    port
}

// =========================================================================
// Raw receiver
// =========================================================================

/// Reads one `[u32 BE length][payload]` frame, the way the receiver does,
/// and returns the payload.
pub fn raw_receiver() -> (u16, JoinHandle<Vec<u8>>) {
    let (listener, port) = bind();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut header = [0u8; 4];
        stream.read_exact(&mut header).unwrap();
        let len = u32::from_be_bytes(header) as usize;
        let mut payload = vec![0u8; len];
        stream.read_exact(&mut payload).unwrap();

        // Nothing may follow the payload.
        let mut trailing = Vec::new();
        stream.read_to_end(&mut trailing).unwrap();
        assert!(trailing.is_empty(), "{} unexpected trailing bytes", trailing.len());
        payload
    });
    (port, handle)
}

// =========================================================================
// HTTP responder
// =========================================================================

/// One request as the responder received it.
pub struct CapturedRequest {
    /// Request line and headers, CRLF separated.
    pub head: String,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim())
        })
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Whether `needle` occurs anywhere in the body.
    pub fn body_contains(&self, needle: &[u8]) -> bool {
        !needle.is_empty() && self.body.windows(needle.len()).any(|w| w == needle)
    }
}

/// Answers one request with `status` (e.g. `"200 OK"`) and `body`.
pub fn http_responder(status: &'static str, body: &'static str) -> (u16, JoinHandle<CapturedRequest>) {
    http_responder_with_headers(status, &[], body)
}

/// Like [`http_responder`], with extra response headers.
///
/// Only the first connection is served: a client that follows up with a
/// second request gets a refused connection once the listener is dropped.
pub fn http_responder_with_headers(
    status: &'static str,
    headers: &'static [(&'static str, &'static str)],
    body: &'static str,
) -> (u16, JoinHandle<CapturedRequest>) {
    let (listener, port) = bind();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        drop(listener);
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let request = read_request(&mut reader);
        respond(stream, status, headers, body);
        request
    });
    (port, handle)
}

fn read_request(reader: &mut BufReader<TcpStream>) -> CapturedRequest {
    let mut head = String::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        if line == "\r\n" || line.is_empty() {
            break;
        }
        head.push_str(&line);
    }
    let mut request = CapturedRequest {
        head,
        body: Vec::new(),
    };

    if let Some(len) = request.header("content-length") {
        let mut body = vec![0u8; len.parse().unwrap()];
        reader.read_exact(&mut body).unwrap();
        request.body = body;
    } else if request
        .header("transfer-encoding")
        .is_some_and(|te| te.eq_ignore_ascii_case("chunked"))
    {
        request.body = read_chunked(reader);
    }
    request
}

fn read_chunked(reader: &mut BufReader<TcpStream>) -> Vec<u8> {
    let mut body = Vec::new();
    loop {
        let mut size_line = String::new();
        reader.read_line(&mut size_line).unwrap();
        let size_hex = size_line.trim().split(';').next().unwrap_or_default();
        let size = usize::from_str_radix(size_hex, 16).unwrap();
        if size == 0 {
            let mut end = String::new();
            reader.read_line(&mut end).unwrap();
            return body;
        }
        let mut chunk = vec![0u8; size + 2];
        reader.read_exact(&mut chunk).unwrap();
        body.extend_from_slice(&chunk[..size]);
    }
}

fn respond(mut stream: TcpStream, status: &str, headers: &[(&str, &str)], body: &str) {
    let extra: String = headers
        .iter()
        .map(|(name, value)| format!("{name}: {value}\r\n"))
        .collect();
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n{extra}Connection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).unwrap();
    stream.flush().unwrap();
}
