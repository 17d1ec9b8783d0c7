//! # Snapcourier
//!
//! Gets a freshly captured photo onto a receiver on the local network.
//! A capture goes in, a bounded-size JPEG comes out, and it is delivered
//! over one of two transports while progress is reported back to the caller.
//!
//! # Architecture: One Send, One Worker
//!
//! ```text
//! 1. Parse     "192.168.0.10:5000"  →  TransferTarget
//! 2. Process   capture bytes        →  ImageAsset      (≤ 1280 px wide, JPEG q80)
//! 3. Send      ImageAsset           →  raw TCP frame | HTTP multipart upload
//! ```
//!
//! All three steps run blocking on a dedicated worker thread. The caller only
//! sees [`TransferEvent`](types::TransferEvent)s on a channel and, at the end,
//! exactly one [`TransferResult`](types::TransferResult).
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`address`] | `host:port` parsing with lenient or strict port handling |
//! | [`imaging`] | Decode, downscale and JPEG re-encode via the `image` crate |
//! | [`transport`] | Raw length-prefixed TCP and HTTP multipart senders |
//! | [`session`] | Per-send byte counters, state machine, progress rounding |
//! | [`coordinator`] | Picks the transport, guards against double sends, runs workers |
//! | [`config`] | `snapcourier.toml` loading, merging and validation |
//! | [`error`] | The [`TransferError`](error::TransferError) taxonomy |
//! | [`types`] | Shared types: assets, events, results, the progress sink |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Results, Not Callbacks
//!
//! Every send returns a [`TransferResult`](types::TransferResult) value. Errors
//! from every layer fold into [`TransferError`](error::TransferError) and are
//! reported once, at the coordinator boundary. A failed send leaves nothing
//! behind: the next attempt starts from scratch.
//!
//! ## Lenient Ports
//!
//! An unparsable port silently becomes the default port (5000). Receivers
//! in the field are typed in by hand on a phone keyboard, and the default is
//! nearly always right. `network.strict_port = true` turns this into an error.
//!
//! ## Chunked Raw Writes
//!
//! The raw transport writes 4 KiB at a time so it can report progress per
//! chunk. The wire format itself has no notion of chunks: the receiver just
//! reads `N` bytes after the 4-byte length.

pub mod address;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod imaging;
pub mod output;
pub mod session;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
