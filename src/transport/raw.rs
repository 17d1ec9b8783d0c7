//! Length-prefixed TCP transport.
//!
//! ```text
//! [4 bytes]  payload length N, unsigned big-endian
//! [N bytes]  payload
//! ```
//!
//! No acknowledgement, checksum, or trailer: the receiver reads exactly four
//! bytes, then exactly N bytes. The header is flushed on its own, the payload
//! follows in fixed-size chunks with one progress event per chunk, and the
//! connection is shut down once everything is flushed.

use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{Delivery, Transport};
use crate::address::TransferTarget;
use crate::config::NetworkConfig;
use crate::error::TransferError;
use crate::session::TransferSession;
use crate::types::ProgressSink;

pub const DEFAULT_CHUNK_SIZE: usize = 4096;

#[derive(Debug, Clone)]
pub struct RawSocketTransport {
    chunk_size: usize,
    connect_timeout: Duration,
    write_timeout: Duration,
}

impl Default for RawSocketTransport {
    fn default() -> Self {
        Self::from_config(&NetworkConfig::default())
    }
}

impl RawSocketTransport {
    pub fn from_config(network: &NetworkConfig) -> Self {
        Self {
            chunk_size: network.chunk_size.max(1),
            connect_timeout: network.connect_timeout(),
            write_timeout: network.write_timeout(),
        }
    }

    fn connect(&self, target: &TransferTarget) -> Result<TcpStream, TransferError> {
        let endpoint = target.endpoint();
        let connection_error = |reason: String| TransferError::Connection {
            endpoint: endpoint.clone(),
            reason,
        };

        let addrs: Vec<SocketAddr> = (target.host(), target.port())
            .to_socket_addrs()
            .map_err(|e| connection_error(e.to_string()))?
            .collect();

        let mut last_err = None;
        for addr in &addrs {
            match TcpStream::connect_timeout(addr, self.connect_timeout) {
                Ok(stream) => {
                    debug!(%addr, "connected");
                    return Ok(stream);
                }
                Err(e) => {
                    debug!(%addr, error = %e, "connect attempt failed");
                    last_err = Some(e);
                }
            }
        }
        Err(connection_error(match last_err {
            Some(e) => e.to_string(),
            None => "host resolved to no addresses".to_string(),
        }))
    }
}

impl Transport for RawSocketTransport {
    fn send(
        &self,
        target: &TransferTarget,
        payload: &[u8],
        sink: &dyn ProgressSink,
    ) -> Result<Delivery, TransferError> {
        let mut session = TransferSession::new(payload.len() as u64, sink);
        session.connecting(target.endpoint());

        let outcome = self.connect(target).and_then(|mut stream| {
            stream.set_write_timeout(Some(self.write_timeout))?;
            session.sending();
            write_framed(&mut stream, payload, self.chunk_size, &mut session)?;
            // Closing is best effort: the payload is already flushed.
            if let Err(e) = stream.shutdown(Shutdown::Both) {
                debug!(error = %e, "shutdown after send failed");
            }
            Ok(Delivery {
                bytes_sent: session.bytes_sent(),
                filename: None,
            })
        });

        match &outcome {
            Ok(delivery) => info!(
                endpoint = %target.endpoint(),
                bytes = delivery.bytes_sent,
                "raw transfer complete"
            ),
            Err(e) => warn!(endpoint = %target.endpoint(), error = %e, "raw transfer failed"),
        }
        session.finish(&outcome);
        outcome
    }
}

/// Write the length header and the chunked payload to `writer`.
///
/// Generic over the writer so the framing can be checked without a socket.
pub fn write_framed<W: Write>(
    writer: &mut W,
    payload: &[u8],
    chunk_size: usize,
    session: &mut TransferSession<'_>,
) -> io::Result<()> {
    let len = u32::try_from(payload.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("payload of {} bytes exceeds the 4-byte length prefix", payload.len()),
        )
    })?;

    writer.write_all(&len.to_be_bytes())?;
    writer.flush()?;

    for chunk in payload.chunks(chunk_size.max(1)) {
        writer.write_all(chunk)?;
        session.record(chunk.len());
    }
    writer.flush()
}
