//! Transfer orchestration: pick a transport, run it, report one result.
//!
//! ```text
//! capture ─→ AddressParser ─→ ImageProcessor ─→ Transport (raw | http)
//!                                                   │
//!                      ProgressSink ←── events ─────┘
//! ```
//!
//! [`TransferCoordinator::send`] is the blocking core. [`spawn`] and
//! [`spawn_delivery`] run it on a worker thread and hand back a
//! [`TransferHandle`]: events arrive on its channel while the send runs, and
//! [`TransferHandle::wait`] yields the single [`TransferResult`].
//!
//! One asset can only be in flight once. A second send of the same asset
//! while the first is running fails with [`TransferError::Busy`] without
//! touching the network.
//!
//! [`spawn`]: TransferCoordinator::spawn
//! [`spawn_delivery`]: TransferCoordinator::spawn_delivery

use std::collections::HashSet;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use crate::address::{AddressParser, Scheme, TransferTarget};
use crate::config::CourierConfig;
use crate::error::TransferError;
use crate::imaging::{ImageProcessor, ProcessConfig, read_capture};
use crate::transport::{HttpMultipartTransport, RawSocketTransport, Transport};
use crate::types::{AssetId, ImageAsset, ProgressSink, TransferEvent, TransferResult};

/// Where the capture comes from.
#[derive(Debug, Clone)]
pub enum CaptureSource {
    /// Encoded image bytes already in memory.
    Bytes(Vec<u8>),
    /// An image file on disk.
    Path(PathBuf),
}

pub struct TransferCoordinator {
    parser: AddressParser,
    processor: ImageProcessor,
    raw: Box<dyn Transport>,
    http: Box<dyn Transport>,
    active: Mutex<HashSet<AssetId>>,
}

/// Marks an asset as in flight until dropped.
struct ActiveGuard<'a> {
    active: &'a Mutex<HashSet<AssetId>>,
    id: AssetId,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

impl TransferCoordinator {
    pub fn new(config: &CourierConfig) -> Self {
        Self::with_transports(
            config,
            Box::new(RawSocketTransport::from_config(&config.network)),
            Box::new(HttpMultipartTransport::from_config(config)),
        )
    }

    /// Build with caller-supplied transports (parsing and processing still
    /// follow `config`).
    pub fn with_transports(
        config: &CourierConfig,
        raw: Box<dyn Transport>,
        http: Box<dyn Transport>,
    ) -> Self {
        Self {
            parser: AddressParser::from_config(&config.network),
            processor: ImageProcessor::new(ProcessConfig::from_image_config(&config.image)),
            raw,
            http,
            active: Mutex::new(HashSet::new()),
        }
    }

    pub fn parser(&self) -> &AddressParser {
        &self.parser
    }

    fn transport_for(&self, scheme: Scheme) -> &dyn Transport {
        match scheme {
            Scheme::Raw => self.raw.as_ref(),
            Scheme::Http => self.http.as_ref(),
        }
    }

    fn claim(&self, id: AssetId) -> Option<ActiveGuard<'_>> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        active.insert(id).then(|| ActiveGuard {
            active: &self.active,
            id,
        })
    }

    /// Send an already processed asset to `target`.
    ///
    /// Blocks until the transport finishes. Exactly one terminal event
    /// reaches `sink`.
    pub fn send(
        &self,
        asset: &ImageAsset,
        target: &TransferTarget,
        sink: &dyn ProgressSink,
    ) -> TransferResult {
        let Some(_guard) = self.claim(asset.id()) else {
            warn!(%target, "asset already in flight, rejecting send");
            return fail(TransferError::Busy, sink);
        };

        info!(%target, bytes = asset.len(), "starting transfer");
        match self
            .transport_for(target.scheme())
            .send(target, asset.bytes(), sink)
        {
            Ok(delivery) => TransferResult::Success {
                bytes_sent: delivery.bytes_sent,
                filename: delivery.filename,
            },
            Err(err) => TransferResult::Failure(err),
        }
    }

    /// Parse `address` and send. A bad address never reaches a transport.
    pub fn send_address(
        &self,
        asset: &ImageAsset,
        address: &str,
        scheme: Scheme,
        sink: &dyn ProgressSink,
    ) -> TransferResult {
        match self.parser.parse(address, scheme) {
            Ok(target) => self.send(asset, &target, sink),
            Err(err) => fail(err, sink),
        }
    }

    /// Full pipeline: parse the address, load and process the capture, send.
    pub fn deliver(
        &self,
        capture: CaptureSource,
        address: &str,
        scheme: Scheme,
        sink: &dyn ProgressSink,
    ) -> TransferResult {
        sink.emit(TransferEvent::Preparing);
        match self.prepare(capture, address, scheme) {
            Ok((asset, target)) => {
                sink.emit(TransferEvent::ImageReady {
                    width: asset.width(),
                    height: asset.height(),
                    encoded_bytes: asset.len(),
                });
                self.send(&asset, &target, sink)
            }
            Err(err) => fail(err, sink),
        }
    }

    fn prepare(
        &self,
        capture: CaptureSource,
        address: &str,
        scheme: Scheme,
    ) -> Result<(ImageAsset, TransferTarget), TransferError> {
        // Address first: no point decoding a photo we can't send.
        let target = self.parser.parse(address, scheme)?;
        let bytes = match capture {
            CaptureSource::Bytes(bytes) => bytes,
            CaptureSource::Path(path) => read_capture(&path)?,
        };
        let asset = self.processor.process(&bytes)?;
        Ok((asset, target))
    }

    /// Run [`send`](Self::send) on a worker thread.
    pub fn spawn(self: &Arc<Self>, asset: Arc<ImageAsset>, target: TransferTarget) -> TransferHandle {
        let coordinator = Arc::clone(self);
        TransferHandle::start(move |tx| coordinator.send(&asset, &target, tx))
    }

    /// Run [`deliver`](Self::deliver) on a worker thread.
    pub fn spawn_delivery(
        self: &Arc<Self>,
        capture: CaptureSource,
        address: impl Into<String>,
        scheme: Scheme,
    ) -> TransferHandle {
        let coordinator = Arc::clone(self);
        let address = address.into();
        TransferHandle::start(move |tx| coordinator.deliver(capture, &address, scheme, tx))
    }
}

/// Report a failure no transport has reported: rejected before sending,
/// or a worker that panicked.
fn fail(err: TransferError, sink: &dyn ProgressSink) -> TransferResult {
    warn!(error = %err, "transfer rejected");
    sink.emit(TransferEvent::Failed {
        reason: err.to_string(),
    });
    TransferResult::Failure(err)
}

/// A send running on its own thread.
pub struct TransferHandle {
    events: Receiver<TransferEvent>,
    worker: JoinHandle<TransferResult>,
}

impl TransferHandle {
    fn start<F>(job: F) -> Self
    where
        F: FnOnce(&mpsc::Sender<TransferEvent>) -> TransferResult + Send + 'static,
    {
        let (tx, events) = mpsc::channel();
        let worker = thread::spawn(move || {
            panic::catch_unwind(AssertUnwindSafe(|| job(&tx)))
                .unwrap_or_else(|_| fail(worker_panicked(), &tx))
        });
        Self { events, worker }
    }

    /// Events from the worker. Iteration ends when the worker is done; the
    /// last event is always `Completed` or `Failed`, even if the worker panics.
    pub fn events(&self) -> &Receiver<TransferEvent> {
        &self.events
    }

    /// Block until the send finishes.
    pub fn wait(self) -> TransferResult {
        self.worker
            .join()
            .unwrap_or_else(|_| TransferResult::Failure(worker_panicked()))
    }
}

fn worker_panicked() -> TransferError {
    TransferError::Io(io::Error::other("transfer worker panicked"))
}
