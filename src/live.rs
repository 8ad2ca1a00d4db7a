//! Per-frame color detection for a live video stream.
//!
//! Frames are handed to a single worker thread through a slot that holds at
//! most one pending frame. When the worker is still busy, new frames are
//! dropped instead of queued, so latency stays bounded no matter how fast the
//! camera delivers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use tracing::{debug, trace};

use crate::classifier::{ColorClassifier, ColorLabel};
use crate::error::Result;
use crate::frame::{BgrFrame, extract_feature};

struct PendingFrame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

#[derive(Default)]
struct Shared {
    latest: Mutex<Option<ColorLabel>>,
    processed: AtomicU64,
    dropped: AtomicU64,
}

pub struct LiveDetector {
    sender: Option<SyncSender<PendingFrame>>,
    worker: Option<JoinHandle<()>>,
    shared: Arc<Shared>,
}

impl LiveDetector {
    pub fn spawn(classifier: Arc<ColorClassifier>) -> Self {
        let (sender, receiver) = mpsc::sync_channel::<PendingFrame>(1);
        let shared = Arc::new(Shared::default());

        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::spawn(move || {
            for pending in receiver {
                let Ok(frame) = BgrFrame::new(pending.width, pending.height, &pending.data) else {
                    continue;
                };
                let feature = extract_feature(&frame);
                let label = classifier.classify_rgb(feature);
                trace!(?feature, %label, "classified frame");
                *worker_shared
                    .latest
                    .lock()
                    .unwrap_or_else(|e| e.into_inner()) = Some(label);
                worker_shared.processed.fetch_add(1, Ordering::Relaxed);
            }
            debug!("frame stream closed, detector stopping");
        });

        Self {
            sender: Some(sender),
            worker: Some(worker),
            shared,
        }
    }

    /// Offer a BGR frame without blocking.
    ///
    /// Returns `Ok(false)` when the frame was dropped because the worker is
    /// busy or gone. Malformed frames are rejected before they are queued.
    pub fn submit(&self, width: u32, height: u32, data: Vec<u8>) -> Result<bool> {
        BgrFrame::new(width, height, &data)?;
        let Some(sender) = &self.sender else {
            return Ok(false);
        };
        match sender.try_send(PendingFrame {
            width,
            height,
            data,
        }) {
            Ok(()) => Ok(true),
            Err(TrySendError::Full(_)) => {
                let dropped = self.shared.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                trace!(dropped, "detector busy, dropping frame");
                Ok(false)
            }
            Err(TrySendError::Disconnected(_)) => Ok(false),
        }
    }

    /// Label of the most recently classified frame.
    pub fn latest(&self) -> Option<ColorLabel> {
        *self.shared.latest.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn processed(&self) -> u64 {
        self.shared.processed.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    /// Finish the pending frame, then stop the worker.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                debug!("detector worker panicked");
            }
        }
    }
}

impl Drop for LiveDetector {
    fn drop(&mut self) {
        self.shutdown();
    }
}
