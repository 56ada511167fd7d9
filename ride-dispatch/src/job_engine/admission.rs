// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_channel::{Receiver, Sender};
use log::error;

/// Counting semaphore built from a bounded channel pre-filled with one token
/// per slot. Acquiring receives a token, dropping the permit sends it back.
#[derive(Debug, Clone)]
pub struct AdmissionSlots {
    inner: Arc<SlotsInner>,
}

#[derive(Debug)]
struct SlotsInner {
    tokens_tx: Sender<()>,
    tokens_rx: Receiver<()>,
    limit: usize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl AdmissionSlots {
    pub fn new(limit: usize) -> Self {
        assert!(limit > 0, "admission limit must be at least 1");
        let (tokens_tx, tokens_rx) = async_channel::bounded(limit);
        for _ in 0..limit {
            if tokens_tx.try_send(()).is_err() {
                break;
            }
        }
        Self {
            inner: Arc::new(SlotsInner {
                tokens_tx,
                tokens_rx,
                limit,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }),
        }
    }

    /// Waits for a free slot. The slot is held until the permit is dropped.
    pub async fn acquire(&self) -> AdmissionPermit {
        if self.inner.tokens_rx.recv().await.is_err() {
            unreachable!("admission slots hold their own sender and cannot close");
        }
        self.admitted()
    }

    #[cfg(test)]
    pub(crate) fn try_acquire(&self) -> Option<AdmissionPermit> {
        self.inner.tokens_rx.try_recv().ok()?;
        Some(self.admitted())
    }

    fn admitted(&self) -> AdmissionPermit {
        let now = self.inner.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.peak.fetch_max(now, Ordering::SeqCst);
        AdmissionPermit {
            slots: self.inner.clone(),
        }
    }

    pub fn limit(&self) -> usize {
        self.inner.limit
    }

    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of permits that were ever held at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.inner.peak.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct AdmissionPermit {
    slots: Arc<SlotsInner>,
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        self.slots.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.slots.tokens_tx.try_send(()).is_err() {
            error!("admission slot could not be returned");
        }
    }
}
