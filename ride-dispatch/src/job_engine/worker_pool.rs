// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use async_channel::{Receiver, Sender};
use futures::executor::block_on;
use futures::FutureExt;
use log::{debug, error, info, warn};

use crate::job_engine::{AdmissionSlots, CancelToken, Job};

/// Fixed-size pool of worker threads that run [`Job`]s with at most `size`
/// of them executing at once.
#[derive(Debug)]
pub struct WorkerPool {
    name: String,
    /// `None` once the pool has been shut down.
    queue: Mutex<Option<Sender<Box<dyn Job>>>>,
    /// Kept so the backlog stays observable after the sender is gone.
    backlog: Receiver<Box<dyn Job>>,
    slots: AdmissionSlots,
    cancel: CancelToken,
    shutting_down: AtomicBool,
    threads: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    pub fn new(name: impl Into<String>, size: usize) -> std::io::Result<Self> {
        let name = name.into();
        let (tx, rx) = async_channel::unbounded();
        let slots = AdmissionSlots::new(size);
        let cancel = CancelToken::new();

        let mut threads = Vec::with_capacity(size);
        for i in 0..size {
            let rx_in_thread: Receiver<Box<dyn Job>> = rx.clone();
            let slots = slots.clone();
            let cancel = cancel.clone();
            let pool_name = name.clone();
            let handle = thread::Builder::new()
                .name(format!("{name}-worker-{i}"))
                .spawn(move || block_on(worker_loop(pool_name, rx_in_thread, slots, cancel)))?;
            threads.push(handle);
        }
        debug!("Started {size} workers for {name}");

        Ok(Self {
            name,
            queue: Mutex::new(Some(tx)),
            backlog: rx,
            slots,
            cancel,
            shutting_down: AtomicBool::new(false),
            threads: Mutex::new(threads),
        })
    }

    /// Queues a job unless the pool is shutting down, in which case the job
    /// is handed back untouched.
    ///
    /// `on_accept` runs before the job becomes visible to any worker and
    /// under the same lock that shutdown takes, so it observes a consistent
    /// accept/reject decision.
    pub fn submit(
        &self,
        job: Box<dyn Job>,
        on_accept: impl FnOnce(),
    ) -> Result<(), Box<dyn Job>> {
        let queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(tx) = queue.as_ref() else {
            return Err(job);
        };
        on_accept();
        if let Err(e) = tx.try_send(job) {
            // every worker is gone, nobody will ever run it
            error!("{}: no worker left to run an accepted job", self.name);
            e.into_inner().abandon();
        }
        Ok(())
    }

    /// Stops accepting jobs. Jobs already queued or running are completed.
    pub fn shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
        let tx = self
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(tx) = tx {
            tx.close();
            info!("{}: shutting down, {} job(s) still queued", self.name, tx.len());
        }
    }

    /// Stops accepting jobs and cancels everything that was accepted.
    pub fn shutdown_now(&self) {
        self.shutdown();
        self.cancel.cancel();
        info!("{}: cancelled all accepted jobs", self.name);
    }

    /// Blocks until every worker thread has exited. Only returns after
    /// [`WorkerPool::shutdown`] was called. Must not be called from a worker.
    pub fn wait_until_finished(&self) {
        let threads: Vec<_> = self
            .threads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for handle in threads {
            if handle.join().is_err() {
                warn!("{}: a worker thread panicked", self.name);
            }
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.slots.limit()
    }

    /// Jobs accepted but not yet picked up by a worker. Still accurate while
    /// a shut down pool drains its queue.
    pub fn queued(&self) -> usize {
        self.backlog.len()
    }

    pub fn in_flight(&self) -> usize {
        self.slots.in_flight()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.slots.peak_in_flight()
    }
}

/// The loop of a single worker thread.
async fn worker_loop(
    name: String,
    rx: Receiver<Box<dyn Job>>,
    slots: AdmissionSlots,
    cancel: CancelToken,
) {
    while let Ok(job) = rx.recv().await {
        if cancel.is_cancelled() && !job.execute_after_cancellation() {
            debug!("{name}: abandoning job {} after cancellation", job.desc());
            job.abandon();
            continue;
        }

        let permit = slots.acquire().await;
        debug!("{name}: executing job {}", job.desc());
        let desc = job.desc().to_string();
        let task = job.create_task(cancel.clone());
        if AssertUnwindSafe(task).catch_unwind().await.is_err() {
            error!("{name}: job {desc} panicked");
        }
        drop(permit);
    }
    debug!("{name}: worker ended, queue closed and drained");
}
