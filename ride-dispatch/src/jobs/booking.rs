// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

//! A booking is the job that takes one passenger from request to destination.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Instant;

use async_channel::{Receiver, Sender};
use futures::future::{self, Either};
use futures::pin_mut;
use log::{debug, info, warn};

use crate::actors::{Driver, Passenger};
use crate::context::DispatchContext;
use crate::driver_pool::DriverLease;
use crate::error::BookingError;
use crate::event_log::BookingRef;
use crate::job_engine::job::{Job, JobTask};
use crate::job_engine::CancelToken;
use crate::jobs::booking_result::{BookingOutcome, BookingResult};

static NEXT_BOOKING_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BookingId(u64);

impl BookingId {
    fn next() -> Self {
        BookingId(NEXT_BOOKING_ID.fetch_add(1, Ordering::SeqCst))
    }

    pub fn from_raw(id: u64) -> Self {
        BookingId(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub enum BookingState {
    Created,
    WaitingForDriver,
    PickingUp,
    Driving,
    Completed,
    Interrupted,
}

impl BookingState {
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingState::Completed | BookingState::Interrupted)
    }

    /// Whether the booking currently has a driver assigned.
    pub fn is_on_trip(self) -> bool {
        matches!(self, BookingState::PickingUp | BookingState::Driving)
    }
}

type SyncState = Arc<(Mutex<BookingState>, Condvar)>;

fn set_state(sync_state: &SyncState, new_state: BookingState) {
    let (lock, cvar) = &**sync_state;
    let mut current_state = lock.lock().unwrap_or_else(PoisonError::into_inner);
    *current_state = new_state;
    cvar.notify_all();
}

/// Forces a terminal state if the booking's future is dropped before it
/// finished, e.g. after a panic caught by the worker.
struct TerminalStateGuard(SyncState);

impl Drop for TerminalStateGuard {
    fn drop(&mut self) {
        let (lock, cvar) = &*self.0;
        let mut current_state = lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !current_state.is_terminal() {
            warn!("booking dropped in state {:?}, marking it interrupted", *current_state);
            *current_state = BookingState::Interrupted;
            cvar.notify_all();
        }
    }
}

pub struct Booking {
    id: BookingId,
    desc: String,
    region: String,
    passenger: Passenger,
    created_at: Instant,
    ctx: Arc<DispatchContext>,
    sync_state: SyncState,
    cancel: CancelToken,
    result_tx: Sender<BookingOutcome>,
}

impl Booking {
    /// Creates a booking for `passenger` in `region` together with the handle
    /// its result will be delivered to. No driver is assigned yet.
    pub fn new(
        ctx: Arc<DispatchContext>,
        passenger: Passenger,
        region: impl Into<String>,
    ) -> (Booking, BookingHandle) {
        let id = BookingId::next();
        let region = region.into();
        let (result_tx, result_rx) = async_channel::bounded(1);
        let sync_state: SyncState =
            Arc::new((Mutex::new(BookingState::Created), Condvar::new()));
        let cancel = CancelToken::new();

        let booking = Booking {
            id,
            desc: format!("booking {id} for {passenger} in {region}"),
            region: region.clone(),
            passenger,
            created_at: Instant::now(),
            ctx,
            sync_state: sync_state.clone(),
            cancel: cancel.clone(),
            result_tx,
        };
        booking.log(None, "Creating booking");

        let handle = BookingHandle {
            id,
            region,
            sync_state,
            cancel,
            result_rx,
        };
        (booking, handle)
    }

    pub fn id(&self) -> BookingId {
        self.id
    }

    pub fn passenger(&self) -> &Passenger {
        &self.passenger
    }

    pub fn state(&self) -> BookingState {
        *self
            .sync_state
            .0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn log(&self, driver: Option<&Driver>, message: &str) {
        self.ctx.log_event(
            &BookingRef {
                id: self.id,
                driver: driver.map(Driver::name),
                passenger: Some(self.passenger.name()),
            },
            message,
        );
    }

    async fn run(self, pool_cancel: CancelToken) {
        let _terminal = TerminalStateGuard(self.sync_state.clone());
        let outcome = self.execute(&pool_cancel).await;
        match &outcome {
            Ok(result) => {
                debug!("booking {} completed in {:?}", self.id, result.elapsed());
                set_state(&self.sync_state, BookingState::Completed);
            }
            Err(e) => {
                info!("{e}");
                self.log(None, "Booking interrupted");
                set_state(&self.sync_state, BookingState::Interrupted);
            }
        }
        self.publish(outcome);
    }

    /// The trip itself. Any driver held when this returns early has already
    /// been put back into the pool by its lease.
    async fn execute(&self, pool_cancel: &CancelToken) -> BookingOutcome {
        set_state(&self.sync_state, BookingState::WaitingForDriver);
        self.log(None, "Starting booking, getting driver");

        let pool = &self.ctx.driver_pool;
        let acquired = match self.until_interrupted(pool_cancel, pool.acquire()).await {
            Ok(acquired) => acquired,
            Err(e) => {
                // never going to be matched any more
                self.ctx.awaiting.decrement();
                return Err(e);
            }
        };
        self.ctx.awaiting.decrement();
        let driver = acquired.map_err(|source| BookingError::Pool {
            booking: self.id,
            source,
        })?;

        let mut lease = DriverLease::new(driver, pool);
        set_state(&self.sync_state, BookingState::PickingUp);
        self.log(Some(lease.driver()), "Starting, on way to passenger");
        let passenger = self.passenger.clone();
        self.until_interrupted(pool_cancel, lease.driver_mut().pick_up_passenger(passenger))
            .await?;

        // sampled once: drives the delay and is what gets reported
        let trip_duration = self.passenger.trip_duration();
        set_state(&self.sync_state, BookingState::Driving);
        self.log(Some(lease.driver()), "Collected passenger, on way to destination");
        self.until_interrupted(
            pool_cancel,
            lease.driver_mut().drive_to_destination(trip_duration),
        )
        .await?;

        let driver = lease.release().map_err(|source| BookingError::Pool {
            booking: self.id,
            source,
        })?;
        self.log(Some(&driver), "At destination, driver is now free");

        Ok(BookingResult::new(
            self.id,
            self.region.clone(),
            self.passenger.clone(),
            driver,
            trip_duration,
            self.created_at.elapsed(),
        ))
    }

    /// Runs `fut` unless the booking or its pool is cancelled first.
    async fn until_interrupted<F: Future>(
        &self,
        pool_cancel: &CancelToken,
        fut: F,
    ) -> Result<F::Output, BookingError> {
        if self.cancel.is_cancelled() || pool_cancel.is_cancelled() {
            return Err(BookingError::Interrupted(self.id));
        }
        let own = self.cancel.cancelled();
        let pool = pool_cancel.cancelled();
        pin_mut!(fut, own, pool);
        match future::select(fut, future::select(own, pool)).await {
            Either::Left((output, _)) => Ok(output),
            Either::Right(_) => Err(BookingError::Interrupted(self.id)),
        }
    }

    fn publish(&self, outcome: BookingOutcome) {
        if self.result_tx.try_send(outcome).is_err() {
            debug!("booking {}: nobody is waiting for the outcome", self.id);
        }
    }
}

impl Job for Booking {
    fn desc(&self) -> &str {
        &self.desc
    }

    fn create_task(self: Box<Self>, cancel: CancelToken) -> JobTask {
        let booking = *self;
        Box::pin(booking.run(cancel))
    }

    fn abandon(self: Box<Self>) {
        self.ctx.awaiting.decrement();
        self.log(None, "Booking abandoned before it started");
        set_state(&self.sync_state, BookingState::Interrupted);
        self.publish(Err(BookingError::Interrupted(self.id)));
    }
}

impl fmt::Debug for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Booking")
            .field("id", &self.id)
            .field("region", &self.region)
            .field("passenger", &self.passenger)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Pending result of an accepted booking.
#[derive(Debug)]
pub struct BookingHandle {
    id: BookingId,
    region: String,
    sync_state: SyncState,
    cancel: CancelToken,
    result_rx: Receiver<BookingOutcome>,
}

impl BookingHandle {
    pub fn id(&self) -> BookingId {
        self.id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn state(&self) -> BookingState {
        *self
            .sync_state
            .0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until the booking has reached `state` or any later one
    /// (including a terminal state).
    pub fn wait_for_state(&self, state: BookingState) -> BookingState {
        // pattern is described on https://doc.rust-lang.org/stable/std/sync/struct.Condvar.html
        let (lock, cvar) = &*self.sync_state;
        let mut current_state = lock.lock().unwrap_or_else(PoisonError::into_inner);
        while *current_state < state {
            current_state = cvar
                .wait(current_state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *current_state
    }

    /// Asks the booking to stop at its next suspension point. A driver it
    /// already holds goes back to the pool.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.state().is_terminal()
    }

    /// Non-blocking peek at the outcome.
    pub fn try_outcome(&self) -> Option<BookingOutcome> {
        self.result_rx.try_recv().ok()
    }

    /// Blocks the calling thread until the booking finished.
    pub fn wait(self) -> BookingOutcome {
        self.result_rx
            .recv_blocking()
            .unwrap_or(Err(BookingError::Abandoned(self.id)))
    }

    pub async fn outcome(self) -> BookingOutcome {
        self.result_rx
            .recv()
            .await
            .unwrap_or(Err(BookingError::Abandoned(self.id)))
    }
}
