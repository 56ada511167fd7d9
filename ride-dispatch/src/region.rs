// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

//! A region runs bookings independently of other regions, sharing only the
//! driver pool of the dispatch.
//!
//! At most `max_simultaneous_jobs` bookings of a region execute at a time.
//! Bookings beyond that are accepted and wait for a free position; they do
//! not have to complete in the order they were submitted.

use std::sync::Arc;

use log::{debug, info};

use crate::actors::Passenger;
use crate::context::DispatchContext;
use crate::event_log::BookingRef;
use crate::job_engine::WorkerPool;
use crate::jobs::booking::{Booking, BookingHandle, BookingId};

/// Result of submitting a passenger to a region.
#[must_use]
#[derive(Debug)]
pub enum Admission {
    Accepted(BookingHandle),
    /// The region is shutting down. The booking was never executed.
    Rejected { booking_id: BookingId, region: String },
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Admission::Accepted(_))
    }

    pub fn is_rejected(&self) -> bool {
        !self.is_accepted()
    }

    pub fn handle(&self) -> Option<&BookingHandle> {
        match self {
            Admission::Accepted(handle) => Some(handle),
            Admission::Rejected { .. } => None,
        }
    }

    pub fn into_handle(self) -> Option<BookingHandle> {
        match self {
            Admission::Accepted(handle) => Some(handle),
            Admission::Rejected { .. } => None,
        }
    }
}

#[derive(Debug)]
pub struct Region {
    name: String,
    max_simultaneous_jobs: usize,
    ctx: Arc<DispatchContext>,
    workers: WorkerPool,
}

impl Region {
    pub(crate) fn new(
        ctx: Arc<DispatchContext>,
        name: impl Into<String>,
        max_simultaneous_jobs: usize,
    ) -> std::io::Result<Self> {
        let name = name.into();
        let workers = WorkerPool::new(name.clone(), max_simultaneous_jobs)?;
        debug!("Created region {name} for {max_simultaneous_jobs} simultaneous bookings");
        Ok(Self {
            name,
            max_simultaneous_jobs,
            ctx,
            workers,
        })
    }

    /// Creates a booking for `passenger` and queues it. The returned handle is
    /// pending until the booking gets a position and a driver and completes.
    ///
    /// Counts the booking as awaiting a driver as soon as it is accepted.
    pub fn submit(&self, passenger: Passenger) -> Admission {
        let (booking, handle) = Booking::new(self.ctx.clone(), passenger, &self.name);
        let id = booking.id();
        let passenger_name = booking.passenger().name().to_string();

        if self.workers.is_shutting_down() {
            return self.reject(id, &passenger_name);
        }

        match self
            .workers
            .submit(Box::new(booking), || self.ctx.awaiting.increment())
        {
            Ok(()) => Admission::Accepted(handle),
            // lost the race against shutdown; the booking is dropped unexecuted
            Err(_booking) => self.reject(id, &passenger_name),
        }
    }

    fn reject(&self, booking_id: BookingId, passenger: &str) -> Admission {
        self.ctx.log_event(
            &BookingRef {
                id: booking_id,
                driver: None,
                passenger: Some(passenger),
            },
            "Rejected booking",
        );
        Admission::Rejected {
            booking_id,
            region: self.name.clone(),
        }
    }

    /// Completes the bookings already accepted and stops accepting new ones.
    /// Does not wait for running bookings.
    pub fn shutdown(&self) {
        info!("Shutting down region {}", self.name);
        self.workers.shutdown();
    }

    /// Stops accepting bookings and interrupts every accepted one.
    pub fn shutdown_now(&self) {
        info!("Cancelling all bookings of region {}", self.name);
        self.workers.shutdown_now();
    }

    pub fn wait_until_finished(&self) {
        self.workers.wait_until_finished();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_simultaneous_jobs(&self) -> usize {
        self.max_simultaneous_jobs
    }

    pub fn is_shutting_down(&self) -> bool {
        self.workers.is_shutting_down()
    }

    /// Bookings currently holding a position in this region.
    pub fn in_flight(&self) -> usize {
        self.workers.in_flight()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.workers.peak_in_flight()
    }

    /// Accepted bookings still waiting for a position.
    pub fn queued(&self) -> usize {
        self.workers.queued()
    }
}
