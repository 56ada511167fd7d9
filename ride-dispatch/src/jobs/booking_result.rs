// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::time::Duration;

use crate::actors::{Driver, Passenger};
use crate::error::BookingError;
use crate::jobs::booking::BookingId;

/// What a handle eventually yields for an accepted booking.
pub type BookingOutcome = Result<BookingResult, BookingError>;

/// Final record of a completed booking.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingResult {
    booking_id: BookingId,
    region: String,
    passenger: Passenger,
    driver: Driver,
    trip_duration: Duration,
    elapsed: Duration,
}

impl BookingResult {
    pub fn new(
        booking_id: BookingId,
        region: impl Into<String>,
        passenger: Passenger,
        driver: Driver,
        trip_duration: Duration,
        elapsed: Duration,
    ) -> Self {
        Self {
            booking_id,
            region: region.into(),
            passenger,
            driver,
            trip_duration,
            elapsed,
        }
    }

    pub fn booking_id(&self) -> BookingId {
        self.booking_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn passenger(&self) -> &Passenger {
        &self.passenger
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    /// Simulated time spent driving the passenger to the destination.
    pub fn trip_duration(&self) -> Duration {
        self.trip_duration
    }

    /// Wall-clock time from creating the booking to arriving at the destination.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
