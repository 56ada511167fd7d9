// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::sync::{Mutex, PoisonError};

use log::debug;
use ride_dispatch::{BookingId, BookingRef, EventLog};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub booking_id: BookingId,
    pub driver: Option<String>,
    pub passenger: Option<String>,
    pub message: String,
}

/// Keeps every booking event in arrival order so tests can inspect them.
#[derive(Debug, Default)]
pub struct RecordingEventLog {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages logged for one booking, in order.
    pub fn messages_for(&self, booking_id: BookingId) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.booking_id == booking_id)
            .map(|e| e.message)
            .collect()
    }

    pub fn count(&self, message: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| e.message == message)
            .count()
    }
}

impl EventLog for RecordingEventLog {
    fn log_event(&self, booking: &BookingRef<'_>, message: &str) {
        debug!("{booking}: {message}");
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedEvent {
                booking_id: booking.id,
                driver: booking.driver.map(str::to_string),
                passenger: booking.passenger.map(str::to_string),
                message: message.to_string(),
            });
    }
}
