// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::fmt;

use log::info;

use crate::jobs::booking::BookingId;

/// Identity of a booking as seen by the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRef<'a> {
    pub id: BookingId,
    pub driver: Option<&'a str>,
    pub passenger: Option<&'a str>,
}

/// Renders `id:driver:passenger`, with `null` for missing parts.
impl fmt::Display for BookingRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.id,
            self.driver.unwrap_or("null"),
            self.passenger.unwrap_or("null")
        )
    }
}

/// Receives booking lifecycle events. Purely observational.
pub trait EventLog: Send + Sync {
    fn log_event(&self, booking: &BookingRef<'_>, message: &str);
}

/// Writes events through the `log` facade, if enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleEventLog {
    enabled: bool,
}

impl ConsoleEventLog {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl EventLog for ConsoleEventLog {
    fn log_event(&self, booking: &BookingRef<'_>, message: &str) {
        if !self.enabled {
            return;
        }
        info!(target: "ride_dispatch::events", "{booking}: {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_ref_display_uses_null_for_missing_parts() {
        let unassigned = BookingRef {
            id: BookingId::from_raw(7),
            driver: None,
            passenger: Some("Alex"),
        };
        assert_eq!(unassigned.to_string(), "7:null:Alex");

        let assigned = BookingRef {
            driver: Some("Dana"),
            ..unassigned
        };
        assert_eq!(assigned.to_string(), "7:Dana:Alex");

        let empty = BookingRef {
            id: BookingId::from_raw(1),
            driver: None,
            passenger: None,
        };
        assert_eq!(empty.to_string(), "1:null:null");
    }
}
