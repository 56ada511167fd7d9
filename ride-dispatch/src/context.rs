// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::fmt;
use std::sync::Arc;

use crate::awaiting::AwaitingDriverCounter;
use crate::driver_pool::DriverPool;
use crate::event_log::{BookingRef, EventLog};

/// Dispatch-wide state every booking needs while it runs.
pub struct DispatchContext {
    pub driver_pool: DriverPool,
    pub awaiting: AwaitingDriverCounter,
    event_log: Arc<dyn EventLog>,
}

impl DispatchContext {
    pub fn new(driver_pool: DriverPool, event_log: Arc<dyn EventLog>) -> Self {
        Self {
            driver_pool,
            awaiting: AwaitingDriverCounter::new(),
            event_log,
        }
    }

    pub fn log_event(&self, booking: &BookingRef<'_>, message: &str) {
        self.event_log.log_event(booking, message);
    }
}

impl fmt::Debug for DispatchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchContext")
            .field("driver_pool", &self.driver_pool)
            .field("awaiting", &self.awaiting)
            .finish_non_exhaustive()
    }
}
