// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::fmt;
use std::time::Duration;

use async_io::Timer;
use log::trace;

use crate::actors::{ActorProfile, Passenger};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Driver {
    profile: ActorProfile,
    /// Only set between pickup and arrival at the destination.
    current_passenger: Option<Passenger>,
}

impl Driver {
    pub fn new(name: impl Into<String>, max_delay: u64) -> Self {
        Self {
            profile: ActorProfile::new(name, max_delay),
            current_passenger: None,
        }
    }

    pub fn name(&self) -> &str {
        self.profile.name()
    }

    pub fn profile(&self) -> &ActorProfile {
        &self.profile
    }

    pub fn current_passenger(&self) -> Option<&Passenger> {
        self.current_passenger.as_ref()
    }

    /// Drives to the passenger, taking between 0 and `max_delay` ms, and
    /// takes them on board.
    pub async fn pick_up_passenger(&mut self, passenger: Passenger) {
        let delay = self.profile.sample_delay();
        trace!("{}: picking up {} in {:?}", self.name(), passenger, delay);
        Timer::after(delay).await;
        self.current_passenger = Some(passenger);
    }

    /// Drives the current passenger to their destination. The caller decides
    /// the duration so it can be reported unchanged afterwards.
    ///
    /// Returns the passenger that was dropped off.
    pub async fn drive_to_destination(&mut self, trip: Duration) -> Option<Passenger> {
        trace!("{}: driving for {:?}", self.name(), trip);
        Timer::after(trip).await;
        self.current_passenger.take()
    }

    /// Forgets the current passenger. Used when a trip is abandoned midway.
    pub fn clear_passenger(&mut self) {
        self.current_passenger = None;
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.profile, f)
    }
}
