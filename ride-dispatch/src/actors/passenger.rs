// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::fmt;
use std::time::Duration;

use crate::actors::ActorProfile;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Passenger {
    profile: ActorProfile,
}

impl Passenger {
    pub fn new(name: impl Into<String>, max_delay: u64) -> Self {
        Self {
            profile: ActorProfile::new(name, max_delay),
        }
    }

    pub fn name(&self) -> &str {
        self.profile.name()
    }

    pub fn profile(&self) -> &ActorProfile {
        &self.profile
    }

    /// Samples how long the ride to the destination takes.
    ///
    /// Every call draws a fresh value, so a booking samples this exactly once
    /// per trip and reuses it for both the simulated travel and the report.
    pub fn trip_duration(&self) -> Duration {
        self.profile.sample_delay()
    }
}

impl fmt::Display for Passenger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.profile, f)
    }
}
