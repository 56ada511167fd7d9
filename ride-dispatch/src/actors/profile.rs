// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::fmt;
use std::time::Duration;

use rand::Rng;

/// Identity and timing bound shared by every trip actor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActorProfile {
    name: String,
    /// Upper bound (inclusive) of simulated delays, in milliseconds.
    max_delay: u64,
}

impl ActorProfile {
    pub fn new(name: impl Into<String>, max_delay: u64) -> Self {
        Self {
            name: name.into(),
            max_delay,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_delay(&self) -> u64 {
        self.max_delay
    }

    /// Draws a delay uniformly from `[0, max_delay]` milliseconds.
    pub fn sample_delay(&self) -> Duration {
        if self.max_delay == 0 {
            return Duration::ZERO;
        }
        let millis = rand::rng().random_range(0..=self.max_delay);
        Duration::from_millis(millis)
    }
}

impl fmt::Display for ActorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
