// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use thiserror::Error;

use crate::jobs::booking::BookingId;

/// Misuse of the shared driver pool. These are configuration or programming
/// errors, not normal runtime conditions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("driver pool is at capacity ({capacity}); driver {driver} was not added")]
    AtCapacity { capacity: usize, driver: String },

    #[error("driver pool has been closed")]
    Closed,
}

/// Why a booking finished without a [`BookingResult`](crate::jobs::booking_result::BookingResult).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("booking {0} was interrupted")]
    Interrupted(BookingId),

    #[error("booking {0} was abandoned before publishing an outcome")]
    Abandoned(BookingId),

    #[error("booking {booking} could not return its driver: {source}")]
    Pool {
        booking: BookingId,
        #[source]
        source: PoolError,
    },
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown region '{0}'")]
    UnknownRegion(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error("failed to spawn worker thread for region '{region}': {source}")]
    Spawn {
        region: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one region must be configured")]
    NoRegions,

    #[error("region '{0}' must allow at least one simultaneous booking")]
    ZeroCeiling(String),

    #[error("region names must not be empty")]
    EmptyRegionName,

    #[error("driver pool capacity must be at least 1")]
    ZeroCapacity,

    #[error("invalid region specification '{0}', expected NAME=LIMIT")]
    InvalidRegionSpec(String),

    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}
