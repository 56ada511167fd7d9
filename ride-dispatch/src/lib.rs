// SPDX-License-Identifier: MIT
// ride-dispatch: concurrent ride-dispatch simulation core
//
// - Regions admit a bounded number of simultaneous bookings.
// - Bookings draw drivers from one dispatch-wide pool.
//
// Author: Johannes Leupolz <dev@leupolz.eu>

pub mod actors;
pub mod awaiting;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod driver_pool;
pub mod error;
pub mod event_log;
pub mod job_engine;
pub mod jobs;
pub mod region;
pub mod simulation;

pub use actors::{Driver, Passenger};
pub use config::DispatchConfig;
pub use dispatch::Dispatch;
pub use driver_pool::DriverPool;
pub use error::{BookingError, ConfigError, DispatchError, PoolError};
pub use event_log::{BookingRef, ConsoleEventLog, EventLog};
pub use jobs::booking::{BookingHandle, BookingId, BookingState};
pub use jobs::booking_result::{BookingOutcome, BookingResult};
pub use region::{Admission, Region};
