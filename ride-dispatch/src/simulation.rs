// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

//! End-to-end simulated run on top of a [`Dispatch`].

use std::thread;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::actors::{Driver, Passenger};
use crate::dispatch::Dispatch;
use crate::error::{BookingError, DispatchError};
use crate::region::Admission;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationPlan {
    pub drivers: usize,
    pub driver_max_delay: u64,
    pub passengers: usize,
    pub passenger_max_delay: u64,
    /// Passengers booked after the shutdown, all of which must be rejected.
    pub late_passengers: usize,
    /// Cancel accepted bookings instead of letting them finish.
    pub shutdown_now: bool,
}

impl Default for SimulationPlan {
    fn default() -> Self {
        Self {
            drivers: 5,
            driver_max_delay: 100,
            passengers: 20,
            passenger_max_delay: 100,
            late_passengers: 1,
            shutdown_now: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationReport {
    pub completed: usize,
    pub rejected: usize,
    pub interrupted: usize,
    pub abandoned: usize,
    pub total_trip_duration: Duration,
    pub elapsed: Duration,
}

/// Registers the drivers, books the passengers round-robin over the regions,
/// shuts the dispatch down and waits for every accepted booking.
pub fn run_simulation(
    dispatch: &Dispatch,
    plan: &SimulationPlan,
) -> Result<SimulationReport, DispatchError> {
    let started = Instant::now();
    let regions: Vec<String> = dispatch.region_names().map(str::to_string).collect();
    let mut report = SimulationReport::default();

    // drivers come in from their own thread, as they would in reality
    let pool = dispatch.driver_pool().clone();
    let drivers = plan.drivers;
    let driver_max_delay = plan.driver_max_delay;
    let registration = thread::spawn(move || {
        (1..=drivers).try_for_each(|i| pool.add_driver(Driver::new(format!("D{i}"), driver_max_delay)))
    });

    let mut handles = Vec::with_capacity(plan.passengers);
    for (i, region) in (1..=plan.passengers).zip(regions.iter().cycle()) {
        let passenger = Passenger::new(format!("P{i}"), plan.passenger_max_delay);
        match dispatch.book(passenger, region)? {
            Admission::Accepted(handle) => handles.push(handle),
            Admission::Rejected { .. } => report.rejected += 1,
        }
    }
    info!(
        "Booked {} passengers, {} awaiting a driver",
        handles.len(),
        dispatch.bookings_awaiting_driver()
    );

    let registered = registration.join().unwrap_or_else(|_| {
        warn!("driver registration thread panicked");
        Ok(())
    });
    if let Err(e) = registered {
        dispatch.shutdown_now();
        dispatch.wait_until_finished();
        return Err(e.into());
    }

    if plan.shutdown_now {
        dispatch.shutdown_now();
    } else {
        dispatch.shutdown();
    }

    for (i, region) in (1..=plan.late_passengers).zip(regions.iter().cycle()) {
        let passenger = Passenger::new(format!("late-P{i}"), plan.passenger_max_delay);
        if dispatch.book(passenger, region)?.is_rejected() {
            report.rejected += 1;
        }
    }

    for handle in handles {
        match handle.wait() {
            Ok(result) => {
                report.completed += 1;
                report.total_trip_duration += result.trip_duration();
            }
            Err(BookingError::Interrupted(_)) => report.interrupted += 1,
            Err(e) => {
                warn!("{e}");
                report.abandoned += 1;
            }
        }
    }
    dispatch.wait_until_finished();

    report.elapsed = started.elapsed();
    info!(
        "Simulation finished in {:?}: {} completed, {} rejected, {} interrupted, {} abandoned",
        report.elapsed, report.completed, report.rejected, report.interrupted, report.abandoned
    );
    Ok(report)
}
