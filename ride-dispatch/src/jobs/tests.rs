// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use futures::executor::block_on;

use crate::actors::{Driver, Passenger};
use crate::context::DispatchContext;
use crate::driver_pool::DriverPool;
use crate::error::BookingError;
use crate::event_log::{BookingRef, EventLog};
use crate::job_engine::{CancelToken, Job, WorkerPool};
use crate::jobs::booking::{Booking, BookingHandle, BookingState};

#[derive(Default)]
struct RecordingLog {
    events: Mutex<Vec<String>>,
}

impl EventLog for RecordingLog {
    fn log_event(&self, booking: &BookingRef<'_>, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(format!("{booking}: {message}"));
    }
}

/// Panics when a booking logs `panic_on`.
struct PanickingLog {
    panic_on: &'static str,
}

impl EventLog for PanickingLog {
    fn log_event(&self, _booking: &BookingRef<'_>, message: &str) {
        if message == self.panic_on {
            panic!("event log failed on '{message}'");
        }
    }
}

fn context_with_drivers(drivers: &[(&str, u64)]) -> (Arc<DispatchContext>, Arc<RecordingLog>) {
    let log = Arc::new(RecordingLog::default());
    let ctx = Arc::new(DispatchContext::new(DriverPool::new(16), log.clone()));
    for (name, max_delay) in drivers {
        ctx.driver_pool
            .add_driver(Driver::new(*name, *max_delay))
            .unwrap();
    }
    (ctx, log)
}

/// Accepts the booking the way a region does and runs it on its own thread.
fn spawn_booking(
    ctx: &Arc<DispatchContext>,
    passenger: Passenger,
    pool_cancel: CancelToken,
) -> (BookingHandle, thread::JoinHandle<()>) {
    let (booking, handle) = Booking::new(ctx.clone(), passenger, "Central");
    ctx.awaiting.increment();
    let runner = thread::spawn(move || block_on(Box::new(booking).create_task(pool_cancel)));
    (handle, runner)
}

#[test]
fn test_ids_are_unique_and_increasing_per_thread() {
    let (ctx, _log) = context_with_drivers(&[]);
    let creators: Vec<_> = (0..8)
        .map(|t| {
            let ctx = ctx.clone();
            thread::spawn(move || {
                (0..100)
                    .map(|i| {
                        let (booking, _handle) =
                            Booking::new(ctx.clone(), Passenger::new(format!("P{t}-{i}"), 0), "R");
                        booking.id()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut all = HashSet::new();
    for creator in creators {
        let ids = creator.join().unwrap();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        all.extend(ids);
    }
    assert_eq!(all.len(), 800);
    assert!(all.iter().all(|id| id.get() >= 1));
}

#[test]
fn test_booking_completes_and_returns_driver() {
    let (ctx, log) = context_with_drivers(&[("D1", 5)]);
    let (handle, runner) = spawn_booking(&ctx, Passenger::new("P1", 10), CancelToken::new());

    let result = handle.wait().unwrap();
    runner.join().unwrap();

    assert_eq!(result.driver().name(), "D1");
    assert!(result.driver().current_passenger().is_none());
    assert_eq!(result.passenger().name(), "P1");
    assert!(result.trip_duration() <= Duration::from_millis(10));
    assert!(result.elapsed() >= result.trip_duration());
    assert_eq!(ctx.driver_pool.idle_count(), 1);
    assert_eq!(ctx.awaiting.get(), 0);

    let events = log.events.lock().unwrap();
    let id = result.booking_id();
    assert_eq!(
        *events,
        vec![
            format!("{id}:null:P1: Creating booking"),
            format!("{id}:null:P1: Starting booking, getting driver"),
            format!("{id}:D1:P1: Starting, on way to passenger"),
            format!("{id}:D1:P1: Collected passenger, on way to destination"),
            format!("{id}:D1:P1: At destination, driver is now free"),
        ]
    );
}

#[test]
fn test_state_progresses_to_completed() {
    let (ctx, _log) = context_with_drivers(&[("D1", 0)]);
    let (booking, handle) = Booking::new(ctx.clone(), Passenger::new("P1", 0), "Central");
    assert_eq!(handle.state(), BookingState::Created);
    assert_eq!(booking.state(), BookingState::Created);
    ctx.awaiting.increment();

    let runner = thread::spawn(move || block_on(Box::new(booking).create_task(CancelToken::new())));
    assert_eq!(handle.wait_for_state(BookingState::Completed), BookingState::Completed);
    assert!(handle.is_finished());
    runner.join().unwrap();
    assert!(handle.try_outcome().unwrap().is_ok());
}

#[test]
fn test_cancel_while_waiting_for_driver() {
    let (ctx, _log) = context_with_drivers(&[]);
    let (handle, runner) = spawn_booking(&ctx, Passenger::new("P1", 0), CancelToken::new());

    handle.wait_for_state(BookingState::WaitingForDriver);
    assert_eq!(ctx.awaiting.get(), 1);
    handle.cancel();

    let id = handle.id();
    assert_eq!(handle.wait(), Err(BookingError::Interrupted(id)));
    runner.join().unwrap();
    assert_eq!(ctx.awaiting.get(), 0);
    assert_eq!(ctx.driver_pool.idle_count(), 0);
}

#[test]
fn test_pool_cancel_during_trip_returns_driver() {
    let (ctx, _log) = context_with_drivers(&[("D1", 60_000)]);
    let pool_cancel = CancelToken::new();
    let (handle, runner) = spawn_booking(&ctx, Passenger::new("P1", 60_000), pool_cancel.clone());

    handle.wait_for_state(BookingState::PickingUp);
    assert_eq!(ctx.driver_pool.idle_count(), 0);
    pool_cancel.cancel();

    assert!(matches!(handle.wait(), Err(BookingError::Interrupted(_))));
    runner.join().unwrap();

    let driver = ctx.driver_pool.try_get_driver().unwrap();
    assert_eq!(driver.name(), "D1");
    assert!(driver.current_passenger().is_none());
    assert_eq!(ctx.awaiting.get(), 0);
}

#[test]
fn test_abandoned_booking_reports_interrupted() {
    let (ctx, _log) = context_with_drivers(&[("D1", 0)]);
    let (booking, handle) = Booking::new(ctx.clone(), Passenger::new("P1", 0), "Central");
    ctx.awaiting.increment();

    Box::new(booking).abandon();

    assert_eq!(handle.state(), BookingState::Interrupted);
    assert!(matches!(handle.wait(), Err(BookingError::Interrupted(_))));
    assert_eq!(ctx.awaiting.get(), 0);
    assert_eq!(ctx.driver_pool.idle_count(), 1);
}

#[test]
fn test_dropped_booking_reports_abandoned() {
    let (ctx, _log) = context_with_drivers(&[]);
    let (booking, handle) = Booking::new(ctx, Passenger::new("P1", 0), "Central");
    let id = booking.id();
    drop(booking);
    assert_eq!(handle.wait(), Err(BookingError::Abandoned(id)));
}

#[test]
fn test_panicking_booking_ends_interrupted_and_returns_driver() {
    let log = Arc::new(PanickingLog {
        panic_on: "Starting, on way to passenger",
    });
    let ctx = Arc::new(DispatchContext::new(DriverPool::new(4), log));
    ctx.driver_pool.add_driver(Driver::new("D1", 0)).unwrap();

    let pool = WorkerPool::new("panics", 1).unwrap();
    let (booking, handle) = Booking::new(ctx.clone(), Passenger::new("P1", 0), "Central");
    let id = booking.id();
    pool.submit(Box::new(booking), || ctx.awaiting.increment())
        .unwrap();

    assert_eq!(
        handle.wait_for_state(BookingState::Completed),
        BookingState::Interrupted
    );
    assert_eq!(handle.wait(), Err(BookingError::Abandoned(id)));

    pool.shutdown();
    pool.wait_until_finished();
    assert_eq!(ctx.driver_pool.idle_count(), 1);
    assert_eq!(ctx.awaiting.get(), 0);
}
