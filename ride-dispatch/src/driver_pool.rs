// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

//! Dispatch-wide pool of idle drivers.
//!
//! The pool is a bounded `async_channel`: adding a driver is a send, taking
//! one is a receive. Receiving suspends the caller until a driver is
//! available and each driver is delivered to exactly one receiver.

use async_channel::{Receiver, Sender, TryRecvError, TrySendError};
use log::{debug, error};

use crate::actors::Driver;
use crate::error::PoolError;

/// Default number of idle drivers a pool can hold.
pub const DEFAULT_DRIVER_CAPACITY: usize = 999;

#[derive(Debug, Clone)]
pub struct DriverPool {
    tx: Sender<Driver>,
    rx: Receiver<Driver>,
    capacity: usize,
}

impl DriverPool {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "driver pool capacity must be at least 1");
        let (tx, rx) = async_channel::bounded(capacity);
        Self { tx, rx, capacity }
    }

    /// Adds an idle driver, waking at most one waiting taker.
    pub fn add_driver(&self, driver: Driver) -> Result<(), PoolError> {
        match self.tx.try_send(driver) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(driver)) => {
                error!(
                    "driver pool at capacity {}, refusing {}",
                    self.capacity, driver
                );
                Err(PoolError::AtCapacity {
                    capacity: self.capacity,
                    driver: driver.name().to_string(),
                })
            }
            Err(TrySendError::Closed(_)) => Err(PoolError::Closed),
        }
    }

    /// Takes an idle driver, blocking the calling thread until one is free.
    pub fn get_driver(&self) -> Result<Driver, PoolError> {
        self.rx.recv_blocking().map_err(|_| PoolError::Closed)
    }

    /// Takes an idle driver, suspending the calling task until one is free.
    ///
    /// Dropping the returned future before it completes never loses a driver.
    pub async fn acquire(&self) -> Result<Driver, PoolError> {
        let driver = self.rx.recv().await.map_err(|_| PoolError::Closed)?;
        debug!("driver {} left the pool", driver);
        Ok(driver)
    }

    pub fn try_get_driver(&self) -> Option<Driver> {
        match self.rx.try_recv() {
            Ok(driver) => Some(driver),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => None,
        }
    }

    pub fn idle_count(&self) -> usize {
        self.rx.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// A driver taken from the pool for the duration of one trip.
///
/// If the lease is dropped without [`DriverLease::release`] (cancellation,
/// panic) the driver is still put back, with its passenger cleared.
#[derive(Debug)]
pub struct DriverLease<'a> {
    driver: Option<Driver>,
    pool: &'a DriverPool,
}

impl<'a> DriverLease<'a> {
    pub fn new(driver: Driver, pool: &'a DriverPool) -> Self {
        Self {
            driver: Some(driver),
            pool,
        }
    }

    pub fn driver(&self) -> &Driver {
        self.driver
            .as_ref()
            .unwrap_or_else(|| unreachable!("driver lease used after release"))
    }

    pub fn driver_mut(&mut self) -> &mut Driver {
        self.driver
            .as_mut()
            .unwrap_or_else(|| unreachable!("driver lease used after release"))
    }

    /// Puts the driver back into the pool and returns a snapshot of it.
    pub fn release(mut self) -> Result<Driver, PoolError> {
        let mut driver = self
            .driver
            .take()
            .unwrap_or_else(|| unreachable!("driver lease released twice"));
        driver.clear_passenger();
        let snapshot = driver.clone();
        self.pool.add_driver(driver)?;
        Ok(snapshot)
    }
}

impl Drop for DriverLease<'_> {
    fn drop(&mut self) {
        if let Some(mut driver) = self.driver.take() {
            driver.clear_passenger();
            debug!("returning driver {} after an unfinished trip", driver);
            if let Err(e) = self.pool.add_driver(driver) {
                error!("lost a driver while returning it to the pool: {e}");
            }
        }
    }
}
