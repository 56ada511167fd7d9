// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, info};

use crate::actors::{Driver, Passenger};
use crate::config::DispatchConfig;
use crate::context::DispatchContext;
use crate::driver_pool::DriverPool;
use crate::error::{DispatchError, PoolError};
use crate::event_log::{BookingRef, ConsoleEventLog, EventLog};
use crate::region::{Admission, Region};

/// Owns the regions and the shared driver pool and routes bookings.
#[derive(Debug)]
pub struct Dispatch {
    regions: BTreeMap<String, Region>,
    ctx: Arc<DispatchContext>,
}

impl Dispatch {
    /// Builds the dispatch and one region per configured entry. Booking events
    /// are written to the log if `config.log_events` is set.
    pub fn new(config: &DispatchConfig) -> Result<Self, DispatchError> {
        Self::with_event_log(config, Arc::new(ConsoleEventLog::new(config.log_events)))
    }

    pub fn with_event_log(
        config: &DispatchConfig,
        event_log: Arc<dyn EventLog>,
    ) -> Result<Self, DispatchError> {
        config.validate()?;
        info!("Creating dispatch with {} regions", config.regions.len());

        let ctx = Arc::new(DispatchContext::new(
            DriverPool::new(config.driver_capacity),
            event_log,
        ));

        let mut regions = BTreeMap::new();
        for (name, &max_simultaneous_jobs) in &config.regions {
            debug!("Creating region {name}");
            let region = Region::new(ctx.clone(), name.clone(), max_simultaneous_jobs)
                .map_err(|source| DispatchError::Spawn {
                    region: name.clone(),
                    source,
                })?;
            regions.insert(name.clone(), region);
        }
        info!("Done creating {} regions", regions.len());

        Ok(Self { regions, ctx })
    }

    /// Adds an idle driver. Safe to call from any thread.
    pub fn add_driver(&self, driver: Driver) -> Result<(), PoolError> {
        self.ctx.driver_pool.add_driver(driver)
    }

    /// Takes an idle driver, blocking until one is available.
    pub fn get_driver(&self) -> Result<Driver, PoolError> {
        self.ctx.driver_pool.get_driver()
    }

    /// Books `passenger` into the region called `region`.
    ///
    /// An accepted booking counts as awaiting a driver until it gets one.
    /// A rejected booking (region shutting down) leaves the count untouched.
    pub fn book(&self, passenger: Passenger, region: &str) -> Result<Admission, DispatchError> {
        let region = self
            .regions
            .get(region)
            .ok_or_else(|| DispatchError::UnknownRegion(region.to_string()))?;
        Ok(region.submit(passenger))
    }

    /// Accepted bookings across all regions that have no driver yet.
    pub fn bookings_awaiting_driver(&self) -> usize {
        self.ctx.awaiting.get()
    }

    pub fn log_event(&self, booking: &BookingRef<'_>, message: &str) {
        self.ctx.log_event(booking, message);
    }

    /// Tells every region to finish its accepted bookings and reject new
    /// ones. Returns without waiting for the bookings.
    pub fn shutdown(&self) {
        for region in self.regions.values() {
            region.shutdown();
        }
    }

    /// Tells every region to stop accepting bookings and interrupt the ones
    /// it accepted.
    pub fn shutdown_now(&self) {
        for region in self.regions.values() {
            region.shutdown_now();
        }
    }

    /// Blocks until every region's workers have exited. Call after a shutdown.
    pub fn wait_until_finished(&self) {
        for region in self.regions.values() {
            region.wait_until_finished();
        }
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.get(name)
    }

    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn driver_pool(&self) -> &DriverPool {
        &self.ctx.driver_pool
    }
}
