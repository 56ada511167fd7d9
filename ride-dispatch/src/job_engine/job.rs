// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::job_engine::CancelToken;

pub type JobTask = Pin<Box<dyn Future<Output = ()>>>;

pub trait Job: Send + 'static {
    /// Free-form description, used for logging or debugging
    fn desc(&self) -> &str;

    /// Whether the job should still execute when the pool was cancelled
    /// before the job started.
    fn execute_after_cancellation(&self) -> bool {
        false
    }

    /// Creates the future that executes this job. Consumes the job, so it runs
    /// at most once. The token fires when the owning pool is cancelled.
    fn create_task(self: Box<Self>, cancel: CancelToken) -> JobTask;

    /// Called instead of [`Job::create_task`] when the job is dropped without
    /// being executed.
    fn abandon(self: Box<Self>) {}
}

impl fmt::Debug for dyn Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job").field("desc", &self.desc()).finish()
    }
}
