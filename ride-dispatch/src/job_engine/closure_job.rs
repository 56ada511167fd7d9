// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::future::Future;

use crate::job_engine::job::{Job, JobTask};
use crate::job_engine::CancelToken;

type TaskCreator = Box<dyn FnOnce(CancelToken) -> JobTask + Send>;

/// A job made from a closure. Handy for ad-hoc work on a region's workers.
pub struct ClosureJob {
    desc: String,
    execute_after_cancellation: bool,
    task_creator: TaskCreator,
    on_abandon: Option<Box<dyn FnOnce() + Send>>,
}

impl ClosureJob {
    pub fn new<F, Fut>(desc: impl Into<String>, execute_after_cancellation: bool, f: F) -> Self
    where
        F: FnOnce(CancelToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let task_creator: TaskCreator =
            Box::new(move |cancel: CancelToken| -> JobTask {
                Box::pin(f(cancel))
            });
        Self {
            desc: desc.into(),
            execute_after_cancellation,
            task_creator,
            on_abandon: None,
        }
    }

    pub fn on_abandon(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_abandon = Some(Box::new(f));
        self
    }
}

impl Job for ClosureJob {
    fn desc(&self) -> &str {
        &self.desc
    }

    fn execute_after_cancellation(&self) -> bool {
        self.execute_after_cancellation
    }

    fn create_task(self: Box<Self>, cancel: CancelToken) -> JobTask {
        (self.task_creator)(cancel)
    }

    fn abandon(self: Box<Self>) {
        if let Some(f) = self.on_abandon {
            f();
        }
    }
}
