// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>
//! # Design: Bounded per-region job execution
//!
//! ## Overview
//! Every region owns one [`WorkerPool`](worker_pool::WorkerPool):
//!
//! - Jobs are queued on an unbounded `async_channel`; submitting never blocks.
//! - A fixed number of worker threads drain the queue. Each worker holds an
//!   admission permit for exactly as long as its job runs, so the number of
//!   executing jobs never exceeds the pool size.
//! - Shutdown closes the queue. Workers keep draining what was already
//!   queued and exit once it is empty.
//! - Hard shutdown additionally fires the pool's [`CancelToken`]: running
//!   jobs observe it at their next suspension point, queued jobs are
//!   abandoned instead of executed.
//!
//! ```text
//!         +---------------------------------------+
//!         |              submit(job)              |
//!         +-------------------+-------------------+
//!                             |
//!                             v
//!                  +----------+----------+
//!                  |  queue (unbounded)  |
//!                  +--+--------+------+--+
//!                     |        |      |
//!                +----v--+ +---v---+ +v------+
//!                | w-0   | | w-1   | | w-k   |   one admission permit each
//!                +-------+ +-------+ +-------+
//! ```

pub mod admission;
pub mod cancel;
#[cfg(test)]
pub(crate) mod closure_job;
pub mod job;
pub mod worker_pool;

pub use admission::{AdmissionPermit, AdmissionSlots};
pub use cancel::CancelToken;
pub use job::Job;
pub use worker_pool::WorkerPool;
