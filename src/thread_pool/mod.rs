//! This module provides the [`ThreadPool`] trait that the server dispatches
//! connection handlers through, along with its two implementations.
//!
//! [`NaiveThreadPool`] starts a fresh thread for every job, giving the reference
//! behavior of one unbounded execution unit per accepted connection. It is the
//! default. [`SharedQueueThreadPool`] runs jobs on a fixed number of threads fed by a
//! shared queue; choosing it caps handler concurrency, which also caps how many
//! connections are serviced at once.

use crate::Result;

/// A trait for the basic functionality of a pool that runs jobs on other threads
pub trait ThreadPool {
    /// creates a pool sized for `threads` concurrent jobs.
    ///
    /// Implementations that spawn per job may ignore the size.
    fn new(threads: u32) -> Result<Self>
    where
        Self: Sized;

    /// Runs `job` on a thread of the pool.
    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static;
}

mod naive;
mod shared_queue;

pub use self::naive::NaiveThreadPool;
pub use self::shared_queue::SharedQueueThreadPool;
