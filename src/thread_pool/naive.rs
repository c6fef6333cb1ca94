use super::ThreadPool;
use crate::Result;
use std::thread;

/// a pool that is not actually a pool: every spawned job gets a brand new thread.
///
/// This is the reference concurrency model for connection handling. One thread per
/// connection, no admission control, no cap on growth.
pub struct NaiveThreadPool;

impl ThreadPool for NaiveThreadPool {
    /// the `threads` size is ignored; this pool grows with every spawn
    fn new(_threads: u32) -> Result<Self> {
        Ok(NaiveThreadPool)
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        thread::spawn(job);
    }
}
