use super::ThreadPool;
use crate::Result;
use crossbeam::channel;
use crossbeam::channel::{Receiver, Sender};
use std::thread;
use tracing::{debug, error};

/// A pool with a fixed number of threads fed from a shared job queue.
///
/// The queue is the MPMC [`channel`] from the crossbeam crate, used here as single
/// producer, multiple consumer: the pool sends, its threads receive. If a job panics,
/// the panicking thread is replaced with a fresh one, so a misbehaving connection
/// does not shrink the pool. Thread creation failures during such a replacement are
/// logged and swallowed, so the pool can in principle shrink to zero, at which point
/// spawning panics.
///
/// [`channel`]: https://docs.rs/crossbeam/0.8.1/crossbeam/channel/index.html
pub struct SharedQueueThreadPool {
    /// the sending half of the job queue
    tx: Sender<Box<dyn FnOnce() + Send + 'static>>,
}

impl ThreadPool for SharedQueueThreadPool {
    /// creates the pool with `threads` receiver threads sharing one queue
    fn new(threads: u32) -> Result<Self> {
        let (tx, rx) = channel::unbounded::<Box<dyn FnOnce() + Send + 'static>>();
        for n in 0..threads {
            let job_rx = JobReceiver(rx.clone());
            thread::Builder::new()
                .name(format!("pool-{}", n))
                .spawn(move || run_jobs(job_rx))?;
        }
        Ok(SharedQueueThreadPool { tx })
    }

    /// queues `job` for the next free thread
    ///
    /// # Panics
    /// Panics if the pool has no threads left.
    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.tx
            .send(Box::new(job))
            .expect("no worker threads remain in the pool");
    }
}

/// the receiving half held by each pool thread; its Drop impl replaces a thread
/// that went down panicking
#[derive(Clone)]
struct JobReceiver(Receiver<Box<dyn FnOnce() + Send + 'static>>);

impl Drop for JobReceiver {
    fn drop(&mut self) {
        if thread::panicking() {
            debug!("pool thread panicked, starting a replacement");
            let job_rx = self.clone();
            if let Err(e) = thread::Builder::new().spawn(move || run_jobs(job_rx)) {
                error!("failed to spawn a replacement pool thread: {}", e);
            }
        }
    }
}

/// waits for jobs on the shared queue and runs them until the pool is dropped
fn run_jobs(rx: JobReceiver) {
    loop {
        match rx.0.recv() {
            Ok(job) => job(),
            Err(_) => {
                debug!("pool destroyed, thread exiting");
                break;
            }
        }
    }
}
