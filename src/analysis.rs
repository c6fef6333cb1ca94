use crate::book::BookEntry;
use crate::registry::BookRegistry;
use crate::sink;
use crate::Result;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, TryLockError};
use std::thread;
use std::time::Duration;
use tracing::{debug, error};

/// the number of analysis worker threads in the fixed pool
pub const ANALYSIS_WORKERS: usize = 2;

/// the default time between ranked analysis reports
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// The periodic ranked-analysis pass over the book registry.
///
/// A fixed pool of [`ANALYSIS_WORKERS`] identical workers shares one `Analyzer`. Each
/// worker loops forever: sleep the configured interval, then attempt one report. The
/// report sink sits behind a lock acquired with `try_lock`; a worker that finds the
/// lock held skips its whole cycle and retries on its next wake-up, so reports are
/// never queued or backlogged.
///
/// A report recomputes every book's match count from its current lines, stable-sorts
/// the registry snapshot by descending count (ties keep snapshot order, newest book
/// first), and writes one line per book. Handlers keep appending while this runs, so
/// each count is a lower bound as of the moment that book was scanned.
pub struct Analyzer {
    registry: Arc<BookRegistry>,
    pattern: String,
    interval: Duration,
    out: Mutex<Box<dyn Write + Send>>,
}

impl Analyzer {
    /// creates an analyzer reporting to stdout
    pub fn new(registry: Arc<BookRegistry>, pattern: String, interval: Duration) -> Analyzer {
        Analyzer::with_sink(registry, pattern, interval, Box::new(io::stdout()))
    }

    /// creates an analyzer reporting into the given sink
    pub fn with_sink(
        registry: Arc<BookRegistry>,
        pattern: String,
        interval: Duration,
        sink: Box<dyn Write + Send>,
    ) -> Analyzer {
        Analyzer {
            registry,
            pattern,
            interval,
            out: Mutex::new(sink),
        }
    }

    /// spawns the fixed worker pool, each worker holding a handle to `analyzer`
    ///
    /// # Errors
    /// returns an error if a worker thread could not be spawned
    pub fn spawn_workers(analyzer: Arc<Analyzer>) -> Result<()> {
        for n in 0..ANALYSIS_WORKERS {
            let worker = analyzer.clone();
            thread::Builder::new()
                .name(format!("analysis-{}", n))
                .spawn(move || worker.run_loop())?;
        }
        Ok(())
    }

    /// the sleep-then-report loop run by every worker
    fn run_loop(&self) {
        loop {
            thread::sleep(self.interval);
            match self.try_report() {
                Ok(true) => debug!("analysis report emitted"),
                Ok(false) => debug!("another worker holds the report sink, skipping this cycle"),
                Err(e) => error!("analysis report failed: {}", e),
            }
        }
    }

    /// attempts one report cycle.
    ///
    /// Returns `Ok(false)` without doing any work when another worker currently holds
    /// the report sink (the non-blocking skip), `Ok(true)` after a report was written.
    pub fn try_report(&self) -> Result<bool> {
        let mut out = match self.out.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return Ok(false),
            Err(TryLockError::Poisoned(e)) => e.into_inner(),
        };
        let ranked = self.ranked_books();
        sink::write_report(&mut *out, &self.pattern, &ranked)?;
        out.flush()?;
        Ok(true)
    }

    /// snapshots the registry, recomputes every match count, and sorts by descending
    /// count. The sort is stable, so equal counts keep snapshot order.
    fn ranked_books(&self) -> Vec<Arc<BookEntry>> {
        let mut books = self.registry.snapshot();
        for book in &books {
            book.recount_matches();
        }
        books.sort_by(|a, b| b.match_count().cmp(&a.match_count()));
        books
    }
}
