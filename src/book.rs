use crate::record::LineRecord;
use std::sync::{Arc, Mutex};

/// One ingested book: the ordered line record of a single connection.
///
/// The connection order and title are fixed at creation. The line sequence grows
/// append-only, fed by the owning connection handler, while the cached match count is
/// rewritten by the analysis workers on every report pass. Both live behind the entry's
/// own lock, so appends and recounts are atomic per entry even while a report is
/// scanning other books. Entries are never removed; they live for the process lifetime
/// so repeated analysis passes can re-rank them.
#[derive(Debug)]
pub struct BookEntry {
    connection_order: u32,
    title: String,
    state: Mutex<BookState>,
}

#[derive(Debug)]
struct BookState {
    lines: Vec<Arc<LineRecord>>,
    match_count: usize,
}

impl BookEntry {
    pub(crate) fn new(
        connection_order: u32,
        title: String,
        first_line: Arc<LineRecord>,
    ) -> Arc<BookEntry> {
        Arc::new(BookEntry {
            connection_order,
            title,
            state: Mutex::new(BookState {
                lines: vec![first_line],
                match_count: 0,
            }),
        })
    }

    /// the 1-based accept-time sequence number of the owning connection
    pub fn connection_order(&self) -> u32 {
        self.connection_order
    }

    /// the book's title: the first materialized line of its connection
    pub fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn push_line(&self, line: Arc<LineRecord>) {
        self.lock_state().lines.push(line);
    }

    /// the number of lines recorded so far
    pub fn line_count(&self) -> usize {
        self.lock_state().lines.len()
    }

    /// a point-in-time copy of the line record handles, in arrival order
    pub fn lines(&self) -> Vec<Arc<LineRecord>> {
        self.lock_state().lines.clone()
    }

    /// the match count cached by the most recent analysis pass
    pub fn match_count(&self) -> usize {
        self.lock_state().match_count
    }

    /// rescans the current lines, stores the number of pattern matches, and returns it.
    ///
    /// Handlers may still be appending while a report runs; the stored count is a
    /// lower bound as of the moment this book was scanned.
    pub fn recount_matches(&self) -> usize {
        let mut state = self.lock_state();
        let count = state
            .lines
            .iter()
            .filter(|line| line.matches_pattern())
            .count();
        state.match_count = count;
        count
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, BookState> {
        self.state.lock().expect("book entry lock poisoned")
    }
}
