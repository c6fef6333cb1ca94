use crate::book::BookEntry;
use crate::record::LineRecord;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// The coordinator owning the collection of all ingested books.
///
/// Every read and write of the collection goes through this type. The collection
/// itself is guarded by a single lock held only for the duration of one membership
/// operation; each entry's line sequence has its own lock (see [`BookEntry`]), so a
/// snapshot can be iterated, and its entries appended to, without holding the
/// collection lock.
///
/// Books are kept newest-first: a newly created book is inserted at the front.
/// This ordering is what a [`snapshot`](BookRegistry::snapshot) returns and is the
/// tie-break order for ranked reports.
#[derive(Debug)]
pub struct BookRegistry {
    books: Mutex<VecDeque<Arc<BookEntry>>>,
}

impl BookRegistry {
    /// creates an empty registry
    pub fn new() -> BookRegistry {
        BookRegistry {
            books: Mutex::new(VecDeque::new()),
        }
    }

    /// registers a new book for `connection_order`, seeded with its title line.
    /// Called exactly once per connection, when its first line arrives.
    /// Returns the shared handle the owning handler appends through.
    pub fn create_book(
        &self,
        connection_order: u32,
        title: String,
        first_line: Arc<LineRecord>,
    ) -> Arc<BookEntry> {
        let entry = BookEntry::new(connection_order, title, first_line);
        self.lock_books().push_front(entry.clone());
        entry
    }

    /// appends a line record to `entry`'s sequence.
    ///
    /// The append is atomic under the entry's own lock; the collection lock is not
    /// needed because membership does not change.
    pub fn append(&self, entry: &Arc<BookEntry>, line: Arc<LineRecord>) {
        entry.push_line(line);
    }

    /// returns a point-in-time copy of the current entry handles, newest book first.
    ///
    /// The copy is safe to iterate without any lock. Entries are shared by reference:
    /// a snapshotted entry's own line sequence reflects whatever has been appended
    /// since the snapshot was taken.
    pub fn snapshot(&self) -> Vec<Arc<BookEntry>> {
        self.lock_books().iter().cloned().collect()
    }

    /// finds the book registered for `connection_order`, if any
    pub fn lookup(&self, connection_order: u32) -> Option<Arc<BookEntry>> {
        self.lock_books()
            .iter()
            .find(|entry| entry.connection_order() == connection_order)
            .cloned()
    }

    /// the number of registered books
    pub fn len(&self) -> usize {
        self.lock_books().len()
    }

    /// whether no books have been registered yet
    pub fn is_empty(&self) -> bool {
        self.lock_books().is_empty()
    }

    fn lock_books(&self) -> std::sync::MutexGuard<'_, VecDeque<Arc<BookEntry>>> {
        self.books.lock().expect("book registry lock poisoned")
    }
}

impl Default for BookRegistry {
    fn default() -> BookRegistry {
        BookRegistry::new()
    }
}
