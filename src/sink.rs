//! Output formatting for the two durable surfaces: per-book files and ranked reports.
//!
//! Both are write-only, human-oriented outputs. The file sink runs once per
//! connection, at stream end; the report sink runs once per successful analysis
//! cycle. Neither implies any machine-parseable contract beyond field order.

use crate::book::BookEntry;
use crate::Result;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// the file name a finished book is written under, keyed by connection order.
///
/// Orders are zero-padded to two digits; an order of 100 or more simply produces a
/// wider name (`book_100.txt`).
pub fn book_file_name(connection_order: u32) -> String {
    format!("book_{:02}.txt", connection_order)
}

/// writes `book`'s lines, one per output line in arrival order, to its file in `dir`.
///
/// Returns the path written. Failure to create or write the file is an error for the
/// caller to log; it is never fatal to the server.
pub fn persist_book(dir: &Path, book: &BookEntry) -> Result<PathBuf> {
    let path = dir.join(book_file_name(book.connection_order()));
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    for line in book.lines() {
        writeln!(writer, "{}", line.text())?;
    }
    writer.flush()?;
    Ok(path)
}

/// renders one ranked report: a blank line, a header naming the pattern, one line per
/// book in the given order, and a trailing blank-line separator.
///
/// `books` is expected to be sorted by descending match count already; this function
/// only formats.
pub fn write_report<W: Write>(out: &mut W, pattern: &str, books: &[Arc<BookEntry>]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Books sorted by occurrences of '{}':", pattern)?;
    for book in books {
        writeln!(
            out,
            "Book {:02}: '{}' - {} occurrences",
            book.connection_order(),
            book.title(),
            book.match_count()
        )?;
    }
    writeln!(out)?;
    Ok(())
}
