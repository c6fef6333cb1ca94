#![deny(missing_docs)]
//! A multithreaded TCP server that ingests "books" as newline-delimited text and
//! ranks them by occurrences of a configured search pattern.
//!
//! Every accepted connection streams one book. The server records each decoded line,
//! flags whether it contains the pattern, writes the finished book to a
//! `book_<NN>.txt` file keyed by connection order, and periodically prints all books
//! ranked by match count.
//!
//! ## Ingestion
//! Each connection is handled by its own execution unit, dispatched through a
//! [`ThreadPool`]. The handler decodes the byte stream into lines (splitting on
//! newlines, skipping empty lines, stripping non-printable bytes and a first-line
//! byte-order mark — see [`LineDecoder`]), and turns every line into an immutable
//! [`LineRecord`] carrying its cached pattern-match flag.
//!
//! Each record is linked into two places at once: the [`SharedLog`], the append-only
//! history of every line across all connections, and the connection's own
//! [`BookEntry`] inside the [`BookRegistry`]. The first materialized line doubles as
//! the book's title. When the peer closes the stream, the handler writes the book's
//! lines, in arrival order, to its output file.
//!
//! ## Analysis
//! A fixed pool of two [`Analyzer`] workers wakes on an interval, recomputes every
//! book's match count, and prints a ranked report. Only one worker may report at a
//! time; a worker that finds the report sink busy skips its cycle entirely instead of
//! queueing behind its peer.
//!
//! ## Matching
//! A line matches when its lowercase text contains the lowercase pattern as a
//! contiguous substring — see [`PatternMatcher`]. The test runs once per line, at
//! record creation, and is cached forever.
//!
//! ## Server executable
//! The [`bookworm-server`] binary wires this library to the command line: it parses
//! the listening port and search pattern (both required), configures logging, and
//! runs a [`BookwormServer`] with one thread per connection.
//!
//! [`bookworm-server`]: ./bin/bookworm-server.rs

pub use analysis::{Analyzer, ANALYSIS_WORKERS, DEFAULT_REPORT_INTERVAL};
pub use book::BookEntry;
pub use decoder::{LineDecoder, MAX_LINE_BYTES};
pub use error::{BookwormError, Result};
pub use log::SharedLog;
pub use pattern::PatternMatcher;
pub use record::LineRecord;
pub use registry::BookRegistry;
pub use server::{BookwormServer, ServerConfig};
pub use thread_pool::{NaiveThreadPool, SharedQueueThreadPool, ThreadPool};

mod analysis;
mod book;
mod decoder;
mod error;
mod handler;
mod log;
mod pattern;
mod record;
mod registry;
mod server;
pub mod sink;
pub mod thread_pool;
