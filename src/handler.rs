use crate::book::BookEntry;
use crate::decoder::LineDecoder;
use crate::record::LineRecord;
use crate::server::ServerState;
use crate::sink;
use crate::Result;
use std::io::{ErrorKind, Read};
use std::net::TcpStream;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const RECV_BUFFER_BYTES: usize = 1024;

/// Runs one connection to completion: reads the byte stream, materializes its lines
/// into the shared log and the connection's book, and on stream end writes the
/// finished book to its file.
///
/// Reads are blocking; with one execution unit per connection nothing else is stalled
/// by them, and per-line arrival order is preserved. The handler ends on EOF, on a
/// read failure, or on an expired idle timeout when one is configured; every ending
/// path triggers the single file emission. Read and sink failures are contained here:
/// they end this connection and never affect the server.
pub(crate) fn serve(state: ServerState, mut tcp: TcpStream, connection_order: u32) -> Result<()> {
    let peer_addr = tcp.peer_addr()?;
    if state.idle_timeout.is_some() {
        tcp.set_read_timeout(state.idle_timeout)?;
    }
    debug!("connection {} accepted from {}", connection_order, peer_addr);

    let mut decoder = LineDecoder::new();
    let mut recv_buffer = [0_u8; RECV_BUFFER_BYTES];
    let mut book: Option<Arc<BookEntry>> = None;

    loop {
        match tcp.read(&mut recv_buffer) {
            Ok(0) => {
                info!("connection {} closed by {}", connection_order, peer_addr);
                break;
            }
            Ok(bytes_read) => {
                for text in decoder.feed(&recv_buffer[..bytes_read]) {
                    store_line(&state, &mut book, connection_order, text);
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            // a timed-out read only happens under a configured idle timeout
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                warn!(
                    "connection {} idle past the configured timeout, closing",
                    connection_order
                );
                break;
            }
            Err(e) => {
                error!("read failed on connection {}: {}", connection_order, e);
                break;
            }
        }
    }

    // exactly one durable emission, at stream end; a connection that never
    // materialized a line has no book and emits nothing
    if let Some(entry) = &book {
        match sink::persist_book(&state.output_dir, entry) {
            Ok(path) => info!("book {} written to {}", connection_order, path.display()),
            Err(e) => error!("could not write book {} to its file: {}", connection_order, e),
        }
    }
    Ok(())
}

/// materializes one decoded line: classify, append to the shared log, then to the
/// connection's book, creating the book from its title line on first use
fn store_line(
    state: &ServerState,
    book: &mut Option<Arc<BookEntry>>,
    connection_order: u32,
    text: String,
) {
    let record = LineRecord::classify(text, &state.matcher);
    state.shared_log.append(record.clone());
    match book {
        None => {
            let title = record.text().to_string();
            let entry = state.registry.create_book(connection_order, title, record.clone());
            debug!(
                "book {} registered with title {:?}",
                connection_order,
                entry.title()
            );
            *book = Some(entry);
        }
        Some(entry) => state.registry.append(entry, record.clone()),
    }
    debug!("stored line {:?}", record.text());
}
