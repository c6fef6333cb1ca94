//! end-to-end tests running a real server on a loopback listener

use bookworm::{
    BookRegistry, BookwormServer, NaiveThreadPool, ServerConfig, SharedLog,
    SharedQueueThreadPool, ThreadPool,
};
use std::fs;
use std::io::Write;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const WAIT: Duration = Duration::from_secs(10);

/// binds a loopback listener, runs the server on it in a background thread, and
/// returns the address to connect to plus handles for inspecting server state
fn start_server<P>(pattern: &str, out_dir: &Path, pool: P) -> (SocketAddr, Arc<BookRegistry>, Arc<SharedLog>)
where
    P: ThreadPool + Send + 'static,
{
    let mut config = ServerConfig::new(pattern);
    config.output_dir = out_dir.to_path_buf();
    // keep the periodic reports out of the way of these tests
    config.report_interval = Duration::from_secs(3600);

    let server = BookwormServer::new(config, pool).unwrap();
    let registry = server.registry();
    let shared_log = server.shared_log();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || server.run_on(listener).unwrap());

    (addr, registry, shared_log)
}

/// polls `cond` until it holds or the timeout expires
fn wait_for<F: Fn() -> bool>(cond: F) -> bool {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    false
}

fn send_book(addr: SocketAddr, body: &[u8]) {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(body).unwrap();
    // dropping the stream closes it, ending the book
}

#[test]
fn one_connection_stores_classifies_and_persists_its_book() {
    let dir = TempDir::new().unwrap();
    let pool = NaiveThreadPool::new(1).unwrap();
    let (addr, registry, shared_log) = start_server("cat", dir.path(), pool);

    send_book(addr, b"Title\na Cat sat\nno match\n");

    let book_path = dir.path().join("book_01.txt");
    assert!(wait_for(|| book_path.exists()), "book file never appeared");
    assert_eq!(
        fs::read_to_string(&book_path).unwrap(),
        "Title\na Cat sat\nno match\n"
    );

    let entry = registry.lookup(1).unwrap();
    assert_eq!(entry.title(), "Title");
    assert_eq!(entry.line_count(), 3);

    let lines = entry.lines();
    let flags: Vec<bool> = lines.iter().map(|l| l.matches_pattern()).collect();
    assert_eq!(flags, vec![false, true, false]);

    assert_eq!(shared_log.len(), 3);
}

#[test]
fn decoding_rules_hold_over_the_wire() {
    let dir = TempDir::new().unwrap();
    let pool = NaiveThreadPool::new(1).unwrap();
    let (addr, registry, _) = start_server("cat", dir.path(), pool);

    // BOM on the title line, an empty line, and a control byte in a later line
    send_book(addr, b"\xef\xbb\xbfMy Title\r\n\r\n\x01cat line\n");

    assert!(wait_for(|| registry
        .lookup(1)
        .map(|b| b.line_count() == 2)
        .unwrap_or(false)));

    let entry = registry.lookup(1).unwrap();
    assert_eq!(entry.title(), "My Title");
    let lines = entry.lines();
    assert_eq!(lines[1].text(), "cat line");
    assert!(lines[1].matches_pattern());
}

#[test]
fn concurrent_connections_do_not_corrupt_each_other() {
    const K: usize = 8;

    let dir = TempDir::new().unwrap();
    let pool = NaiveThreadPool::new(1).unwrap();
    let (addr, registry, shared_log) = start_server("needle", dir.path(), pool);

    crossbeam_utils::thread::scope(|s| {
        for i in 0..K {
            s.spawn(move |_| {
                let body = format!("book-{}\nneedle line {}\nfiller\n", i, i);
                send_book(addr, body.as_bytes());
            });
        }
    })
    .unwrap();

    // every handler has stored its lines and written its file
    assert!(wait_for(|| {
        registry.len() == K
            && (1..=K as u32).all(|order| {
                let path = dir.path().join(format!("book_{:02}.txt", order));
                fs::read_to_string(path)
                    .map(|text| text.lines().count() == 3)
                    .unwrap_or(false)
            })
    }));

    // connection orders are a permutation of 1..=K
    let mut orders: Vec<u32> = registry
        .snapshot()
        .iter()
        .map(|entry| entry.connection_order())
        .collect();
    orders.sort_unstable();
    assert_eq!(orders, (1..=K as u32).collect::<Vec<u32>>());

    // each book holds exactly its own lines, and its file matches
    for entry in registry.snapshot() {
        let i: usize = entry.title().strip_prefix("book-").unwrap().parse().unwrap();
        let expected = format!("book-{}\nneedle line {}\nfiller\n", i, i);

        let lines = entry.lines();
        let texts: Vec<String> = lines.iter().map(|l| l.text().to_string()).collect();
        assert_eq!(
            texts,
            vec![
                format!("book-{}", i),
                format!("needle line {}", i),
                "filler".to_string()
            ]
        );

        let path = dir
            .path()
            .join(format!("book_{:02}.txt", entry.connection_order()));
        assert_eq!(fs::read_to_string(path).unwrap(), expected);
    }

    assert_eq!(shared_log.len(), K * 3);
}

#[test]
fn shared_queue_pool_services_connections_too() {
    let dir = TempDir::new().unwrap();
    let pool = SharedQueueThreadPool::new(4).unwrap();
    let (addr, registry, _) = start_server("cat", dir.path(), pool);

    send_book(addr, b"Queued Title\ncat nap\n");

    let book_path = dir.path().join("book_01.txt");
    assert!(wait_for(|| book_path.exists()));
    assert_eq!(
        fs::read_to_string(book_path).unwrap(),
        "Queued Title\ncat nap\n"
    );
    assert_eq!(registry.lookup(1).unwrap().title(), "Queued Title");
}

#[test]
fn a_connection_with_no_lines_registers_and_emits_nothing() {
    let dir = TempDir::new().unwrap();
    let pool = NaiveThreadPool::new(1).unwrap();
    let (addr, registry, _) = start_server("cat", dir.path(), pool);

    // connect and close without sending a single terminated line
    drop(TcpStream::connect(addr).unwrap());
    // a partial line without its terminator is discarded too
    send_book(addr, b"never terminated");

    thread::sleep(Duration::from_millis(500));
    assert!(registry.is_empty());
    assert!(!dir.path().join("book_01.txt").exists());
    assert!(!dir.path().join("book_02.txt").exists());
}
