use crate::analysis::{Analyzer, DEFAULT_REPORT_INTERVAL};
use crate::handler;
use crate::log::SharedLog;
use crate::pattern::PatternMatcher;
use crate::registry::BookRegistry;
use crate::thread_pool::ThreadPool;
use crate::Result;
use std::net::{TcpListener, ToSocketAddrs};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Startup configuration for a [`BookwormServer`].
#[derive(Debug)]
pub struct ServerConfig {
    /// the search pattern counted in every ingested line; must be non-empty
    pub pattern: String,
    /// the directory receiving the per-book `book_<NN>.txt` files
    pub output_dir: PathBuf,
    /// the time between ranked analysis reports
    pub report_interval: Duration,
    /// optional per-connection read timeout. Unset by default: an idle connection
    /// holds its execution unit until the peer closes or fails.
    pub idle_timeout: Option<Duration>,
}

impl ServerConfig {
    /// a configuration for `pattern` with the defaults: output into the current
    /// directory, the reference report interval, no idle timeout
    pub fn new(pattern: impl Into<String>) -> ServerConfig {
        ServerConfig {
            pattern: pattern.into(),
            output_dir: PathBuf::from("."),
            report_interval: DEFAULT_REPORT_INTERVAL,
            idle_timeout: None,
        }
    }
}

/// the shared state every connection handler works against, cheap to clone per
/// connection
#[derive(Clone)]
pub(crate) struct ServerState {
    pub(crate) registry: Arc<BookRegistry>,
    pub(crate) shared_log: Arc<SharedLog>,
    pub(crate) matcher: Arc<PatternMatcher>,
    pub(crate) output_dir: PathBuf,
    pub(crate) idle_timeout: Option<Duration>,
}

/// A TCP book-ingestion server.
///
/// It accepts connections, each streaming one book as newline-delimited text, and
/// hands every accepted stream to a handler dispatched through a [`ThreadPool`].
/// Handlers record lines into the shared ingestion log and the per-connection book
/// registry; a fixed pool of analysis workers periodically prints books ranked by
/// occurrences of the configured pattern. The accept loop launches-and-forgets every
/// handler, so no connection ever blocks it.
///
/// # Example
/// Create a server that listens on "127.0.0.1:7000", counts occurrences of "cat",
/// and gives every connection its own thread:
/// ```rust,no_run
/// use bookworm::{BookwormServer, NaiveThreadPool, ServerConfig, ThreadPool};
/// # use bookworm::Result;
/// # fn main() -> Result<()> {
/// let pool = NaiveThreadPool::new(1)?;
/// let server = BookwormServer::new(ServerConfig::new("cat"), pool)?;
/// server.run("127.0.0.1:7000")?;
/// # Ok(())
/// # }
/// ```
pub struct BookwormServer<P: ThreadPool> {
    state: ServerState,
    analyzer: Arc<Analyzer>,
    /// the pool that runs one job per accepted connection
    pool: P,
}

impl<P: ThreadPool> BookwormServer<P> {
    /// builds a server from `config`, validating the pattern
    ///
    /// # Errors
    /// returns [`BookwormError::Parsing`](crate::BookwormError) if the configured
    /// pattern is empty
    pub fn new(config: ServerConfig, pool: P) -> Result<BookwormServer<P>> {
        let matcher = Arc::new(PatternMatcher::new(&config.pattern)?);
        let registry = Arc::new(BookRegistry::new());
        let shared_log = Arc::new(SharedLog::new());
        let analyzer = Arc::new(Analyzer::new(
            registry.clone(),
            matcher.pattern().to_string(),
            config.report_interval,
        ));
        let state = ServerState {
            registry,
            shared_log,
            matcher,
            output_dir: config.output_dir,
            idle_timeout: config.idle_timeout,
        };
        Ok(BookwormServer {
            state,
            analyzer,
            pool,
        })
    }

    /// a handle to the registry of ingested books
    pub fn registry(&self) -> Arc<BookRegistry> {
        self.state.registry.clone()
    }

    /// a handle to the cross-connection ingestion log
    pub fn shared_log(&self) -> Arc<SharedLog> {
        self.state.shared_log.clone()
    }

    /// binds a listener on `addr` and runs the server on it
    ///
    /// # Errors
    /// returns an error if the listener could not be bound or the analysis workers
    /// could not be started
    pub fn run<A: ToSocketAddrs>(self, addr: A) -> Result<()> {
        let listener = TcpListener::bind(addr)?;
        info!("listening on {}", listener.local_addr()?);
        self.run_on(listener)
    }

    /// runs the server on an externally created listener.
    ///
    /// Starts the analysis worker pool, then accepts forever, assigning each
    /// connection the next 1-based connection order and dispatching its handler into
    /// the pool. A failed accept is logged and the loop continues; a failed handler is
    /// logged by the job that ran it and never affects other connections.
    pub fn run_on(self, listener: TcpListener) -> Result<()> {
        Analyzer::spawn_workers(self.analyzer.clone())?;

        let mut connection_counter: u32 = 0;
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    connection_counter += 1;
                    let connection_order = connection_counter;
                    let state = self.state.clone();
                    self.pool.spawn(move || {
                        if let Err(e) = handler::serve(state, stream, connection_order) {
                            error!("error serving connection {}: {}", connection_order, e);
                        }
                    });
                }
                Err(e) => error!("connection failed: {}", e),
            }
        }
        Ok(())
    }
}
