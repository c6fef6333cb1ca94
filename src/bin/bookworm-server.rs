//! this binary starts the bookworm server
//! to see the list of arguments, type: `bookworm-server --help`
//!
//! Two arguments are required: the listening port and the search pattern. The server
//! binds 0.0.0.0 on the given port, ingests one book per connection, writes each
//! finished book to `book_<NN>.txt` in the output directory, and prints a ranked
//! pattern-occurrence report on the configured interval.

use bookworm::{BookwormError, BookwormServer, NaiveThreadPool, Result, ServerConfig, ThreadPool};
use clap::{crate_version, App, Arg};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::exit;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_OUTPUT_DIR: &str = ".";
const DEFAULT_INTERVAL_SECS: &str = "5";

/// ['Opt'] holds parsed and validated options from the command line
#[derive(Debug)]
struct Opt {
    addr: SocketAddr,
    pattern: String,
    output_dir: PathBuf,
    interval: Duration,
    idle_timeout: Option<Duration>,
}

impl Opt {
    /// validates the raw command line values
    /// returns `Ok<Opt>` if everything is valid
    /// # Errors
    /// returns [`BookwormError::Parsing`] if one of the parameters is invalid
    fn build(
        port: &str,
        pattern: &str,
        output_dir: &str,
        interval: &str,
        idle_timeout: Option<&str>,
    ) -> Result<Opt> {
        let port: u16 = port.parse().map_err(|_| {
            BookwormError::Parsing(format!("could not parse {} into a port number", port))
        })?;
        if port == 0 {
            return Err(BookwormError::Parsing(
                "the listening port must be a positive integer".to_string(),
            ));
        }

        if pattern.is_empty() {
            return Err(BookwormError::Parsing(
                "the search pattern must not be empty".to_string(),
            ));
        }

        let interval_secs: u64 = interval.parse().map_err(|_| {
            BookwormError::Parsing(format!(
                "could not parse {} into a number of seconds",
                interval
            ))
        })?;
        if interval_secs == 0 {
            return Err(BookwormError::Parsing(
                "the report interval must be at least one second".to_string(),
            ));
        }

        let idle_timeout = match idle_timeout {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    BookwormError::Parsing(format!(
                        "could not parse {} into a number of seconds",
                        raw
                    ))
                })?;
                if secs == 0 {
                    return Err(BookwormError::Parsing(
                        "the idle timeout must be at least one second".to_string(),
                    ));
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Opt {
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
            pattern: pattern.to_string(),
            output_dir: PathBuf::from(output_dir),
            interval: Duration::from_secs(interval_secs),
            idle_timeout,
        })
    }
}

fn main() {
    // set up a tracing subscriber to log to STDERR
    subscriber_config();

    // parse command line args
    let matches = App::new("bookworm-server")
        .version(crate_version!())
        .about("a multi-threaded book ingestion and pattern-search server")
        .arg(
            Arg::with_name("port")
                .short("l")
                .long("port")
                .value_name("PORT")
                .help("sets the port the server listens on")
                .required(true),
        )
        .arg(
            Arg::with_name("pattern")
                .short("p")
                .long("pattern")
                .value_name("PATTERN")
                .help("sets the search pattern counted in every ingested line")
                .required(true),
        )
        .arg(
            Arg::with_name("output-dir")
                .long("output-dir")
                .value_name("DIR")
                .help("sets the directory receiving the book_<NN>.txt files")
                .default_value(DEFAULT_OUTPUT_DIR),
        )
        .arg(
            Arg::with_name("interval")
                .long("interval")
                .value_name("SECONDS")
                .help("sets the number of seconds between ranked analysis reports")
                .default_value(DEFAULT_INTERVAL_SECS),
        )
        .arg(
            Arg::with_name("idle-timeout")
                .long("idle-timeout")
                .value_name("SECONDS")
                .help("closes a connection after this many seconds without data"),
        )
        .get_matches();

    // validate command line options, store them in Opt
    let opt = match Opt::build(
        matches.value_of("port").unwrap(),
        matches.value_of("pattern").unwrap(),
        matches.value_of("output-dir").unwrap(),
        matches.value_of("interval").unwrap(),
        matches.value_of("idle-timeout"),
    ) {
        Ok(opt) => opt,
        Err(err) => {
            eprintln!("{}", err);
            exit(1);
        }
    };

    // start the server
    if let Err(e) = run(opt) {
        eprintln!("{}", e);
        exit(1);
    }
}

fn run(opt: Opt) -> Result<()> {
    info!("bookworm-server {}", env!("CARGO_PKG_VERSION"));
    info!("searching for pattern {:?}", opt.pattern);

    let mut config = ServerConfig::new(opt.pattern);
    config.output_dir = opt.output_dir;
    config.report_interval = opt.interval;
    config.idle_timeout = opt.idle_timeout;

    // one thread per connection, the size is ignored
    let pool = NaiveThreadPool::new(1)?;
    let server = BookwormServer::new(config, pool)?;
    server.run(opt.addr)
}

/// configures a tracing subscriber that will log to STDERR
fn subscriber_config() {
    let subscriber = FmtSubscriber::builder()
        // events at INFO and above; per-line stores log at DEBUG and stay quiet
        .with_max_level(Level::INFO)
        // log to stderr instead of stdout, which the reports go to
        .with_writer(std::io::stderr)
        // completes the builder.
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting tracing default subscriber failed");
}
