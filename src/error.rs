use thiserror::Error;

/// type alias for all operations in this crate that could fail with a [`BookwormError`]
pub type Result<T> = std::result::Result<T, BookwormError>;

/// The error variants used by the bookworm server.
#[derive(Error, Debug)]
pub enum BookwormError {
    /// variant for errors caused by socket and file IO
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// variant for invalid configuration values, such as an unparseable port number
    /// or an empty search pattern
    #[error("{0}")]
    Parsing(String),
}
