use std::path::PathBuf;

/// Boxed driver error, used where the concrete error depends on the backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot connect to {url}")]
    Connect {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("query failed")]
    Query(#[source] BoxError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("cannot write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// The url is redacted before it ends up in the message.
    pub(crate) fn connect(url: &str, source: impl Into<BoxError>) -> Self {
        Error::Connect {
            url: crate::config::redact_url(url),
            source: source.into(),
        }
    }

    pub(crate) fn query(source: impl Into<BoxError>) -> Self {
        Error::Query(source.into())
    }
}

/// Failures while turning rows into statements.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(
        "column count mismatch: {expected} export columns given, but the query returns {actual} columns"
    )]
    ColumnCountMismatch { expected: usize, actual: usize },

    #[error("row {row} has {actual} values, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("failed to read row {row}")]
    Row {
        row: usize,
        #[source]
        source: BoxError,
    },
}
