use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors produced by the health aggregator.
///
/// Per-record problems are not represented here; they are reported through
/// [`crate::warnings::SkipWarning`] and never abort a batch.
#[derive(Error, Debug)]
pub enum HealthError {
    /// An input file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The merged output file could not be written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The input parsed as JSON but is not an array of records.
    #[error("Expected a JSON array of records in {path}")]
    NotARecordList { path: PathBuf },

    /// A timestamp string did not match any recognised format.
    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    /// The IANA timezone identifier is not known to the timezone database.
    #[error("Invalid timezone '{0}'; use an IANA name like 'America/Los_Angeles'")]
    InvalidTimezone(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the health crates.
pub type Result<T> = std::result::Result<T, HealthError>;
