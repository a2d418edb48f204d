//! Error types for wool-core

use thiserror::Error;

/// Result type alias using wool-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in wool-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error while reading or writing a store file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Exchange package could not be read or written
    #[error("Exchange package error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Lookup of an id the store doesn't hold
    #[error("Note not found: {0}")]
    NotFound(String),

    /// The imported snapshot predates our last export
    #[error(
        "Cannot import - internal database export lamport clock = {local_export_clock}, \
         external database last import lamport clock = {remote_last_import_clock}"
    )]
    StaleImport {
        local_export_clock: i64,
        remote_last_import_clock: i64,
    },

    /// Store has no primary file but was asked to use it
    #[error("Store has no primary path")]
    MissingPath,

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
