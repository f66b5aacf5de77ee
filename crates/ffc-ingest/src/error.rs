//! Error types for flat file ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to split decoded content into rows.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The delimited reader rejected a record.
    #[error("malformed record near line {line}: {message}")]
    Delimited { line: u64, message: String },
}

/// Errors that can occur while reading an input file.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Decoding Errors ===
    /// The structure names an encoding label that encoding_rs does not know.
    #[error("unknown encoding '{label}' for {path}")]
    UnknownEncoding { path: PathBuf, label: String },

    /// Content is not valid in the declared encoding.
    #[error("{path} is not valid {encoding}")]
    MalformedContent {
        path: PathBuf,
        encoding: &'static str,
    },

    // === Parsing Errors ===
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::MalformedContent {
            path: PathBuf::from("/in/ORD_1.csv"),
            encoding: "UTF-8",
        };
        assert_eq!(err.to_string(), "/in/ORD_1.csv is not valid UTF-8");
    }
}
