//! Errors that can be thrown when processing configuration.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseConfigurationError {
    #[error("parse error on {file_path}:{line}:{column}: {message}")]
    ParseError {
        file_path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
    #[error("I/O error: {0}")]
    IoErrorButStringified(String),
}

#[derive(Debug, Error)]
pub enum WriteParsedConfigurationError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq)]
pub enum MakeRuntimeConfigurationError {
    #[error("unsupported configuration version {version}, expected {expected}")]
    UnsupportedVersion { version: u32, expected: u32 },
    #[error("invalid identifier quote {quote:?}: {message}")]
    InvalidIdentifierQuote { quote: String, message: String },
}
