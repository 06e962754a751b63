use std::path::PathBuf;

use thiserror::Error;

/// Main application error type that encompasses all possible failure modes
///
/// Structural hAtom problems are never errors: they become [`crate::Report`]s and
/// the validation pass continues. Only the variants below abort a pass.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XHTML parsing error: {document} - {source}")]
    Parse {
        document: String,
        #[source]
        source: ParseError,
    },

    #[error("Validation engine already used: {document} - request a fresh engine from the registry")]
    EngineReused { document: String },

    #[error("No validation session registered for document: {document}")]
    SessionNotFound { document: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Vocabulary error: {0}")]
    Vocabulary(String),

    #[error("File system traversal error: {path} - {reason}")]
    FileSystemTraversal { path: PathBuf, reason: String },

    #[error("Concurrent operation error: {details}")]
    Concurrency { details: String },
}

/// Failures of the underlying markup parser
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("input is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("{0}")]
    Malformed(#[from] roxmltree::Error),
}

/// Keyword vocabulary loading errors
#[derive(Error, Debug)]
pub enum VocabularyError {
    #[error("Vocabulary file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unable to read vocabulary file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid vocabulary format: {details}")]
    InvalidFormat { details: String },
}

impl From<VocabularyError> for ValidationError {
    fn from(err: VocabularyError) -> Self {
        ValidationError::Vocabulary(err.to_string())
    }
}

impl From<crate::config::ConfigError> for ValidationError {
    fn from(err: crate::config::ConfigError) -> Self {
        ValidationError::Config(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Vocabulary result type alias
pub type VocabularyResult<T> = std::result::Result<T, VocabularyError>;
