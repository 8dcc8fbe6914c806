//! Error types for `PoCatalog`

use thiserror::Error;

use crate::formats::po::DecodeError;

/// The error type for `PoCatalog` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== PO Format Errors ====================
    /// A malformed directive or an orphan continuation line (strict mode only).
    #[error("syntax error on line {line}")]
    Syntax {
        /// 1-based line number.
        line: usize,
    },

    /// A message id was defined twice in the same scope (strict mode only).
    #[error("duplicated key '{key}' near line {line}")]
    DuplicateKey {
        /// The repeated message id.
        key: String,
        /// 1-based line of the first directive (`msgctxt` or `msgid`) of
        /// the repeated entry, not the later line that completed it.
        line: usize,
    },

    /// A quoted string token could not be unescaped.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Decoding was asked to write into an absent catalog.
    #[error("nil decode target")]
    NilTarget,

    // ==================== File System Errors ====================
    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDir(String),

    // ==================== Configuration Errors ====================
    /// Invalid load configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDir(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type alias for `PoCatalog` operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error came from the PO parser rather than from I/O.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::Syntax { .. } | Error::DuplicateKey { .. } | Error::Decode(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(Error::Syntax { line: 3 }.to_string(), "syntax error on line 3");
        assert_eq!(
            Error::DuplicateKey { key: "a".into(), line: 12 }.to_string(),
            "duplicated key 'a' near line 12"
        );
        assert_eq!(Error::NilTarget.to_string(), "nil decode target");
    }

    #[test]
    fn test_parse_error_classification() {
        assert!(Error::Syntax { line: 1 }.is_parse_error());
        assert!(Error::Decode(DecodeError::MissingQuotes).is_parse_error());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(!Error::from(io).is_parse_error());
    }
}
