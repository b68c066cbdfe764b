//! Error type shared by every operation in the crate.

use std::path::PathBuf;

use openssl::error::ErrorStack;
use thiserror::Error;

use crate::pem_codec::PemKind;

/// Errors returned by the PEM, extraction, generation, expiry, fingerprint and
/// verification operations.
#[derive(Error, Debug)]
pub enum SslToolError {
    /// No decodable PEM block was found in the input
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// The PEM block carries a tag this tool does not handle
    #[error("Unsupported PEM type: {0}")]
    UnsupportedPemKind(String),

    /// The PEM block is a known kind, but not the one the operation needs
    #[error("{role} file is not a valid {expected} (found {found})")]
    WrongArtifactKind {
        role: &'static str,
        expected: PemKind,
        found: PemKind,
    },

    /// A subject field failed validation
    #[error("Invalid {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PEM payload decoded but is not a valid DER structure
    #[error("Error parsing {what}: {source}")]
    ParseFailure {
        what: &'static str,
        #[source]
        source: ErrorStack,
    },

    /// Key generation, signing or encoding failed inside OpenSSL
    #[error("{context}: {source}")]
    Crypto {
        context: &'static str,
        #[source]
        source: ErrorStack,
    },
}

impl SslToolError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SslToolError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(what: &'static str) -> impl FnOnce(ErrorStack) -> Self {
        move |source| SslToolError::ParseFailure { what, source }
    }

    pub(crate) fn crypto(context: &'static str) -> impl FnOnce(ErrorStack) -> Self {
        move |source| SslToolError::Crypto { context, source }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SslToolError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SslToolError>;
