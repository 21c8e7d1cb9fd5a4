//! # Error Types
//!
//! This module defines the error type used throughout the library.
//! All fallible operations return [`Result<T>`](Result), an alias for
//! `Result<T, CryptKeeperError>`.

use thiserror::Error;

/// Convenience alias used by every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, CryptKeeperError>;

/// The error type for all CryptKeeper operations.
///
/// Covers storage I/O, header parsing and validation, key checking,
/// cursor misuse and failures of the key-derivation / randomness primitives.
#[derive(Error, Debug)]
pub enum CryptKeeperError {
    /// I/O error on the underlying storage.
    ///
    /// Produced when the storage cannot be opened (missing path, permissions)
    /// or when a read/write/seek on it fails mid-operation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Header parsing error.
    ///
    /// - Wrong magic literal
    /// - Short or truncated header region
    /// - Non-numeric size field, malformed KCV or nonce
    /// - Encoded header wider than the reserved region
    #[error("Header error: {0}")]
    Header(String),

    /// The header names a format version this library does not read.
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(String),

    /// The key check value stored in the header does not match the working key.
    ///
    /// This almost always means a wrong key or password.
    #[error("Key check mismatch: header has {stored}, key produces {computed}")]
    KeyCheckMismatch { stored: String, computed: String },

    /// A seek would move the cursor before the start of the content
    /// (or past the largest representable offset).
    #[error("Invalid seek: target offset {target} is out of range")]
    InvalidSeek { target: i128 },

    /// Write attempted through a handle opened in read mode.
    #[error("Handle is read-only")]
    ReadOnly,

    /// The key length is not accepted by the selected block cipher.
    #[error("Invalid key length {len} for {algorithm}")]
    InvalidKeyLength { algorithm: &'static str, len: usize },

    /// Key-derivation or randomness failure.
    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl From<CryptKeeperError> for std::io::Error {
    fn from(err: CryptKeeperError) -> Self {
        use std::io::ErrorKind;
        match err {
            CryptKeeperError::Io(e) => e,
            CryptKeeperError::InvalidSeek { .. } => {
                std::io::Error::new(ErrorKind::InvalidInput, err)
            }
            CryptKeeperError::ReadOnly => std::io::Error::new(ErrorKind::PermissionDenied, err),
            CryptKeeperError::Header(_)
            | CryptKeeperError::UnsupportedVersion(_)
            | CryptKeeperError::KeyCheckMismatch { .. } => {
                std::io::Error::new(ErrorKind::InvalidData, err)
            }
            other => std::io::Error::other(other),
        }
    }
}
