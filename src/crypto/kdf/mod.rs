//! # Key Derivation Functions (KDF)
//!
//! Password-mode files never store a key: the working key is stretched from
//! the password with the file nonce as salt every time the file is opened.
//!
//! - [`pbkdf2`] - PBKDF2 over HMAC (SHA-1 for the file format)

pub mod pbkdf2;
