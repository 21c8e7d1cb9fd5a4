//! src/file/key_source.rs
//! Key provisioning: a fixed key, or a password stretched with the file nonce.
//!
//! A password key cannot exist before the nonce does, so the handle asks the
//! key source for its cipher only after the header has been read or created.

use crate::aliases::{secret_key_from_hex, PasswordString, SecretKey};
use crate::consts::{DEFAULT_PBKDF2_ITERATIONS, PBKDF2_MAX_ITER, PBKDF2_MIN_ITER};
use crate::crypto::cipher::{Algorithm, BlockCipher};
use crate::crypto::kdf::pbkdf2::derive_password_key;
use crate::error::Result;
use std::fmt;

/// Where the working key of a handle comes from.
pub enum KeySource {
    /// Caller-supplied key; its length selects the cipher variant.
    Fixed(SecretKey),
    /// PBKDF2-HMAC-SHA1(password, nonce, iterations), sized for the algorithm.
    Password {
        password: PasswordString,
        iterations: u32,
    },
}

impl KeySource {
    pub fn from_key(key: impl Into<Vec<u8>>) -> Self {
        KeySource::Fixed(SecretKey::new(key.into()))
    }

    pub fn from_key_hex(hex_key: &str) -> Result<Self> {
        Ok(KeySource::Fixed(secret_key_from_hex(hex_key)?))
    }

    /// Password source with the file format's default pass count.
    pub fn from_password(password: impl Into<String>) -> Self {
        KeySource::Password {
            password: PasswordString::new(password.into()),
            iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }

    /// Change the pass count of a password source (clamped to the allowed range).
    /// No effect on a fixed key.
    #[must_use]
    pub fn with_iterations(mut self, passes: u32) -> Self {
        if let KeySource::Password { iterations, .. } = &mut self {
            *iterations = passes.clamp(PBKDF2_MIN_ITER, PBKDF2_MAX_ITER);
        }
        self
    }

    #[must_use]
    pub fn iterations(&self) -> Option<u32> {
        match self {
            KeySource::Fixed(_) => None,
            KeySource::Password { iterations, .. } => Some(*iterations),
        }
    }

    /// Build the block cipher for a file whose nonce is `nonce`.
    pub fn cipher(&self, algorithm: Algorithm, nonce: &[u8]) -> Result<Box<dyn BlockCipher>> {
        match self {
            KeySource::Fixed(key) => algorithm.cipher(key.expose_secret()),
            KeySource::Password {
                password,
                iterations,
            } => {
                let key =
                    derive_password_key(password, nonce, *iterations, algorithm.derived_key_len())?;
                algorithm.cipher(key.expose_secret())
            }
        }
    }
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Fixed(key) => f
                .debug_struct("Fixed")
                .field("len", &key.expose_secret().len())
                .finish_non_exhaustive(),
            KeySource::Password { iterations, .. } => f
                .debug_struct("Password")
                .field("iterations", iterations)
                .finish_non_exhaustive(),
        }
    }
}
