//! src/builders/file_builder.rs
//! Encrypted file builder: key source, algorithm, KDF passes and randomness.

use crate::aliases::{PasswordString, SecretKey};
use crate::crypto::cipher::Algorithm;
use crate::crypto::rng::{OsRandom, RandomSource};
use crate::error::Result;
use crate::file::{EncryptedFile, KeySource, OpenMode};
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

/// Builder for [`EncryptedFile`] handles.
///
/// Defaults: [`Algorithm::Des`], 4096 PBKDF2 passes for passwords
/// (see [`DEFAULT_PBKDF2_ITERATIONS`](crate::consts::DEFAULT_PBKDF2_ITERATIONS)),
/// OS randomness for new nonces.
///
/// ```no_run
/// use cryptkeeper_rs::{EncryptedFileBuilder, OpenMode};
///
/// let mut keeper = EncryptedFileBuilder::from_password("correct horse battery staple");
/// let mut file = keeper.open("notes.enc", OpenMode::WriteTruncate)?;
/// file.write(b"hello")?;
/// file.close()?;
/// # Ok::<(), cryptkeeper_rs::CryptKeeperError>(())
/// ```
pub struct EncryptedFileBuilder {
    algorithm: Algorithm,
    key_source: KeySource,
    random: Box<dyn RandomSource>,
}

impl EncryptedFileBuilder {
    #[must_use]
    pub fn new(key_source: KeySource) -> Self {
        Self {
            algorithm: Algorithm::default(),
            key_source,
            random: Box::new(OsRandom),
        }
    }

    /// Password mode: the key is stretched from `password` and each file's nonce.
    #[must_use]
    pub fn from_password(password: impl Into<String>) -> Self {
        Self::new(KeySource::from_password(password))
    }

    /// Password mode from an already wrapped password.
    #[must_use]
    pub fn from_secure_password(password: PasswordString) -> Self {
        Self::new(KeySource::Password {
            password,
            iterations: crate::consts::DEFAULT_PBKDF2_ITERATIONS,
        })
    }

    /// Fixed-key mode; the key length selects the cipher variant.
    #[must_use]
    pub fn from_key(key: SecretKey) -> Self {
        Self::new(KeySource::Fixed(key))
    }

    /// Fixed-key mode from a hex string.
    pub fn from_key_hex(hex_key: &str) -> Result<Self> {
        Ok(Self::new(KeySource::from_key_hex(hex_key)?))
    }

    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the PBKDF2 pass count (clamped to the allowed range). Ignored for fixed keys.
    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.key_source = self.key_source.with_iterations(iterations);
        self
    }

    /// Replace the nonce source (deterministic sources are useful in tests).
    #[must_use]
    pub fn with_random_source(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Box::new(random);
        self
    }

    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Current PBKDF2 pass count, `None` in fixed-key mode.
    #[must_use]
    pub fn iterations(&self) -> Option<u32> {
        self.key_source.iterations()
    }

    #[must_use]
    pub fn key_source(&self) -> &KeySource {
        &self.key_source
    }

    /// Open a file on disk.
    pub fn open<P: AsRef<Path>>(&mut self, path: P, mode: OpenMode) -> Result<EncryptedFile<File>> {
        EncryptedFile::open_with(
            path,
            mode,
            self.algorithm,
            &self.key_source,
            &mut *self.random,
        )
    }

    /// Open a container held in arbitrary seekable storage.
    pub fn open_storage<S>(&mut self, storage: S, mode: OpenMode) -> Result<EncryptedFile<S>>
    where
        S: Read + Write + Seek,
    {
        EncryptedFile::from_storage(
            storage,
            mode,
            self.algorithm,
            &self.key_source,
            &mut *self.random,
        )
    }
}

impl std::fmt::Debug for EncryptedFileBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedFileBuilder")
            .field("algorithm", &self.algorithm)
            .field("key_source", &self.key_source)
            .finish_non_exhaustive()
    }
}
