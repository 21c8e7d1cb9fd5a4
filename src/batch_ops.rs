//! src/batch_ops.rs
//! Parallel whole-file encryption and decryption.
//!
//! Each job gets its own handle and its own nonce; handles are never shared
//! between threads.

use rayon::prelude::*;
use std::path::PathBuf;

use crate::convert::{decrypt_file, encrypt_file};
use crate::crypto::cipher::Algorithm;
use crate::{CryptKeeperError, EncryptedFileBuilder, KeySource};

/// Build a fresh builder per job from a shared key description.
fn job_builder(key_source: &KeySource, algorithm: Algorithm) -> EncryptedFileBuilder {
    let source = match key_source {
        KeySource::Fixed(key) => KeySource::from_key(key.expose_secret().clone()),
        KeySource::Password {
            password,
            iterations,
        } => KeySource::from_password(password.expose_secret().clone())
            .with_iterations(*iterations),
    };
    EncryptedFileBuilder::new(source).with_algorithm(algorithm)
}

/// Encrypt every `(plain, encrypted)` path pair in parallel.
pub fn encrypt_batch(
    batch: &[(PathBuf, PathBuf)],
    key_source: &KeySource,
    algorithm: Algorithm,
) -> Result<(), CryptKeeperError> {
    batch.par_iter().try_for_each(|(src, dst)| {
        encrypt_file(src, dst, &mut job_builder(key_source, algorithm)).map(|_| ())
    })
}

/// Decrypt every `(encrypted, plain)` path pair in parallel.
pub fn decrypt_batch(
    batch: &[(PathBuf, PathBuf)],
    key_source: &KeySource,
    algorithm: Algorithm,
) -> Result<(), CryptKeeperError> {
    batch.par_iter().try_for_each(|(src, dst)| {
        decrypt_file(src, dst, &mut job_builder(key_source, algorithm)).map(|_| ())
    })
}
