// src/crypto/rng.rs
//! Random byte source used for nonce generation.
//!
//! The file handle never reaches for the OS directly; it asks an injected
//! [`RandomSource`], so tests can supply deterministic bytes.

use crate::error::{CryptKeeperError, Result};
use rand::rngs::OsRng;
use rand::TryRngCore;

/// Supplier of cryptographically random bytes.
pub trait RandomSource: Send {
    fn fill(&mut self, dest: &mut [u8]) -> Result<()>;

    /// `n` fresh random bytes.
    fn bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut out = vec![0u8; n];
        self.fill(&mut out)?;
        Ok(out)
    }
}

/// Operating-system randomness (`getrandom` through `rand::rngs::OsRng`).
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    #[inline]
    fn fill(&mut self, dest: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| CryptKeeperError::Crypto(format!("OS random source failed: {e}")))
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    #[inline]
    fn fill(&mut self, dest: &mut [u8]) -> Result<()> {
        (**self).fill(dest)
    }
}
