//! src/crypto/kdf/pbkdf2.rs
//! PBKDF2 password stretching over HMAC, generic in the digest.

use crate::aliases::{PasswordString, SecretKey};
use crate::consts::{PBKDF2_MAX_ITER, PBKDF2_MIN_ITER};
use crate::crypto::hmac::{hmac_tag, keyed_hmac};
use crate::error::{CryptKeeperError, Result};
use hmac::digest::core_api::BlockSizeUser;
use hmac::digest::Digest;
use sha1::Sha1;

/// Stretch `password` and `salt` into exactly `length` key bytes (PBKDF2).
///
/// Works in blocks of the digest width. Block `b` (from 1) starts from
/// `U1 = HMAC(password, salt || b as u32 big-endian)`; each further pass computes
/// `Uk = HMAC(password, Uk-1)` and XORs it into the block accumulator. Blocks are
/// concatenated and the result truncated to `length`.
///
/// # Errors
///
/// [`CryptKeeperError::Crypto`] if `passes` or `length` is zero, or if `length`
/// needs more than `u32::MAX` blocks.
pub fn stretch_key<D>(length: usize, passes: u32, password: &[u8], salt: &[u8]) -> Result<Vec<u8>>
where
    D: Digest + BlockSizeUser + Clone,
{
    if passes < PBKDF2_MIN_ITER {
        return Err(CryptKeeperError::Crypto("PBKDF2 passes must be ≥1".into()));
    }
    if length == 0 {
        return Err(CryptKeeperError::Crypto("PBKDF2 key length must be ≥1".into()));
    }

    let keyed = keyed_hmac::<D>(password)?;

    let width = <D as Digest>::output_size();
    let blocks = u32::try_from(length.div_ceil(width))
        .map_err(|_| CryptKeeperError::Crypto("PBKDF2 key length too large".into()))?;

    let mut key = Vec::with_capacity(blocks as usize * width);
    for block_index in 1..=blocks {
        let mut u = hmac_tag(&keyed, &[salt, &block_index.to_be_bytes()[..]]);
        let mut accumulator = u.clone();

        for _ in 1..passes {
            u = hmac_tag(&keyed, &[u.as_slice()]);
            accumulator
                .iter_mut()
                .zip(u.iter())
                .for_each(|(acc, byte)| *acc ^= byte);
        }

        key.extend_from_slice(&accumulator);
    }

    key.truncate(length);
    Ok(key)
}

/// Derive the working key of a password-mode file: PBKDF2-HMAC-SHA1 with the
/// file nonce as salt.
#[inline]
pub fn derive_password_key(
    password: &PasswordString,
    nonce: &[u8],
    passes: u32,
    length: usize,
) -> Result<SecretKey> {
    if passes > PBKDF2_MAX_ITER {
        return Err(CryptKeeperError::Crypto(format!(
            "PBKDF2 passes unreasonably high (>{PBKDF2_MAX_ITER})"
        )));
    }
    let key = stretch_key::<Sha1>(length, passes, password.expose_secret().as_bytes(), nonce)?;
    Ok(SecretKey::new(key))
}
