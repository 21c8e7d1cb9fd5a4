// src/crypto/hmac.rs

//! HMAC primitive of the password KDF (`hmac` + `sha1`).
//!
//! `SimpleHmac<D>` pre-hashes keys longer than the digest block, zero-pads the
//! key to the block width and applies the 0x36 / 0x5c inner and outer masks.
//! The KDF keys the MAC once with [`keyed_hmac`] and then tags every pass with
//! [`hmac_tag`], which clones the keyed state instead of re-deriving the pads.

use crate::error::{CryptKeeperError, Result};
use hmac::digest::core_api::BlockSizeUser;
use hmac::digest::{Digest, Output};
use hmac::{Mac, SimpleHmac};

/// HMAC-D keyed with `key`, ready to be cloned per message.
#[inline]
pub fn keyed_hmac<D>(key: &[u8]) -> Result<SimpleHmac<D>>
where
    D: Digest + BlockSizeUser + Clone,
{
    // `SimpleHmac` accepts any `Digest`; `Hmac` needs the core API.
    <SimpleHmac<D> as Mac>::new_from_slice(key)
        .map_err(|e| CryptKeeperError::Crypto(format!("HMAC key rejected: {e}")))
}

/// Tag the concatenation of `parts` with an already keyed MAC.
#[inline]
pub fn hmac_tag<D>(keyed: &SimpleHmac<D>, parts: &[&[u8]]) -> Output<SimpleHmac<D>>
where
    D: Digest + BlockSizeUser + Clone,
{
    let mut mac = keyed.clone();
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes()
}
