//! src/crypto/cipher.rs
//! Single-block cipher capability and the RustCrypto adapters behind it.
//!
//! The file format only ever asks a cipher to transform one block in place,
//! so the capability is a tiny object-safe trait. [`Algorithm`] picks the
//! concrete primitive from the key length.

use crate::consts::{HEADER_SIZE_128, HEADER_SIZE_64};
use crate::error::{CryptKeeperError, Result};
use aes::cipher::generic_array::GenericArray;
use aes::cipher::typenum::Unsigned;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};
use des::{Des, TdesEde2, TdesEde3};
use std::fmt;

/// Encrypts and decrypts exactly one block under a key fixed at construction.
///
/// `block` must be exactly [`block_size`](BlockCipher::block_size) bytes long.
pub trait BlockCipher: Send + Sync {
    fn block_size(&self) -> usize;
    fn encrypt_block(&self, block: &mut [u8]);
    fn decrypt_block(&self, block: &mut [u8]);
}

/// Adapter from any RustCrypto block cipher to [`BlockCipher`] (raw ECB on one block).
pub struct EcbBlockCipher<C> {
    inner: C,
}

impl<C: KeyInit> EcbBlockCipher<C> {
    pub fn new_from_slice(key: &[u8], algorithm: &'static str) -> Result<Self> {
        C::new_from_slice(key)
            .map(|inner| Self { inner })
            .map_err(|_| CryptKeeperError::InvalidKeyLength {
                algorithm,
                len: key.len(),
            })
    }
}

impl<C> BlockCipher for EcbBlockCipher<C>
where
    C: BlockEncrypt + BlockDecrypt + Send + Sync,
{
    #[inline]
    fn block_size(&self) -> usize {
        C::BlockSize::USIZE
    }

    #[inline]
    fn encrypt_block(&self, block: &mut [u8]) {
        self.inner.encrypt_block(GenericArray::from_mut_slice(block));
    }

    #[inline]
    fn decrypt_block(&self, block: &mut [u8]) {
        self.inner.decrypt_block(GenericArray::from_mut_slice(block));
    }
}

/// Block cipher family used for a file.
///
/// The family fixes the block size, the header width and the length of a
/// password-derived key. The key length then selects the family member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// DES (8-byte key), two-key TDEA (16) or three-key TDEA (24). 8-byte blocks.
    #[default]
    Des,
    /// AES-128, AES-192 or AES-256. 16-byte blocks.
    Aes,
}

impl Algorithm {
    #[must_use]
    pub const fn block_size(self) -> usize {
        match self {
            Algorithm::Des => 8,
            Algorithm::Aes => 16,
        }
    }

    /// Width of the reserved header region; always a multiple of the block size.
    #[must_use]
    pub const fn header_size(self) -> usize {
        match self {
            Algorithm::Des => HEADER_SIZE_64,
            Algorithm::Aes => HEADER_SIZE_128,
        }
    }

    /// Key length produced when stretching a password for this family.
    #[must_use]
    pub const fn derived_key_len(self) -> usize {
        match self {
            Algorithm::Des => 24,
            Algorithm::Aes => 32,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::Des => "DES",
            Algorithm::Aes => "AES",
        }
    }

    /// Build the single-block primitive for `key`.
    pub fn cipher(self, key: &[u8]) -> Result<Box<dyn BlockCipher>> {
        let name = self.name();
        let cipher: Box<dyn BlockCipher> = match (self, key.len()) {
            (Algorithm::Des, 8) => boxed::<Des>(key, name)?,
            (Algorithm::Des, 16) => boxed::<TdesEde2>(key, name)?,
            (Algorithm::Des, 24) => boxed::<TdesEde3>(key, name)?,
            (Algorithm::Aes, 16) => boxed::<Aes128>(key, name)?,
            (Algorithm::Aes, 24) => boxed::<Aes192>(key, name)?,
            (Algorithm::Aes, 32) => boxed::<Aes256>(key, name)?,
            (_, len) => {
                return Err(CryptKeeperError::InvalidKeyLength {
                    algorithm: name,
                    len,
                })
            }
        };
        Ok(cipher)
    }
}

fn boxed<C>(key: &[u8], algorithm: &'static str) -> Result<Box<dyn BlockCipher>>
where
    C: KeyInit + BlockEncrypt + BlockDecrypt + Send + Sync + 'static,
{
    Ok(Box::new(EcbBlockCipher::<C>::new_from_slice(key, algorithm)?))
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn des_known_answer() {
        let key = hex::decode("133457799BBCDFF1").unwrap();
        let cipher = Algorithm::Des.cipher(&key).unwrap();
        let mut block = hex::decode("0123456789ABCDEF").unwrap();
        cipher.encrypt_block(&mut block);
        assert_eq!(hex::encode(&block), "85e813540f0ab405");
        cipher.decrypt_block(&mut block);
        assert_eq!(hex::encode(&block), "0123456789abcdef");
    }

    #[test]
    fn aes128_fips197_vector() {
        let key = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let cipher = Algorithm::Aes.cipher(&key).unwrap();
        let mut block = hex::decode("00112233445566778899aabbccddeeff").unwrap();
        cipher.encrypt_block(&mut block);
        assert_eq!(hex::encode(&block), "69c4e0d86a7b0430d8cdb78070b4c55a");
        assert_eq!(cipher.block_size(), 16);
    }

    #[test]
    fn three_key_tdea_with_equal_keys_is_single_des() {
        let single = hex::decode("133457799BBCDFF1").unwrap();
        let triple = single.repeat(3);

        let des = Algorithm::Des.cipher(&single).unwrap();
        let tdes = Algorithm::Des.cipher(&triple).unwrap();

        let mut a = [0x5au8; 8];
        let mut b = [0x5au8; 8];
        des.encrypt_block(&mut a);
        tdes.encrypt_block(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_unsupported_key_length() {
        let err = Algorithm::Des.cipher(&[0u8; 12]).err().unwrap();
        assert_eq!(err.to_string(), "Invalid key length 12 for DES");
        assert!(Algorithm::Aes.cipher(&[0u8; 8]).is_err());
    }

    #[test]
    fn header_region_is_block_aligned() {
        for alg in [Algorithm::Des, Algorithm::Aes] {
            assert_eq!(alg.header_size() % alg.block_size(), 0);
        }
    }
}
