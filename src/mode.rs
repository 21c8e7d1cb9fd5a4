//! # Block Counter Mode
//!
//! Whitening scheme that makes the ciphertext of block `i` depend on the key,
//! the file nonce and `i`, without storing a per-block IV.
//!
//! - encrypt: `E_k(plain XOR nonce_i)`
//! - decrypt: `D_k(cipher) XOR nonce_i`
//!
//! `nonce_i` is the base nonce with its trailing [`COUNTER_WIDTH`] bytes
//! replaced by `i` in big-endian order. The operation order is part of the
//! on-disk format: swapping it changes every ciphertext block.

use crate::consts::{COUNTER_WIDTH, KCV_BYTES};
use crate::crypto::cipher::BlockCipher;
use crate::error::{CryptKeeperError, Result};

/// Per-file block transformer: a cipher bound to a key plus the file nonce.
pub struct BlockCounterMode {
    cipher: Box<dyn BlockCipher>,
    nonce: Vec<u8>,
}

impl BlockCounterMode {
    /// Bind `cipher` to `nonce`; the nonce must be exactly one block.
    pub fn new(cipher: Box<dyn BlockCipher>, nonce: Vec<u8>) -> Result<Self> {
        if nonce.len() != cipher.block_size() {
            return Err(CryptKeeperError::Header(format!(
                "nonce is {} bytes, cipher block is {}",
                nonce.len(),
                cipher.block_size()
            )));
        }
        Ok(Self { cipher, nonce })
    }

    #[inline]
    pub fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    #[inline]
    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    /// Base nonce with the counter written big-endian into its trailing bytes.
    ///
    /// For blocks shorter than [`COUNTER_WIDTH`] only the low-order counter
    /// bytes fit; with the supported ciphers the block is always at least 8 bytes.
    pub fn modify_nonce(&self, counter: u64) -> Vec<u8> {
        let mut modified = self.nonce.clone();
        let width = COUNTER_WIDTH.min(modified.len());
        let counter_bytes = counter.to_be_bytes();
        let tail = modified.len() - width;
        modified[tail..].copy_from_slice(&counter_bytes[COUNTER_WIDTH - width..]);
        modified
    }

    /// XOR with the counter nonce, then encrypt. In place.
    pub fn encrypt_block(&self, block: &mut [u8], counter: u64) {
        debug_assert_eq!(block.len(), self.block_size());
        let modified = self.modify_nonce(counter);
        xor_in_place(block, &modified);
        self.cipher.encrypt_block(block);
    }

    /// Decrypt, then XOR with the counter nonce. In place.
    pub fn decrypt_block(&self, block: &mut [u8], counter: u64) {
        debug_assert_eq!(block.len(), self.block_size());
        self.cipher.decrypt_block(block);
        let modified = self.modify_nonce(counter);
        xor_in_place(block, &modified);
    }

    /// Encrypt a block-aligned buffer whose first block has index `first_block`.
    pub fn encrypt_blocks(&self, buffer: &mut [u8], first_block: u64) {
        for (i, block) in buffer.chunks_exact_mut(self.block_size()).enumerate() {
            self.encrypt_block(block, first_block + i as u64);
        }
    }

    /// Decrypt a block-aligned buffer whose first block has index `first_block`.
    pub fn decrypt_blocks(&self, buffer: &mut [u8], first_block: u64) {
        for (i, block) in buffer.chunks_exact_mut(self.block_size()).enumerate() {
            self.decrypt_block(block, first_block + i as u64);
        }
    }

    /// Key check value: the first three bytes of `E_k(0…0)` as six lower-case
    /// hex digits. No nonce and no counter are involved.
    pub fn key_check_value(&self) -> String {
        key_check_value(self.cipher.as_ref())
    }
}

/// Key check value of a bare cipher, see [`BlockCounterMode::key_check_value`].
pub fn key_check_value(cipher: &dyn BlockCipher) -> String {
    let mut zeros = vec![0u8; cipher.block_size()];
    cipher.encrypt_block(&mut zeros);
    hex::encode(&zeros[..KCV_BYTES])
}

#[inline]
fn xor_in_place(block: &mut [u8], mask: &[u8]) {
    block
        .iter_mut()
        .zip(mask.iter())
        .for_each(|(b, m)| *b ^= m);
}
