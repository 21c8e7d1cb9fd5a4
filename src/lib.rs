// src/lib.rs

pub mod aliases;
#[cfg(feature = "batch-ops")]
pub mod batch_ops;
pub mod builders;
pub mod consts;
pub mod convert;
pub mod crypto;
pub mod error;
pub mod file;
pub mod header;
pub mod mode;

// High-level API
pub use builders::file_builder::EncryptedFileBuilder;
pub use error::{CryptKeeperError, Result};
pub use file::{EncryptedFile, KeySource, OpenMode};

// Building blocks for custom flows (inspection, other storage, other ciphers)
pub use crypto::cipher::{Algorithm, BlockCipher, EcbBlockCipher};
pub use crypto::kdf::pbkdf2::{derive_password_key, stretch_key};
pub use crypto::rng::{OsRandom, RandomSource};
pub use header::{read_header, FileHeader, FormatVersion};
pub use mode::BlockCounterMode;

#[cfg(feature = "batch-ops")]
pub use batch_ops::{decrypt_batch, encrypt_batch};

pub use convert::{decrypt_file, encrypt_file, rekey, seal, unseal};
