//! # Constants
//!
//! Format literals, region sizes and key-derivation defaults shared by the
//! header codec, the block mode and the file handle.

/// Product name that opens every header.
pub const HEADER_MAGIC: &str = "CryptKeeper";

/// Lower-case spelling found in files from older writers. Accepted on read only.
pub const HEADER_MAGIC_LEGACY: &str = "Cryptkeeper";

/// Oldest format: the nonce is not persisted.
pub const FORMAT_VERSION_LEGACY: &str = "1.0";

/// Current format, written by this library: the nonce follows the KCV.
pub const FORMAT_VERSION_CURRENT: &str = "1.1";

/// Header width for ciphers with an 8-byte block (DES family).
pub const HEADER_SIZE_64: usize = 64;

/// Header width for ciphers with a 16-byte block (AES family).
pub const HEADER_SIZE_128: usize = 128;

/// Width in bytes of the block counter written into the nonce suffix.
pub const COUNTER_WIDTH: usize = 8;

/// Number of leading cipher-output bytes kept as the key check value.
pub const KCV_BYTES: usize = 3;

/// Minimum allowed PBKDF2 pass count.
pub const PBKDF2_MIN_ITER: u32 = 1;

/// Maximum allowed PBKDF2 pass count.
///
/// Set to `5_000_000` to cap the time an open can spend stretching a password.
pub const PBKDF2_MAX_ITER: u32 = 5_000_000;

/// Pass count used by the file format when stretching a password.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 4096;
