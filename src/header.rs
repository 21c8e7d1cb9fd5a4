//! # Header Parsing
//!
//! Every encrypted file starts with a fixed-width text header followed by
//! zero padding:
//!
//! ```text
//! CryptKeeper 1.1 <stored size> <kcv> <NONCE HEX>\n\0\0…
//! ```
//!
//! - **1.0** (legacy): the nonce is not persisted; an all-zero nonce is assumed.
//!   A trailing nonce token is still accepted when present.
//! - **1.1** (current): the nonce follows the KCV. All writes use this version.
//!
//! The stored size is the content length plus one. [`FileHeader`] holds the
//! true content length and applies the offset only in [`FileHeader::encode`] and
//! [`FileHeader::parse`]; a stored `0` (fresh file) and `1` both mean empty.

use crate::consts::{
    FORMAT_VERSION_CURRENT, FORMAT_VERSION_LEGACY, HEADER_MAGIC, HEADER_MAGIC_LEGACY, KCV_BYTES,
};
use crate::error::{CryptKeeperError, Result};
use std::fmt;
use std::io::Read;

/// Header format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatVersion {
    /// `1.0`: no nonce field.
    Legacy,
    /// `1.1`: nonce stored as hex.
    Current,
}

impl FormatVersion {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FormatVersion::Legacy => FORMAT_VERSION_LEGACY,
            FormatVersion::Current => FORMAT_VERSION_CURRENT,
        }
    }

    pub fn parse(token: &str) -> Result<Self> {
        match token {
            FORMAT_VERSION_LEGACY => Ok(FormatVersion::Legacy),
            FORMAT_VERSION_CURRENT => Ok(FormatVersion::Current),
            other => Err(CryptKeeperError::UnsupportedVersion(other.to_string())),
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed or freshly initialised file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub version: FormatVersion,
    /// True content length in bytes (not the stored `+1` value).
    pub content_len: u64,
    /// Six lower-case hex digits.
    pub kcv: String,
    /// One cipher block.
    pub nonce: Vec<u8>,
}

impl FileHeader {
    /// Current-version header.
    #[must_use]
    pub fn new(content_len: u64, kcv: String, nonce: Vec<u8>) -> Self {
        Self {
            version: FormatVersion::Current,
            content_len,
            kcv,
            nonce,
        }
    }

    /// Value written to the size field.
    #[inline]
    #[must_use]
    pub const fn stored_size(&self) -> u64 {
        self.content_len + 1
    }

    /// Render the header into exactly `width` bytes (newline-terminated, zero padded).
    pub fn encode(&self, width: usize) -> Result<Vec<u8>> {
        let line = match self.version {
            FormatVersion::Current => format!(
                "{HEADER_MAGIC} {} {} {} {}\n",
                self.version,
                self.stored_size(),
                self.kcv,
                hex::encode_upper(&self.nonce)
            ),
            FormatVersion::Legacy => format!(
                "{HEADER_MAGIC} {} {} {}\n",
                self.version,
                self.stored_size(),
                self.kcv
            ),
        };

        if line.len() > width {
            return Err(CryptKeeperError::Header(format!(
                "encoded header is {} bytes, region is {width}",
                line.len()
            )));
        }

        let mut region = vec![0u8; width];
        region[..line.len()].copy_from_slice(line.as_bytes());
        Ok(region)
    }

    /// Parse a header region. `block_size` fixes the expected nonce length.
    pub fn parse(region: &[u8], block_size: usize) -> Result<Self> {
        let text_end = region.iter().position(|&b| b == 0).unwrap_or(region.len());
        let text = std::str::from_utf8(&region[..text_end])
            .map_err(|_| CryptKeeperError::Header("header is not valid text".into()))?;
        let line = text.split('\n').next().unwrap_or_default();
        let mut tokens = line.split_ascii_whitespace();

        if !matches!(tokens.next(), Some(HEADER_MAGIC | HEADER_MAGIC_LEGACY)) {
            return Err(CryptKeeperError::Header(
                "Not a CryptKeeper file: invalid magic".into(),
            ));
        }

        let version = FormatVersion::parse(
            tokens
                .next()
                .ok_or_else(|| CryptKeeperError::Header("missing version field".into()))?,
        )?;

        let stored_size: u64 = tokens
            .next()
            .ok_or_else(|| CryptKeeperError::Header("missing size field".into()))?
            .parse()
            .map_err(|_| CryptKeeperError::Header("invalid size field".into()))?;

        let kcv = tokens
            .next()
            .ok_or_else(|| CryptKeeperError::Header("missing key check value".into()))?;
        if kcv.len() != KCV_BYTES * 2 || !kcv.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CryptKeeperError::Header(format!(
                "malformed key check value: {kcv:?}"
            )));
        }

        let nonce = match (version, tokens.next()) {
            (_, Some(hex_nonce)) => {
                let nonce = hex::decode(hex_nonce)
                    .map_err(|e| CryptKeeperError::Header(format!("malformed nonce: {e}")))?;
                if nonce.len() != block_size {
                    return Err(CryptKeeperError::Header(format!(
                        "nonce is {} bytes, expected {block_size}",
                        nonce.len()
                    )));
                }
                nonce
            }
            (FormatVersion::Legacy, None) => vec![0u8; block_size],
            (FormatVersion::Current, None) => {
                return Err(CryptKeeperError::Header("missing nonce field".into()))
            }
        };

        if tokens.next().is_some() {
            return Err(CryptKeeperError::Header(
                "unexpected trailing header field".into(),
            ));
        }

        Ok(Self {
            version,
            content_len: stored_size.saturating_sub(1),
            kcv: kcv.to_ascii_lowercase(),
            nonce,
        })
    }

    /// Compare the stored KCV against one recomputed from the working key.
    pub fn validate(&self, computed_kcv: &str) -> Result<()> {
        if self.kcv.eq_ignore_ascii_case(computed_kcv) {
            Ok(())
        } else {
            Err(CryptKeeperError::KeyCheckMismatch {
                stored: self.kcv.clone(),
                computed: computed_kcv.to_string(),
            })
        }
    }
}

/// Read and parse the header region from the start of `reader` without a key.
///
/// Useful for inspecting a file (version, length, nonce) before opening it.
///
/// # Errors
///
/// - [`CryptKeeperError::Header`] if fewer than `width` bytes are available or the text is
///   malformed
/// - [`CryptKeeperError::UnsupportedVersion`] for an unknown version token
/// - [`CryptKeeperError::Io`] on any other read failure
pub fn read_header<R: Read>(mut reader: R, width: usize, block_size: usize) -> Result<FileHeader> {
    let mut region = vec![0u8; width];
    reader.read_exact(&mut region).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            CryptKeeperError::Header(format!("short header: expected {width} bytes"))
        } else {
            CryptKeeperError::Io(e)
        }
    })?;
    FileHeader::parse(&region, block_size)
}
