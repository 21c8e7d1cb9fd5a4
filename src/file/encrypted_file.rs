//! src/file/encrypted_file.rs
//! Seekable encrypted file handle.
//!
//! Storage layout:
//!
//! ```text
//! [0, header)                          fixed-width text header
//! [header + i*block, header + (i+1)*block)   ciphertext of block i
//! ```
//!
//! Reads and writes are mapped onto the whole blocks covering the requested
//! byte range. Partially covered blocks that already hold content are
//! decrypted first so the bytes around the written span survive
//! (read-modify-write). Each block is transformed by [`BlockCounterMode`]
//! with its absolute index as the counter.

use crate::crypto::cipher::Algorithm;
use crate::crypto::rng::{OsRandom, RandomSource};
use crate::error::{CryptKeeperError, Result};
use crate::file::key_source::KeySource;
use crate::file::open_mode::OpenMode;
use crate::header::{FileHeader, FormatVersion};
use crate::mode::BlockCounterMode;
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, trace, warn};

/// Largest zero run encrypted per step when filling a gap left by a seek past the end.
const GAP_FILL_CHUNK: usize = 64 * 1024;

/// An open encrypted file.
///
/// Holds the storage, the working key (inside the block mode) and the cursor.
/// All cursor operations take `&mut self`: one handle, one cursor, one thread.
///
/// The header is rewritten on [`close`](EncryptedFile::close) (or
/// [`flush`](EncryptedFile::flush)) when the handle is writable. Dropping an
/// unclosed handle performs the same rewrite and logs a failure.
pub struct EncryptedFile<S = File>
where
    S: Read + Write + Seek,
{
    storage: S,
    mode: BlockCounterMode,
    algorithm: Algorithm,
    source_version: FormatVersion,
    header_size: u64,
    offset: u64,
    len: u64,
    read_only: bool,
    closed: bool,
}

impl EncryptedFile<File> {
    /// Open `path` with the default algorithm (DES family) and OS randomness.
    ///
    /// See [`EncryptedFileBuilder`](crate::EncryptedFileBuilder) for other settings.
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode, key_source: &KeySource) -> Result<Self> {
        Self::open_with(path, mode, Algorithm::default(), key_source, &mut OsRandom)
    }

    /// Open `path` with an explicit algorithm and random source.
    ///
    /// # Errors
    ///
    /// - [`CryptKeeperError::Io`] if the path cannot be opened in `mode`
    /// - [`CryptKeeperError::Header`] / [`CryptKeeperError::UnsupportedVersion`] for a bad header
    /// - [`CryptKeeperError::KeyCheckMismatch`] for a wrong key or password
    pub fn open_with<P: AsRef<Path>>(
        path: P,
        mode: OpenMode,
        algorithm: Algorithm,
        key_source: &KeySource,
        random: &mut dyn RandomSource,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = mode.open_options().open(path)?;
        debug!(path = %path.display(), %mode, %algorithm, "opening encrypted file");
        Self::from_storage(file, mode, algorithm, key_source, random)
    }
}

impl<S> EncryptedFile<S>
where
    S: Read + Write + Seek,
{
    /// Open an encrypted container held in arbitrary seekable storage.
    ///
    /// `WriteTruncate` / `WriteCreate` do not shrink `storage`; they start from
    /// an empty content length, so any old bytes are unreachable.
    pub fn from_storage(
        mut storage: S,
        mode: OpenMode,
        algorithm: Algorithm,
        key_source: &KeySource,
        random: &mut dyn RandomSource,
    ) -> Result<Self> {
        let header_size = algorithm.header_size();
        let block_size = algorithm.block_size();

        let parsed = if mode.initializes_header() {
            None
        } else {
            match read_header_region(&mut storage, header_size)? {
                Some(region) => Some(FileHeader::parse(&region, block_size)?),
                None if mode.is_append() => None,
                None => {
                    return Err(CryptKeeperError::Header(format!(
                        "short header: expected {header_size} bytes"
                    )))
                }
            }
        };

        let (nonce, len, source_version) = match &parsed {
            Some(header) => (header.nonce.clone(), header.content_len, header.version),
            None => (random.bytes(block_size)?, 0, FormatVersion::Current),
        };

        let cipher = key_source.cipher(algorithm, &nonce)?;
        let block_mode = BlockCounterMode::new(cipher, nonce)?;

        if let Some(header) = &parsed {
            header.validate(&block_mode.key_check_value())?;
        }

        let offset = if mode.is_append() { len } else { 0 };
        debug!(
            %mode,
            version = %source_version,
            len,
            fresh = parsed.is_none(),
            "encrypted file ready"
        );

        Ok(Self {
            storage,
            mode: block_mode,
            algorithm,
            source_version,
            header_size: header_size as u64,
            offset,
            len,
            read_only: mode.is_read_only(),
            closed: false,
        })
    }

    /// Read up to `buf.len()` decrypted bytes at the cursor.
    ///
    /// Returns the number of bytes produced: fewer than requested near the end
    /// of content, `0` at or past it. The cursor advances by the returned count.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let start = self.offset;
        let end = start.saturating_add(buf.len() as u64).min(self.len);
        if start >= end {
            return Ok(0);
        }

        let block = self.block_size();
        let block_start = start / block;
        let block_end = end.div_ceil(block);
        trace!(start, end, block_start, block_end, "read");

        let mut blocks = vec![0u8; ((block_end - block_start) * block) as usize];
        self.storage
            .seek(SeekFrom::Start(self.block_offset(block_start)))?;
        self.storage.read_exact(&mut blocks)?;
        self.mode.decrypt_blocks(&mut blocks, block_start);

        let skip = (start - block_start * block) as usize;
        let count = (end - start) as usize;
        buf[..count].copy_from_slice(&blocks[skip..skip + count]);

        self.offset = end;
        Ok(count)
    }

    /// Write all of `buf` at the cursor, extending the content if needed.
    ///
    /// Returns `buf.len()`. If the cursor was moved past the end of content,
    /// the gap is first filled with encrypted zeros.
    ///
    /// # Errors
    ///
    /// [`CryptKeeperError::ReadOnly`] on a read-only handle; storage failures are
    /// returned as [`CryptKeeperError::Io`] and leave the content length unchanged
    /// for the failing span.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if self.read_only {
            return Err(CryptKeeperError::ReadOnly);
        }
        if buf.is_empty() {
            return Ok(0);
        }
        if self.offset > self.len {
            self.fill_gap()?;
        }
        self.write_at_cursor(buf)?;
        Ok(buf.len())
    }

    /// Move the cursor. `SeekFrom::End` is relative to the content length.
    ///
    /// Read-only handles clamp the target to the content length.
    ///
    /// # Errors
    ///
    /// [`CryptKeeperError::InvalidSeek`] if the target is negative; the cursor is unchanged.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => i128::from(offset),
            SeekFrom::End(delta) => i128::from(self.len) + i128::from(delta),
            SeekFrom::Current(delta) => i128::from(self.offset) + i128::from(delta),
        };
        let mut offset =
            u64::try_from(target).map_err(|_| CryptKeeperError::InvalidSeek { target })?;
        if self.read_only && offset > self.len {
            offset = self.len;
        }
        self.offset = offset;
        Ok(offset)
    }

    /// Current cursor position.
    #[inline]
    #[must_use]
    pub fn tell(&self) -> u64 {
        self.offset
    }

    /// Content length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    #[inline]
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Format version found on open (`Current` for fresh files).
    #[inline]
    #[must_use]
    pub fn source_version(&self) -> FormatVersion {
        self.source_version
    }

    #[inline]
    #[must_use]
    pub fn nonce(&self) -> &[u8] {
        self.mode.nonce()
    }

    #[must_use]
    pub fn key_check_value(&self) -> String {
        self.mode.key_check_value()
    }

    /// Header that [`close`](EncryptedFile::close) would write now.
    #[must_use]
    pub fn header(&self) -> FileHeader {
        FileHeader::new(self.len, self.key_check_value(), self.nonce().to_vec())
    }

    /// Rewrite the header (writable handles) and flush the storage.
    pub fn flush(&mut self) -> Result<()> {
        if !self.read_only {
            let region = self.header().encode(self.header_size as usize)?;
            self.storage.seek(SeekFrom::Start(0))?;
            self.storage.write_all(&region)?;
            debug!(len = self.len, "header rewritten");
        }
        self.storage.flush()?;
        Ok(())
    }

    /// Rewrite the header if writable, then release the storage.
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        let result = self.flush();
        debug!(ok = result.is_ok(), "encrypted file closed");
        result
    }

    #[inline]
    fn block_size(&self) -> u64 {
        self.mode.block_size() as u64
    }

    #[inline]
    fn block_offset(&self, block_index: u64) -> u64 {
        self.header_size + block_index * self.block_size()
    }

    fn write_at_cursor(&mut self, data: &[u8]) -> Result<()> {
        let start = self.offset;
        let end = start.checked_add(data.len() as u64).ok_or_else(|| {
            CryptKeeperError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                "write would overflow the file offset",
            ))
        })?;

        let block = self.block_size();
        let block_start = start / block;
        let block_end = end.div_ceil(block);
        let mut blocks = vec![0u8; ((block_end - block_start) * block) as usize];

        // Blocks up to here hold content and must be merged, not overwritten.
        let content_blocks = self.len.div_ceil(block);
        if block_start < content_blocks {
            let existing = ((block_end.min(content_blocks) - block_start) * block) as usize;
            self.storage
                .seek(SeekFrom::Start(self.block_offset(block_start)))?;
            self.storage.read_exact(&mut blocks[..existing])?;
            self.mode.decrypt_blocks(&mut blocks[..existing], block_start);
        }
        trace!(start, end, block_start, block_end, merged = block_start < content_blocks, "write");

        let skip = (start - block_start * block) as usize;
        blocks[skip..skip + data.len()].copy_from_slice(data);
        self.mode.encrypt_blocks(&mut blocks, block_start);

        self.storage
            .seek(SeekFrom::Start(self.block_offset(block_start)))?;
        self.storage.write_all(&blocks)?;

        self.offset = end;
        self.len = self.len.max(end);
        Ok(())
    }

    fn fill_gap(&mut self) -> Result<()> {
        let target = self.offset;
        trace!(from = self.len, to = target, "filling gap with zeros");
        self.offset = self.len;
        let zeros = vec![0u8; GAP_FILL_CHUNK.min((target - self.len) as usize)];
        while self.offset < target {
            let step = ((target - self.offset) as usize).min(zeros.len());
            self.write_at_cursor(&zeros[..step])?;
        }
        Ok(())
    }
}

// Leaves out the storage and the keyed block mode.
impl<S> fmt::Debug for EncryptedFile<S>
where
    S: Read + Write + Seek,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedFile")
            .field("algorithm", &self.algorithm)
            .field("offset", &self.offset)
            .field("len", &self.len)
            .field("read_only", &self.read_only)
            .finish_non_exhaustive()
    }
}

impl<S> Drop for EncryptedFile<S>
where
    S: Read + Write + Seek,
{
    fn drop(&mut self) {
        if !self.closed {
            if let Err(e) = self.flush() {
                warn!(error = %e, "failed to rewrite header while dropping encrypted file");
            }
        }
    }
}

impl<S> Read for EncryptedFile<S>
where
    S: Read + Write + Seek,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        EncryptedFile::read(self, buf).map_err(io::Error::from)
    }
}

impl<S> Write for EncryptedFile<S>
where
    S: Read + Write + Seek,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        EncryptedFile::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        EncryptedFile::flush(self).map_err(io::Error::from)
    }
}

impl<S> Seek for EncryptedFile<S>
where
    S: Read + Write + Seek,
{
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        EncryptedFile::seek(self, pos).map_err(io::Error::from)
    }
}

/// Read the header region from offset 0; `None` if the storage is shorter than `width`.
fn read_header_region<S: Read + Seek>(storage: &mut S, width: usize) -> Result<Option<Vec<u8>>> {
    storage.seek(SeekFrom::Start(0))?;
    let mut region = Vec::with_capacity(width);
    storage.by_ref().take(width as u64).read_to_end(&mut region)?;
    Ok((region.len() == width).then_some(region))
}
