//! src/convert.rs
//! Whole-stream helpers built on [`EncryptedFile`]
//!
//! - [`seal`] / [`unseal`] – move plaintext into / out of an open handle
//! - [`encrypt_file`] / [`decrypt_file`] – the same between paths
//! - [`rekey`] – copy content between two handles (new password, key or algorithm)

use crate::builders::file_builder::EncryptedFileBuilder;
use crate::error::Result;
use crate::file::{EncryptedFile, OpenMode};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;
use tracing::debug;

const COPY_CHUNK: usize = 64 * 1024;

/// Write everything from `input` into `file` at its cursor. Returns the byte count.
pub fn seal<R, S>(mut input: R, file: &mut EncryptedFile<S>) -> Result<u64>
where
    R: Read,
    S: Read + Write + Seek,
{
    let mut chunk = vec![0u8; COPY_CHUNK];
    let mut total = 0u64;
    loop {
        let n = match input.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        file.write(&chunk[..n])?;
        total += n as u64;
    }
    Ok(total)
}

/// Copy the content of `file` from its cursor to the end into `output`.
pub fn unseal<W, S>(file: &mut EncryptedFile<S>, mut output: W) -> Result<u64>
where
    W: Write,
    S: Read + Write + Seek,
{
    let mut chunk = vec![0u8; COPY_CHUNK];
    let mut total = 0u64;
    loop {
        let n = file.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        output.write_all(&chunk[..n])?;
        total += n as u64;
    }
    output.flush()?;
    Ok(total)
}

/// Encrypt the plain file at `input` into a new container at `output`.
pub fn encrypt_file<P, Q>(input: P, output: Q, keeper: &mut EncryptedFileBuilder) -> Result<u64>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let reader = BufReader::new(File::open(input.as_ref())?);
    let mut file = keeper.open(output.as_ref(), OpenMode::WriteTruncate)?;
    let total = seal(reader, &mut file)?;
    file.close()?;
    debug!(bytes = total, path = %output.as_ref().display(), "encrypted file written");
    Ok(total)
}

/// Decrypt the container at `input` into a plain file at `output`.
pub fn decrypt_file<P, Q>(input: P, output: Q, keeper: &mut EncryptedFileBuilder) -> Result<u64>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let mut file = keeper.open(input.as_ref(), OpenMode::Read)?;
    let writer = BufWriter::new(File::create(output.as_ref())?);
    let total = unseal(&mut file, writer)?;
    file.close()?;
    debug!(bytes = total, path = %output.as_ref().display(), "plain file written");
    Ok(total)
}

/// Copy the whole content of `source` into `target` at its cursor.
///
/// `source` is read from offset 0; both cursors end after the copied bytes.
pub fn rekey<S, T>(source: &mut EncryptedFile<S>, target: &mut EncryptedFile<T>) -> Result<u64>
where
    S: Read + Write + Seek,
    T: Read + Write + Seek,
{
    source.seek(std::io::SeekFrom::Start(0))?;
    let mut chunk = vec![0u8; COPY_CHUNK];
    let mut total = 0u64;
    loop {
        let n = source.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        target.write(&chunk[..n])?;
        total += n as u64;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::cipher::Algorithm;
    use std::io::Cursor;

    #[test]
    fn seal_then_unseal() {
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let mut keeper = EncryptedFileBuilder::from_key_hex("0011223344556677").unwrap();

        let mut storage = Cursor::new(Vec::new());
        let mut file = keeper.open_storage(&mut storage, OpenMode::WriteTruncate).unwrap();
        assert_eq!(seal(Cursor::new(&data), &mut file).unwrap(), data.len() as u64);
        file.close().unwrap();

        let mut file = keeper.open_storage(&mut storage, OpenMode::Read).unwrap();
        let mut out = Vec::new();
        assert_eq!(unseal(&mut file, &mut out).unwrap(), data.len() as u64);
        assert_eq!(out, data);
    }

    #[test]
    fn rekey_to_another_algorithm() {
        let mut old = EncryptedFileBuilder::from_password("old").with_iterations(3);
        let mut new = EncryptedFileBuilder::from_password("new")
            .with_iterations(3)
            .with_algorithm(Algorithm::Aes);

        let mut old_storage = Cursor::new(Vec::new());
        let mut file = old.open_storage(&mut old_storage, OpenMode::WriteTruncate).unwrap();
        file.write(b"migrate me please").unwrap();

        let mut new_storage = Cursor::new(Vec::new());
        let mut target = new.open_storage(&mut new_storage, OpenMode::WriteTruncate).unwrap();
        assert_eq!(rekey(&mut file, &mut target).unwrap(), 17);
        target.close().unwrap();
        file.close().unwrap();

        let mut reopened = new.open_storage(&mut new_storage, OpenMode::Read).unwrap();
        let mut out = Vec::new();
        unseal(&mut reopened, &mut out).unwrap();
        assert_eq!(out, b"migrate me please");
    }
}
