//! src/file/open_mode.rs
//! fopen-style open modes and what each one means for the header.

use crate::error::CryptKeeperError;
use std::fmt;
use std::fs::OpenOptions;
use std::str::FromStr;

/// How an encrypted file is opened.
///
/// Every writable mode opens the storage read+write, because the header has
/// to be rewritten at close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// `"r"`: existing file, read-only.
    Read,
    /// `"w"`: create or truncate, fresh header.
    WriteTruncate,
    /// `"a"`: existing file positioned at end of content; created when absent.
    Append,
    /// `"r+"`: existing file, read and write from offset 0.
    ReadWrite,
    /// `"w+"`: create or truncate, fresh header.
    WriteCreate,
    /// `"a+"`: like [`OpenMode::Append`].
    AppendCreate,
}

impl OpenMode {
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(self, OpenMode::Read)
    }

    /// Modes that always start from a fresh header and empty content.
    #[must_use]
    pub const fn initializes_header(self) -> bool {
        matches!(self, OpenMode::WriteTruncate | OpenMode::WriteCreate)
    }

    /// Modes that fall back to a fresh header when the storage holds none.
    #[must_use]
    pub const fn is_append(self) -> bool {
        matches!(self, OpenMode::Append | OpenMode::AppendCreate)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            OpenMode::Read => "r",
            OpenMode::WriteTruncate => "w",
            OpenMode::Append => "a",
            OpenMode::ReadWrite => "r+",
            OpenMode::WriteCreate => "w+",
            OpenMode::AppendCreate => "a+",
        }
    }

    /// `std::fs` options implementing this mode on a plain file.
    #[must_use]
    pub fn open_options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options.read(true);
        match self {
            OpenMode::Read => {}
            OpenMode::ReadWrite => {
                options.write(true);
            }
            OpenMode::WriteTruncate | OpenMode::WriteCreate => {
                options.write(true).create(true).truncate(true);
            }
            OpenMode::Append | OpenMode::AppendCreate => {
                options.write(true).create(true);
            }
        }
        options
    }
}

impl FromStr for OpenMode {
    type Err = CryptKeeperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "b" is accepted and ignored, as with fopen.
        let normalized: String = s.chars().filter(|&c| c != 'b').collect();
        match normalized.as_str() {
            "r" => Ok(OpenMode::Read),
            "w" => Ok(OpenMode::WriteTruncate),
            "a" => Ok(OpenMode::Append),
            "r+" => Ok(OpenMode::ReadWrite),
            "w+" => Ok(OpenMode::WriteCreate),
            "a+" => Ok(OpenMode::AppendCreate),
            _ => Err(CryptKeeperError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("unknown open mode {s:?}"),
            ))),
        }
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
