// src/file/mod.rs

//! Seekable encrypted file facade.
//!
//! Core API: [`EncryptedFile`] with `read` / `write` / `seek` / `tell` / `close`.
//! Helpers: [`OpenMode`] (fopen-style modes) and [`KeySource`] (fixed key or password).

pub(crate) mod encrypted_file;
pub(crate) mod key_source;
pub(crate) mod open_mode;

pub use encrypted_file::EncryptedFile;
pub use key_source::KeySource;
pub use open_mode::OpenMode;
