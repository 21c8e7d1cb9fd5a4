//! # Builders
//!
//! Fluent configuration of encrypted file handles.
//!
//! ## Modules
//!
//! - [`file_builder`] - Builder for [`EncryptedFile`](crate::EncryptedFile) handles
//!
//! ## Usage
//!
//! Pick a key source, optionally change the algorithm, pass count or random
//! source, then open as many paths as needed with the same settings.

pub mod file_builder;
