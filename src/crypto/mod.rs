// src/crypto/mod.rs

//! Low-level crypto primitives.
//!
//! Block cipher capability, HMAC, password KDF and the random source.
//! See the crate root for re-exports.

pub mod cipher;
pub mod hmac;
pub mod kdf;
pub mod rng;
