//! tests/common.rs
//! Common constants and utilities shared across test files

use cryptkeeper_rs::{RandomSource, Result};
use serde::Deserialize;
use std::path::Path;

/// Fast pass count for tests - performance testing is in benches/
#[allow(dead_code)] // Used across multiple test files
pub const TEST_ITERATIONS: u32 = 5;

#[allow(dead_code)] // Used across multiple test files
pub const TEST_PASSWORD: &str =
    "This is my password.  There are many like it, but this one is mine.";

#[allow(dead_code)] // Used across multiple test files
pub const TEST_KEY_HEX: &str = "0123456789ABCDEFFEDCBA9876543210";

#[allow(dead_code)] // Used across multiple test files
pub const TEST_DATA: &[u8] = b"This is some data to put in the encrypted file.\n";

/// Random source that hands out a fixed byte pattern, cycling when exhausted.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct FixedRandom {
    pattern: Vec<u8>,
    position: usize,
}

#[allow(dead_code)]
impl FixedRandom {
    pub fn new(pattern: impl Into<Vec<u8>>) -> Self {
        let pattern = pattern.into();
        assert!(!pattern.is_empty(), "pattern must not be empty");
        Self {
            pattern,
            position: 0,
        }
    }

    pub fn from_hex(pattern: &str) -> Self {
        Self::new(hex::decode(pattern).expect("valid hex pattern"))
    }
}

impl RandomSource for FixedRandom {
    fn fill(&mut self, dest: &mut [u8]) -> Result<()> {
        for byte in dest.iter_mut() {
            *byte = self.pattern[self.position];
            self.position = (self.position + 1) % self.pattern.len();
        }
        Ok(())
    }
}

/// Load a JSON fixture from tests/vector/data/.
#[allow(dead_code)]
pub fn load_json<T>(filename: &str) -> Vec<T>
where
    T: for<'de> Deserialize<'de>,
{
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("vector")
        .join("data")
        .join(filename);

    let content =
        std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {filename}: {e}"));

    serde_json::from_str(&content).unwrap_or_else(|e| panic!("Failed to parse {filename}: {e}"))
}

/// `0, 1, 2, …` wrapping at 256.
#[allow(dead_code)]
pub fn patterned(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 256) as u8).collect()
}
