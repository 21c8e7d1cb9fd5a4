//! tests/batch_ops_tests.rs
//! Parallel path-level encryption (feature `batch-ops`).
#![cfg(feature = "batch-ops")]

mod common;

use common::{patterned, TEST_ITERATIONS, TEST_PASSWORD};
use cryptkeeper_rs::{decrypt_batch, encrypt_batch, Algorithm, CryptKeeperError, KeySource};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn jobs(dir: &TempDir, count: usize) -> (Vec<(PathBuf, PathBuf)>, Vec<(PathBuf, PathBuf)>) {
    let mut seal = Vec::new();
    let mut unseal = Vec::new();
    for i in 0..count {
        let plain = dir.path().join(format!("plain_{i}.bin"));
        let sealed = dir.path().join(format!("sealed_{i}.enc"));
        let restored = dir.path().join(format!("restored_{i}.bin"));
        fs::write(&plain, patterned(100 * i + 7)).unwrap();
        seal.push((plain, sealed.clone()));
        unseal.push((sealed, restored));
    }
    (seal, unseal)
}

#[test]
fn batch_roundtrip_with_password() {
    let dir = TempDir::new().unwrap();
    let (seal, unseal) = jobs(&dir, 6);
    let key = KeySource::from_password(TEST_PASSWORD).with_iterations(TEST_ITERATIONS);

    encrypt_batch(&seal, &key, Algorithm::Des).unwrap();
    decrypt_batch(&unseal, &key, Algorithm::Des).unwrap();

    for ((plain, _), (_, restored)) in seal.iter().zip(&unseal) {
        assert_eq!(fs::read(plain).unwrap(), fs::read(restored).unwrap());
    }
}

#[test]
fn batch_jobs_get_distinct_nonces() {
    let dir = TempDir::new().unwrap();
    let (seal, _) = jobs(&dir, 4);
    let key = KeySource::from_key_hex("000102030405060708090a0b0c0d0e0f").unwrap();

    encrypt_batch(&seal, &key, Algorithm::Aes).unwrap();

    let mut nonces: Vec<String> = seal
        .iter()
        .map(|(_, sealed)| {
            let bytes = fs::read(sealed).unwrap();
            let line = String::from_utf8_lossy(&bytes[..128]).to_string();
            line.split_whitespace().nth(4).unwrap().to_string()
        })
        .collect();
    nonces.sort();
    nonces.dedup();
    assert_eq!(nonces.len(), 4);
}

#[test]
fn batch_empty_batch() {
    let key = KeySource::from_password("unused");
    encrypt_batch(&[], &key, Algorithm::Des).unwrap();
    decrypt_batch(&[], &key, Algorithm::Des).unwrap();
}

#[test]
fn batch_reports_failing_job() {
    let dir = TempDir::new().unwrap();
    let (mut seal, _) = jobs(&dir, 2);
    seal.push((dir.path().join("missing.bin"), dir.path().join("never.enc")));
    let key = KeySource::from_password("pw").with_iterations(TEST_ITERATIONS);

    let err = encrypt_batch(&seal, &key, Algorithm::Des).unwrap_err();
    assert!(matches!(err, CryptKeeperError::Io(_)));
}
