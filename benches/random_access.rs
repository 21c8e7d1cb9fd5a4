// benches/random_access.rs
//! Sequential write / read throughput and small unaligned random access,
//! all against in-memory storage.

use cryptkeeper_rs::{Algorithm, EncryptedFileBuilder, OpenMode};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::io::{Cursor, SeekFrom};

// --- Size constants ---
const KB: usize = 1024;
const MB: usize = 1024 * 1024;

fn format_size(bytes: usize) -> String {
    if bytes >= MB {
        format!("{} MiB", bytes / MB)
    } else if bytes >= KB {
        format!("{} KiB", bytes / KB)
    } else {
        format!("{bytes} B")
    }
}

fn keeper(algorithm: Algorithm) -> EncryptedFileBuilder {
    let key = match algorithm {
        Algorithm::Des => "0123456789ABCDEFFEDCBA9876543210",
        Algorithm::Aes => "000102030405060708090a0b0c0d0e0f",
    };
    EncryptedFileBuilder::from_key_hex(key)
        .unwrap()
        .with_algorithm(algorithm)
}

fn sealed(keeper: &mut EncryptedFileBuilder, content: &[u8]) -> Vec<u8> {
    let mut storage = Cursor::new(Vec::with_capacity(content.len() + 256));
    let mut file = keeper
        .open_storage(&mut storage, OpenMode::WriteTruncate)
        .unwrap();
    file.write(content).unwrap();
    file.close().unwrap();
    storage.into_inner()
}

fn bench_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential");

    for algorithm in [Algorithm::Des, Algorithm::Aes] {
        for &size in &[KB, 64 * KB, MB] {
            let input = vec![0x41u8; size];
            let mut keeper = keeper(algorithm);
            group.throughput(Throughput::Bytes(size as u64));

            group.bench_with_input(
                BenchmarkId::new(format!("write/{algorithm}"), format_size(size)),
                &size,
                |b, _| b.iter(|| black_box(sealed(&mut keeper, black_box(&input)))),
            );

            let stored = sealed(&mut keeper, &input);
            group.bench_with_input(
                BenchmarkId::new(format!("read/{algorithm}"), format_size(size)),
                &size,
                |b, _| {
                    let mut out = vec![0u8; size];
                    b.iter(|| {
                        let storage = Cursor::new(black_box(&stored[..]).to_vec());
                        let mut file = keeper.open_storage(storage, OpenMode::Read).unwrap();
                        black_box(file.read(&mut out).unwrap());
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_random_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_access");
    let size = MB;
    let input = vec![0x5au8; size];

    for algorithm in [Algorithm::Des, Algorithm::Aes] {
        let mut keeper = keeper(algorithm);
        let stored = sealed(&mut keeper, &input);
        let mut file = keeper
            .open_storage(Cursor::new(stored), OpenMode::ReadWrite)
            .unwrap();

        // Offsets stride through the file and never line up with a block.
        let offsets: Vec<u64> = (0..64u64).map(|i| (i * 16_411 + 3) % (size as u64 - 64)).collect();

        group.bench_function(BenchmarkId::new("read_13", algorithm), |b| {
            let mut buf = [0u8; 13];
            b.iter(|| {
                for &offset in &offsets {
                    file.seek(SeekFrom::Start(offset)).unwrap();
                    black_box(file.read(&mut buf).unwrap());
                }
            });
        });

        group.bench_function(BenchmarkId::new("overwrite_13", algorithm), |b| {
            let patch = [0xa5u8; 13];
            b.iter(|| {
                for &offset in &offsets {
                    file.seek(SeekFrom::Start(offset)).unwrap();
                    black_box(file.write(&patch).unwrap());
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sequential, bench_random_access);
criterion_main!(benches);
