use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use upsilon_core::{
    build_registry, cipher, hasher, Aes256Ctr, Blake2b256, HashAlgorithm, HashFunction, Iv,
    Key, KnownSymmetric, SymmetricAlgorithm, SymmetricCipher, XChaCha20R20,
};
use upsilon_pow::{Laserproof, PowVerifier};
use upsilon_testkit::fixtures::multi_party_fixtures;

const INPUT_BYTES: usize = 16 * 1024;

fn bench_hash(c: &mut Criterion) {
    let input = vec![0x5au8; INPUT_BYTES];
    let mut group = c.benchmark_group("hash");
    group.throughput(Throughput::Bytes(INPUT_BYTES as u64));

    group.bench_function("blake2b-256 static", |b| {
        let h = hasher::<Blake2b256>();
        b.iter(|| h.compute(black_box(&input[..]), None).unwrap())
    });
    for tag in [
        HashAlgorithm::BLAKE2B_256,
        HashAlgorithm::SHA2_256,
        HashAlgorithm::SHA3_256,
        HashAlgorithm::BLAKE3_256,
    ] {
        let h = build_registry().hasher(tag).unwrap();
        group.bench_function(format!("{} dynamic", tag), |b| {
            b.iter(|| h.compute(black_box(&input[..]), None).unwrap())
        });
    }
    group.finish();
}

fn bench_cipher(c: &mut Criterion) {
    let mut buf = vec![0u8; INPUT_BYTES];
    let mut group = c.benchmark_group("cipher");
    group.throughput(Throughput::Bytes(INPUT_BYTES as u64));

    group.bench_function("aes-256-ctr static", |b| {
        let key = Key::<<Aes256Ctr as KnownSymmetric>::Cipher>::default();
        let iv = Iv::<<Aes256Ctr as KnownSymmetric>::Cipher>::default();
        let mut enc = cipher::<Aes256Ctr>(&key, &iv);
        b.iter(|| {
            enc.seek(0).unwrap();
            enc.encrypt_in_place(black_box(&mut buf[..])).unwrap();
        })
    });
    group.bench_function("xchacha20 static", |b| {
        let key = Key::<<XChaCha20R20 as KnownSymmetric>::Cipher>::default();
        let iv = Iv::<<XChaCha20R20 as KnownSymmetric>::Cipher>::default();
        let mut enc = cipher::<XChaCha20R20>(&key, &iv);
        b.iter(|| {
            enc.seek(0).unwrap();
            enc.encrypt_in_place(black_box(&mut buf[..])).unwrap();
        })
    });
    group.bench_function("chacha20/8 dynamic", |b| {
        let mut enc = build_registry()
            .cipher(SymmetricAlgorithm::CHACHA20_8, &[0u8; 32], &[0u8; 12])
            .unwrap();
        b.iter(|| {
            enc.seek(0).unwrap();
            enc.encrypt_in_place(black_box(&mut buf[..])).unwrap();
        })
    });
    group.finish();
}

fn bench_credentials(c: &mut Criterion) {
    let parties = multi_party_fixtures(2);
    let other = parties[1].agreer.public_bytes();
    c.bench_function("agree + shake256 32", |b| {
        b.iter(|| {
            parties[0]
                .agreer
                .derive_shared_secret(black_box(&other[..]), 32)
                .unwrap()
        })
    });

    let sig = parties[0].identity.sign(b"Hello, world!").unwrap();
    let identity = parties[0].identity.identity();
    c.bench_function("ed25519 sign", |b| {
        b.iter(|| parties[0].identity.sign(black_box(&b"Hello, world!"[..])).unwrap())
    });
    c.bench_function("ed25519 verify", |b| {
        b.iter(|| identity.verify(black_box(&b"Hello, world!"[..]), &sig))
    });
}

fn bench_laserproof(c: &mut Criterion) {
    let laserproof = Laserproof::default();
    let data = hasher::<Blake2b256>().compute(b"Hello, world!", None).unwrap();
    let proof = laserproof.candidate(data.as_bytes(), 4).unwrap();
    c.bench_function("laserproof verify (difficulty 128)", |b| {
        b.iter(|| laserproof.difficulty(black_box(data.as_bytes()), proof.as_bytes()))
    });
}

criterion_group!(
    benches,
    bench_hash,
    bench_cipher,
    bench_credentials,
    bench_laserproof
);
criterion_main!(benches);
