//! Golden vectors for cross-implementation verification.
//!
//! Every implementation of Upsilon must produce identical:
//! - hash outputs for each hash tag
//! - KDF outputs for each KDF tag, at every requested length
//! - keystreams for each cipher tag
//! - deterministic Ed25519 signatures over the bound message hash
//! - KDF(X25519) shared secrets
//! - Laserproof difficulties

use upsilon::{build_registry, HashAlgorithm, TaggedHash, Upsilon, UpsilonConfig};
use upsilon_testkit::vectors::{
    all_vectors, hash_vectors, laserproof_vectors, verify_all_vectors,
};

#[test]
fn test_all_golden_vectors() {
    let results = verify_all_vectors(build_registry());
    assert!(!results.is_empty());
    let failures: Vec<_> = results.iter().filter(|(_, ok, _)| !ok).collect();
    assert!(failures.is_empty(), "failing vectors: {:#?}", failures);
}

#[test]
fn test_hello_world_static_and_dynamic() {
    use upsilon::core::{hasher, Blake2b256, HashFunctionExt};

    let fixed = hasher::<Blake2b256>()
        .compute_fixed::<32>(b"Hello, world!", None)
        .unwrap();
    let dynamic = build_registry()
        .hasher(HashAlgorithm::BLAKE2B_256)
        .unwrap()
        .compute(b"Hello, world!", None)
        .unwrap();

    assert_eq!(fixed, dynamic);
    assert_eq!(
        fixed.to_hex(),
        "b5da441cfe72ae042ef4d2b17742907f675de4da57462d4c3609c2e2ed755970"
    );

    let capitalized = hasher::<Blake2b256>()
        .compute_fixed::<32>(b"Hello, World!", None)
        .unwrap();
    assert_ne!(fixed, capitalized);
}

#[test]
fn test_tagged_hash_record_through_facade() {
    let upsilon = Upsilon::new(UpsilonConfig::default()).unwrap();
    let hash = upsilon.hash(b"Hello, world!").unwrap();
    let bytes = hash.to_bytes();

    // [tag 0x0420][32-byte value]
    assert_eq!(&bytes[..5], &[0x82, 0x19, 0x04, 0x20, 0x58]);
    assert_eq!(bytes[5], 32);

    let decoded = TaggedHash::from_bytes(&bytes).unwrap();
    build_registry().check_tagged_hash(&decoded).unwrap();
    assert_eq!(decoded, hash);
    assert_eq!(decoded.value.to_hex(), hash_vectors()[0].expected);
}

#[test]
fn test_vector_tables_cover_every_family() {
    let all = all_vectors();
    assert!(!all.hash.is_empty());
    assert!(!all.kdf.is_empty());
    assert!(!all.cipher.is_empty());
    assert!(!all.signature.is_empty());
    assert!(!all.agreement.is_empty());
    assert!(laserproof_vectors().iter().any(|v| v.difficulty as usize > v.backstride_len));
}

#[test]
#[ignore] // Run with --ignored to print the vectors as JSON
fn test_print_vectors_json() {
    println!("{}", upsilon_testkit::vectors::vectors_json());
}
