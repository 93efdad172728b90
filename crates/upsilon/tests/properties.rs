//! Property-based tests across the registry.

use proptest::prelude::*;

use upsilon::core::{HashFunction, Kdf};
use upsilon::pow::{PowGenerator, PowVerifier};
use upsilon::{build_registry, Difficulty, KdfAlgorithm, Laserproof, LaserproofConfig};
use upsilon_testkit::generators::{
    chunked_payload, hash_algorithm, hash_with_salt, kdf_algorithm, payload, split_at_cuts,
};

fn small_laserproof() -> Laserproof {
    Laserproof::new(
        build_registry(),
        LaserproofConfig {
            lookback_len: 64,
            backstride_len: 96,
            threshold: 16,
            ..Default::default()
        },
    )
    .unwrap()
}

proptest! {
    #[test]
    fn test_salted_compute_matches_session(
        (alg, salt) in hash_with_salt(),
        input in payload(512),
    ) {
        let hasher = build_registry().hasher(alg).unwrap();
        let one_shot = hasher.compute(&input, Some(&salt[..])).unwrap();

        let mut session = hasher.begin(Some(&salt[..])).unwrap();
        session.process(&input);
        prop_assert_eq!(session.finish(), one_shot);
    }

    #[test]
    fn test_chunking_does_not_change_hash(
        alg in hash_algorithm(),
        (input, cuts) in chunked_payload(1024),
    ) {
        let hasher = build_registry().hasher(alg).unwrap();
        let expected = hasher.compute(&input, None).unwrap();

        let mut session = hasher.begin(None).unwrap();
        for chunk in split_at_cuts(&input, &cuts) {
            session.process(chunk);
        }
        prop_assert_eq!(session.finish(), expected);
    }

    #[test]
    fn test_reset_restarts_the_session(
        (alg, salt) in hash_with_salt(),
        junk in payload(64),
        input in payload(256),
    ) {
        let hasher = build_registry().hasher(alg).unwrap();
        let expected = hasher.compute(&input, Some(&salt[..])).unwrap();

        let mut session = hasher.begin(Some(&salt[..])).unwrap();
        session.process(&junk);
        session.reset();
        session.process(&input);
        prop_assert_eq!(session.finish(), expected);
    }

    #[test]
    fn test_truncated_output_is_prefix(
        alg in hash_algorithm(),
        input in payload(256),
        frac in 0.0f64..=1.0,
    ) {
        let hasher = build_registry().hasher(alg).unwrap();
        let full = hasher.compute(&input, None).unwrap();
        let len = (full.len() as f64 * frac) as usize;

        let mut out = vec![0u8; len];
        hasher.compute_into(&input, None, &mut out).unwrap();
        prop_assert_eq!(&out[..], &full.as_bytes()[..len]);
    }

    #[test]
    fn test_kdf_output_is_prefix_consistent(
        alg in kdf_algorithm(),
        input in payload(128),
        short in 0usize..600,
        extra in 0usize..600,
    ) {
        let kdf = build_registry().kdf(alg).unwrap();
        let long = kdf.expand(&input, short + extra).unwrap();
        let prefix = kdf.expand(&input, short).unwrap();
        prop_assert_eq!(&prefix[..], &long[..short]);
    }
}

#[test]
fn test_hkdf_prefix_consistent_to_its_limit() {
    let kdf = build_registry().kdf(KdfAlgorithm::HKDF_SHA256).unwrap();
    let max = kdf.max_output().unwrap();
    assert_eq!(max, 8160);

    let full = kdf.expand(b"input keying material", max).unwrap();
    for len in [0, 1, 31, 32, 33, 4096, max - 1] {
        let prefix = kdf.expand(b"input keying material", len).unwrap();
        assert_eq!(&prefix[..], &full[..len], "len {}", len);
    }
    assert!(kdf.expand(b"input keying material", max + 1).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn test_work_exceeds_threshold(
        data in prop::array::uniform32(any::<u8>()),
        threshold in 0usize..300,
    ) {
        let laserproof = small_laserproof();
        let pow = laserproof.work(&data, threshold).unwrap();
        let difficulty = pow.verify(&laserproof, &data);
        prop_assert!(difficulty > Difficulty::from(threshold));

        // Verification is deterministic.
        prop_assert_eq!(laserproof.difficulty(&data, pow.proof.as_bytes()), difficulty);
    }

    #[test]
    fn test_short_proofs_have_no_difficulty(
        data in prop::array::uniform32(any::<u8>()),
        nonce in any::<u64>(),
        cut in 0usize..32,
    ) {
        let laserproof = small_laserproof();
        let proof = laserproof.candidate(&data, nonce).unwrap();
        prop_assert!(laserproof.difficulty(&data, &proof.as_bytes()[..cut]).is_zero());
    }

    #[test]
    fn test_candidate_difficulty_is_block_aligned(
        data in prop::array::uniform32(any::<u8>()),
        nonce in 0u64..64,
    ) {
        let laserproof = small_laserproof();
        let proof = laserproof.candidate(&data, nonce).unwrap();
        let difficulty = laserproof.difficulty(&data, proof.as_bytes());
        let bytes = difficulty.to_u64().unwrap();
        prop_assert!(bytes > 0);
        prop_assert_eq!(bytes % laserproof.proof_len() as u64, 0);
    }
}
