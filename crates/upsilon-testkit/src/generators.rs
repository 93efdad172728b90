//! Proptest generators for property-based testing.

use proptest::prelude::*;

use upsilon_core::{
    build_registry, HashAlgorithm, HashProperties, KdfAlgorithm, SymmetricAlgorithm,
};
use upsilon_credentials::OwnedIdentity;

/// Any built-in hash tag.
pub fn hash_algorithm() -> impl Strategy<Value = HashAlgorithm> {
    prop::sample::select(HashAlgorithm::ASSIGNED.to_vec())
}

/// Any built-in cipher tag.
pub fn symmetric_algorithm() -> impl Strategy<Value = SymmetricAlgorithm> {
    prop::sample::select(SymmetricAlgorithm::ASSIGNED.to_vec())
}

/// Any built-in KDF tag.
pub fn kdf_algorithm() -> impl Strategy<Value = KdfAlgorithm> {
    prop::sample::select(KdfAlgorithm::ASSIGNED.to_vec())
}

/// A tag no built-in algorithm uses.
pub fn unassigned_hash_algorithm() -> impl Strategy<Value = HashAlgorithm> {
    any::<u16>()
        .prop_filter("assigned", |v| {
            !HashAlgorithm::ASSIGNED.contains(&HashAlgorithm(*v))
        })
        .prop_map(HashAlgorithm)
}

/// Input bytes of at most `max_len`.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// `input` together with split points that cut it into chunks.
pub fn chunked_payload(max_len: usize) -> impl Strategy<Value = (Vec<u8>, Vec<usize>)> {
    payload(max_len).prop_flat_map(|input| {
        let len = input.len();
        (
            Just(input),
            prop::collection::vec(0..=len, 0..8).prop_map(|mut cuts| {
                cuts.sort_unstable();
                cuts
            }),
        )
    })
}

/// Split `input` at the sorted offsets `cuts`.
pub fn split_at_cuts<'a>(input: &'a [u8], cuts: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for &cut in cuts {
        chunks.push(&input[start..cut]);
        start = cut;
    }
    chunks.push(&input[start..]);
    chunks
}

/// A salt whose length lies within `props`' bounds, favoring the bounds
/// themselves. Unbounded maxima are capped at 256 bytes.
pub fn salt_for(props: HashProperties) -> impl Strategy<Value = Vec<u8>> {
    let min = props.min_salt;
    let max = props.max_salt.min(min + 256);
    prop_oneof![Just(min), Just(max), min..=max]
        .prop_flat_map(|len| prop::collection::vec(any::<u8>(), len))
}

/// A hash tag with a salt valid for it.
pub fn hash_with_salt() -> impl Strategy<Value = (HashAlgorithm, Vec<u8>)> {
    hash_algorithm().prop_flat_map(|alg| {
        let props = build_registry()
            .hash_properties(alg)
            .unwrap_or(HashProperties::new(alg, 0));
        (Just(alg), salt_for(props))
    })
}

/// An identity whose private key is an arbitrary Ed25519 seed.
pub fn owned_identity() -> impl Strategy<Value = OwnedIdentity> {
    (any::<[u8; 32]>(), hash_algorithm()).prop_map(|(seed, hash)| {
        crate::fixtures::identity_from_seed(seed, hash)
    })
}
