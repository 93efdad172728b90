//! Test fixtures and helpers.
//!
//! Deterministic credentials for integration tests and benches.

use upsilon_core::{
    build_registry, AgreementAlgorithm, HashAlgorithm, KdfAlgorithm, SignatureAlgorithm,
};
use upsilon_credentials::{Agreer, OwnedIdentity};

/// An Ed25519 identity with the given seed as private key.
///
/// Panics if `hash` is not a built-in hash.
pub fn identity_from_seed(seed: [u8; 32], hash: HashAlgorithm) -> OwnedIdentity {
    OwnedIdentity::load(build_registry(), SignatureAlgorithm::CURVE25519, hash, &seed)
        .expect("built-in identity")
}

/// An X25519 agreer with the given private key.
pub fn agreer_from_seed(seed: [u8; 32], kdf: KdfAlgorithm) -> Agreer {
    Agreer::load(build_registry(), kdf, AgreementAlgorithm::CURVE25519, &seed)
        .expect("built-in agreer")
}

/// One party in a multi-party test: an identity and an agreer.
pub struct Party {
    pub identity: OwnedIdentity,
    pub agreer: Agreer,
}

impl Party {
    /// Deterministic party derived from `index`.
    pub fn new(index: u8) -> Self {
        let mut seed = [0u8; 32];
        seed[0] = index;
        seed[31] = 0x80;
        Self {
            identity: identity_from_seed(seed, HashAlgorithm::BLAKE2B_256),
            agreer: agreer_from_seed(seed, KdfAlgorithm::SHAKE256),
        }
    }
}

/// Create `count` distinct parties.
pub fn multi_party_fixtures(count: u8) -> Vec<Party> {
    (0..count).map(Party::new).collect()
}
