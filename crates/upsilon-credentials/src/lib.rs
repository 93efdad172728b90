//! # Upsilon Credentials
//!
//! Key agreement and signing identities, each carrying the algorithm tags
//! needed to rebuild it from bytes.
//!
//! ## Key Concepts
//!
//! - **Agreer**: private key-agreement state bound to a KDF
//! - **RemoteAgreer**: the tags and derived secret of a finished agreement
//! - **Identity**: a public signature key bound to a message hash
//! - **OwnedIdentity**: an identity plus its private key
//!
//! ## Usage
//!
//! ```rust,no_run
//! use upsilon_core::{build_registry, HashAlgorithm, KdfAlgorithm, AgreementAlgorithm, SignatureAlgorithm};
//! use upsilon_credentials::{Agreer, Identity, OwnedIdentity};
//!
//! let registry = build_registry();
//!
//! let alice = Agreer::generate(registry, KdfAlgorithm::SHAKE256, AgreementAlgorithm::CURVE25519).unwrap();
//! let bob = Agreer::generate(registry, KdfAlgorithm::SHAKE256, AgreementAlgorithm::CURVE25519).unwrap();
//! let secret = alice.derive_shared_secret(&bob.public_bytes(), 32).unwrap();
//! assert_eq!(secret, bob.derive_shared_secret(&alice.public_bytes(), 32).unwrap());
//!
//! let me = OwnedIdentity::generate(registry, SignatureAlgorithm::CURVE25519, HashAlgorithm::BLAKE2B_256).unwrap();
//! let sig = me.sign(b"Hello, world!").unwrap();
//! let public = Identity::from_bytes(registry, &me.public_bytes()).unwrap();
//! assert!(public.verify(b"Hello, world!", &sig));
//! ```

pub mod agreer;
pub mod identity;

pub use agreer::{Agreer, RemoteAgreer};
pub use identity::{Identity, OwnedIdentity};
