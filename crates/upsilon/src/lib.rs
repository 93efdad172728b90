//! # Upsilon
//!
//! Algorithm agility for cryptographic primitives. Every hash, cipher, key
//! agreement, signature scheme, KDF and proof-of-work algorithm is named by
//! a small numeric tag, and every serialized object carries the tags it was
//! made with, so data outlives any one choice of algorithm.
//!
//! ## Overview
//!
//! - **Capabilities**: hash functions, stream ciphers, key agreement,
//!   signatures, KDFs and proof of work, each behind one trait
//! - **Registry**: tag to implementation lookup, built once
//! - **Credentials**: agreers and identities that rebuild themselves from
//!   their own bytes
//! - **Laserproof**: a self-scaling memory-hard proof of work
//!
//! ## Usage
//!
//! ```rust,no_run
//! use upsilon::{Upsilon, UpsilonConfig};
//!
//! let upsilon = Upsilon::new(UpsilonConfig::default()).unwrap();
//!
//! let me = upsilon.generate_identity().unwrap();
//! let sig = me.sign(b"Hello, world!").unwrap();
//! let public = upsilon.load_identity(&me.public_bytes()).unwrap();
//! assert!(public.verify(b"Hello, world!", &sig));
//!
//! let digest = upsilon.hash(b"block").unwrap();
//! let pow = upsilon.work(digest.value.as_bytes(), 256).unwrap();
//! println!("difficulty {}", upsilon.verify_work(&pow, digest.value.as_bytes()));
//! ```
//!
//! ## Re-exports
//!
//! - `upsilon::core` - Tags, capabilities, registry, wire records
//! - `upsilon::credentials` - Agreers and identities
//! - `upsilon::pow` - Laserproof

pub mod config;
pub mod context;
pub mod error;

// Re-export component crates
pub use upsilon_core as core;
pub use upsilon_credentials as credentials;
pub use upsilon_pow as pow;

pub use config::UpsilonConfig;
pub use context::Upsilon;
pub use error::{Result, UpsilonError};

// Re-export commonly used types
pub use upsilon_core::{
    build_registry, AgreementAlgorithm, CryptoError, DynHash, Hash, HashAlgorithm, KdfAlgorithm,
    Registry, RegistryBuilder, SignatureAlgorithm, SymmetricAlgorithm, TaggedHash,
};
pub use upsilon_credentials::{Agreer, Identity, OwnedIdentity, RemoteAgreer};
pub use upsilon_pow::{Difficulty, Laserproof, LaserproofConfig, ProofOfWork};
