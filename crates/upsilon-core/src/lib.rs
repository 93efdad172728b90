//! # Upsilon Core
//!
//! Algorithm agility for cryptographic primitives: select, invoke and
//! serialize interchangeable hash functions, stream ciphers, key agreement,
//! signature schemes and KDFs through small numeric algorithm tags.
//!
//! This crate contains no I/O and no global state beyond the lazily built
//! built-in [`Registry`].
//!
//! ## Two ways to select an algorithm
//!
//! - Static: name a marker type and call through it directly, for example
//!   `hasher::<Blake2b256>()` or `cipher::<Aes256Ctr>(&key, &iv)`. No lookup,
//!   key sizes checked by the type system.
//! - Dynamic: resolve a tag read at run time, for example
//!   `build_registry().hasher(tag)?`, and get a trait object back.
//!
//! Both paths run the same implementation.
//!
//! ## Wire format
//!
//! Every persisted object is a [`wire`] record: its algorithm tags first,
//! then its payload segments, framed as deterministic CBOR.

pub mod agreement;
pub mod csprng;
pub mod error;
pub mod hash;
pub mod hash_value;
pub mod kdf;
pub mod registry;
pub mod signature;
pub mod symmetric;
pub mod tag;
pub mod wire;

pub use agreement::{AgreementFunction, AgreementScheme, Curve25519Agreement, X25519Private};
pub use csprng::Csprng;
pub use error::{CryptoError, Result};
pub use hash::{
    hasher, Blake2b128, Blake2b256, Blake2b512, Blake2s128, Blake2s256, Blake3, HashFunction,
    HashFunctionExt, HashProperties, KnownHash, PartialHash, SaltedSession, Sha224, Sha256,
    Sha384, Sha3_224, Sha3_256, Sha3_384, Sha3_512, Sha512,
};
pub use hash_value::{DynHash, Hash, TaggedHash};
pub use kdf::{kdf, HkdfSha256, Kdf, KnownKdf, Shake128, Shake256};
pub use registry::{build_registry, Registry, RegistryBuilder};
pub use signature::{Ed25519Private, Ed25519Public, Ed25519Signature, SignatureScheme, Signer, Verifier};
pub use symmetric::{
    cipher, Aes128Ctr, Aes256Ctr, ChaCha20R12, ChaCha20R20, ChaCha20R8, Keystream, KnownSymmetric,
    SymmetricCipher, SymmetricProperties, XChaCha20R12, XChaCha20R20, XChaCha20R8,
};
pub use tag::{
    AgreementAlgorithm, AlgorithmFamily, AlgorithmTag, HashAlgorithm, KdfAlgorithm, PowAlgorithm,
    SignatureAlgorithm, SymmetricAlgorithm,
};
pub use wire::{Record, RecordWriter};

/// Key and IV array types for the static cipher path.
pub use ::cipher::{Iv, Key};
