//! The algorithm registry.
//!
//! One table per capability family, keyed by tag. A registry is assembled
//! with a [`RegistryBuilder`] and is read-only afterwards, so it can be
//! shared freely between threads. [`build_registry`] returns the process-wide
//! instance holding every built-in algorithm.
//!
//! The built-ins are registered from the same marker types the static path
//! uses (`with_hash::<Sha256>()` etc.), so the two paths cannot drift apart.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::agreement::{AgreementFunction, AgreementScheme, Curve25519Agreement};
use crate::error::{CryptoError, Result};
use crate::hash::{self, HashFunction, HashProperties, KnownHash};
use crate::hash_value::TaggedHash;
use crate::kdf::{HkdfSha256, Kdf, KnownKdf, Shake128, Shake256};
use crate::signature::{Ed25519Signature, SignatureScheme, Signer, Verifier};
use crate::symmetric::{self, Keystream, KnownSymmetric, SymmetricCipher, SymmetricProperties};
use crate::tag::{
    AgreementAlgorithm, AlgorithmFamily, AlgorithmTag, HashAlgorithm, KdfAlgorithm,
    SignatureAlgorithm, SymmetricAlgorithm,
};

/// Builds a cipher from a key and an IV of the registered sizes.
pub type SymmetricLoader =
    Arc<dyn Fn(&[u8], &[u8]) -> Result<Box<dyn SymmetricCipher>> + Send + Sync>;

/// Rehydrates private agreement state.
pub type AgreementLoader = Arc<dyn Fn(&[u8]) -> Result<Box<dyn AgreementFunction>> + Send + Sync>;

/// Produces fresh private agreement state.
pub type AgreementGenerator = Arc<dyn Fn() -> Box<dyn AgreementFunction> + Send + Sync>;

pub type VerifierLoader = Arc<dyn Fn(&[u8]) -> Result<Box<dyn Verifier>> + Send + Sync>;
pub type SignerLoader = Arc<dyn Fn(&[u8]) -> Result<Box<dyn Signer>> + Send + Sync>;
pub type SignerGenerator = Arc<dyn Fn() -> Box<dyn Signer> + Send + Sync>;

#[derive(Clone)]
struct SymmetricEntry {
    properties: SymmetricProperties,
    load: SymmetricLoader,
}

#[derive(Clone)]
struct AgreementEntry {
    load: AgreementLoader,
    generate: Option<AgreementGenerator>,
}

#[derive(Clone)]
struct SignatureEntry {
    load_public: VerifierLoader,
    load_private: Option<SignerLoader>,
    generate: Option<SignerGenerator>,
}

/// Inserts and reports a double registration.
fn insert_once<T: AlgorithmTag, V>(table: &mut BTreeMap<T, V>, tag: T, value: V) {
    if table.insert(tag, value).is_some() {
        debug_assert!(false, "{} algorithm {} registered twice", T::FAMILY, tag);
        tracing::warn!(
            family = %T::FAMILY,
            tag = %tag,
            "algorithm registered twice, keeping the last registration"
        );
    } else {
        tracing::debug!(family = %T::FAMILY, tag = %tag, "registered algorithm");
    }
}

/// Assembles a [`Registry`].
///
/// Each tag must be registered at most once per family.
#[derive(Clone, Default)]
pub struct RegistryBuilder {
    hashes: BTreeMap<HashAlgorithm, Arc<dyn HashFunction>>,
    symmetric: BTreeMap<SymmetricAlgorithm, SymmetricEntry>,
    kdfs: BTreeMap<KdfAlgorithm, Arc<dyn Kdf>>,
    agreements: BTreeMap<AgreementAlgorithm, AgreementEntry>,
    signatures: BTreeMap<SignatureAlgorithm, SignatureEntry>,
}

impl RegistryBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder holding every built-in algorithm.
    pub fn with_defaults() -> Self {
        Self::new()
            .with_hash::<hash::Sha224>()
            .with_hash::<hash::Sha256>()
            .with_hash::<hash::Sha384>()
            .with_hash::<hash::Sha512>()
            .with_hash::<hash::Sha3_224>()
            .with_hash::<hash::Sha3_256>()
            .with_hash::<hash::Sha3_384>()
            .with_hash::<hash::Sha3_512>()
            .with_hash::<hash::Blake2b128>()
            .with_hash::<hash::Blake2b256>()
            .with_hash::<hash::Blake2b512>()
            .with_hash::<hash::Blake2s128>()
            .with_hash::<hash::Blake2s256>()
            .with_hash::<hash::Blake3>()
            .with_symmetric::<symmetric::Aes128Ctr>()
            .with_symmetric::<symmetric::Aes256Ctr>()
            .with_symmetric::<symmetric::ChaCha20R8>()
            .with_symmetric::<symmetric::ChaCha20R12>()
            .with_symmetric::<symmetric::ChaCha20R20>()
            .with_symmetric::<symmetric::XChaCha20R8>()
            .with_symmetric::<symmetric::XChaCha20R12>()
            .with_symmetric::<symmetric::XChaCha20R20>()
            .with_kdf::<Shake128>()
            .with_kdf::<Shake256>()
            .with_kdf::<HkdfSha256>()
            .with_agreement::<Curve25519Agreement>()
            .with_signature::<Ed25519Signature>()
    }

    pub fn register_hash(mut self, hash: Arc<dyn HashFunction>) -> Self {
        let tag = hash.algorithm();
        insert_once(&mut self.hashes, tag, hash);
        self
    }

    pub fn register_symmetric(
        mut self,
        properties: SymmetricProperties,
        load: SymmetricLoader,
    ) -> Self {
        insert_once(
            &mut self.symmetric,
            properties.algorithm,
            SymmetricEntry { properties, load },
        );
        self
    }

    pub fn register_kdf(mut self, kdf: Arc<dyn Kdf>) -> Self {
        let tag = kdf.algorithm();
        insert_once(&mut self.kdfs, tag, kdf);
        self
    }

    /// Register an agreement scheme. Without a generator the tag can only
    /// load existing private state.
    pub fn register_agreement(
        mut self,
        tag: AgreementAlgorithm,
        load: AgreementLoader,
        generate: Option<AgreementGenerator>,
    ) -> Self {
        insert_once(&mut self.agreements, tag, AgreementEntry { load, generate });
        self
    }

    /// Register a signature scheme. Without a private loader the tag is
    /// verification-only.
    pub fn register_signature(
        mut self,
        tag: SignatureAlgorithm,
        load_public: VerifierLoader,
        load_private: Option<SignerLoader>,
        generate: Option<SignerGenerator>,
    ) -> Self {
        insert_once(
            &mut self.signatures,
            tag,
            SignatureEntry {
                load_public,
                load_private,
                generate,
            },
        );
        self
    }

    pub fn with_hash<A: KnownHash>(self) -> Self {
        self.register_hash(Arc::new(hash::hasher::<A>()))
    }

    pub fn with_symmetric<A: KnownSymmetric>(self) -> Self {
        self.register_symmetric(
            A::properties(),
            Arc::new(
                |key: &[u8], iv: &[u8]| -> Result<Box<dyn SymmetricCipher>> {
                    let cipher = Keystream::<A::Cipher>::from_slices(A::TAG, key, iv)?;
                    Ok(Box::new(cipher))
                },
            ),
        )
    }

    pub fn with_kdf<A: KnownKdf>(self) -> Self {
        self.register_kdf(Arc::new(A::default()))
    }

    pub fn with_agreement<A: AgreementScheme>(self) -> Self {
        self.register_agreement(
            A::TAG,
            Arc::new(|private: &[u8]| -> Result<Box<dyn AgreementFunction>> {
                Ok(Box::new(A::load(private)?))
            }),
            Some(Arc::new(|| -> Box<dyn AgreementFunction> { Box::new(A::generate()) })
                as AgreementGenerator),
        )
    }

    pub fn with_signature<A: SignatureScheme>(self) -> Self {
        self.register_signature(
            A::TAG,
            Arc::new(|public: &[u8]| -> Result<Box<dyn Verifier>> {
                Ok(Box::new(A::load_public(public)?))
            }),
            Some(Arc::new(|private: &[u8]| -> Result<Box<dyn Signer>> {
                Ok(Box::new(A::load_private(private)?))
            }) as SignerLoader),
            Some(Arc::new(|| -> Box<dyn Signer> { Box::new(A::generate()) }) as SignerGenerator),
        )
    }

    /// Freeze into a read-only registry.
    pub fn build(self) -> Registry {
        let registry = Registry {
            hashes: self.hashes,
            symmetric: self.symmetric,
            kdfs: self.kdfs,
            agreements: self.agreements,
            signatures: self.signatures,
        };
        tracing::info!(
            hashes = registry.hashes.len(),
            symmetric = registry.symmetric.len(),
            kdfs = registry.kdfs.len(),
            agreements = registry.agreements.len(),
            signatures = registry.signatures.len(),
            "algorithm registry built"
        );
        registry
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("hashes", &self.hashes.keys().collect::<Vec<_>>())
            .field("symmetric", &self.symmetric.keys().collect::<Vec<_>>())
            .field("kdfs", &self.kdfs.keys().collect::<Vec<_>>())
            .field("agreements", &self.agreements.keys().collect::<Vec<_>>())
            .field("signatures", &self.signatures.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Maps algorithm tags to implementations, per capability family.
pub struct Registry {
    hashes: BTreeMap<HashAlgorithm, Arc<dyn HashFunction>>,
    symmetric: BTreeMap<SymmetricAlgorithm, SymmetricEntry>,
    kdfs: BTreeMap<KdfAlgorithm, Arc<dyn Kdf>>,
    agreements: BTreeMap<AgreementAlgorithm, AgreementEntry>,
    signatures: BTreeMap<SignatureAlgorithm, SignatureEntry>,
}

fn lookup<'a, T: AlgorithmTag, V>(table: &'a BTreeMap<T, V>, tag: T) -> Result<&'a V> {
    table.get(&tag).ok_or_else(|| CryptoError::unsupported(tag))
}

impl Registry {
    pub fn hasher(&self, tag: HashAlgorithm) -> Result<Arc<dyn HashFunction>> {
        lookup(&self.hashes, tag).cloned()
    }

    pub fn hash_properties(&self, tag: HashAlgorithm) -> Result<HashProperties> {
        Ok(lookup(&self.hashes, tag)?.properties())
    }

    /// Check that a tagged hash names a registered algorithm and has a
    /// plausible length for it.
    pub fn check_tagged_hash(&self, hash: &TaggedHash) -> Result<()> {
        let max = self.hash_properties(hash.algorithm)?.max_output;
        if hash.value.is_empty() || hash.value.len() > max {
            return Err(CryptoError::InvalidEncoding(format!(
                "{} hash of {} bytes, expected 1..={}",
                hash.algorithm,
                hash.value.len(),
                max
            )));
        }
        Ok(())
    }

    /// A cipher keyed with `key` and `iv`, positioned at zero.
    pub fn cipher(
        &self,
        tag: SymmetricAlgorithm,
        key: &[u8],
        iv: &[u8],
    ) -> Result<Box<dyn SymmetricCipher>> {
        (lookup(&self.symmetric, tag)?.load)(key, iv)
    }

    pub fn symmetric_properties(&self, tag: SymmetricAlgorithm) -> Result<SymmetricProperties> {
        Ok(lookup(&self.symmetric, tag)?.properties)
    }

    pub fn kdf(&self, tag: KdfAlgorithm) -> Result<Arc<dyn Kdf>> {
        lookup(&self.kdfs, tag).cloned()
    }

    pub fn kdf_max_output(&self, tag: KdfAlgorithm) -> Result<Option<usize>> {
        Ok(lookup(&self.kdfs, tag)?.max_output())
    }

    pub fn load_agreement(
        &self,
        tag: AgreementAlgorithm,
        private: &[u8],
    ) -> Result<Box<dyn AgreementFunction>> {
        (lookup(&self.agreements, tag)?.load)(private)
    }

    pub fn generate_agreement(&self, tag: AgreementAlgorithm) -> Result<Box<dyn AgreementFunction>> {
        let entry = lookup(&self.agreements, tag)?;
        let generate = entry
            .generate
            .as_ref()
            .ok_or_else(|| CryptoError::not_generatable(tag))?;
        Ok(generate())
    }

    pub fn load_verifier(&self, tag: SignatureAlgorithm, public: &[u8]) -> Result<Box<dyn Verifier>> {
        (lookup(&self.signatures, tag)?.load_public)(public)
    }

    /// Load a signing key. Fails with `AlgorithmNotGeneratable` on a
    /// verification-only tag.
    pub fn load_signer(&self, tag: SignatureAlgorithm, private: &[u8]) -> Result<Box<dyn Signer>> {
        let entry = lookup(&self.signatures, tag)?;
        let load = entry
            .load_private
            .as_ref()
            .ok_or_else(|| CryptoError::not_generatable(tag))?;
        load(private)
    }

    pub fn generate_signer(&self, tag: SignatureAlgorithm) -> Result<Box<dyn Signer>> {
        let entry = lookup(&self.signatures, tag)?;
        let generate = entry
            .generate
            .as_ref()
            .ok_or_else(|| CryptoError::not_generatable(tag))?;
        Ok(generate())
    }

    /// Every registered tag of a family, ascending.
    pub fn algorithms(&self, family: AlgorithmFamily) -> Vec<u16> {
        fn raw<T: AlgorithmTag, V>(table: &BTreeMap<T, V>) -> Vec<u16> {
            table.keys().map(|tag| tag.to_u16()).collect()
        }
        match family {
            AlgorithmFamily::Hash => raw(&self.hashes),
            AlgorithmFamily::Symmetric => raw(&self.symmetric),
            AlgorithmFamily::Kdf => raw(&self.kdfs),
            AlgorithmFamily::Agreement => raw(&self.agreements),
            AlgorithmFamily::Signature => raw(&self.signatures),
            AlgorithmFamily::ProofOfWork => Vec::new(),
        }
    }

    pub fn contains(&self, family: AlgorithmFamily, tag: u16) -> bool {
        match family {
            AlgorithmFamily::Hash => self.hashes.contains_key(&HashAlgorithm(tag)),
            AlgorithmFamily::Symmetric => self.symmetric.contains_key(&SymmetricAlgorithm(tag)),
            AlgorithmFamily::Kdf => self.kdfs.contains_key(&KdfAlgorithm(tag)),
            AlgorithmFamily::Agreement => self.agreements.contains_key(&AgreementAlgorithm(tag)),
            AlgorithmFamily::Signature => self.signatures.contains_key(&SignatureAlgorithm(tag)),
            AlgorithmFamily::ProofOfWork => false,
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("hashes", &self.hashes.keys().collect::<Vec<_>>())
            .field("symmetric", &self.symmetric.keys().collect::<Vec<_>>())
            .field("kdfs", &self.kdfs.keys().collect::<Vec<_>>())
            .field("agreements", &self.agreements.keys().collect::<Vec<_>>())
            .field("signatures", &self.signatures.keys().collect::<Vec<_>>())
            .finish()
    }
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// The process-wide registry of built-in algorithms.
///
/// Built on first call; later calls return the same instance.
pub fn build_registry() -> &'static Registry {
    REGISTRY.get_or_init(|| RegistryBuilder::with_defaults().build())
}
