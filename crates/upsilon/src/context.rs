//! The configured entry point.

use zeroize::Zeroizing;

use upsilon_core::{
    build_registry, AlgorithmTag, Csprng, HashFunction, Registry, SymmetricCipher, TaggedHash,
};
use upsilon_credentials::{Agreer, Identity, OwnedIdentity, RemoteAgreer};
use upsilon_pow::{Difficulty, Laserproof, PowGenerator, ProofOfWork};

use crate::config::UpsilonConfig;
use crate::error::{Result, UpsilonError};

/// A registry plus a validated choice of default algorithms.
///
/// Provides a unified API for:
/// - Hashing with the configured hash
/// - Generating and loading identities and agreers
/// - Keying the configured cipher
/// - Laserproof work and verification
pub struct Upsilon<'r> {
    registry: &'r Registry,
    config: UpsilonConfig,
    laserproof: Laserproof,
}

impl Upsilon<'static> {
    /// Validate `config` against the built-in registry.
    pub fn new(config: UpsilonConfig) -> Result<Self> {
        Upsilon::with_registry(build_registry(), config)
    }
}

impl<'r> Upsilon<'r> {
    /// Validate `config` against a custom registry.
    pub fn with_registry(registry: &'r Registry, config: UpsilonConfig) -> Result<Self> {
        require(registry, config.hash)?;
        require(registry, config.signature)?;
        require(registry, config.agreement)?;
        require(registry, config.kdf)?;
        require(registry, config.symmetric)?;

        let lp = &config.laserproof;
        if lp.threshold == 0 && lp.max_work_len.is_none() {
            return Err(UpsilonError::InvalidConfig(
                "laserproof threshold 0 never stops without max_work_len".into(),
            ));
        }
        let laserproof = Laserproof::new(registry, lp.clone())?;

        tracing::debug!(
            "Upsilon configured: hash={} signature={} agreement={} kdf={} symmetric={}",
            config.hash,
            config.signature,
            config.agreement,
            config.kdf,
            config.symmetric
        );

        Ok(Self {
            registry,
            config,
            laserproof,
        })
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn config(&self) -> &UpsilonConfig {
        &self.config
    }

    // ==================== Hashing ====================

    /// Hash `input` with the configured hash.
    pub fn hash(&self, input: &[u8]) -> Result<TaggedHash> {
        self.hash_salted(input, None)
    }

    pub fn hash_salted(&self, input: &[u8], salt: Option<&[u8]>) -> Result<TaggedHash> {
        let value = self.registry.hasher(self.config.hash)?.compute(input, salt)?;
        Ok(TaggedHash::new(self.config.hash, value))
    }

    /// Recompute `expected` over `input` with the hash it names.
    pub fn check_hash(&self, input: &[u8], expected: &TaggedHash) -> Result<bool> {
        self.registry.check_tagged_hash(expected)?;
        let value = self.registry.hasher(expected.algorithm)?.compute(input, None)?;
        Ok(value == expected.value)
    }

    // ==================== Identities ====================

    pub fn generate_identity(&self) -> Result<OwnedIdentity> {
        Ok(OwnedIdentity::generate(
            self.registry,
            self.config.signature,
            self.config.hash,
        )?)
    }

    pub fn load_identity(&self, bytes: &[u8]) -> Result<Identity> {
        Ok(Identity::from_bytes(self.registry, bytes)?)
    }

    pub fn load_owned_identity(&self, bytes: &[u8]) -> Result<OwnedIdentity> {
        Ok(OwnedIdentity::from_bytes(self.registry, bytes)?)
    }

    // ==================== Key agreement ====================

    pub fn generate_agreer(&self) -> Result<Agreer> {
        Ok(Agreer::generate(
            self.registry,
            self.config.kdf,
            self.config.agreement,
        )?)
    }

    pub fn load_agreer(&self, bytes: &[u8]) -> Result<Agreer> {
        Ok(Agreer::from_bytes(self.registry, bytes)?)
    }

    pub fn load_remote_agreer(&self, bytes: &[u8]) -> Result<RemoteAgreer> {
        Ok(RemoteAgreer::from_bytes(self.registry, bytes)?)
    }

    /// A key for the configured cipher shared with `other_public`.
    pub fn derive_symmetric_key(
        &self,
        agreer: &Agreer,
        other_public: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>> {
        Ok(agreer.derive_symmetric_key_for(self.registry, self.config.symmetric, other_public)?)
    }

    // ==================== Symmetric ====================

    /// A fresh random key for the configured cipher.
    pub fn random_key(&self) -> Result<Zeroizing<Vec<u8>>> {
        let props = self.registry.symmetric_properties(self.config.symmetric)?;
        let mut key = Zeroizing::new(vec![0u8; props.key_size]);
        Csprng::with_standard(|rng| rng.fill(&mut key));
        Ok(key)
    }

    /// A fresh random IV for the configured cipher.
    pub fn random_iv(&self) -> Result<Vec<u8>> {
        let props = self.registry.symmetric_properties(self.config.symmetric)?;
        let mut iv = vec![0u8; props.iv_size];
        Csprng::with_standard(|rng| rng.fill(&mut iv));
        Ok(iv)
    }

    /// The configured cipher keyed with `key` and `iv`.
    pub fn cipher(&self, key: &[u8], iv: &[u8]) -> Result<Box<dyn SymmetricCipher>> {
        Ok(self.registry.cipher(self.config.symmetric, key, iv)?)
    }

    // ==================== Proof of work ====================

    pub fn laserproof(&self) -> &Laserproof {
        &self.laserproof
    }

    /// Find a proof over `hashed_data` with difficulty above `threshold`.
    pub fn work(&self, hashed_data: &[u8], threshold: usize) -> Result<ProofOfWork> {
        Ok(self.laserproof.work(hashed_data, threshold)?)
    }

    pub fn verify_work(&self, pow: &ProofOfWork, hashed_data: &[u8]) -> Difficulty {
        pow.verify(&self.laserproof, hashed_data)
    }
}

impl std::fmt::Debug for Upsilon<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upsilon")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn require<T: AlgorithmTag>(registry: &Registry, tag: T) -> Result<()> {
    if registry.contains(T::FAMILY, tag.to_u16()) {
        Ok(())
    } else {
        Err(UpsilonError::InvalidConfig(format!(
            "{} algorithm {} is not registered",
            T::FAMILY,
            tag
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upsilon_core::{HashAlgorithm, RegistryBuilder, SymmetricAlgorithm};

    #[test]
    fn test_default_config_validates() {
        let upsilon = Upsilon::new(UpsilonConfig::default()).unwrap();
        assert_eq!(upsilon.config().hash, HashAlgorithm::BLAKE2B_256);
    }

    #[test]
    fn test_unregistered_tag_rejected() {
        let config = UpsilonConfig {
            symmetric: SymmetricAlgorithm(0x0999),
            ..Default::default()
        };
        let err = Upsilon::new(config).unwrap_err();
        assert!(matches!(err, UpsilonError::InvalidConfig(msg) if msg.contains("symmetric")));
    }

    #[test]
    fn test_never_stopping_laserproof_rejected() {
        let mut config = UpsilonConfig::default();
        config.laserproof.threshold = 0;
        assert!(matches!(
            Upsilon::new(config.clone()),
            Err(UpsilonError::InvalidConfig(_))
        ));
        config.laserproof.max_work_len = Some(1024);
        assert!(Upsilon::new(config).is_ok());
    }

    #[test]
    fn test_custom_registry() {
        let registry = RegistryBuilder::new()
            .with_hash::<upsilon_core::Sha256>()
            .build();
        let config = UpsilonConfig {
            hash: HashAlgorithm::SHA2_256,
            ..Default::default()
        };
        // Only the hash is registered.
        assert!(Upsilon::with_registry(&registry, config).is_err());
    }

    #[test]
    fn test_hash_and_check() {
        let upsilon = Upsilon::new(UpsilonConfig::default()).unwrap();
        let hash = upsilon.hash(b"Hello, world!").unwrap();
        assert!(upsilon.check_hash(b"Hello, world!", &hash).unwrap());
        assert!(!upsilon.check_hash(b"Hello, World!", &hash).unwrap());
    }

    #[test]
    fn test_random_key_roundtrip() {
        let upsilon = Upsilon::new(UpsilonConfig::default()).unwrap();
        let key = upsilon.random_key().unwrap();
        let iv = upsilon.random_iv().unwrap();
        assert_eq!(key.len(), 32);
        assert_eq!(iv.len(), 24);
        let ciphertext = upsilon.cipher(&key, &iv).unwrap().encrypt(b"secret").unwrap();
        let plaintext = upsilon.cipher(&key, &iv).unwrap().decrypt(&ciphertext).unwrap();
        assert_eq!(plaintext, b"secret");
    }

    #[test]
    fn test_work_and_verify() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();

        let upsilon = Upsilon::new(UpsilonConfig::default()).unwrap();
        let data = upsilon.hash(b"Hello, world!").unwrap().value;
        let pow = upsilon.work(data.as_bytes(), 64).unwrap();
        assert_eq!(pow.nonce, 4);
        assert_eq!(upsilon.verify_work(&pow, data.as_bytes()), Difficulty::from(128u64));
    }
}
