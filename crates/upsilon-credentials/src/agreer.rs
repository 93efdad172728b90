//! Key agreement bound to a KDF.
//!
//! An [`Agreer`] holds private agreement state and the KDF that turns raw
//! shared material into key material. Every secret it hands out is
//! `KDF(agree(other_public))`; raw agreement output never leaves this module.
//!
//! A [`RemoteAgreer`] is the result of a finished agreement: the two tags
//! and the derived secret, for storage or for a party that does not need to
//! redo the agreement.

use std::fmt;
use std::sync::Arc;

use zeroize::Zeroizing;

use upsilon_core::{
    AgreementAlgorithm, AgreementFunction, AgreementScheme, AlgorithmFamily, CryptoError, Kdf,
    KdfAlgorithm, Key, KnownKdf, KnownSymmetric, Record, RecordWriter, Registry, Result,
    SymmetricAlgorithm,
};

/// Private key-agreement state plus its KDF.
pub struct Agreer {
    kdf: Arc<dyn Kdf>,
    agreement: Box<dyn AgreementFunction>,
}

impl Agreer {
    /// Generate fresh private state for the given algorithm pair.
    pub fn generate(
        registry: &Registry,
        kdf: KdfAlgorithm,
        agreement: AgreementAlgorithm,
    ) -> Result<Self> {
        Ok(Self {
            kdf: registry.kdf(kdf)?,
            agreement: registry.generate_agreement(agreement)?,
        })
    }

    /// Generate with both algorithms fixed at compile time.
    pub fn generate_static<K: KnownKdf, A: AgreementScheme>() -> Self {
        Self {
            kdf: Arc::new(K::default()),
            agreement: Box::new(A::generate()),
        }
    }

    /// A fresh agreer over the same algorithm pair as `remote`.
    pub fn generate_like(registry: &Registry, remote: &RemoteAgreer) -> Result<Self> {
        Self::generate(registry, remote.kdf_algorithm(), remote.agreement_algorithm())
    }

    /// Rehydrate from private agreement bytes.
    pub fn load(
        registry: &Registry,
        kdf: KdfAlgorithm,
        agreement: AgreementAlgorithm,
        private: &[u8],
    ) -> Result<Self> {
        Ok(Self {
            kdf: registry.kdf(kdf)?,
            agreement: registry.load_agreement(agreement, private)?,
        })
    }

    pub fn kdf_algorithm(&self) -> KdfAlgorithm {
        self.kdf.algorithm()
    }

    pub fn agreement_algorithm(&self) -> AgreementAlgorithm {
        self.agreement.algorithm()
    }

    /// The public value to send to the other party.
    pub fn public_bytes(&self) -> Vec<u8> {
        self.agreement.public_bytes()
    }

    /// Fill `out` with the secret shared with the holder of `other_public`.
    pub fn derive_shared_secret_into(&self, other_public: &[u8], out: &mut [u8]) -> Result<()> {
        let raw = self.agreement.agree(other_public)?;
        self.kdf.expand_into(&raw, out)
    }

    pub fn derive_shared_secret(
        &self,
        other_public: &[u8],
        len: usize,
    ) -> Result<Zeroizing<Vec<u8>>> {
        let mut out = Zeroizing::new(vec![0u8; len]);
        self.derive_shared_secret_into(other_public, &mut out)?;
        Ok(out)
    }

    pub fn derive_shared_secret_fixed<const N: usize>(
        &self,
        other_public: &[u8],
    ) -> Result<Zeroizing<[u8; N]>> {
        let mut out = Zeroizing::new([0u8; N]);
        self.derive_shared_secret_into(other_public, &mut out[..])?;
        Ok(out)
    }

    /// A key sized for the cipher `S`.
    pub fn derive_symmetric_key<S: KnownSymmetric>(
        &self,
        other_public: &[u8],
    ) -> Result<Key<S::Cipher>> {
        let mut key = Key::<S::Cipher>::default();
        self.derive_shared_secret_into(other_public, &mut key)?;
        Ok(key)
    }

    /// A key sized for the cipher `symmetric`, looked up at run time.
    pub fn derive_symmetric_key_for(
        &self,
        registry: &Registry,
        symmetric: SymmetricAlgorithm,
        other_public: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>> {
        let key_size = registry.symmetric_properties(symmetric)?.key_size;
        self.derive_shared_secret(other_public, key_size)
    }

    /// Finish an agreement into a portable [`RemoteAgreer`].
    pub fn remote(&self, other_public: &[u8], len: usize) -> Result<RemoteAgreer> {
        Ok(RemoteAgreer {
            kdf: self.kdf_algorithm(),
            agreement: self.agreement_algorithm(),
            secret: self.derive_shared_secret(other_public, len)?,
        })
    }

    /// Encode as a `[kdf, agreement][private]` record.
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        let private = self.agreement.private_bytes();
        Zeroizing::new(
            RecordWriter::new()
                .tag(self.kdf_algorithm())
                .tag(self.agreement_algorithm())
                .segment(&private)
                .finish(),
        )
    }

    pub fn from_bytes(registry: &Registry, bytes: &[u8]) -> Result<Self> {
        let record = Record::decode(bytes)?;
        record.expect_shape(2, 1)?;
        Self::load(
            registry,
            record.tag(0)?,
            record.tag(1)?,
            record.segment(0)?,
        )
    }
}

impl fmt::Debug for Agreer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agreer")
            .field("kdf", &self.kdf_algorithm())
            .field("agreement", &self.agreement_algorithm())
            .field("public", &hex::encode(self.public_bytes()))
            .finish_non_exhaustive()
    }
}

/// The outcome of a finished agreement.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteAgreer {
    kdf: KdfAlgorithm,
    agreement: AgreementAlgorithm,
    secret: Zeroizing<Vec<u8>>,
}

impl RemoteAgreer {
    pub fn new(kdf: KdfAlgorithm, agreement: AgreementAlgorithm, secret: Vec<u8>) -> Self {
        Self {
            kdf,
            agreement,
            secret: Zeroizing::new(secret),
        }
    }

    pub fn kdf_algorithm(&self) -> KdfAlgorithm {
        self.kdf
    }

    pub fn agreement_algorithm(&self) -> AgreementAlgorithm {
        self.agreement
    }

    /// The derived shared secret.
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// Encode as a `[kdf, agreement][secret]` record.
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(
            RecordWriter::new()
                .tag(self.kdf)
                .tag(self.agreement)
                .segment(&self.secret)
                .finish(),
        )
    }

    /// Decode a record. Both tags must be registered.
    pub fn from_bytes(registry: &Registry, bytes: &[u8]) -> Result<Self> {
        let record = Record::decode(bytes)?;
        record.expect_shape(2, 1)?;
        let kdf: KdfAlgorithm = record.tag(0)?;
        let agreement: AgreementAlgorithm = record.tag(1)?;

        registry.kdf(kdf)?;
        if !registry.contains(AlgorithmFamily::Agreement, agreement.0) {
            return Err(CryptoError::unsupported(agreement));
        }

        Ok(Self::new(kdf, agreement, record.segment(0)?.to_vec()))
    }
}

impl fmt::Debug for RemoteAgreer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteAgreer")
            .field("kdf", &self.kdf)
            .field("agreement", &self.agreement)
            .field("secret_len", &self.secret.len())
            .finish()
    }
}
