//! Signing identities bound to a message hash.
//!
//! Messages are never signed raw. Both [`OwnedIdentity::sign`] and every
//! `verify` hash the message with the bound hash function first and hand
//! the digest to the signature scheme.

use std::fmt;
use std::sync::Arc;

use zeroize::Zeroizing;

use upsilon_core::{
    hasher, DynHash, HashAlgorithm, HashFunction, KnownHash, Record, RecordWriter, Registry,
    Result, SignatureAlgorithm, SignatureScheme, Signer, Verifier,
};

fn digest(hasher: &dyn HashFunction, message: &[u8]) -> Result<DynHash> {
    hasher.compute(message, None)
}

/// A public identity: a verification key and its message hash.
pub struct Identity {
    hasher: Arc<dyn HashFunction>,
    verifier: Box<dyn Verifier>,
}

impl Identity {
    pub fn load(
        registry: &Registry,
        signature: SignatureAlgorithm,
        hash: HashAlgorithm,
        public: &[u8],
    ) -> Result<Self> {
        Ok(Self {
            hasher: registry.hasher(hash)?,
            verifier: registry.load_verifier(signature, public)?,
        })
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.verifier.algorithm()
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hasher.algorithm()
    }

    /// The raw verification key.
    pub fn public_key(&self) -> Vec<u8> {
        self.verifier.public_bytes()
    }

    /// Check `signature` over `message`. Never fails; anything wrong is
    /// `false`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        match digest(self.hasher.as_ref(), message) {
            Ok(hashed) => self.verifier.verify(hashed.as_bytes(), signature),
            Err(_) => false,
        }
    }

    /// Encode as a `[signature, hash][public]` record.
    pub fn to_bytes(&self) -> Vec<u8> {
        let public = self.public_key();
        RecordWriter::new()
            .tag(self.algorithm())
            .tag(self.hash_algorithm())
            .segment(&public)
            .finish()
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

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm() == other.algorithm()
            && self.hash_algorithm() == other.hash_algorithm()
            && self.public_key() == other.public_key()
    }
}

impl Eq for Identity {}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("signature", &self.algorithm())
            .field("hash", &self.hash_algorithm())
            .field("public", &hex::encode(self.public_key()))
            .finish()
    }
}

/// An identity together with its private signing key.
pub struct OwnedIdentity {
    hasher: Arc<dyn HashFunction>,
    signer: Box<dyn Signer>,
}

impl OwnedIdentity {
    pub fn generate(
        registry: &Registry,
        signature: SignatureAlgorithm,
        hash: HashAlgorithm,
    ) -> Result<Self> {
        Ok(Self {
            hasher: registry.hasher(hash)?,
            signer: registry.generate_signer(signature)?,
        })
    }

    /// Generate with both algorithms fixed at compile time.
    pub fn generate_static<S: SignatureScheme, H: KnownHash>() -> Self {
        Self {
            hasher: Arc::new(hasher::<H>()),
            signer: Box::new(S::generate()),
        }
    }

    pub fn load(
        registry: &Registry,
        signature: SignatureAlgorithm,
        hash: HashAlgorithm,
        private: &[u8],
    ) -> Result<Self> {
        Ok(Self {
            hasher: registry.hasher(hash)?,
            signer: registry.load_signer(signature, private)?,
        })
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.signer.algorithm()
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hasher.algorithm()
    }

    /// Hash `message` and sign the digest.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        let hashed = digest(self.hasher.as_ref(), message)?;
        Ok(self.signer.sign(hashed.as_bytes()))
    }

    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        match digest(self.hasher.as_ref(), message) {
            Ok(hashed) => self.signer.verify(hashed.as_bytes(), signature),
            Err(_) => false,
        }
    }

    /// The public half.
    pub fn identity(&self) -> Identity {
        Identity {
            hasher: Arc::clone(&self.hasher),
            verifier: self.signer.to_verifier(),
        }
    }

    /// The public half as an [`Identity`] record.
    pub fn public_bytes(&self) -> Vec<u8> {
        self.identity().to_bytes()
    }

    /// Encode as a `[signature, hash][private]` record.
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        let private = self.signer.private_bytes();
        Zeroizing::new(
            RecordWriter::new()
                .tag(self.algorithm())
                .tag(self.hash_algorithm())
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

impl fmt::Debug for OwnedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedIdentity")
            .field("signature", &self.algorithm())
            .field("hash", &self.hash_algorithm())
            .field("public", &hex::encode(self.signer.public_bytes()))
            .finish_non_exhaustive()
    }
}
