//! The signature capability.
//!
//! Signers and verifiers operate on already-hashed messages; binding a
//! message hash is the job of the identity types built on top.

use ed25519_dalek::{Signature, SigningKey, VerifyingKey};
use zeroize::Zeroizing;

use crate::csprng::Csprng;
use crate::error::{CryptoError, Result};
use crate::tag::SignatureAlgorithm;

/// A public verification key.
pub trait Verifier: Send + Sync {
    fn algorithm(&self) -> SignatureAlgorithm;

    /// Check `signature` over `hashed`. Malformed signatures are `false`.
    fn verify(&self, hashed: &[u8], signature: &[u8]) -> bool;

    fn public_bytes(&self) -> Vec<u8>;
}

/// A private signing key.
pub trait Signer: Verifier {
    fn sign(&self, hashed: &[u8]) -> Vec<u8>;

    fn private_bytes(&self) -> Zeroizing<Vec<u8>>;

    /// The matching public key as a standalone verifier.
    fn to_verifier(&self) -> Box<dyn Verifier>;
}

/// A signature scheme selectable at compile time.
pub trait SignatureScheme: Default + Copy + Send + Sync + 'static {
    const TAG: SignatureAlgorithm;
    type Public: Verifier + 'static;
    type Private: Signer + 'static;

    /// Fresh signing key from this thread's CSPRNG.
    fn generate() -> Self::Private;

    fn load_public(public: &[u8]) -> Result<Self::Public>;

    fn load_private(private: &[u8]) -> Result<Self::Private>;
}

/// Ed25519.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ed25519Signature;

/// An Ed25519 verifying key.
#[derive(Debug, Clone)]
pub struct Ed25519Public(VerifyingKey);

/// An Ed25519 signing key (32-byte seed). Zeroizes on drop.
#[derive(Clone)]
pub struct Ed25519Private(SigningKey);

fn strict_verify(key: &VerifyingKey, hashed: &[u8], signature: &[u8]) -> bool {
    match Signature::from_slice(signature) {
        Ok(sig) => key.verify_strict(hashed, &sig).is_ok(),
        Err(_) => false,
    }
}

impl Verifier for Ed25519Public {
    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::CURVE25519
    }

    fn verify(&self, hashed: &[u8], signature: &[u8]) -> bool {
        strict_verify(&self.0, hashed, signature)
    }

    fn public_bytes(&self) -> Vec<u8> {
        self.0.to_bytes().to_vec()
    }
}

impl Verifier for Ed25519Private {
    fn algorithm(&self) -> SignatureAlgorithm {
        SignatureAlgorithm::CURVE25519
    }

    fn verify(&self, hashed: &[u8], signature: &[u8]) -> bool {
        strict_verify(&self.0.verifying_key(), hashed, signature)
    }

    fn public_bytes(&self) -> Vec<u8> {
        self.0.verifying_key().to_bytes().to_vec()
    }
}

impl Signer for Ed25519Private {
    fn sign(&self, hashed: &[u8]) -> Vec<u8> {
        ed25519_dalek::Signer::sign(&self.0, hashed).to_bytes().to_vec()
    }

    fn private_bytes(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(self.0.to_bytes().to_vec())
    }

    fn to_verifier(&self) -> Box<dyn Verifier> {
        Box::new(Ed25519Public(self.0.verifying_key()))
    }
}

impl std::fmt::Debug for Ed25519Private {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ed25519Private(pub {})",
            &hex::encode(self.0.verifying_key().as_bytes())[..16]
        )
    }
}

fn key_array(what: &'static str, bytes: &[u8]) -> Result<[u8; 32]> {
    bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
        what,
        expected: 32,
        actual: bytes.len(),
    })
}

impl SignatureScheme for Ed25519Signature {
    const TAG: SignatureAlgorithm = SignatureAlgorithm::CURVE25519;
    type Public = Ed25519Public;
    type Private = Ed25519Private;

    fn generate() -> Ed25519Private {
        Ed25519Private(Csprng::with_standard(|rng| SigningKey::generate(rng)))
    }

    fn load_public(public: &[u8]) -> Result<Ed25519Public> {
        let bytes = key_array("Ed25519 public key", public)?;
        VerifyingKey::from_bytes(&bytes).map(Ed25519Public).map_err(|_| {
            CryptoError::InvalidEncoding("Ed25519 public key is not a valid point".into())
        })
    }

    fn load_private(private: &[u8]) -> Result<Ed25519Private> {
        let seed = Zeroizing::new(key_array("Ed25519 private key", private)?);
        Ok(Ed25519Private(SigningKey::from_bytes(&seed)))
    }
}
