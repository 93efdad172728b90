//! The key-agreement capability.

use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::csprng::Csprng;
use crate::error::{CryptoError, Result};
use crate::tag::AgreementAlgorithm;

/// A private key-agreement state.
pub trait AgreementFunction: Send + Sync {
    fn algorithm(&self) -> AgreementAlgorithm;

    /// Raw shared material with the holder of `other_public`.
    ///
    /// This is not key material. It is not uniformly distributed, and it
    /// must go through a KDF before use.
    fn agree(&self, other_public: &[u8]) -> Result<Zeroizing<Vec<u8>>>;

    fn public_bytes(&self) -> Vec<u8>;

    fn private_bytes(&self) -> Zeroizing<Vec<u8>>;
}

/// An agreement scheme selectable at compile time.
pub trait AgreementScheme: Default + Copy + Send + Sync + 'static {
    const TAG: AgreementAlgorithm;
    type Private: AgreementFunction + 'static;

    /// Fresh private state from this thread's CSPRNG.
    fn generate() -> Self::Private;

    /// Rehydrate from [`AgreementFunction::private_bytes`] output.
    fn load(private: &[u8]) -> Result<Self::Private>;
}

/// X25519 Diffie-Hellman.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Curve25519Agreement;

/// An X25519 private key. The secret zeroizes on drop.
pub struct X25519Private {
    secret: StaticSecret,
    public: PublicKey,
}

impl X25519Private {
    fn from_secret(secret: StaticSecret) -> Self {
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }
}

impl AgreementFunction for X25519Private {
    fn algorithm(&self) -> AgreementAlgorithm {
        AgreementAlgorithm::CURVE25519
    }

    fn agree(&self, other_public: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let other: [u8; 32] = other_public.try_into().map_err(|_| {
            CryptoError::InvalidEncoding(format!(
                "X25519 public key must be 32 bytes, got {}",
                other_public.len()
            ))
        })?;
        let shared = self.secret.diffie_hellman(&PublicKey::from(other));
        if !shared.was_contributory() {
            return Err(CryptoError::InvalidEncoding(
                "X25519 public key has low order".into(),
            ));
        }
        Ok(Zeroizing::new(shared.as_bytes().to_vec()))
    }

    fn public_bytes(&self) -> Vec<u8> {
        self.public.as_bytes().to_vec()
    }

    fn private_bytes(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(self.secret.to_bytes().to_vec())
    }
}

impl AgreementScheme for Curve25519Agreement {
    const TAG: AgreementAlgorithm = AgreementAlgorithm::CURVE25519;
    type Private = X25519Private;

    fn generate() -> X25519Private {
        let secret = Csprng::with_standard(|rng| StaticSecret::random_from_rng(rng));
        X25519Private::from_secret(secret)
    }

    fn load(private: &[u8]) -> Result<X25519Private> {
        let bytes: Zeroizing<[u8; 32]> =
            Zeroizing::new(private.try_into().map_err(|_| {
                CryptoError::InvalidKeyLength {
                    what: "X25519 private key",
                    expected: 32,
                    actual: private.len(),
                }
            })?);
        Ok(X25519Private::from_secret(StaticSecret::from(*bytes)))
    }
}
