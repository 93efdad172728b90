//! The key-derivation capability.
//!
//! SHAKE output is prefix-consistent: asking for fewer bytes yields a prefix
//! of a longer request. HKDF output is too for a fixed input, but HKDF caps
//! the length at 255 hash blocks.

use hkdf::Hkdf;
use sha3::digest::{ExtendableOutput, Update, XofReader};
use zeroize::Zeroizing;

use crate::error::{CryptoError, Result};
use crate::tag::KdfAlgorithm;

/// A deterministic key-derivation function.
pub trait Kdf: Send + Sync {
    fn algorithm(&self) -> KdfAlgorithm;

    /// Longest output this KDF can produce, or `None` when unbounded.
    fn max_output(&self) -> Option<usize>;

    /// Fill `out` with key material derived from `input`.
    fn expand_into(&self, input: &[u8], out: &mut [u8]) -> Result<()>;

    fn expand(&self, input: &[u8], len: usize) -> Result<Zeroizing<Vec<u8>>> {
        let mut out = Zeroizing::new(vec![0u8; len]);
        self.expand_into(input, &mut out)?;
        Ok(out)
    }
}

/// A KDF selectable at compile time.
pub trait KnownKdf: Kdf + Default + Copy + 'static {
    const TAG: KdfAlgorithm;
}

/// Static lookup.
pub fn kdf<A: KnownKdf>() -> A {
    A::default()
}

/// SHAKE128 as an unbounded KDF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shake128;

/// SHAKE256 as an unbounded KDF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shake256;

fn shake<X: Default + Update + ExtendableOutput>(input: &[u8], out: &mut [u8]) {
    let mut xof = X::default();
    xof.update(input);
    xof.finalize_xof().read(out);
}

impl KnownKdf for Shake128 {
    const TAG: KdfAlgorithm = KdfAlgorithm::SHAKE128;
}

impl Kdf for Shake128 {
    fn algorithm(&self) -> KdfAlgorithm {
        Self::TAG
    }

    fn max_output(&self) -> Option<usize> {
        None
    }

    fn expand_into(&self, input: &[u8], out: &mut [u8]) -> Result<()> {
        shake::<sha3::Shake128>(input, out);
        Ok(())
    }
}

impl KnownKdf for Shake256 {
    const TAG: KdfAlgorithm = KdfAlgorithm::SHAKE256;
}

impl Kdf for Shake256 {
    fn algorithm(&self) -> KdfAlgorithm {
        Self::TAG
    }

    fn max_output(&self) -> Option<usize> {
        None
    }

    fn expand_into(&self, input: &[u8], out: &mut [u8]) -> Result<()> {
        shake::<sha3::Shake256>(input, out);
        Ok(())
    }
}

/// HKDF-SHA256 (RFC 5869) with an empty salt and empty info.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HkdfSha256;

impl HkdfSha256 {
    pub const MAX_OUTPUT: usize = 255 * 32;
}

impl KnownKdf for HkdfSha256 {
    const TAG: KdfAlgorithm = KdfAlgorithm::HKDF_SHA256;
}

impl Kdf for HkdfSha256 {
    fn algorithm(&self) -> KdfAlgorithm {
        Self::TAG
    }

    fn max_output(&self) -> Option<usize> {
        Some(Self::MAX_OUTPUT)
    }

    fn expand_into(&self, input: &[u8], out: &mut [u8]) -> Result<()> {
        Hkdf::<sha2::Sha256>::new(None, input)
            .expand(&[], out)
            .map_err(|_| CryptoError::OutputTooLarge {
                requested: out.len(),
                max: Self::MAX_OUTPUT,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shake256_known_value() {
        let out = kdf::<Shake256>().expand(b"", 32).unwrap();
        assert_eq!(
            hex::encode(&*out),
            "46b9dd2b0ba88d13233b3feb743eeb243fcd52ea62b81b82b50c27646ed5762f"
        );
    }

    #[test]
    fn test_shake_is_prefix_consistent() {
        let long = Shake128.expand(b"secret", 1024).unwrap();
        let short = Shake128.expand(b"secret", 17).unwrap();
        assert_eq!(&long[..17], &short[..]);
    }

    #[test]
    fn test_hkdf_limit() {
        assert!(HkdfSha256.expand(b"ikm", HkdfSha256::MAX_OUTPUT).is_ok());
        assert_eq!(
            HkdfSha256.expand(b"ikm", HkdfSha256::MAX_OUTPUT + 1).unwrap_err(),
            CryptoError::OutputTooLarge {
                requested: 8161,
                max: 8160
            }
        );
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            HkdfSha256.expand(b"ikm", 42).unwrap(),
            HkdfSha256.expand(b"ikm", 42).unwrap()
        );
        assert_ne!(
            Shake256.expand(b"a", 32).unwrap(),
            Shake256.expand(b"b", 32).unwrap()
        );
    }
}
