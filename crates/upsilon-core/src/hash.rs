//! The hash capability.
//!
//! A [`HashFunction`] starts [`PartialHash`] sessions. Salting is uniform:
//! when an algorithm has no salt parameter of its own, the session is
//! wrapped in a [`SaltedSession`] that feeds the salt before any input and
//! again after every reset, so callers cannot tell the two cases apart.
//!
//! Built-in algorithms are zero-sized marker types ([`Sha256`],
//! [`Blake2b256`], ...) implementing both [`HashFunction`] and
//! [`KnownHash`]. The marker is the static handle; the registry stores the
//! same marker behind `Arc<dyn HashFunction>` for the dynamic path.

use std::borrow::Cow;

use blake2::digest::consts::{U16, U32};
use sha2::Digest;

use crate::error::{CryptoError, Result};
use crate::hash_value::{DynHash, Hash};
use crate::tag::HashAlgorithm;

/// Static per-algorithm metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashProperties {
    pub algorithm: HashAlgorithm,
    /// Longest output the algorithm produces, in bytes.
    pub max_output: usize,
    pub min_salt: usize,
    pub max_salt: usize,
}

impl HashProperties {
    /// Properties of an algorithm that needs no salt and accepts any.
    pub const fn new(algorithm: HashAlgorithm, max_output: usize) -> Self {
        Self {
            algorithm,
            max_output,
            min_salt: 0,
            max_salt: usize::MAX,
        }
    }

    /// Check a salt length against the bounds.
    pub fn check_salt(&self, len: usize) -> Result<()> {
        if len < self.min_salt || len > self.max_salt {
            return Err(CryptoError::InvalidSaltLength {
                len,
                min: self.min_salt,
                max: self.max_salt,
            });
        }
        Ok(())
    }

    /// Check a requested output length against `max_output`.
    pub fn check_output(&self, len: usize) -> Result<()> {
        if len > self.max_output {
            return Err(CryptoError::OutputTooLarge {
                requested: len,
                max: self.max_output,
            });
        }
        Ok(())
    }
}

/// An incremental hashing session.
///
/// Chunks passed to [`process`](Self::process) are order-significant.
/// Finishing consumes the session.
pub trait PartialHash: Send {
    /// Feed more input.
    fn process(&mut self, chunk: &[u8]);

    /// Finish with the algorithm's full output.
    fn finish(self: Box<Self>) -> DynHash;

    /// Return to the state right after construction (and salting).
    fn reset(&mut self);

    /// Finish into `out`, truncating the full output to its length.
    fn finish_into(self: Box<Self>, out: &mut [u8]) -> Result<()> {
        let full = self.finish();
        if out.len() > full.len() {
            return Err(CryptoError::OutputTooLarge {
                requested: out.len(),
                max: full.len(),
            });
        }
        out.copy_from_slice(&full.as_bytes()[..out.len()]);
        Ok(())
    }
}

/// Emulates a salt parameter by feeding the salt ahead of the input.
pub struct SaltedSession {
    inner: Box<dyn PartialHash>,
    salt: Vec<u8>,
}

impl SaltedSession {
    pub fn new(mut inner: Box<dyn PartialHash>, salt: Vec<u8>) -> Self {
        inner.process(&salt);
        Self { inner, salt }
    }
}

impl PartialHash for SaltedSession {
    fn process(&mut self, chunk: &[u8]) {
        self.inner.process(chunk);
    }

    fn finish(self: Box<Self>) -> DynHash {
        self.inner.finish()
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.inner.process(&self.salt);
    }
}

/// A hash algorithm.
pub trait HashFunction: Send + Sync {
    fn properties(&self) -> HashProperties;

    /// Start a session with no salt processing at all.
    fn begin_unsalted(&self) -> Box<dyn PartialHash>;

    fn algorithm(&self) -> HashAlgorithm {
        self.properties().algorithm
    }

    /// Start a session, salted when `salt` is given.
    ///
    /// Without a salt, an algorithm that requires one is salted with zeroes
    /// of the minimum length.
    fn begin(&self, salt: Option<&[u8]>) -> Result<Box<dyn PartialHash>> {
        let props = self.properties();
        let salt = match salt {
            Some(salt) => {
                props.check_salt(salt.len())?;
                Cow::Borrowed(salt)
            }
            None if props.min_salt > 0 => Cow::Owned(vec![0u8; props.min_salt]),
            None => return Ok(self.begin_unsalted()),
        };
        if salt.is_empty() {
            return Ok(self.begin_unsalted());
        }
        Ok(Box::new(SaltedSession::new(
            self.begin_unsalted(),
            salt.into_owned(),
        )))
    }

    /// One-shot hash with the full output length.
    fn compute(&self, input: &[u8], salt: Option<&[u8]>) -> Result<DynHash> {
        let mut session = self.begin(salt)?;
        session.process(input);
        Ok(session.finish())
    }

    /// One-shot hash truncated to `out.len()` bytes.
    fn compute_into(&self, input: &[u8], salt: Option<&[u8]>, out: &mut [u8]) -> Result<()> {
        self.properties().check_output(out.len())?;
        let mut session = self.begin(salt)?;
        session.process(input);
        session.finish_into(out)
    }
}

/// Fixed-length output helpers for any hash function.
pub trait HashFunctionExt: HashFunction {
    fn compute_fixed<const N: usize>(&self, input: &[u8], salt: Option<&[u8]>) -> Result<Hash<N>> {
        let mut out = [0u8; N];
        self.compute_into(input, salt, &mut out)?;
        Ok(Hash(out))
    }
}

impl<T: HashFunction + ?Sized> HashFunctionExt for T {}

/// A hash algorithm selectable at compile time.
pub trait KnownHash: HashFunction + Default + Copy + 'static {
    const TAG: HashAlgorithm;
    const OUTPUT_LEN: usize;
}

/// Static lookup.
pub fn hasher<A: KnownHash>() -> A {
    A::default()
}

/// Session over any RustCrypto fixed-output digest.
struct DigestSession<D>(D);

impl<D: Digest + Send + 'static> PartialHash for DigestSession<D> {
    fn process(&mut self, chunk: &[u8]) {
        Digest::update(&mut self.0, chunk);
    }

    fn finish(self: Box<Self>) -> DynHash {
        DynHash::from_vec(self.0.finalize().to_vec())
    }

    fn reset(&mut self) {
        self.0 = D::new();
    }
}

macro_rules! digest_hash {
    ($( $(#[$meta:meta])* $name:ident => $digest:ty, $tag:ident, $len:literal; )*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            pub struct $name;

            impl KnownHash for $name {
                const TAG: HashAlgorithm = HashAlgorithm::$tag;
                const OUTPUT_LEN: usize = $len;
            }

            impl HashFunction for $name {
                fn properties(&self) -> HashProperties {
                    HashProperties::new(HashAlgorithm::$tag, $len)
                }

                fn begin_unsalted(&self) -> Box<dyn PartialHash> {
                    Box::new(DigestSession(<$digest>::new()))
                }
            }
        )*
    };
}

digest_hash! {
    Sha224 => sha2::Sha224, SHA2_224, 28;
    Sha256 => sha2::Sha256, SHA2_256, 32;
    Sha384 => sha2::Sha384, SHA2_384, 48;
    Sha512 => sha2::Sha512, SHA2_512, 64;
    Sha3_224 => sha3::Sha3_224, SHA3_224, 28;
    Sha3_256 => sha3::Sha3_256, SHA3_256, 32;
    Sha3_384 => sha3::Sha3_384, SHA3_384, 48;
    Sha3_512 => sha3::Sha3_512, SHA3_512, 64;
    /// BLAKE2b with a 16-byte digest (not a truncated BLAKE2b-512).
    Blake2b128 => blake2::Blake2b<U16>, BLAKE2B_128, 16;
    /// BLAKE2b with a 32-byte digest.
    Blake2b256 => blake2::Blake2b<U32>, BLAKE2B_256, 32;
    Blake2b512 => blake2::Blake2b512, BLAKE2B_512, 64;
    Blake2s128 => blake2::Blake2s<U16>, BLAKE2S_128, 16;
    Blake2s256 => blake2::Blake2s256, BLAKE2S_256, 32;
}

/// BLAKE3 in its default 32-byte mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3;

struct Blake3Session(blake3::Hasher);

impl PartialHash for Blake3Session {
    fn process(&mut self, chunk: &[u8]) {
        self.0.update(chunk);
    }

    fn finish(self: Box<Self>) -> DynHash {
        DynHash::from_vec(self.0.finalize().as_bytes().to_vec())
    }

    fn reset(&mut self) {
        self.0.reset();
    }
}

impl KnownHash for Blake3 {
    const TAG: HashAlgorithm = HashAlgorithm::BLAKE3_256;
    const OUTPUT_LEN: usize = 32;
}

impl HashFunction for Blake3 {
    fn properties(&self) -> HashProperties {
        HashProperties::new(HashAlgorithm::BLAKE3_256, 32)
    }

    fn begin_unsalted(&self) -> Box<dyn PartialHash> {
        Box::new(Blake3Session(blake3::Hasher::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blake2b_256_known_value() {
        let out = hasher::<Blake2b256>()
            .compute(b"Hello, world!", None)
            .unwrap();
        assert_eq!(
            out.to_hex(),
            "b5da441cfe72ae042ef4d2b17742907f675de4da57462d4c3609c2e2ed755970"
        );
    }

    #[test]
    fn test_sha256_empty() {
        let out = Sha256.compute(b"", None).unwrap();
        assert_eq!(
            out.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_salt_is_prepended() {
        let salted = Sha3_256.compute(b"input", Some(&b"salt"[..])).unwrap();
        let manual = Sha3_256.compute(b"saltinput", None).unwrap();
        assert_eq!(salted, manual);
    }

    #[test]
    fn test_reset_replays_salt() {
        let mut session = Blake2s256.begin(Some(&b"pepper"[..])).unwrap();
        session.process(b"garbage");
        session.reset();
        session.process(b"data");
        assert_eq!(
            session.finish(),
            Blake2s256.compute(b"data", Some(&b"pepper"[..])).unwrap()
        );
    }

    #[test]
    fn test_chunking_does_not_matter() {
        let mut session = Blake3.begin(None).unwrap();
        session.process(b"Hello, ");
        session.process(b"world!");
        assert_eq!(
            session.finish(),
            Blake3.compute(b"Hello, world!", None).unwrap()
        );
    }

    #[test]
    fn test_compute_into_truncates() {
        let full = Sha512.compute(b"abc", None).unwrap();
        let mut short = [0u8; 20];
        Sha512.compute_into(b"abc", None, &mut short).unwrap();
        assert_eq!(&short[..], &full.as_bytes()[..20]);
    }

    #[test]
    fn test_output_too_large() {
        let mut out = [0u8; 33];
        let err = Blake2b256.compute_into(b"abc", None, &mut out).unwrap_err();
        assert_eq!(
            err,
            CryptoError::OutputTooLarge {
                requested: 33,
                max: 32
            }
        );
        assert!(Blake2b256.compute_fixed::<64>(b"abc", None).is_err());
    }

    #[test]
    fn test_compute_fixed_matches_dynamic() {
        let fixed: Hash<32> = Sha256.compute_fixed(b"abc", None).unwrap();
        assert_eq!(fixed, Sha256.compute(b"abc", None).unwrap());
    }

    #[test]
    fn test_blake2b_sizes_are_distinct_functions() {
        let short = Blake2b128.compute(b"x", None).unwrap();
        let long = Blake2b512.compute(b"x", None).unwrap();
        assert_eq!(short.len(), 16);
        assert_eq!(long.len(), 64);
        assert_ne!(short.as_bytes(), &long.as_bytes()[..16]);
    }

    #[derive(Clone, Copy, Default)]
    struct NeedsSalt;

    impl HashFunction for NeedsSalt {
        fn properties(&self) -> HashProperties {
            HashProperties {
                min_salt: 8,
                max_salt: 16,
                ..HashProperties::new(HashAlgorithm(0x7f20), 32)
            }
        }

        fn begin_unsalted(&self) -> Box<dyn PartialHash> {
            Sha256.begin_unsalted()
        }
    }

    #[test]
    fn test_salt_bounds() {
        assert!(matches!(
            NeedsSalt.compute(b"m", Some(&[1u8; 7][..])),
            Err(CryptoError::InvalidSaltLength { len: 7, .. })
        ));
        assert!(NeedsSalt.compute(b"m", Some(&[1u8; 17][..])).is_err());
        assert!(NeedsSalt.compute(b"m", Some(&[1u8; 16][..])).is_ok());
    }

    #[test]
    fn test_missing_salt_uses_zeroes() {
        assert_eq!(
            NeedsSalt.compute(b"m", None).unwrap(),
            NeedsSalt.compute(b"m", Some(&[0u8; 8][..])).unwrap()
        );
    }
}
