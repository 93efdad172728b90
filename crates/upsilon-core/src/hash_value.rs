//! Hash values in their two shapes.
//!
//! [`Hash<N>`] carries its length in the type; [`DynHash`] carries it at run
//! time. A fixed hash widens into a dynamic one for free, and every
//! narrowing (to a shorter length, or from dynamic to fixed) is an explicit,
//! fallible call. Both shapes order lexicographically over their bytes, also
//! against each other.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{CryptoError, Result};
use crate::tag::HashAlgorithm;
use crate::wire::{Record, RecordWriter};

/// A hash whose length is known at compile time.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash<const N: usize>(pub [u8; N]);

impl<const N: usize> Hash<N> {
    /// The length of this hash shape in bytes.
    pub const LEN: usize = N;

    /// The all-zero hash.
    pub const ZERO: Self = Self([0u8; N]);

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// Keep the first `M` bytes. Fails when `M > N`.
    pub fn truncate<const M: usize>(&self) -> Result<Hash<M>> {
        if M > N {
            return Err(CryptoError::OutputTooLarge {
                requested: M,
                max: N,
            });
        }
        let mut out = [0u8; M];
        out.copy_from_slice(&self.0[..M]);
        Ok(Hash(out))
    }

    /// Widen into a length-carrying hash.
    pub fn to_dynamic(&self) -> DynHash {
        DynHash(self.0.to_vec())
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hex string of exactly `N` bytes.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| CryptoError::InvalidEncoding(e.to_string()))?;
        Self::try_from(bytes.as_slice())
    }
}

impl<const N: usize> Default for Hash<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const N: usize> fmt::Debug for Hash<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "Hash<{}>({})", N, &hex[..hex.len().min(16)])
    }
}

impl<const N: usize> AsRef<[u8]> for Hash<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> From<[u8; N]> for Hash<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> TryFrom<&[u8]> for Hash<N> {
    type Error = CryptoError;

    fn try_from(slice: &[u8]) -> Result<Self> {
        let arr: [u8; N] = slice.try_into().map_err(|_| {
            CryptoError::InvalidEncoding(format!(
                "hash length mismatch: expected {}, got {}",
                N,
                slice.len()
            ))
        })?;
        Ok(Self(arr))
    }
}

impl<const N: usize> TryFrom<DynHash> for Hash<N> {
    type Error = CryptoError;

    fn try_from(hash: DynHash) -> Result<Self> {
        Self::try_from(hash.as_bytes())
    }
}

impl<const N: usize> From<Hash<N>> for DynHash {
    fn from(hash: Hash<N>) -> Self {
        hash.to_dynamic()
    }
}

/// A hash whose length travels with its bytes.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DynHash(Vec<u8>);

impl DynHash {
    /// Wrap raw bytes.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the raw bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keep the first `len` bytes. Fails when `len` exceeds the current length.
    pub fn truncate(&self, len: usize) -> Result<DynHash> {
        if len > self.0.len() {
            return Err(CryptoError::OutputTooLarge {
                requested: len,
                max: self.0.len(),
            });
        }
        Ok(Self(self.0[..len].to_vec()))
    }

    /// Narrow to a fixed shape by keeping the first `M` bytes.
    pub fn to_fixed<const M: usize>(&self) -> Result<Hash<M>> {
        let truncated = self.truncate(M)?;
        Hash::try_from(truncated.as_bytes())
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        hex::decode(s)
            .map(Self)
            .map_err(|e| CryptoError::InvalidEncoding(e.to_string()))
    }
}

impl fmt::Debug for DynHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "DynHash[{}]({})", self.0.len(), &hex[..hex.len().min(16)])
    }
}

impl AsRef<[u8]> for DynHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for DynHash {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for DynHash {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl<const N: usize> PartialEq<DynHash> for Hash<N> {
    fn eq(&self, other: &DynHash) -> bool {
        self.0[..] == other.0[..]
    }
}

impl<const N: usize> PartialEq<Hash<N>> for DynHash {
    fn eq(&self, other: &Hash<N>) -> bool {
        self.0[..] == other.0[..]
    }
}

impl<const N: usize> PartialOrd<DynHash> for Hash<N> {
    fn partial_cmp(&self, other: &DynHash) -> Option<Ordering> {
        Some(self.0[..].cmp(&other.0[..]))
    }
}

impl<const N: usize> PartialOrd<Hash<N>> for DynHash {
    fn partial_cmp(&self, other: &Hash<N>) -> Option<Ordering> {
        Some(self.0[..].cmp(&other.0[..]))
    }
}

/// A hash value bound to the algorithm that produced it.
///
/// Two tagged hashes are equal only when both the algorithm and the bytes
/// are; they order by algorithm first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaggedHash {
    pub algorithm: HashAlgorithm,
    pub value: DynHash,
}

impl TaggedHash {
    pub fn new(algorithm: HashAlgorithm, value: impl Into<DynHash>) -> Self {
        Self {
            algorithm,
            value: value.into(),
        }
    }

    /// Encode as a `[hash tag][value]` record.
    pub fn to_bytes(&self) -> Vec<u8> {
        RecordWriter::new()
            .tag(self.algorithm)
            .segment(self.value.as_bytes())
            .finish()
    }

    /// Decode a `[hash tag][value]` record.
    ///
    /// This checks framing only; use
    /// [`Registry::check_tagged_hash`](crate::registry::Registry::check_tagged_hash)
    /// to also check the algorithm and the value length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let record = Record::decode(bytes)?;
        record.expect_shape(1, 1)?;
        Ok(Self {
            algorithm: record.tag(0)?,
            value: DynHash::from(record.segment(0)?),
        })
    }
}

impl AsRef<[u8]> for TaggedHash {
    fn as_ref(&self) -> &[u8] {
        self.value.as_bytes()
    }
}
