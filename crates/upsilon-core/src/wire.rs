//! Self-describing records.
//!
//! Every persisted object is one record: a definite-length CBOR array whose
//! leading items are unsigned integers (the algorithm tags, one per
//! capability the object binds) and whose trailing items are byte strings
//! (the payload segments). The encoding is a strict subset of RFC 8949
//! Core Deterministic Encoding:
//! - Integers and lengths use the smallest valid head
//! - Definite lengths only
//! - Tags come before segments, and nothing follows the array
//!
//! Decoding parses the CBOR with `ciborium`, then re-encodes the result and
//! requires the exact input bytes back, which rejects every non-canonical
//! form. It is tag-first: [`Record::decode`] only checks framing; the caller
//! resolves each tag against a registry before looking at the segments, so
//! an unknown tag fails as unsupported instead of being misread.

use ciborium::value::Value;
use zeroize::Zeroize;

use crate::error::{CryptoError, Result};
use crate::tag::AlgorithmTag;

const MAJOR_UINT: u8 = 0;
const MAJOR_BYTES: u8 = 2;
const MAJOR_ARRAY: u8 = 4;

/// Builds one record. Tags must all be added before the first segment.
///
/// Segments are borrowed; the only copy is the encoded output.
#[derive(Debug, Default)]
pub struct RecordWriter<'a> {
    tags: Vec<u16>,
    segments: Vec<&'a [u8]>,
}

impl<'a> RecordWriter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an algorithm tag.
    pub fn tag<T: AlgorithmTag>(mut self, tag: T) -> Self {
        debug_assert!(self.segments.is_empty(), "tags must precede segments");
        self.tags.push(tag.to_u16());
        self
    }

    /// Append a payload segment.
    pub fn segment(mut self, bytes: &'a [u8]) -> Self {
        self.segments.push(bytes);
        self
    }

    /// Encode the record.
    pub fn finish(self) -> Vec<u8> {
        encode(&self.tags, &self.segments)
    }
}

fn encode(tags: &[u16], segments: &[&[u8]]) -> Vec<u8> {
    let payload: usize = segments.iter().map(|s| s.len() + 9).sum();
    let mut buf = Vec::with_capacity(9 + tags.len() * 3 + payload);

    encode_uint(&mut buf, MAJOR_ARRAY, (tags.len() + segments.len()) as u64);
    for tag in tags {
        encode_uint(&mut buf, MAJOR_UINT, u64::from(*tag));
    }
    for segment in segments {
        encode_uint(&mut buf, MAJOR_BYTES, segment.len() as u64);
        buf.extend_from_slice(segment);
    }
    buf
}

/// Encode an unsigned integer head with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// A decoded record. Segments may hold private keys, so they are zeroed
/// on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    tags: Vec<u16>,
    segments: Vec<Vec<u8>>,
}

impl Record {
    /// Decode framing. Fails on anything but a complete, minimal record.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let value: Value =
            ciborium::from_reader(bytes).map_err(|e| malformed(&e.to_string()))?;
        let Value::Array(items) = value else {
            return Err(malformed("record is not an array"));
        };

        let mut tags = Vec::new();
        let mut segments = Vec::new();
        for item in items {
            match item {
                Value::Integer(value) if segments.is_empty() => {
                    let tag = u16::try_from(value).map_err(|_| {
                        malformed(&format!("tag {} is not a 16-bit value", i128::from(value)))
                    })?;
                    tags.push(tag);
                }
                Value::Bytes(segment) => segments.push(segment),
                _ => return Err(malformed("unexpected item")),
            }
        }

        // Re-encoding catches non-minimal heads, indefinite lengths and
        // trailing bytes.
        let segment_refs: Vec<&[u8]> = segments.iter().map(Vec::as_slice).collect();
        if encode(&tags, &segment_refs) != bytes {
            return Err(malformed("non-canonical encoding"));
        }

        Ok(Self { tags, segments })
    }

    /// Check the number of tags and segments.
    pub fn expect_shape(&self, tags: usize, segments: usize) -> Result<()> {
        if self.tags.len() != tags || self.segments.len() != segments {
            return Err(malformed(&format!(
                "expected {} tags and {} segments, got {} and {}",
                tags,
                segments,
                self.tags.len(),
                self.segments.len()
            )));
        }
        Ok(())
    }

    /// The `index`th tag, typed by family.
    pub fn tag<T: AlgorithmTag>(&self, index: usize) -> Result<T> {
        self.tags
            .get(index)
            .map(|raw| T::from_u16(*raw))
            .ok_or_else(|| malformed(&format!("missing tag {index}")))
    }

    /// The `index`th segment.
    pub fn segment(&self, index: usize) -> Result<&[u8]> {
        self.segments
            .get(index)
            .map(Vec::as_slice)
            .ok_or_else(|| malformed(&format!("missing segment {index}")))
    }

    pub fn tags(&self) -> &[u16] {
        &self.tags
    }

    pub fn segments(&self) -> &[Vec<u8>] {
        &self.segments
    }
}

impl Drop for Record {
    fn drop(&mut self) {
        self.segments.zeroize();
    }
}

fn malformed(msg: &str) -> CryptoError {
    CryptoError::InvalidEncoding(format!("record: {msg}"))
}
