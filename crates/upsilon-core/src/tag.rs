//! Algorithm tags.
//!
//! A tag is a 16-bit identifier selecting one concrete algorithm inside a
//! capability family. The high byte names the algorithm line and the low byte
//! the variant (usually an output or key size in bytes). Tags lead every
//! serialized object, so an assigned value is never reassigned; new
//! algorithms only ever add values.
//!
//! Tags are open newtypes rather than closed enums: a value read off the wire
//! that this build does not know is still a valid tag, and only fails when it
//! is resolved against a [`Registry`](crate::registry::Registry).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CryptoError;

/// The capability families an algorithm can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmFamily {
    Hash,
    Symmetric,
    Agreement,
    Signature,
    Kdf,
    ProofOfWork,
}

impl AlgorithmFamily {
    /// Human-readable family name.
    pub const fn name(self) -> &'static str {
        match self {
            AlgorithmFamily::Hash => "hash",
            AlgorithmFamily::Symmetric => "symmetric",
            AlgorithmFamily::Agreement => "agreement",
            AlgorithmFamily::Signature => "signature",
            AlgorithmFamily::Kdf => "kdf",
            AlgorithmFamily::ProofOfWork => "proof-of-work",
        }
    }
}

impl fmt::Display for AlgorithmFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Common behaviour of every family's tag type.
pub trait AlgorithmTag: Copy + Eq + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// The family this tag type belongs to.
    const FAMILY: AlgorithmFamily;

    /// Wrap a raw wire value. Never fails: unknown values are valid tags.
    fn from_u16(value: u16) -> Self;

    /// The raw wire value.
    fn to_u16(self) -> u16;

    /// The assigned name, if this build knows the value.
    fn name(self) -> Option<&'static str>;
}

/// Parse `0x`-prefixed hex or decimal.
fn parse_numeric_tag(s: &str) -> Option<u16> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagRepr {
    Number(u16),
    Text(String),
}

macro_rules! algorithm_tag {
    (
        $(#[$meta:meta])*
        pub struct $name:ident : $family:expr;
        {
            $( $(#[$cmeta:meta])* $constant:ident = $value:literal => $label:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u16);

        impl $name {
            $( $(#[$cmeta])* pub const $constant: Self = Self($value); )*

            /// Every tag value this build assigns a name to, ascending.
            pub const ASSIGNED: &'static [Self] = &[$(Self::$constant),*];
        }

        impl AlgorithmTag for $name {
            const FAMILY: AlgorithmFamily = $family;

            fn from_u16(value: u16) -> Self {
                Self(value)
            }

            fn to_u16(self) -> u16 {
                self.0
            }

            fn name(self) -> Option<&'static str> {
                match self.0 {
                    $( $value => Some($label), )*
                    _ => None,
                }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.name() {
                    Some(name) => f.write_str(name),
                    None => write!(f, "{:#06x}", self.0),
                }
            }
        }

        impl FromStr for $name {
            type Err = CryptoError;

            /// Accepts an assigned name (case-insensitive) or a raw value.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if let Some(tag) = Self::ASSIGNED
                    .iter()
                    .find(|tag| tag.name().is_some_and(|n| n.eq_ignore_ascii_case(s)))
                {
                    return Ok(*tag);
                }
                parse_numeric_tag(s).map(Self).ok_or_else(|| {
                    CryptoError::InvalidEncoding(format!(
                        "unknown {} algorithm name: {}",
                        $family.name(),
                        s
                    ))
                })
            }
        }

        impl From<$name> for u16 {
            fn from(tag: $name) -> u16 {
                tag.0
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                match self.name() {
                    Some(name) => serializer.serialize_str(name),
                    None => serializer.serialize_u16(self.0),
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match TagRepr::deserialize(deserializer)? {
                    TagRepr::Number(value) => Ok(Self(value)),
                    TagRepr::Text(text) => text.parse().map_err(serde::de::Error::custom),
                }
            }
        }
    };
}

algorithm_tag! {
    /// Hash function tags. The low byte is the output length in bytes.
    pub struct HashAlgorithm: AlgorithmFamily::Hash;
    {
        SHA2_224 = 0x021c => "SHA2-224",
        SHA2_256 = 0x0220 => "SHA2-256",
        SHA2_384 = 0x0230 => "SHA2-384",
        SHA2_512 = 0x0240 => "SHA2-512",
        SHA3_224 = 0x031c => "SHA3-224",
        SHA3_256 = 0x0320 => "SHA3-256",
        SHA3_384 = 0x0330 => "SHA3-384",
        SHA3_512 = 0x0340 => "SHA3-512",
        BLAKE2B_128 = 0x0410 => "BLAKE2b-128",
        BLAKE2B_256 = 0x0420 => "BLAKE2b-256",
        BLAKE2B_512 = 0x0440 => "BLAKE2b-512",
        BLAKE2S_128 = 0x0510 => "BLAKE2s-128",
        BLAKE2S_256 = 0x0520 => "BLAKE2s-256",
        BLAKE3_256 = 0x0620 => "BLAKE3-256",
    }
}

algorithm_tag! {
    /// Stream cipher tags.
    ///
    /// None of these provide a MAC: ciphertexts are malleable, so callers
    /// must authenticate separately.
    pub struct SymmetricAlgorithm: AlgorithmFamily::Symmetric;
    {
        AES128_CTR = 0x0110 => "AES-128-CTR",
        AES256_CTR = 0x0120 => "AES-256-CTR",
        CHACHA20_8 = 0x0208 => "ChaCha20/8",
        CHACHA20_12 = 0x020c => "ChaCha20/12",
        CHACHA20_20 = 0x0212 => "ChaCha20/20",
        XCHACHA20_8 = 0x0308 => "XChaCha20/8",
        XCHACHA20_12 = 0x030c => "XChaCha20/12",
        XCHACHA20_20 = 0x0312 => "XChaCha20/20",
    }
}

impl SymmetricAlgorithm {
    /// Full-round ChaCha20.
    pub const CHACHA20: Self = Self::CHACHA20_20;
    /// Full-round XChaCha20.
    pub const XCHACHA20: Self = Self::XCHACHA20_20;
}

algorithm_tag! {
    /// Key agreement tags.
    pub struct AgreementAlgorithm: AlgorithmFamily::Agreement;
    {
        /// X25519 Diffie-Hellman.
        CURVE25519 = 0x0000 => "Curve25519",
    }
}

algorithm_tag! {
    /// Signature scheme tags.
    pub struct SignatureAlgorithm: AlgorithmFamily::Signature;
    {
        /// Ed25519 over Curve25519.
        CURVE25519 = 0x0000 => "Curve25519",
    }
}

algorithm_tag! {
    /// Key derivation function tags.
    pub struct KdfAlgorithm: AlgorithmFamily::Kdf;
    {
        SHAKE128 = 0x0010 => "SHAKE128",
        SHAKE256 = 0x0020 => "SHAKE256",
        HKDF_SHA256 = 0x0030 => "HKDF-SHA256",
    }
}

algorithm_tag! {
    /// Proof-of-work tags.
    pub struct PowAlgorithm: AlgorithmFamily::ProofOfWork;
    {
        LASERPROOF = 0x0100 => "Laserproof",
    }
}
