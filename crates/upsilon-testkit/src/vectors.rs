//! Golden vectors computed with independent implementations.
//!
//! Inputs are kept small and outputs are hex so the same tables can be
//! exported as JSON and checked by other implementations.

use serde::Serialize;

use upsilon_core::{
    AgreementAlgorithm, CryptoError, HashAlgorithm, HashFunction, Kdf, KdfAlgorithm, Registry,
    Result, SignatureAlgorithm, SymmetricAlgorithm, SymmetricCipher,
};
use upsilon_credentials::{Agreer, Identity, OwnedIdentity};
use upsilon_pow::{Difficulty, Laserproof, LaserproofConfig, PowVerifier};

/// An unsalted hash of `input`.
#[derive(Debug, Clone, Serialize)]
pub struct HashVector {
    pub algorithm: HashAlgorithm,
    pub input: &'static str,
    pub expected: &'static str,
}

/// `len` bytes of KDF output over `input`.
#[derive(Debug, Clone, Serialize)]
pub struct KdfVector {
    pub algorithm: KdfAlgorithm,
    pub input: &'static str,
    pub len: usize,
    pub expected: &'static str,
}

/// Encryption of `plaintext` from position zero. Key and IV are the
/// counting sequences `0, 1, 2, ...` of the algorithm's sizes.
#[derive(Debug, Clone, Serialize)]
pub struct CipherVector {
    pub algorithm: SymmetricAlgorithm,
    pub plaintext: &'static str,
    pub expected: &'static str,
}

/// A deterministic signature by the identity with private key `seed` over
/// `message`, hashed with `hash`.
#[derive(Debug, Clone, Serialize)]
pub struct SignatureVector {
    pub algorithm: SignatureAlgorithm,
    pub hash: HashAlgorithm,
    pub seed: &'static str,
    pub message: &'static str,
    pub public: &'static str,
    pub signature: &'static str,
}

/// A key agreement whose raw output is put through `kdf`.
#[derive(Debug, Clone, Serialize)]
pub struct AgreementVector {
    pub algorithm: AgreementAlgorithm,
    pub kdf: KdfAlgorithm,
    pub private: &'static str,
    pub public: &'static str,
    pub other_public: &'static str,
    pub derived: &'static str,
}

/// The Laserproof difficulty of the candidate proof for `nonce` over the
/// BLAKE2b-256 hash of `message`.
#[derive(Debug, Clone, Serialize)]
pub struct LaserproofVector {
    pub message: &'static str,
    pub nonce: u64,
    pub lookback_len: usize,
    pub backstride_len: usize,
    pub threshold: u8,
    pub difficulty: u64,
}

/// Every table, for export.
#[derive(Debug, Clone, Serialize)]
pub struct GoldenVectors {
    pub hash: Vec<HashVector>,
    pub kdf: Vec<KdfVector>,
    pub cipher: Vec<CipherVector>,
    pub signature: Vec<SignatureVector>,
    pub agreement: Vec<AgreementVector>,
    pub laserproof: Vec<LaserproofVector>,
}

pub fn hash_vectors() -> Vec<HashVector> {
    vec![
        HashVector {
            algorithm: HashAlgorithm::BLAKE2B_256,
            input: "Hello, world!",
            expected: "b5da441cfe72ae042ef4d2b17742907f675de4da57462d4c3609c2e2ed755970",
        },
        HashVector {
            algorithm: HashAlgorithm::BLAKE2B_256,
            input: "Hello, World!",
            expected: "511bc81dde11180838c562c82bb35f3223f46061ebde4a955c27b3f489cf1e03",
        },
        HashVector {
            algorithm: HashAlgorithm::SHA2_256,
            input: "",
            expected: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        },
        HashVector {
            algorithm: HashAlgorithm::SHA2_256,
            input: "abc",
            expected: "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        },
        HashVector {
            algorithm: HashAlgorithm::SHA2_512,
            input: "abc",
            expected: "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
                       2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f",
        },
        HashVector {
            algorithm: HashAlgorithm::SHA3_256,
            input: "abc",
            expected: "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532",
        },
        HashVector {
            algorithm: HashAlgorithm::BLAKE2B_512,
            input: "abc",
            expected: "ba80a53f981c4d0d6a2797b69f12f6e94c212f14685ac4b74b12bb6fdbffa2d1\
                       7d87c5392aab792dc252d5de4533cc9518d38aa8dbf1925ab92386edd4009923",
        },
        HashVector {
            algorithm: HashAlgorithm::BLAKE2S_256,
            input: "abc",
            expected: "508c5e8c327c14e2e1a72ba34eeb452f37458b209ed63a294d999b4c86675982",
        },
        HashVector {
            algorithm: HashAlgorithm::BLAKE3_256,
            input: "",
            expected: "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262",
        },
    ]
}

pub fn kdf_vectors() -> Vec<KdfVector> {
    vec![
        KdfVector {
            algorithm: KdfAlgorithm::SHAKE256,
            input: "",
            len: 32,
            expected: "46b9dd2b0ba88d13233b3feb743eeb243fcd52ea62b81b82b50c27646ed5762f",
        },
        KdfVector {
            algorithm: KdfAlgorithm::SHAKE128,
            input: "",
            len: 32,
            expected: "7f9c2ba4e88f827d616045507605853ed73b8093f6efbc88eb1a6eacfa66ef26",
        },
        KdfVector {
            algorithm: KdfAlgorithm::SHAKE256,
            input: "Hello, world!",
            len: 64,
            expected: "cf68a0d388047ed588ad72d3808cf9a3243f04d4901748c705fbf3a27d955542\
                       fd9d53af53e84c8abd4fce6e224af9a0a9e7eea5573a886b1af8c29f9897c8b5",
        },
        KdfVector {
            algorithm: KdfAlgorithm::HKDF_SHA256,
            input: "Hello, world!",
            len: 42,
            expected: "5814667d3177b96f047b928d1817672cd7e8dd11f563577bc8036932fa54ebd1\
                       0a8d8c7be5bb11b1ce9f",
        },
    ]
}

pub fn cipher_vectors() -> Vec<CipherVector> {
    vec![
        CipherVector {
            algorithm: SymmetricAlgorithm::AES128_CTR,
            plaintext: "Hello, world!",
            expected: "42f167d92e42d0329eb1f83ce7",
        },
        CipherVector {
            algorithm: SymmetricAlgorithm::AES256_CTR,
            plaintext: "Hello, world!",
            expected: "120b683b67d751e19f5c395923",
        },
        CipherVector {
            algorithm: SymmetricAlgorithm::CHACHA20,
            plaintext: "Hello, world!",
            expected: "585f9d7daea774ea5656e3d45c",
        },
        CipherVector {
            algorithm: SymmetricAlgorithm::XCHACHA20,
            plaintext: "Hello, world!",
            expected: "ad5f0da29e7dc8636e7411871b",
        },
    ]
}

pub fn signature_vectors() -> Vec<SignatureVector> {
    vec![SignatureVector {
        algorithm: SignatureAlgorithm::CURVE25519,
        hash: HashAlgorithm::BLAKE2B_256,
        seed: "4242424242424242424242424242424242424242424242424242424242424242",
        message: "Hello, world!",
        public: "2152f8d19b791d24453242e15f2eab6cb7cffa7b6a5ed30097960e069881db12",
        signature: "e8d9805319dd7a8c0d51769ee3d001fa3e6a0715bf0843653073f8d8ed6361b3\
                    7b4fcd4ef87973203394c10c13cd26d156f0bb8812824c44b521bba8637f3207",
    }]
}

pub fn agreement_vectors() -> Vec<AgreementVector> {
    // Alice and Bob from RFC 7748 section 6.1.
    vec![AgreementVector {
        algorithm: AgreementAlgorithm::CURVE25519,
        kdf: KdfAlgorithm::SHAKE256,
        private: "77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a",
        public: "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a",
        other_public: "de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f",
        derived: "760eb325d226c52884f7dfec2248affe3cb5168714aef8bb66f483467e5aadfd",
    }]
}

pub fn laserproof_vectors() -> Vec<LaserproofVector> {
    let default = |nonce, difficulty| LaserproofVector {
        message: "Hello, world!",
        nonce,
        lookback_len: 4096,
        backstride_len: 8192,
        threshold: 128,
        difficulty,
    };
    let small = |nonce, difficulty| LaserproofVector {
        message: "Hello, world!",
        nonce,
        lookback_len: 64,
        backstride_len: 96,
        threshold: 16,
        difficulty,
    };
    vec![
        default(0, 32),
        default(2, 64),
        default(4, 128),
        default(5, 96),
        small(0, 192),
        small(2, 672),
    ]
}

pub fn all_vectors() -> GoldenVectors {
    GoldenVectors {
        hash: hash_vectors(),
        kdf: kdf_vectors(),
        cipher: cipher_vectors(),
        signature: signature_vectors(),
        agreement: agreement_vectors(),
        laserproof: laserproof_vectors(),
    }
}

/// All tables as pretty JSON.
pub fn vectors_json() -> String {
    serde_json::to_string_pretty(&all_vectors()).unwrap_or_default()
}

/// `0, 1, 2, ...` of length `len`.
pub fn counting_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| i as u8).collect()
}

fn decode(hex_str: &str) -> Result<Vec<u8>> {
    hex::decode(hex_str).map_err(|e| CryptoError::InvalidEncoding(e.to_string()))
}

fn run_hash(registry: &Registry, v: &HashVector) -> Result<String> {
    Ok(registry
        .hasher(v.algorithm)?
        .compute(v.input.as_bytes(), None)?
        .to_hex())
}

fn run_kdf(registry: &Registry, v: &KdfVector) -> Result<String> {
    let out = registry.kdf(v.algorithm)?.expand(v.input.as_bytes(), v.len)?;
    Ok(hex::encode(&out[..]))
}

fn run_cipher(registry: &Registry, v: &CipherVector) -> Result<String> {
    let props = registry.symmetric_properties(v.algorithm)?;
    let mut cipher = registry.cipher(
        v.algorithm,
        &counting_bytes(props.key_size),
        &counting_bytes(props.iv_size),
    )?;
    Ok(hex::encode(cipher.encrypt(v.plaintext.as_bytes())?))
}

fn run_signature(registry: &Registry, v: &SignatureVector) -> Result<String> {
    let owned = OwnedIdentity::load(registry, v.algorithm, v.hash, &decode(v.seed)?)?;
    let public = Identity::load(registry, v.algorithm, v.hash, &decode(v.public)?)?;
    if owned.identity() != public {
        return Err(CryptoError::InvalidEncoding("public key mismatch".into()));
    }
    let signature = owned.sign(v.message.as_bytes())?;
    if !public.verify(v.message.as_bytes(), &signature) {
        return Err(CryptoError::InvalidEncoding("signature does not verify".into()));
    }
    Ok(hex::encode(signature))
}

fn run_agreement(registry: &Registry, v: &AgreementVector) -> Result<String> {
    let agreer = Agreer::load(registry, v.kdf, v.algorithm, &decode(v.private)?)?;
    if hex::encode(agreer.public_bytes()) != v.public {
        return Err(CryptoError::InvalidEncoding("public value mismatch".into()));
    }
    let other = decode(v.other_public)?;
    let secret = agreer.derive_shared_secret(&other, 32)?;
    Ok(hex::encode(&secret[..]))
}

fn run_laserproof(registry: &Registry, v: &LaserproofVector) -> Result<Difficulty> {
    let laserproof = Laserproof::new(
        registry,
        LaserproofConfig {
            lookback_len: v.lookback_len,
            backstride_len: v.backstride_len,
            threshold: v.threshold,
            ..Default::default()
        },
    )?;
    let data = registry
        .hasher(HashAlgorithm::BLAKE2B_256)?
        .compute(v.message.as_bytes(), None)?;
    let proof = laserproof.candidate(data.as_bytes(), v.nonce)?;
    Ok(laserproof.difficulty(data.as_bytes(), proof.as_bytes()))
}

fn outcome(name: String, expected: &str, got: Result<String>) -> (String, bool, String) {
    match got {
        Ok(hex) => (name, hex == expected, hex),
        Err(e) => (name, false, e.to_string()),
    }
}

/// Check every vector against `registry`.
///
/// Returns `(name, matches, produced)` per vector; `produced` is the error
/// message when the run failed.
pub fn verify_all_vectors(registry: &Registry) -> Vec<(String, bool, String)> {
    let mut results = Vec::new();
    for v in hash_vectors() {
        let name = format!("hash {} {:?}", v.algorithm, v.input);
        results.push(outcome(name, v.expected, run_hash(registry, &v)));
    }
    for v in kdf_vectors() {
        let name = format!("kdf {} {:?} {}", v.algorithm, v.input, v.len);
        results.push(outcome(name, v.expected, run_kdf(registry, &v)));
    }
    for v in cipher_vectors() {
        let name = format!("cipher {}", v.algorithm);
        results.push(outcome(name, v.expected, run_cipher(registry, &v)));
    }
    for v in signature_vectors() {
        let name = format!("signature {}/{}", v.algorithm, v.hash);
        results.push(outcome(name, v.signature, run_signature(registry, &v)));
    }
    for v in agreement_vectors() {
        let name = format!("agreement {}/{}", v.algorithm, v.kdf);
        results.push(outcome(name, v.derived, run_agreement(registry, &v)));
    }
    for v in laserproof_vectors() {
        let name = format!(
            "laserproof nonce {} ({}/{}/{})",
            v.nonce, v.lookback_len, v.backstride_len, v.threshold
        );
        let expected = Difficulty::from(v.difficulty);
        results.push(match run_laserproof(registry, &v) {
            Ok(d) => (name, d == expected, d.to_string()),
            Err(e) => (name, false, e.to_string()),
        });
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use upsilon_core::build_registry;

    #[test]
    fn test_all_vectors_pass() {
        for (name, ok, produced) in verify_all_vectors(build_registry()) {
            assert!(ok, "vector '{}' produced {}", name, produced);
        }
    }

    #[test]
    fn test_json_export() {
        let json = vectors_json();
        assert!(json.contains("\"BLAKE2b-256\""));
        assert!(json.contains("b5da441cfe72ae042ef4d2b17742907f675de4da57462d4c3609c2e2ed755970"));
    }

    #[test]
    fn test_empty_registry_fails_every_vector() {
        let registry = upsilon_core::RegistryBuilder::new().build();
        assert!(verify_all_vectors(&registry).iter().all(|(_, ok, _)| !ok));
    }
}
