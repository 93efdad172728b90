//! Laserproof: a self-scaling memory-hard proof of work.
//!
//! A verifier grows a work buffer `W` one hash block at a time. Each block
//! hashes the most recent `lookback_len` bytes of `W`, salted with the hashed
//! data. After every block a stop check hashes the most recent
//! `backstride_len` bytes of `W`, salted with the proof seed, and XOR-folds
//! the output to one byte; the buffer is complete once that byte is below
//! `threshold`. The difficulty of a proof is the length of `W` at that point.
//!
//! `W` depends only on the hashed data, so a prover searching over proof
//! seeds builds it once and replays the stop checks per candidate.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use upsilon_core::{
    hasher, Blake2b256, CryptoError, DynHash, HashAlgorithm, HashFunction, PowAlgorithm, Record,
    RecordWriter, Registry, Result,
};

use crate::difficulty::Difficulty;

/// Laserproof parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaserproofConfig {
    /// Hash used for work blocks, stop checks and proof seeds.
    pub hash: HashAlgorithm,
    /// Bytes of `W` hashed into each new block.
    pub lookback_len: usize,
    /// Bytes of `W` hashed by each stop check.
    pub backstride_len: usize,
    /// A check stops when its folded byte is below this. Zero never stops.
    pub threshold: u8,
    /// Give up once `W` reaches this many bytes.
    pub max_work_len: Option<usize>,
}

impl Default for LaserproofConfig {
    fn default() -> Self {
        Self {
            hash: HashAlgorithm::BLAKE2B_256,
            lookback_len: 4096,
            backstride_len: 8192,
            threshold: 128,
            max_work_len: None,
        }
    }
}

/// Checks the difficulty of a proof seed.
pub trait PowVerifier: Send + Sync {
    fn algorithm(&self) -> PowAlgorithm;

    fn hash_algorithm(&self) -> HashAlgorithm;

    /// Difficulty of `proof` over `hashed_data`. Total: failures are
    /// [`Difficulty::ZERO`].
    fn difficulty(&self, hashed_data: &[u8], proof: &[u8]) -> Difficulty;
}

/// Searches for proof seeds.
pub trait PowGenerator: PowVerifier {
    /// Find a proof whose difficulty over `hashed_data` exceeds `threshold`.
    fn work(&self, hashed_data: &[u8], threshold: usize) -> Result<ProofOfWork>;
}

/// A configured Laserproof instance.
#[derive(Clone)]
pub struct Laserproof {
    hasher: Arc<dyn HashFunction>,
    config: LaserproofConfig,
}

impl Laserproof {
    /// Resolve `config.hash` in `registry`.
    pub fn new(registry: &Registry, config: LaserproofConfig) -> Result<Self> {
        Ok(Self {
            hasher: registry.hasher(config.hash)?,
            config,
        })
    }

    /// Use an already resolved hash function. `config.hash` is overwritten
    /// with its tag.
    pub fn with_hasher(hasher: Arc<dyn HashFunction>, mut config: LaserproofConfig) -> Self {
        config.hash = hasher.algorithm();
        Self { hasher, config }
    }

    pub fn config(&self) -> &LaserproofConfig {
        &self.config
    }

    /// Required proof seed length: the hash's full output.
    pub fn proof_len(&self) -> usize {
        self.hasher.properties().max_output
    }

    /// Append one work block to `work`.
    fn grow(&self, hashed_data: &[u8], work: &mut Vec<u8>) -> Result<()> {
        let lookback = work.len().min(self.config.lookback_len);
        let mut session = self.hasher.begin(Some(hashed_data))?;
        session.process(&work[work.len() - lookback..]);
        work.extend_from_slice(session.finish().as_bytes());
        Ok(())
    }

    /// Whether the buffer `work` is complete for `proof`.
    fn stops(&self, work: &[u8], proof: &[u8]) -> Result<bool> {
        let len = work.len();
        let backstride = self.config.backstride_len;
        let mut session = self.hasher.begin(Some(proof))?;

        if len >= backstride {
            session.process(&work[len - backstride..]);
        } else if len > 0 {
            // Window byte i is W[(len - backstride + i) mod len]. After the
            // leading partial copy the rest is whole copies of W.
            let start = (len - backstride % len) % len;
            session.process(&work[start..]);
            for _ in 0..(backstride - (len - start)) / len {
                session.process(work);
            }
        }

        let folded = session.finish().as_bytes().iter().fold(0u8, |acc, b| acc ^ b);
        tracing::trace!(len, folded, "laserproof stop check");
        Ok(folded < self.config.threshold)
    }

    fn check_cap(&self, len: usize) -> Result<()> {
        match self.config.max_work_len {
            Some(max) if len >= max => Err(CryptoError::OutputTooLarge {
                requested: len,
                max,
            }),
            _ => Ok(()),
        }
    }

    fn check_proof_len(&self, proof: &[u8]) -> Result<()> {
        let expected = self.proof_len();
        if proof.len() != expected {
            return Err(CryptoError::InvalidProofLength {
                expected,
                actual: proof.len(),
            });
        }
        Ok(())
    }

    fn try_difficulty(&self, hashed_data: &[u8], proof: &[u8]) -> Result<usize> {
        self.check_proof_len(proof)?;
        let mut work = Vec::new();
        loop {
            self.grow(hashed_data, &mut work)?;
            if self.stops(&work, proof)? {
                return Ok(work.len());
            }
            self.check_cap(work.len())?;
        }
    }

    /// Whether the first stop for `proof` lands past `threshold` bytes,
    /// which makes its difficulty exceed `threshold`. Grows the shared
    /// `work` buffer as needed.
    ///
    /// A seed that reaches the cap past `threshold` is rejected, since
    /// another seed may still stop in time. Reaching the cap earlier, or
    /// with a configuration that never stops, fails the whole search.
    fn accepts(
        &self,
        hashed_data: &[u8],
        work: &mut Vec<u8>,
        proof: &[u8],
        threshold: usize,
    ) -> Result<bool> {
        let block = self.proof_len();
        let mut end = 0;
        loop {
            end += block;
            while work.len() < end {
                self.grow(hashed_data, work)?;
            }
            if self.stops(&work[..end], proof)? {
                return Ok(end > threshold);
            }
            if let Err(e) = self.check_cap(end) {
                if end > threshold && self.config.threshold > 0 {
                    return Ok(false);
                }
                return Err(e);
            }
        }
    }

    /// The candidate proof seed for `nonce`.
    pub fn candidate(&self, hashed_data: &[u8], nonce: u64) -> Result<DynHash> {
        self.hasher.compute(&nonce.to_be_bytes(), Some(hashed_data))
    }
}

impl Default for Laserproof {
    fn default() -> Self {
        Self::with_hasher(
            Arc::new(hasher::<Blake2b256>()),
            LaserproofConfig::default(),
        )
    }
}

impl std::fmt::Debug for Laserproof {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Laserproof")
            .field("config", &self.config)
            .finish()
    }
}

impl PowVerifier for Laserproof {
    fn algorithm(&self) -> PowAlgorithm {
        PowAlgorithm::LASERPROOF
    }

    fn hash_algorithm(&self) -> HashAlgorithm {
        self.config.hash
    }

    fn difficulty(&self, hashed_data: &[u8], proof: &[u8]) -> Difficulty {
        match self.try_difficulty(hashed_data, proof) {
            Ok(len) => Difficulty::from(len),
            Err(e) => {
                tracing::warn!("Laserproof verification failed: {}", e);
                Difficulty::ZERO
            }
        }
    }
}

impl PowGenerator for Laserproof {
    fn work(&self, hashed_data: &[u8], threshold: usize) -> Result<ProofOfWork> {
        let mut work = Vec::new();
        let mut nonce = 0u64;
        loop {
            let proof = self.candidate(hashed_data, nonce)?;
            if self.accepts(hashed_data, &mut work, proof.as_bytes(), threshold)? {
                tracing::debug!(nonce, threshold, "laserproof candidate accepted");
                return Ok(ProofOfWork {
                    algorithm: PowAlgorithm::LASERPROOF,
                    hash: self.config.hash,
                    proof,
                    nonce,
                });
            }
            nonce += 1;
        }
    }
}

/// A proof seed together with the nonce that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofOfWork {
    pub algorithm: PowAlgorithm,
    pub hash: HashAlgorithm,
    pub proof: DynHash,
    pub nonce: u64,
}

impl ProofOfWork {
    /// Difficulty of this proof over `hashed_data`. Zero when `verifier`
    /// runs a different algorithm or hash.
    pub fn verify(&self, verifier: &dyn PowVerifier, hashed_data: &[u8]) -> Difficulty {
        if verifier.algorithm() != self.algorithm || verifier.hash_algorithm() != self.hash {
            tracing::warn!(
                "Proof of work for {}/{} checked with {}/{}",
                self.algorithm,
                self.hash,
                verifier.algorithm(),
                verifier.hash_algorithm()
            );
            return Difficulty::ZERO;
        }
        verifier.difficulty(hashed_data, self.proof.as_bytes())
    }

    /// Encode as a `[pow, hash][proof, nonce]` record, nonce big-endian.
    pub fn to_bytes(&self) -> Vec<u8> {
        let nonce = self.nonce.to_be_bytes();
        RecordWriter::new()
            .tag(self.algorithm)
            .tag(self.hash)
            .segment(self.proof.as_bytes())
            .segment(&nonce)
            .finish()
    }

    /// Decode a record. The hash must be registered; only Laserproof is a
    /// known proof-of-work algorithm.
    pub fn from_bytes(registry: &Registry, bytes: &[u8]) -> Result<Self> {
        let record = Record::decode(bytes)?;
        record.expect_shape(2, 2)?;
        let algorithm: PowAlgorithm = record.tag(0)?;
        let hash: HashAlgorithm = record.tag(1)?;

        if algorithm != PowAlgorithm::LASERPROOF {
            return Err(CryptoError::unsupported(algorithm));
        }
        registry.hasher(hash)?;

        let nonce: [u8; 8] = record.segment(1)?.try_into().map_err(|_| {
            CryptoError::InvalidEncoding("proof of work: nonce must be 8 bytes".into())
        })?;

        Ok(Self {
            algorithm,
            hash,
            proof: DynHash::from(record.segment(0)?),
            nonce: u64::from_be_bytes(nonce),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upsilon_core::{build_registry, HashFunctionExt, RegistryBuilder, Sha256};

    fn hashed_data() -> DynHash {
        Blake2b256.compute(b"Hello, world!", None).unwrap()
    }

    fn small() -> Laserproof {
        Laserproof::new(
            build_registry(),
            LaserproofConfig {
                lookback_len: 64,
                backstride_len: 96,
                threshold: 16,
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let lp = Laserproof::default();
        assert_eq!(lp.config(), &LaserproofConfig::default());
        assert_eq!(lp.proof_len(), 32);
        assert_eq!(lp.algorithm(), PowAlgorithm::LASERPROOF);
    }

    #[test]
    fn test_reference_difficulties() {
        let lp = Laserproof::default();
        let data = hashed_data();
        let p0 = lp.candidate(data.as_bytes(), 0).unwrap();
        assert_eq!(
            p0.to_hex(),
            "b4512361170a0efb5934fa2bf1d91f825c6609dc85257f155869707245475903"
        );
        assert_eq!(lp.difficulty(data.as_bytes(), p0.as_bytes()), Difficulty::from(32u64));

        let p4 = lp.candidate(data.as_bytes(), 4).unwrap();
        assert_eq!(lp.difficulty(data.as_bytes(), p4.as_bytes()), Difficulty::from(128u64));
    }

    #[test]
    fn test_reference_difficulty_past_backstride() {
        let lp = small();
        let data = hashed_data();
        let expected = [192u64, 224, 672, 320];
        for (nonce, want) in expected.into_iter().enumerate() {
            let proof = lp.candidate(data.as_bytes(), nonce as u64).unwrap();
            assert_eq!(
                lp.difficulty(data.as_bytes(), proof.as_bytes()),
                Difficulty::from(want),
                "nonce {nonce}"
            );
        }
    }

    #[test]
    fn test_work_reference() {
        let lp = Laserproof::default();
        let data = hashed_data();
        let pow = lp.work(data.as_bytes(), 64).unwrap();
        assert_eq!(pow.nonce, 4);
        assert_eq!(
            pow.proof.to_hex(),
            "562d51b9b504f41faf03d86a484d7b8b41602e4abb073cd37755ec533774cfcc"
        );
        assert_eq!(pow.verify(&lp, data.as_bytes()), Difficulty::from(128u64));
    }

    #[test]
    fn test_work_exceeds_threshold() {
        let lp = small();
        let data = Sha256.compute_fixed::<32>(b"some block", None).unwrap();
        for threshold in [0usize, 100, 400] {
            let pow = lp.work(data.as_bytes(), threshold).unwrap();
            assert!(pow.verify(&lp, data.as_bytes()) > Difficulty::from(threshold));
        }
    }

    #[test]
    fn test_capped_work_still_exceeds_threshold() {
        let lp = Laserproof::new(
            build_registry(),
            LaserproofConfig {
                lookback_len: 64,
                backstride_len: 96,
                threshold: 16,
                max_work_len: Some(256),
                ..Default::default()
            },
        )
        .unwrap();
        for i in 0u32..40 {
            let data = Sha256.compute_fixed::<32>(&i.to_be_bytes(), None).unwrap();
            let pow = lp.work(data.as_bytes(), 200).unwrap();
            let difficulty = pow.verify(&lp, data.as_bytes());
            assert!(difficulty > Difficulty::from(200usize), "data {i}: {difficulty}");
            assert!(difficulty <= Difficulty::from(256usize), "data {i}: {difficulty}");
        }
    }

    #[test]
    fn test_never_stopping_capped_work_fails() {
        let lp = Laserproof::new(
            build_registry(),
            LaserproofConfig {
                threshold: 0,
                max_work_len: Some(256),
                ..Default::default()
            },
        )
        .unwrap();
        let data = hashed_data();
        assert!(matches!(
            lp.work(data.as_bytes(), 64),
            Err(CryptoError::OutputTooLarge { max: 256, .. })
        ));
    }

    #[test]
    fn test_wrong_proof_length_is_zero() {
        let lp = Laserproof::default();
        let data = hashed_data();
        let proof = lp.candidate(data.as_bytes(), 4).unwrap();
        assert!(lp.difficulty(data.as_bytes(), &[]).is_zero());
        assert!(lp.difficulty(data.as_bytes(), &proof.as_bytes()[..31]).is_zero());
        assert_eq!(
            lp.check_proof_len(&[0u8; 31]),
            Err(CryptoError::InvalidProofLength {
                expected: 32,
                actual: 31
            })
        );
    }

    #[test]
    fn test_cap_reports_zero() {
        let lp = Laserproof::new(
            build_registry(),
            LaserproofConfig {
                threshold: 0,
                max_work_len: Some(256),
                ..Default::default()
            },
        )
        .unwrap();
        let data = hashed_data();
        let proof = lp.candidate(data.as_bytes(), 0).unwrap();
        assert!(lp.difficulty(data.as_bytes(), proof.as_bytes()).is_zero());
        assert!(matches!(
            lp.work(data.as_bytes(), 1024),
            Err(CryptoError::OutputTooLarge { max: 256, .. })
        ));
    }

    #[test]
    fn test_verify_rejects_other_hash() {
        let lp = Laserproof::default();
        let data = hashed_data();
        let mut pow = lp.work(data.as_bytes(), 0).unwrap();
        pow.hash = HashAlgorithm::SHA2_256;
        assert!(pow.verify(&lp, data.as_bytes()).is_zero());
    }

    #[test]
    fn test_other_hash_algorithm() {
        let lp = Laserproof::new(
            build_registry(),
            LaserproofConfig {
                hash: HashAlgorithm::SHA3_512,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(lp.proof_len(), 64);
        let pow = lp.work(b"data", 64).unwrap();
        assert_eq!(pow.hash, HashAlgorithm::SHA3_512);
        assert_eq!(pow.proof.len(), 64);
        assert!(pow.verify(&lp, b"data") > Difficulty::from(64u64));
    }

    #[test]
    fn test_unregistered_hash() {
        let registry = RegistryBuilder::new().build();
        assert!(matches!(
            Laserproof::new(&registry, LaserproofConfig::default()),
            Err(CryptoError::UnsupportedAlgorithm { .. })
        ));
    }

    #[test]
    fn test_record_roundtrip() {
        let lp = small();
        let pow = lp.work(b"payload", 200).unwrap();
        let restored = ProofOfWork::from_bytes(build_registry(), &pow.to_bytes()).unwrap();
        assert_eq!(restored, pow);
        assert_eq!(
            restored.verify(&lp, b"payload"),
            pow.verify(&lp, b"payload")
        );
    }

    #[test]
    fn test_record_rejects_unknown_pow_and_bad_nonce() {
        let proof = [0u8; 32];
        let bytes = RecordWriter::new()
            .tag(PowAlgorithm(0x0200))
            .tag(HashAlgorithm::BLAKE2B_256)
            .segment(&proof)
            .segment(&[0u8; 8])
            .finish();
        assert!(matches!(
            ProofOfWork::from_bytes(build_registry(), &bytes),
            Err(CryptoError::UnsupportedAlgorithm { .. })
        ));

        let bytes = RecordWriter::new()
            .tag(PowAlgorithm::LASERPROOF)
            .tag(HashAlgorithm::BLAKE2B_256)
            .segment(&proof)
            .segment(&[0u8; 7])
            .finish();
        assert!(matches!(
            ProofOfWork::from_bytes(build_registry(), &bytes),
            Err(CryptoError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_config_from_json() {
        let config: LaserproofConfig =
            serde_json::from_str(r#"{"hash": "SHA3-256", "threshold": 64}"#).unwrap();
        assert_eq!(config.hash, HashAlgorithm::SHA3_256);
        assert_eq!(config.threshold, 64);
        assert_eq!(config.lookback_len, 4096);
        assert_eq!(config.max_work_len, None);
    }
}
