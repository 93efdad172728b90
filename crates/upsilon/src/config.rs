//! Default algorithm selection.

use serde::{Deserialize, Serialize};

use upsilon_core::{
    AgreementAlgorithm, HashAlgorithm, KdfAlgorithm, SignatureAlgorithm, SymmetricAlgorithm,
};
use upsilon_pow::LaserproofConfig;

use crate::error::Result;

/// The algorithms an [`Upsilon`](crate::Upsilon) instance uses when a caller
/// does not name one.
///
/// Tags may be given by name (`"BLAKE2b-256"`) or number (`1056`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpsilonConfig {
    /// Message and content hash.
    pub hash: HashAlgorithm,
    pub signature: SignatureAlgorithm,
    pub agreement: AgreementAlgorithm,
    /// KDF applied to raw agreement output.
    pub kdf: KdfAlgorithm,
    pub symmetric: SymmetricAlgorithm,
    pub laserproof: LaserproofConfig,
}

impl Default for UpsilonConfig {
    fn default() -> Self {
        Self {
            hash: HashAlgorithm::BLAKE2B_256,
            signature: SignatureAlgorithm::CURVE25519,
            agreement: AgreementAlgorithm::CURVE25519,
            kdf: KdfAlgorithm::SHAKE256,
            symmetric: SymmetricAlgorithm::XCHACHA20,
            laserproof: LaserproofConfig::default(),
        }
    }
}

impl UpsilonConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
