//! # Upsilon Proof of Work
//!
//! The proof-of-work capability and its one algorithm, Laserproof.
//!
//! ## Overview
//!
//! A proof binds to already-hashed data. Verifying it replays a memory-hard
//! construction whose length is the proof's [`Difficulty`]; generating one
//! searches nonces until a candidate's difficulty exceeds a threshold.
//!
//! Verification is total: an invalid, truncated or mismatched proof has
//! difficulty zero and never an error.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use upsilon_pow::{Difficulty, Laserproof, PowGenerator};
//!
//! let laserproof = Laserproof::default();
//! let pow = laserproof.work(b"hashed block header", 256).unwrap();
//! assert!(pow.verify(&laserproof, b"hashed block header") > Difficulty::from(256u64));
//! ```

pub mod difficulty;
pub mod laserproof;

pub use difficulty::Difficulty;
pub use laserproof::{Laserproof, LaserproofConfig, PowGenerator, PowVerifier, ProofOfWork};
