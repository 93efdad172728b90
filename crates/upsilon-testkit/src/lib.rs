//! # Upsilon Testkit
//!
//! Testing utilities for Upsilon.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: known answers computed with independent implementations
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: deterministic identities and agreers
//!
//! ## Golden Vectors
//!
//! ```rust
//! use upsilon_core::build_registry;
//! use upsilon_testkit::vectors::verify_all_vectors;
//!
//! for (name, ok, produced) in verify_all_vectors(build_registry()) {
//!     assert!(ok, "{}: {}", name, produced);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use upsilon_testkit::generators::{hash_algorithm, payload};
//!
//! proptest! {
//!     #[test]
//!     fn hashing_is_deterministic(alg in hash_algorithm(), input in payload(256)) {
//!         let hasher = upsilon_core::build_registry().hasher(alg).unwrap();
//!         prop_assert_eq!(hasher.compute(&input, None), hasher.compute(&input, None));
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{agreer_from_seed, identity_from_seed, multi_party_fixtures, Party};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVectors};
