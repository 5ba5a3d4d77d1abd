//! # Checkout Ledger Testkit
//!
//! Testing utilities for the checkout ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known blocks with expected hashes for cross-implementation checks
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Deterministic clocks and chain builders
//!
//! ## Golden Vectors
//!
//! ```rust
//! use checkout_ledger_testkit::vectors::{golden_chain, verify_all_vectors};
//!
//! let chain = golden_chain().unwrap();
//! assert!(chain.verify().is_ok());
//!
//! for (name, ok, hash) in verify_all_vectors() {
//!     assert!(ok, "{name}: {hash}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use checkout_ledger_testkit::generators::{block_from_params, BlockParams};
//!
//! proptest! {
//!     #[test]
//!     fn hash_is_deterministic(params: BlockParams) {
//!         let b1 = block_from_params(&params);
//!         let b2 = block_from_params(&params);
//!         prop_assert_eq!(b1.hash, b2.hash);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use checkout_ledger_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let chain = fixture.chain_with(3);
//! assert_eq!(chain.len(), 4);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{sample_event, StepClock, TestFixture};
pub use generators::{block_from_params, BlockParams};
pub use vectors::{all_vectors, golden_chain, verify_all_vectors, GoldenVector};
