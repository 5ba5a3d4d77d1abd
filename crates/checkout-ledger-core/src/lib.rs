//! # Checkout Ledger Core
//!
//! Pure primitives for the checkout ledger: events, blocks, hashing and the
//! chain validation rule.
//!
//! This crate contains no I/O, no locking and no logging. It is pure
//! computation over a hash-linked list of blocks.
//!
//! ## Key Types
//!
//! - [`CheckoutEvent`] - The payload sealed into each block
//! - [`Block`] - One event bound to its position, timestamp and predecessor
//! - [`BlockHash`] - SHA-256 digest identifying a block
//! - [`Link`] - Genesis or a link to the predecessor's hash
//! - [`Chain`] - Ordered, append-only sequence of blocks
//!
//! ## Hashing
//!
//! `hash = sha256(decimal(position) || timestamp || canonical(data) || prev_hash_hex)`
//!
//! Event data is encoded with deterministic CBOR. See [`canonical`].

pub mod block;
pub mod canonical;
pub mod chain;
pub mod clock;
pub mod crypto;
pub mod error;
pub mod event;
pub mod validation;

pub use block::{compute_hash, Block, Link};
pub use canonical::{canonical_bytes, canonical_event_bytes, digest_input};
pub use chain::Chain;
pub use clock::{Clock, FixedClock, SystemClock};
pub use crypto::BlockHash;
pub use error::{ChainError, CoreError, RejectionReason};
pub use event::CheckoutEvent;
pub use validation::{is_valid, validate_genesis, validate_hash, validate_link};
