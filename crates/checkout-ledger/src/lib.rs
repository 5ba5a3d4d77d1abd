//! # Checkout Ledger
//!
//! An append-only, tamper-evident ledger of book checkouts.
//!
//! ## Overview
//!
//! Every checkout is sealed into a block whose SHA-256 hash binds its
//! position, timestamp, event data and the hash of the block before it. Any
//! retroactive edit to history shows up as a hash mismatch.
//!
//! - **Block**: Immutable once sealed. Genesis is its own variant.
//! - **Chain**: Grows only by appending a block that descends from the head.
//! - **Ledger**: Thread-safe owner of the chain. One writer at a time,
//!   readers receive copies.
//!
//! ## Usage
//!
//! ```rust
//! use checkout_ledger::{CheckoutEvent, Ledger, LedgerConfig};
//!
//! let ledger = Ledger::new(LedgerConfig::default()).unwrap();
//!
//! let block = ledger
//!     .submit(CheckoutEvent::new("b1", "u1", "2024-01-01"))
//!     .unwrap();
//! assert_eq!(block.position, 1);
//!
//! let blocks = ledger.list().unwrap();
//! assert_eq!(blocks.len(), 2);
//! ```
//!
//! ## Re-exports
//!
//! - `checkout_ledger::core` - Core primitives (Block, Chain, hashing)

pub mod error;
pub mod ledger;

pub use checkout_ledger_core as core;

pub use error::{LedgerError, Result};
pub use ledger::{Ledger, LedgerConfig};

pub use checkout_ledger_core::{
    Block, BlockHash, Chain, CheckoutEvent, Clock, FixedClock, Link, RejectionReason, SystemClock,
};
