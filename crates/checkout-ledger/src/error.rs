//! Error types for the Ledger.

use checkout_ledger_core::{ChainError, CoreError, RejectionReason};
use thiserror::Error;

/// Errors that can occur during Ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Block construction failed: the event did not encode, or the position overflowed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The candidate block failed validation against the chain head.
    #[error("block rejected: {0}")]
    Rejected(#[from] RejectionReason),

    /// Append was attempted on a chain with no tail. Indicates a construction bug.
    #[error("empty chain invariant violated")]
    EmptyChain,

    /// A full-chain audit found an inconsistent block.
    #[error("chain corrupted at index {position}: {reason}")]
    Corrupted {
        position: u64,
        reason: RejectionReason,
    },

    /// A thread panicked while holding the chain lock.
    #[error("chain lock poisoned")]
    LockPoisoned,
}

impl LedgerError {
    /// Whether the caller supplied a block that does not fit the chain,
    /// as opposed to an internal inconsistency.
    pub fn is_rejection(&self) -> bool {
        matches!(self, LedgerError::Rejected(_))
    }
}

impl From<ChainError> for LedgerError {
    fn from(e: ChainError) -> Self {
        match e {
            ChainError::Core(e) => LedgerError::Core(e),
            ChainError::Rejected(reason) => LedgerError::Rejected(reason),
            ChainError::EmptyChain => LedgerError::EmptyChain,
            ChainError::Corrupted { position, reason } => {
                LedgerError::Corrupted { position, reason }
            }
        }
    }
}

/// Result type for Ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
