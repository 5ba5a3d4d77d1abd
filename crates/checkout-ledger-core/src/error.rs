//! Error types for the checkout ledger core.

use thiserror::Error;

use crate::crypto::BlockHash;

/// Core errors that can occur while building or hashing blocks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The event could not be lowered to its canonical encoding.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A hex digest could not be parsed.
    #[error("invalid block hash: {0}")]
    InvalidHash(String),

    /// The predecessor already sits at the largest representable position.
    #[error("position overflow after {0}")]
    PositionOverflow(u64),
}

/// Why a candidate block was refused by the chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("prev_hash mismatch: expected {expected:?}, got {got:?}")]
    PrevHashMismatch {
        expected: Option<BlockHash>,
        got: Option<BlockHash>,
    },

    #[error("stored hash does not match contents of block at position {position}")]
    HashTamperDetected { position: u64 },

    #[error("invalid position: expected {expected}, got {got}")]
    PositionGap { expected: u64, got: u64 },

    /// Genesis without the synthetic genesis event, or that event anywhere else.
    #[error("block at position {position} carries the wrong kind of event")]
    GenesisEventMismatch { position: u64 },
}

/// Errors returned by [`Chain`](crate::Chain) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("block rejected: {0}")]
    Rejected(#[from] RejectionReason),

    /// There is no tail to append to. Only reachable through a construction bug.
    #[error("chain has no tail block")]
    EmptyChain,

    #[error("chain corrupted at index {position}: {reason}")]
    Corrupted {
        position: u64,
        reason: RejectionReason,
    },
}

/// Result type for chain operations.
pub type Result<T> = std::result::Result<T, ChainError>;
