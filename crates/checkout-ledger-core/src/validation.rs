//! Block validation: hash recomputation and linkage checks.

use crate::block::{Block, Link};
use crate::error::RejectionReason;
use crate::event::CheckoutEvent;

/// Recompute a block's digest and compare it to the stored one.
///
/// Pure: the block is borrowed immutably and never re-hashed in place.
pub fn validate_hash(block: &Block) -> bool {
    block.has_valid_hash()
}

/// Check that `candidate` may follow `tail`.
///
/// Checked in order, first failure wins:
/// 1. `candidate.prev_hash == tail.hash`
/// 2. the candidate's stored hash matches its contents
/// 3. `candidate.position == tail.position + 1`
/// 4. the candidate does not carry the genesis event
pub fn validate_link(candidate: &Block, tail: &Block) -> Result<(), RejectionReason> {
    if candidate.prev_hash() != Some(&tail.hash) {
        return Err(RejectionReason::PrevHashMismatch {
            expected: Some(tail.hash),
            got: candidate.prev_hash().copied(),
        });
    }

    if !validate_hash(candidate) {
        return Err(RejectionReason::HashTamperDetected {
            position: candidate.position,
        });
    }

    match tail.position.checked_add(1) {
        Some(expected) if expected == candidate.position => {}
        expected => {
            return Err(RejectionReason::PositionGap {
                expected: expected.unwrap_or(u64::MAX),
                got: candidate.position,
            })
        }
    }

    if candidate.data.is_genesis {
        return Err(RejectionReason::GenesisEventMismatch {
            position: candidate.position,
        });
    }

    Ok(())
}

/// Boolean form of [`validate_link`].
pub fn is_valid(candidate: &Block, tail: &Block) -> bool {
    validate_link(candidate, tail).is_ok()
}

/// Check a block claimed to be a genesis block.
///
/// Genesis is trusted when built locally; this is for blocks that arrive from
/// elsewhere (an imported snapshot, a pinned genesis).
pub fn validate_genesis(block: &Block) -> Result<(), RejectionReason> {
    if let Link::Linked(hash) = block.link {
        return Err(RejectionReason::PrevHashMismatch {
            expected: None,
            got: Some(hash),
        });
    }

    if !validate_hash(block) {
        return Err(RejectionReason::HashTamperDetected {
            position: block.position,
        });
    }

    if block.position != 0 {
        return Err(RejectionReason::PositionGap {
            expected: 0,
            got: block.position,
        });
    }

    if block.data != CheckoutEvent::genesis() {
        return Err(RejectionReason::GenesisEventMismatch { position: 0 });
    }

    Ok(())
}
