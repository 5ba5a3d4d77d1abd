//! Chain: an ordered, append-only sequence of blocks.
//!
//! Index 0 is always the genesis block and the last element is the tail.
//! Storage is private: blocks enter only through initialization or the
//! validated append path, and leave only as shared borrows or owned copies.

use crate::block::Block;
use crate::clock::Clock;
use crate::error::{ChainError, CoreError, Result};
use crate::event::CheckoutEvent;
use crate::validation::{validate_genesis, validate_link};

/// An in-memory hash chain of checkout blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Create a chain holding a freshly built genesis block.
    ///
    /// Genesis is trusted by construction and is not validated.
    pub fn initialize(clock: &dyn Clock) -> std::result::Result<Self, CoreError> {
        Ok(Self {
            blocks: vec![Block::genesis(clock)?],
        })
    }

    /// Create a chain from an externally supplied genesis block.
    pub fn with_genesis(genesis: Block) -> Result<Self> {
        validate_genesis(&genesis).map_err(|reason| ChainError::Corrupted {
            position: 0,
            reason,
        })?;
        Ok(Self {
            blocks: vec![genesis],
        })
    }

    /// Rebuild a chain from an exported block list, auditing every link.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self> {
        let chain = Self { blocks };
        chain.verify()?;
        Ok(chain)
    }

    /// Seal `event` into a block linked to the current tail and append it.
    ///
    /// On any error the chain is left untouched.
    pub fn append(&mut self, event: CheckoutEvent, clock: &dyn Clock) -> Result<&Block> {
        let tail = self.tail().ok_or(ChainError::EmptyChain)?;
        let candidate = Block::create(tail, event, clock)?;
        self.append_block(candidate)
    }

    /// Admit a pre-built candidate block if it descends from the tail.
    pub fn append_block(&mut self, candidate: Block) -> Result<&Block> {
        let tail = self.tail().ok_or(ChainError::EmptyChain)?;
        validate_link(&candidate, tail)?;

        self.blocks.push(candidate);
        self.tail().ok_or(ChainError::EmptyChain)
    }

    /// Walk the whole chain and check every block against its predecessor.
    ///
    /// Errors carry the index of the first offending block.
    pub fn verify(&self) -> Result<()> {
        let genesis = self.blocks.first().ok_or(ChainError::EmptyChain)?;
        validate_genesis(genesis).map_err(|reason| ChainError::Corrupted {
            position: 0,
            reason,
        })?;

        for (index, pair) in self.blocks.windows(2).enumerate() {
            validate_link(&pair[1], &pair[0]).map_err(|reason| ChainError::Corrupted {
                position: index as u64 + 1,
                reason,
            })?;
        }

        Ok(())
    }

    /// The most recently appended block.
    pub fn tail(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// The genesis block.
    pub fn genesis(&self) -> Option<&Block> {
        self.blocks.first()
    }

    /// The block at `position`, if present.
    pub fn get(&self, position: u64) -> Option<&Block> {
        usize::try_from(position)
            .ok()
            .and_then(|index| self.blocks.get(index))
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Read-only view of the stored blocks.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// An owned copy of every block, for export.
    pub fn snapshot(&self) -> Vec<Block> {
        self.blocks.clone()
    }
}
