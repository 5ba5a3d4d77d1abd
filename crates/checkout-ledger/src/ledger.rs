//! The Ledger: a thread-safe owning handle around the checkout chain.
//!
//! All writers funnel through a single write lock held for the whole
//! tail-read / build / validate / push sequence. Readers share a read lock and
//! receive owned copies, so they see either the chain before an append or
//! after it, never in between.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use checkout_ledger_core::{Block, Chain, CheckoutEvent, Clock, SystemClock};
use tracing::{debug, info, warn};

use crate::error::{LedgerError, Result};

/// Configuration for the Ledger.
#[derive(Debug, Clone, Default)]
pub struct LedgerConfig {
    /// Re-verify the whole chain after every accepted submit.
    ///
    /// A debugging safeguard: every append is already validated against the
    /// head, so this only trips if that invariant is broken. Costs a full
    /// chain walk per submit.
    pub audit_on_submit: bool,
    /// Fixed genesis timestamp, so that independent ledgers share a genesis hash.
    pub genesis_timestamp: Option<String>,
}

/// The main Ledger struct.
///
/// Exposes the two operations the request layer needs:
/// - [`Ledger::submit`] to seal a checkout into the chain
/// - [`Ledger::list`] to read the chain back for serialization
pub struct Ledger {
    chain: RwLock<Chain>,
    clock: Arc<dyn Clock>,
    config: LedgerConfig,
}

impl Ledger {
    /// Create a ledger stamped by the system clock.
    pub fn new(config: LedgerConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a ledger with a custom timestamp source.
    pub fn with_clock(config: LedgerConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let chain = match &config.genesis_timestamp {
            Some(ts) => Chain::with_genesis(Block::genesis_at(ts.as_str())?)?,
            None => Chain::initialize(clock.as_ref())?,
        };

        if let Some(genesis) = chain.genesis() {
            info!(hash = %genesis.hash, timestamp = %genesis.timestamp, "initialized checkout ledger");
        }

        Ok(Self {
            chain: RwLock::new(chain),
            clock,
            config,
        })
    }

    /// Restore a ledger from a previously exported block list.
    ///
    /// The blocks are audited before the ledger accepts them.
    pub fn from_snapshot(
        config: LedgerConfig,
        clock: Arc<dyn Clock>,
        blocks: Vec<Block>,
    ) -> Result<Self> {
        let chain = Chain::from_blocks(blocks).map_err(|e| {
            warn!(error = %e, "refusing to restore corrupted snapshot");
            LedgerError::from(e)
        })?;

        info!(len = chain.len(), "restored checkout ledger from snapshot");

        Ok(Self {
            chain: RwLock::new(chain),
            clock,
            config,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Write Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Seal a checkout event into a new block and append it.
    ///
    /// Returns a copy of the accepted block.
    pub fn submit(&self, event: CheckoutEvent) -> Result<Block> {
        let mut chain = self.write()?;
        let result = chain.append(event, self.clock.as_ref()).map(Block::clone);
        self.finish_submit(&chain, result)
    }

    /// Admit a pre-built block if it descends from the current head.
    pub fn submit_block(&self, candidate: Block) -> Result<Block> {
        let mut chain = self.write()?;
        let result = chain.append_block(candidate).map(Block::clone);
        self.finish_submit(&chain, result)
    }

    fn finish_submit(
        &self,
        chain: &Chain,
        result: checkout_ledger_core::error::Result<Block>,
    ) -> Result<Block> {
        match result {
            Ok(block) => {
                debug!(position = block.position, hash = %block.hash, "appended block");
                if self.config.audit_on_submit {
                    audit(chain)?;
                }
                Ok(block)
            }
            Err(e) => {
                warn!(error = %e, "block not appended");
                Err(e.into())
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// An owned copy of every block, genesis first.
    pub fn list(&self) -> Result<Vec<Block>> {
        Ok(self.read()?.snapshot())
    }

    /// A copy of the current chain head.
    pub fn head(&self) -> Result<Block> {
        self.read()?.tail().cloned().ok_or(LedgerError::EmptyChain)
    }

    /// A copy of the block at `position`, if present.
    pub fn get(&self, position: u64) -> Result<Option<Block>> {
        Ok(self.read()?.get(position).cloned())
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Audit the whole chain.
    pub fn verify(&self) -> Result<()> {
        let chain = self.read()?;
        audit(&chain)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Chain>> {
        self.chain.read().map_err(|_| LedgerError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Chain>> {
        self.chain.write().map_err(|_| LedgerError::LockPoisoned)
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("chain", &self.chain)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn audit(chain: &Chain) -> Result<()> {
    chain.verify().map_err(|e| {
        warn!(error = %e, "chain audit failed");
        LedgerError::from(e)
    })
}
