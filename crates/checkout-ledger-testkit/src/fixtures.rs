//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use checkout_ledger_core::{Block, Chain, CheckoutEvent, Clock};

/// 2024-01-01T00:00:00Z
pub const DEFAULT_EPOCH: i64 = 1_704_067_200;

/// A clock that advances one second per reading.
///
/// Gives every block a distinct, reproducible timestamp.
#[derive(Debug)]
pub struct StepClock {
    next: AtomicI64,
}

impl StepClock {
    /// Start at 2024-01-01T00:00:00Z.
    pub fn new() -> Self {
        Self::starting_at(DEFAULT_EPOCH)
    }

    /// Start at the given Unix time in seconds.
    pub fn starting_at(unix_secs: i64) -> Self {
        Self {
            next: AtomicI64::new(unix_secs),
        }
    }
}

impl Default for StepClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StepClock {
    fn now(&self) -> String {
        let secs = self.next.fetch_add(1, Ordering::SeqCst);
        DateTime::<Utc>::from_timestamp(secs, 0)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| secs.to_string())
    }
}

/// A numbered checkout event: book `b{n}`, user `u{n}`.
pub fn sample_event(n: u64) -> CheckoutEvent {
    CheckoutEvent::new(format!("b{n}"), format!("u{n}"), "2024-01-01")
}

/// A test fixture with a deterministic clock.
pub struct TestFixture {
    pub clock: Arc<StepClock>,
}

impl TestFixture {
    /// Create a fixture whose clock starts at 2024-01-01T00:00:00Z.
    pub fn new() -> Self {
        Self {
            clock: Arc::new(StepClock::new()),
        }
    }

    /// The clock as a shareable trait object, for handing to a ledger.
    pub fn clock_handle(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    /// A chain with genesis plus `events` sample checkouts.
    pub fn chain_with(&self, events: u64) -> Chain {
        let mut chain =
            Chain::initialize(self.clock.as_ref()).expect("genesis encoding cannot fail");
        for n in 1..=events {
            chain
                .append(sample_event(n), self.clock.as_ref())
                .expect("sample events always link to the tail");
        }
        chain
    }

    /// Build the next block after `prev`, stamped by the fixture clock.
    pub fn successor(&self, prev: &Block, event: CheckoutEvent) -> Block {
        Block::create(prev, event, self.clock.as_ref()).expect("sample events encode")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_clock_advances() {
        let clock = StepClock::new();
        assert_eq!(clock.now(), "2024-01-01T00:00:00Z");
        assert_eq!(clock.now(), "2024-01-01T00:00:01Z");
    }

    #[test]
    fn test_fixture_chain() {
        let fixture = TestFixture::new();
        let chain = fixture.chain_with(3);

        assert_eq!(chain.len(), 4);
        assert!(chain.verify().is_ok());
        assert_eq!(chain.tail().unwrap().data, sample_event(3));
    }

    #[test]
    fn test_successor_links() {
        let fixture = TestFixture::new();
        let chain = fixture.chain_with(1);
        let tail = chain.tail().unwrap();

        let next = fixture.successor(tail, sample_event(2));
        assert_eq!(next.position, 2);
        assert_eq!(next.prev_hash(), Some(&tail.hash));
    }
}
