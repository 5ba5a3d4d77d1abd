//! Block: one checkout event sealed under a SHA-256 digest.
//!
//! A block binds its position, timestamp, event and predecessor digest into
//! its own `hash`. Only [`Block::seal`] assigns that field; every later check
//! recomputes into a local and compares.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::canonical::{canonical_event_bytes, digest_input};
use crate::clock::Clock;
use crate::crypto::BlockHash;
use crate::error::CoreError;
use crate::event::CheckoutEvent;

/// What a block descends from.
///
/// Serialized as the predecessor's hex digest, or the empty string for genesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Link {
    /// First block of a chain. No predecessor to check against.
    Genesis,
    /// Any later block, carrying the hash of its predecessor.
    Linked(BlockHash),
}

impl Link {
    /// The predecessor hash, if any.
    pub fn prev_hash(&self) -> Option<&BlockHash> {
        match self {
            Link::Genesis => None,
            Link::Linked(hash) => Some(hash),
        }
    }

    /// The predecessor hash as it enters the digest input.
    pub fn prev_hash_hex(&self) -> String {
        self.prev_hash().map(BlockHash::to_hex).unwrap_or_default()
    }

    pub fn is_genesis(&self) -> bool {
        matches!(self, Link::Genesis)
    }
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.prev_hash_hex())
    }
}

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Ok(Link::Genesis);
        }
        BlockHash::from_hex(&s)
            .map(Link::Linked)
            .map_err(serde::de::Error::custom)
    }
}

/// A sealed block.
///
/// Fields are public so callers can inspect and hand-craft candidates, but a
/// block stored inside a [`Chain`](crate::Chain) is never handed out mutably.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Zero-based position in the chain.
    pub position: u64,
    /// The embedded checkout event.
    pub data: CheckoutEvent,
    /// Creation time, hashed verbatim.
    pub timestamp: String,
    /// Predecessor link.
    #[serde(rename = "prev_hash")]
    pub link: Link,
    /// Digest assigned at sealing time.
    pub hash: BlockHash,
}

impl Block {
    /// Build a block from its parts and assign its hash.
    ///
    /// This is the only place a block's `hash` is written.
    pub fn seal(
        position: u64,
        timestamp: impl Into<String>,
        data: CheckoutEvent,
        link: Link,
    ) -> Result<Self, CoreError> {
        let timestamp = timestamp.into();
        let hash = compute_hash(position, &timestamp, &data, &link)?;
        Ok(Self {
            position,
            data,
            timestamp,
            link,
            hash,
        })
    }

    /// Build the genesis block stamped with the clock's current time.
    pub fn genesis(clock: &dyn Clock) -> Result<Self, CoreError> {
        Self::genesis_at(clock.now())
    }

    /// Build the genesis block with a fixed timestamp.
    pub fn genesis_at(timestamp: impl Into<String>) -> Result<Self, CoreError> {
        Self::seal(0, timestamp, CheckoutEvent::genesis(), Link::Genesis)
    }

    /// Build the successor of `prev` carrying `event`.
    pub fn create(prev: &Block, event: CheckoutEvent, clock: &dyn Clock) -> Result<Self, CoreError> {
        Self::create_at(prev, event, clock.now())
    }

    /// Build the successor of `prev` with a fixed timestamp.
    pub fn create_at(
        prev: &Block,
        event: CheckoutEvent,
        timestamp: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let position = prev
            .position
            .checked_add(1)
            .ok_or(CoreError::PositionOverflow(prev.position))?;
        Self::seal(position, timestamp, event, Link::Linked(prev.hash))
    }

    /// Recompute the digest from the current fields. Does not touch `self.hash`.
    pub fn compute_hash(&self) -> Result<BlockHash, CoreError> {
        compute_hash(self.position, &self.timestamp, &self.data, &self.link)
    }

    /// Whether the stored hash matches the block's current contents.
    pub fn has_valid_hash(&self) -> bool {
        matches!(self.compute_hash(), Ok(hash) if hash == self.hash)
    }

    /// The predecessor hash, `None` for genesis.
    pub fn prev_hash(&self) -> Option<&BlockHash> {
        self.link.prev_hash()
    }

    pub fn is_genesis(&self) -> bool {
        self.link.is_genesis()
    }
}

/// The block digest function.
///
/// `sha256(decimal(position) || timestamp || canonical(data) || prev_hash_hex)`
pub fn compute_hash(
    position: u64,
    timestamp: &str,
    data: &CheckoutEvent,
    link: &Link,
) -> Result<BlockHash, CoreError> {
    let data = canonical_event_bytes(data)?;
    let input = digest_input(position, timestamp, &data, link.prev_hash());
    Ok(BlockHash::hash(&input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use proptest::prelude::*;

    const TS: &str = "2024-01-01T00:00:00Z";

    #[test]
    fn test_genesis_shape() {
        let genesis = Block::genesis_at(TS).unwrap();
        assert_eq!(genesis.position, 0);
        assert!(genesis.is_genesis());
        assert!(genesis.prev_hash().is_none());
        assert_eq!(genesis.link.prev_hash_hex(), "");
        assert!(genesis.data.is_genesis);
        assert!(genesis.has_valid_hash());
    }

    #[test]
    fn test_create_links_to_predecessor() {
        let clock = FixedClock::new(TS);
        let genesis = Block::genesis(&clock).unwrap();
        let block = Block::create(&genesis, CheckoutEvent::new("b1", "u1", "2024-01-01"), &clock)
            .unwrap();

        assert_eq!(block.position, 1);
        assert_eq!(block.timestamp, TS);
        assert_eq!(block.prev_hash(), Some(&genesis.hash));
        assert!(block.has_valid_hash());
        assert_ne!(block.hash, genesis.hash);
    }

    #[test]
    fn test_hash_is_deterministic() {
        let event = CheckoutEvent::new("b1", "u1", "2024-01-01");
        let link = Link::Linked(BlockHash::from_bytes([7; 32]));
        let h1 = compute_hash(3, TS, &event, &link).unwrap();
        let h2 = compute_hash(3, TS, &event, &link).unwrap();
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_each_field_feeds_the_hash() {
        let event = CheckoutEvent::new("b1", "u1", "2024-01-01");
        let link = Link::Linked(BlockHash::from_bytes([7; 32]));
        let base = compute_hash(3, TS, &event, &link).unwrap();

        assert_ne!(base, compute_hash(4, TS, &event, &link).unwrap());
        assert_ne!(base, compute_hash(3, "2024-01-02T00:00:00Z", &event, &link).unwrap());
        assert_ne!(
            base,
            compute_hash(3, TS, &CheckoutEvent::new("b2", "u1", "2024-01-01"), &link).unwrap()
        );
        assert_ne!(
            base,
            compute_hash(3, TS, &event, &Link::Linked(BlockHash::from_bytes([8; 32]))).unwrap()
        );
        assert_ne!(base, compute_hash(3, TS, &event, &Link::Genesis).unwrap());
    }

    #[test]
    fn test_tampered_data_fails_validation() {
        let genesis = Block::genesis_at(TS).unwrap();
        let mut block =
            Block::create_at(&genesis, CheckoutEvent::new("b1", "u1", "2024-01-01"), TS).unwrap();
        let stored = block.hash;

        block.data.user = "mallory".into();

        assert!(!block.has_valid_hash());
        // Recomputation must not repair the stored hash.
        assert_eq!(block.hash, stored);
        assert!(!block.has_valid_hash());
    }

    #[test]
    fn test_position_overflow() {
        let mut prev = Block::genesis_at(TS).unwrap();
        prev.position = u64::MAX;
        let result = Block::create_at(&prev, CheckoutEvent::default(), TS);
        assert_eq!(result, Err(CoreError::PositionOverflow(u64::MAX)));
    }

    #[test]
    fn test_serde_shape() {
        let genesis = Block::genesis_at(TS).unwrap();
        let block =
            Block::create_at(&genesis, CheckoutEvent::new("b1", "u1", "2024-01-01"), TS).unwrap();

        let json = serde_json::to_value(&genesis).unwrap();
        assert_eq!(json["prev_hash"], "");
        assert_eq!(json["position"], 0);

        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["prev_hash"], genesis.hash.to_hex());
        assert_eq!(json["hash"], block.hash.to_hex());
        assert_eq!(json["data"]["book_id"], "b1");

        let back: Block = serde_json::from_value(json).unwrap();
        assert_eq!(back, block);
        assert!(back.has_valid_hash());
    }

    fn any_event() -> impl Strategy<Value = CheckoutEvent> {
        (any::<String>(), any::<String>(), any::<String>())
            .prop_map(|(book_id, user, date)| CheckoutEvent::new(book_id, user, date))
    }

    fn any_link() -> impl Strategy<Value = Link> {
        prop_oneof![
            Just(Link::Genesis),
            any::<[u8; 32]>().prop_map(|b| Link::Linked(BlockHash::from_bytes(b))),
        ]
    }

    proptest! {
        #[test]
        fn test_compute_hash_deterministic(
            position: u64,
            timestamp: String,
            event in any_event(),
            link in any_link(),
        ) {
            let h1 = compute_hash(position, &timestamp, &event, &link).unwrap();
            let h2 = compute_hash(position, &timestamp, &event.clone(), &link).unwrap();
            prop_assert_eq!(h1, h2);

            let block = Block::seal(position, timestamp, event, link).unwrap();
            prop_assert_eq!(block.hash, h1);
            prop_assert!(block.has_valid_hash());
        }

        #[test]
        fn test_sealed_successor_links_back(event in any_event(), timestamp: String) {
            let genesis = Block::genesis_at(TS).unwrap();
            let next = Block::create_at(&genesis, event, timestamp).unwrap();
            prop_assert_eq!(next.position, 1);
            prop_assert_eq!(next.prev_hash(), Some(&genesis.hash));
            prop_assert!(next.has_valid_hash());
        }
    }
}
