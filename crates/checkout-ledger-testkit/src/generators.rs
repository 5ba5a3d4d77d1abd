//! Proptest generators for property-based testing.

use proptest::prelude::*;

use checkout_ledger_core::{Block, BlockHash, CheckoutEvent, Link};

/// Generate a random BlockHash.
pub fn block_hash() -> impl Strategy<Value = BlockHash> {
    any::<[u8; 32]>().prop_map(BlockHash::from_bytes)
}

/// Generate a Link, genesis roughly one time in eight.
pub fn link() -> impl Strategy<Value = Link> {
    prop_oneof![
        1 => Just(Link::Genesis),
        7 => block_hash().prop_map(Link::Linked),
    ]
}

/// Generate an identifier-like string (may be empty, may be non-ASCII).
pub fn field() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9-]{0,24}".prop_map(String::from),
        any::<String>(),
    ]
}

/// Generate an RFC 3339 timestamp string.
pub fn timestamp() -> impl Strategy<Value = String> {
    (2000u32..2100, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60).prop_map(
        |(y, mo, d, h, mi, s)| format!("{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}Z"),
    )
}

/// Generate an arbitrary (non-genesis) checkout event.
pub fn checkout_event() -> impl Strategy<Value = CheckoutEvent> {
    (field(), field(), field()).prop_map(|(book_id, user, date)| CheckoutEvent::new(book_id, user, date))
}

/// Parameters for sealing a block.
#[derive(Debug, Clone)]
pub struct BlockParams {
    pub position: u64,
    pub timestamp: String,
    pub data: CheckoutEvent,
    pub link: Link,
}

impl Arbitrary for BlockParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (any::<u64>(), timestamp(), checkout_event(), link())
            .prop_map(|(position, timestamp, data, link)| BlockParams {
                position,
                timestamp,
                data,
                link,
            })
            .boxed()
    }
}

/// Seal a block from parameters.
pub fn block_from_params(params: &BlockParams) -> Block {
    Block::seal(
        params.position,
        params.timestamp.clone(),
        params.data.clone(),
        params.link,
    )
    .expect("string-only events always encode")
}
