//! Checkout events: the payload sealed into each block.

use serde::{Deserialize, Serialize};

/// A single book checkout.
///
/// The serde field names are part of the canonical encoding and therefore of
/// every block hash. Renaming a field changes every digest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckoutEvent {
    /// Identifier of the book being checked out.
    pub book_id: String,
    /// Identifier of the borrowing user.
    pub user: String,
    /// Date of checkout, as supplied by the caller.
    pub checkout_date: String,
    /// Set only on the synthetic event carried by the genesis block.
    #[serde(default)]
    pub is_genesis: bool,
}

impl CheckoutEvent {
    /// Create a regular checkout event.
    pub fn new(
        book_id: impl Into<String>,
        user: impl Into<String>,
        checkout_date: impl Into<String>,
    ) -> Self {
        Self {
            book_id: book_id.into(),
            user: user.into(),
            checkout_date: checkout_date.into(),
            is_genesis: false,
        }
    }

    /// The synthetic event embedded in the genesis block.
    pub fn genesis() -> Self {
        Self {
            is_genesis: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_event_is_empty() {
        let event = CheckoutEvent::genesis();
        assert!(event.is_genesis);
        assert!(event.book_id.is_empty());
        assert!(event.user.is_empty());
        assert!(event.checkout_date.is_empty());
    }

    #[test]
    fn test_missing_genesis_flag_defaults_false() {
        let event: CheckoutEvent = serde_json::from_str(
            r#"{"book_id":"b1","user":"u1","checkout_date":"2024-01-01"}"#,
        )
        .unwrap();
        assert_eq!(event, CheckoutEvent::new("b1", "u1", "2024-01-01"));
    }
}
