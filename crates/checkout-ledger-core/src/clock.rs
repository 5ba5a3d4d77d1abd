//! Timestamp sources for block construction.

use chrono::{SecondsFormat, Utc};

/// Supplies the string timestamp stamped onto each new block.
///
/// The returned string is hashed verbatim, so its exact format is part of
/// the block identity.
pub trait Clock: Send + Sync {
    fn now(&self) -> String;
}

/// Wall-clock time in UTC, RFC 3339 with nanosecond precision and a `Z` suffix.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
    }
}

/// Always returns the same timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedClock(pub String);

impl FixedClock {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self(timestamp.into())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> String {
        self.0.clone()
    }
}

impl<F> Clock for F
where
    F: Fn() -> String + Send + Sync,
{
    fn now(&self) -> String {
        self()
    }
}
