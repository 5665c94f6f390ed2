//! Strongly-typed event identifier.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Caller-supplied identifier of an event.
///
/// Uniqueness is not enforced anywhere; two events may share an id, and lookups
/// resolve to the earliest one written.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u32);

impl EventId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// The id that follows this one, used by the contiguous-prefix load.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl core::fmt::Display for EventId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for EventId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<EventId> for u32 {
    fn from(value: EventId) -> Self {
        value.0
    }
}

impl FromStr for EventId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<u32>()
            .map_err(|e| DomainError::invalid_id(format!("EventId: {e}")))?;
        Ok(Self(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_ids() {
        assert_eq!("42".parse::<EventId>().unwrap(), EventId::new(42));
        assert_eq!(" 7 ".parse::<EventId>().unwrap(), EventId::new(7));
    }

    #[test]
    fn rejects_non_numeric_ids() {
        let err = "abc".parse::<EventId>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
    }

    #[test]
    fn next_stops_at_u32_max() {
        assert_eq!(EventId::new(1).next(), Some(EventId::new(2)));
        assert_eq!(EventId::new(u32::MAX).next(), None);
    }
}
