//! The `Event` value: an immutable record with optional causal parents.

use crate::error::{DomainError, DomainResult};
use crate::id::EventId;

/// Maximum number of causal parents one event can reference.
pub const MAX_PARENTS: usize = 8;

/// Width of the payload slot in a row. One byte is always left for the NUL
/// terminator, so at most `MAX_DATA_LENGTH - 1` payload bytes are kept.
pub const MAX_DATA_LENGTH: usize = 128;

/// A persisted record.
///
/// Events are:
/// - **immutable** once constructed (fields are only readable)
/// - **bounded**: at most [`MAX_PARENTS`] parents and `MAX_DATA_LENGTH - 1` bytes of data
/// - **unchecked** as a graph: parents may be dangling, duplicated, or form cycles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    id: EventId,
    parents: Vec<EventId>,
    data: String,
}

impl Event {
    /// Build an event, truncating `data` to fit its slot.
    ///
    /// Fails when more than [`MAX_PARENTS`] parents are given.
    pub fn new(
        id: impl Into<EventId>,
        data: impl Into<String>,
        parents: impl IntoIterator<Item = EventId>,
    ) -> DomainResult<Self> {
        let parents: Vec<EventId> = parents.into_iter().collect();
        if parents.len() > MAX_PARENTS {
            return Err(DomainError::TooManyParents {
                count: parents.len(),
                max: MAX_PARENTS,
            });
        }

        let mut data = data.into();
        truncate_payload(&mut data);

        Ok(Self {
            id: id.into(),
            parents,
            data,
        })
    }

    /// Event without causal parents.
    pub fn root(id: impl Into<EventId>, data: impl Into<String>) -> Self {
        let mut data = data.into();
        truncate_payload(&mut data);
        Self {
            id: id.into(),
            parents: Vec::new(),
            data,
        }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn parents(&self) -> &[EventId] {
        &self.parents
    }

    /// Number of causal parents; never exceeds [`MAX_PARENTS`].
    pub fn parent_count(&self) -> u8 {
        self.parents.len() as u8
    }

    pub fn data(&self) -> &str {
        &self.data
    }
}

/// Shell rendering: `<id>: <data>` followed by the parent list on its own line.
impl core::fmt::Display for Event {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{}: {}", self.id, self.data)?;
        write!(f, " ⬑ Parents:")?;
        for parent in &self.parents {
            write!(f, " {parent}")?;
        }
        Ok(())
    }
}

/// Cut `data` to what a row can hold: everything before the first NUL, then the
/// longest prefix of at most `MAX_DATA_LENGTH - 1` bytes that ends on a
/// character boundary.
///
/// Decoding stops at the first NUL, so the mirror and the file agree.
pub fn truncate_payload(data: &mut String) {
    if let Some(nul) = data.find('\0') {
        data.truncate(nul);
    }
    let limit = MAX_DATA_LENGTH - 1;
    if data.len() <= limit {
        return;
    }
    let mut cut = limit;
    while !data.is_char_boundary(cut) {
        cut -= 1;
    }
    data.truncate(cut);
}
