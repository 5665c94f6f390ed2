//! Fixed-width row encoding of an [`Event`].
//!
//! Layout (little-endian):
//!
//! ```text
//! offset  width  field
//!      0      4  id
//!      4      1  parent_count
//!      5     32  parents (8 x u32, unused slots zeroed)
//!     37    128  data (UTF-8, NUL padded, at most 127 payload bytes)
//!    165      3  reserved, always zero
//! ```

use crate::error::CodecError;
use crate::event::{Event, MAX_DATA_LENGTH, MAX_PARENTS};
use crate::id::EventId;

const ID_OFFSET: usize = 0;
const PARENT_COUNT_OFFSET: usize = 4;
const PARENTS_OFFSET: usize = 5;
const DATA_OFFSET: usize = PARENTS_OFFSET + 4 * MAX_PARENTS;
const RESERVED_OFFSET: usize = DATA_OFFSET + MAX_DATA_LENGTH;

/// Bytes occupied by the encoded fields.
pub const ENCODED_FIELDS_SIZE: usize = RESERVED_OFFSET;

/// Length of one row on disk, including the reserved padding.
pub const ROW_SIZE: usize = 168;

const _: () = assert!(ENCODED_FIELDS_SIZE == 165 && ROW_SIZE - ENCODED_FIELDS_SIZE == 3);

/// One encoded event.
pub type Row = [u8; ROW_SIZE];

/// Encode an event into a row. Never fails: `Event` already upholds the bounds.
pub fn encode(event: &Event) -> Row {
    let mut row = [0u8; ROW_SIZE];

    row[ID_OFFSET..ID_OFFSET + 4].copy_from_slice(&event.id().get().to_le_bytes());
    row[PARENT_COUNT_OFFSET] = event.parent_count();

    for (slot, parent) in event.parents().iter().enumerate() {
        let at = PARENTS_OFFSET + 4 * slot;
        row[at..at + 4].copy_from_slice(&parent.get().to_le_bytes());
    }

    let data = event.data().as_bytes();
    row[DATA_OFFSET..DATA_OFFSET + data.len()].copy_from_slice(data);

    row
}

/// Decode a row produced by [`encode`] (or by any writer using the same layout).
pub fn decode(row: &[u8]) -> Result<Event, CodecError> {
    if row.len() != ROW_SIZE {
        return Err(CodecError::RowLength {
            expected: ROW_SIZE,
            actual: row.len(),
        });
    }

    let id = read_u32(row, ID_OFFSET);
    let parent_count = row[PARENT_COUNT_OFFSET];
    if usize::from(parent_count) > MAX_PARENTS {
        return Err(CodecError::CorruptRow { id, parent_count });
    }

    let parents = (0..usize::from(parent_count))
        .map(|slot| EventId::new(read_u32(row, PARENTS_OFFSET + 4 * slot)));

    let slot = &row[DATA_OFFSET..RESERVED_OFFSET];
    let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
    let data = String::from_utf8_lossy(&slot[..end]).into_owned();

    Event::new(id, data, parents).map_err(|_| CodecError::CorruptRow { id, parent_count })
}

fn read_u32(row: &[u8], at: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&row[at..at + 4]);
    u32::from_le_bytes(buf)
}
