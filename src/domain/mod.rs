pub mod category;
pub mod entry;
pub mod record;

pub use entry::{Entry, EntryId, EntryKind, EntryPatch, NewEntry};
pub use record::{decode_row, parse_calendar_date, row_id, EntryRecord, EntrySnapshot, RejectedRecord};
