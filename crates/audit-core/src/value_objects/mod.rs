//! Value objects - identifiers and time, both injectable for testing

mod clock;
mod record_id;

pub use clock::{Clock, SystemClock};
pub use record_id::{IdGenerator, RecordId, UuidGenerator};
