pub mod kind;
pub mod record;

pub use kind::ProducerKind;
pub use record::{Cause, ErrorRecord, ErrorRecordBuilder};
