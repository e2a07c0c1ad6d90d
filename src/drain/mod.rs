pub mod drain;
pub mod sink;

pub use drain::ErrorDrain;
pub use sink::{RecordSink, TracingSink};
