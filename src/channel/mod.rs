pub mod buffer;
pub mod channel;
pub mod config;

pub use buffer::ErrorBuffer;
pub use channel::ErrorChannel;
pub use config::{Config, ConfigBuilder};
