// src/channel/config.rs

use derive_builder::Builder;

use crate::error::PipeError;

pub const DEFAULT_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate", error = "PipeError"))]
pub struct Config {
    /// Maximum number of records buffered before producers wait for space
    #[builder(default = "DEFAULT_CAPACITY")]
    pub(crate) capacity: usize,

    /// Whether a cancelled drain flushes records already in the buffer
    #[builder(default = "true")]
    pub(crate) drain_on_cancel: bool,
}

impl ConfigBuilder {
    fn validate(&self) -> Result<(), PipeError> {
        match self.capacity {
            Some(0) => Err(PipeError::invalid("capacity must be greater than zero")),
            _ => Ok(()),
        }
    }
}

impl Config {
    /// Creates a config with the given capacity and default flush behavior
    pub fn with_capacity(capacity: usize) -> Result<Self, PipeError> {
        ConfigBuilder::default().capacity(capacity).build()
    }

    /// Returns the buffer capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns whether buffered records are flushed on cancellation
    #[inline]
    pub fn drain_on_cancel(&self) -> bool {
        self.drain_on_cancel
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            capacity: DEFAULT_CAPACITY,
            drain_on_cancel: true,
        }
    }
}
