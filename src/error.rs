use std::convert::Infallible;

use derive_builder::UninitializedFieldError;
use thiserror::Error;

/// Errors surfaced by the error pipe.
///
/// Only validation and sink failures are reported. Cancellation and a vanished
/// consumer on the producer side are absorbed by [`crate::channel::ErrorChannel`]
/// and never show up here.
#[derive(Debug, Error)]
pub enum PipeError {
    /// A required argument was missing or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A sink failed to handle a drained record.
    ///
    /// Preserves the source error for debugging.
    #[error("sink failed")]
    Sink(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl PipeError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        PipeError::InvalidArgument(reason.into())
    }
}

impl From<UninitializedFieldError> for PipeError {
    fn from(err: UninitializedFieldError) -> Self {
        PipeError::InvalidArgument(format!("{} is required", err.field_name()))
    }
}

// Lets `ProducerKind` itself flow through `TryInto<ProducerKind>` bounds.
impl From<Infallible> for PipeError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

pub type PipeResult<T> = Result<T, PipeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_sink_error_preserves_source() {
        let source = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = PipeError::Sink(Box::new(source));

        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "sink failed");
    }

    #[test]
    fn test_error_display() {
        let err = PipeError::invalid("capacity must be greater than zero");
        assert_eq!(
            err.to_string(),
            "invalid argument: capacity must be greater than zero"
        );
    }

    #[test]
    fn test_uninitialized_field_becomes_invalid_argument() {
        let err: PipeError = UninitializedFieldError::new("producer_kind").into();

        assert!(matches!(err, PipeError::InvalidArgument(_)));
        assert!(err.to_string().contains("producer_kind is required"));
        assert!(err.source().is_none());
    }
}
