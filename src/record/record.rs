use std::error::Error;
use std::fmt;
use std::sync::Arc;

use derive_builder::Builder;

use super::kind::ProducerKind;
use crate::error::{PipeError, PipeResult};

/// Underlying failure attached to a record. Shared so records stay cheap to clone.
pub type Cause = Arc<dyn Error + Send + Sync>;

/// One reported failure.
///
/// Records are immutable once built: every input is copied or moved in, and no
/// accessor hands out mutable state.
#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate", error = "PipeError"))]
pub struct ErrorRecord {
    /// Producer type that raised the error. Required.
    #[builder(setter(custom))]
    producer_kind: ProducerKind,

    /// Human readable description.
    #[builder(default, setter(into, strip_option))]
    message: Option<String>,

    /// Underlying error.
    #[builder(default, setter(custom))]
    cause: Option<Cause>,
}

impl ErrorRecordBuilder {
    pub fn producer_kind(&mut self, kind: impl AsRef<str>) -> &mut Self {
        self.producer_kind = Some(ProducerKind::unchecked(kind.as_ref()));
        self
    }

    pub fn cause(&mut self, cause: impl Into<Box<dyn Error + Send + Sync>>) -> &mut Self {
        self.cause = Some(Some(Arc::from(cause.into())));
        self
    }

    /// Attaches a cause that is already shared with other records.
    pub fn shared_cause(&mut self, cause: Cause) -> &mut Self {
        self.cause = Some(Some(cause));
        self
    }

    fn validate(&self) -> Result<(), PipeError> {
        // A missing kind is reported by the generated build fn.
        match &self.producer_kind {
            Some(kind) => kind.validate(),
            None => Ok(()),
        }
    }
}

impl ErrorRecord {
    pub fn builder() -> ErrorRecordBuilder {
        ErrorRecordBuilder::default()
    }

    /// Record with a message and no cause.
    pub fn new<K>(kind: K, message: impl Into<String>) -> PipeResult<Self>
    where
        K: TryInto<ProducerKind>,
        K::Error: Into<PipeError>,
    {
        Ok(ErrorRecord {
            producer_kind: resolve_kind(kind)?,
            message: Some(message.into()),
            cause: None,
        })
    }

    /// Record with both a message and a cause.
    pub fn with_cause<K>(
        kind: K,
        message: impl Into<String>,
        cause: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> PipeResult<Self>
    where
        K: TryInto<ProducerKind>,
        K::Error: Into<PipeError>,
    {
        Ok(ErrorRecord {
            producer_kind: resolve_kind(kind)?,
            message: Some(message.into()),
            cause: Some(Arc::from(cause.into())),
        })
    }

    /// Record with a cause and no message.
    pub fn from_cause<K>(
        kind: K,
        cause: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> PipeResult<Self>
    where
        K: TryInto<ProducerKind>,
        K::Error: Into<PipeError>,
    {
        Ok(ErrorRecord {
            producer_kind: resolve_kind(kind)?,
            message: None,
            cause: Some(Arc::from(cause.into())),
        })
    }

    #[inline]
    pub fn producer_kind(&self) -> &ProducerKind {
        &self.producer_kind
    }

    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[inline]
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    #[inline]
    pub fn shared_cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }
}

fn resolve_kind<K>(kind: K) -> PipeResult<ProducerKind>
where
    K: TryInto<ProducerKind>,
    K::Error: Into<PipeError>,
{
    let kind = kind.try_into().map_err(Into::<PipeError>::into)?;
    kind.validate()?;
    Ok(kind)
}

/// Causes compare by their rendered text; trait objects carry no equality of their own.
impl PartialEq for ErrorRecord {
    fn eq(&self, other: &Self) -> bool {
        let cause_eq = match (&self.cause, &other.cause) {
            (None, None) => true,
            (Some(a), Some(b)) => a.to_string() == b.to_string(),
            _ => false,
        };
        self.producer_kind == other.producer_kind && self.message == other.message && cause_eq
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.producer_kind)?;
        if let Some(message) = &self.message {
            write!(f, " {}", message)?;
        }
        if let Some(cause) = &self.cause {
            if self.message.is_some() {
                write!(f, ":")?;
            }
            write!(f, " {}", cause)?;
        }
        Ok(())
    }
}
