use std::fmt;
use std::sync::Arc;

use crate::error::PipeError;

/// Stable identity of the producer type that raised an error.
///
/// Cloning is cheap: the name is shared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProducerKind(Arc<str>);

impl ProducerKind {
    /// Creates a producer kind from a name.
    ///
    /// Fails with [`PipeError::InvalidArgument`] when the name is empty or blank.
    pub fn new(name: impl AsRef<str>) -> Result<Self, PipeError> {
        let kind = Self::unchecked(name.as_ref());
        kind.validate()?;
        Ok(kind)
    }

    /// Derives the producer kind from a Rust type.
    pub fn of<T: ?Sized>() -> Self {
        Self::unchecked(std::any::type_name::<T>())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn unchecked(name: &str) -> Self {
        ProducerKind(Arc::from(name))
    }

    pub(crate) fn validate(&self) -> Result<(), PipeError> {
        if self.0.trim().is_empty() {
            return Err(PipeError::invalid("producer kind must not be empty"));
        }
        Ok(())
    }
}

impl fmt::Display for ProducerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProducerKind {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&ProducerKind> for ProducerKind {
    fn from(kind: &ProducerKind) -> Self {
        kind.clone()
    }
}

impl TryFrom<&str> for ProducerKind {
    type Error = PipeError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        ProducerKind::new(name)
    }
}

impl TryFrom<String> for ProducerKind {
    type Error = PipeError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        ProducerKind::new(name)
    }
}

impl TryFrom<Option<&str>> for ProducerKind {
    type Error = PipeError;

    fn try_from(name: Option<&str>) -> Result<Self, Self::Error> {
        match name {
            Some(name) => ProducerKind::new(name),
            None => Err(PipeError::invalid("producer kind is required")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fetcher;

    #[test]
    fn test_new_rejects_blank_names() {
        assert!(matches!(
            ProducerKind::new(""),
            Err(PipeError::InvalidArgument(_))
        ));
        assert!(matches!(
            ProducerKind::new("   "),
            Err(PipeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_missing_name_is_invalid() {
        let result = ProducerKind::try_from(None::<&str>);
        assert!(matches!(result, Err(PipeError::InvalidArgument(_))));

        let kind = ProducerKind::try_from(Some("Fetcher")).unwrap();
        assert_eq!(kind.as_str(), "Fetcher");
    }

    #[test]
    fn test_of_uses_type_name() {
        let kind = ProducerKind::of::<Fetcher>();
        assert!(kind.as_str().ends_with("Fetcher"));
        assert_eq!(kind, ProducerKind::of::<Fetcher>());
    }

    #[test]
    fn test_display_and_clone_share_name() {
        let kind = ProducerKind::new("Indexer").unwrap();
        let copy = kind.clone();
        assert_eq!(copy.to_string(), "Indexer");
        assert_eq!(copy, kind);
    }
}
