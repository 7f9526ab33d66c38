use thiserror::Error;

/// Errors raised while deriving a class model from mapping metadata.
///
/// These fail the unit being generated, never the whole run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("malformed metadata for '{class}.{property}': {reason}")]
    MalformedMetadata {
        class: String,
        property: String,
        reason: String,
    },
}

impl ModelError {
    pub fn malformed(
        class: impl Into<String>,
        property: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedMetadata {
            class: class.into(),
            property: property.into(),
            reason: reason.into(),
        }
    }
}
