//! Error types for document store operations.

use thiserror::Error;

/// Errors produced by the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required input was empty or absent.
    #[error("validation error: {0}")]
    Validation(String),

    /// The collection directory does not exist.
    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    /// No document with this id exists in the collection.
    #[error("document not found: {collection}/{id}")]
    DocumentNotFound { collection: String, id: String },

    /// I/O error from the underlying filesystem, passed through unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored content is not valid JSON, or does not match the requested shape.
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// The supplied value cannot be encoded as a JSON object.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Returns `true` for both missing-collection and missing-document errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CollectionNotFound(_) | Self::DocumentNotFound { .. }
        )
    }

    /// Returns `true` if the error was raised by input validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub(crate) fn decode(what: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            what: what.into(),
            source,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
