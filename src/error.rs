//! Error types for the knowledge graph store

use thiserror::Error;

/// Failure of a store operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing graph store is unreachable or the connection was lost
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Call arguments are malformed; nothing was sent to the store
    #[error("validation error: {0}")]
    Validation(String),

    /// The store rejected a statement for a reason other than connectivity
    #[error("backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Stable name of the error kind, as reported to callers
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StoreUnavailable(_) => "StoreUnavailable",
            Self::Validation(_) => "ValidationError",
            Self::Backend(_) => "BackendError",
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(StoreError::unavailable("down").kind(), "StoreUnavailable");
        assert_eq!(StoreError::validation("bad").kind(), "ValidationError");
        assert_eq!(StoreError::backend("oops").kind(), "BackendError");
    }

    #[test]
    fn test_json_errors_are_validation_errors() {
        let err: StoreError = serde_json::from_str::<Vec<String>>("{").unwrap_err().into();
        assert_eq!(err.kind(), "ValidationError");
    }
}
