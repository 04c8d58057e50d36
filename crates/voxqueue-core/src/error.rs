//! Error types for VoxQueue core operations.

use thiserror::Error;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when constructing queue payloads.
///
/// Queue store operations themselves never fail: "not found" and "empty"
/// are expressed as `None` or empty results. The only failure surface is
/// the validation boundary where collaborators build entries, so the store
/// never sees a structurally malformed payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A media entry was given an empty identifier.
    #[error("media entry id must not be empty")]
    EmptyEntryId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::EmptyEntryId;
        assert_eq!(err.to_string(), "media entry id must not be empty");
    }
}
