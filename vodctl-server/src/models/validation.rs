//! Validation error types

use std::fmt;

/// Validation error for catalog input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Multipart form is missing a required part
    MissingPart { part: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::MissingPart { part } => write!(f, "missing form field '{}'", part),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Reject an empty required string. Whitespace-only values pass.
pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::MissingPart { part: "video" };
        assert_eq!(err.to_string(), "missing form field 'video'");
    }

    #[test]
    fn empty_is_rejected() {
        assert_eq!(
            require_non_empty("name", ""),
            Err(ValidationError::Empty { field: "name" })
        );
        assert!(require_non_empty("name", " ").is_ok());
    }
}
