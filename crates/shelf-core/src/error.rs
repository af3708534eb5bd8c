//! # Error Types
//!
//! Domain error types for shelf-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shelf-core errors (this file)                                         │
//! │  └── ValidationError  - A field broke one of its constraints           │
//! │                                                                         │
//! │  shelf-db errors (separate crate)                                      │
//! │  └── DbError          - Validation | Conflict | Storage                │
//! │                                                                         │
//! │  Flow: ValidationError → DbError::Validation → caller                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Message Shape
//! Every message reads `"<Field> <violation>."` so the UI can show it as-is:
//! `"Title is required."`, `"Due date cannot be before Loan date."`.

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any statement reaches the database. A caller that gets one
/// of these knows nothing was written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or whitespace-only.
    #[error("{field} is required.")]
    Required { field: String },

    /// Field value is longer than the column allows.
    #[error("{field} must be at most {max} characters.")]
    TooLong { field: String, max: usize },

    /// Value must be strictly greater than zero.
    #[error("{field} must be > 0.")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must be ≥ 0.")]
    MustBeNonNegative { field: String },

    /// Email does not have a `local@domain.tld` shape.
    #[error("{field} must be a valid email address.")]
    InvalidEmail { field: String },

    /// Date lies after today.
    #[error("{field} cannot be in the future.")]
    InFuture { field: String },

    /// End date lies before start date.
    #[error("{end} cannot be before {start}.")]
    OutOfOrder { start: String, end: String },
}

impl ValidationError {
    /// Returns the human-readable name of the offending field.
    ///
    /// For date-order violations this is the end field, since that is the
    /// one the user has to change.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::MustBeNonNegative { field }
            | ValidationError::InvalidEmail { field }
            | ValidationError::InFuture { field } => field,
            ValidationError::OutOfOrder { end, .. } => end,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "Title".to_string(),
        };
        assert_eq!(err.to_string(), "Title is required.");

        let err = ValidationError::TooLong {
            field: "Bio".to_string(),
            max: 1000,
        };
        assert_eq!(err.to_string(), "Bio must be at most 1000 characters.");

        let err = ValidationError::OutOfOrder {
            start: "Loan date".to_string(),
            end: "Due date".to_string(),
        };
        assert_eq!(err.to_string(), "Due date cannot be before Loan date.");
    }

    #[test]
    fn test_sign_messages_differ() {
        let positive = ValidationError::MustBePositive {
            field: "Sale price".to_string(),
        };
        let non_negative = ValidationError::MustBeNonNegative {
            field: "Original price".to_string(),
        };
        assert_eq!(positive.to_string(), "Sale price must be > 0.");
        assert_eq!(non_negative.to_string(), "Original price must be ≥ 0.");
    }

    #[test]
    fn test_field_accessor() {
        let err = ValidationError::OutOfOrder {
            start: "Loan date".to_string(),
            end: "Due date".to_string(),
        };
        assert_eq!(err.field(), "Due date");

        let err = ValidationError::InFuture {
            field: "Sale date".to_string(),
        };
        assert_eq!(err.field(), "Sale date");
    }
}
