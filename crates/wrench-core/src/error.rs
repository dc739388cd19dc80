//! # Error Types
//!
//! Domain-specific error types for the pricing engine.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  PricingError                                                           │
//! │  ├── Validation        - bad input shape/range, nothing written         │
//! │  ├── *NotFound         - unknown discount / type / owner id             │
//! │  ├── WorkOrderLocked   - order no longer editable (closed/invoiced)     │
//! │  ├── InvalidState      - illegal lifecycle transition, no side effects  │
//! │  └── ConsistencyFault  - mutation and audit write disagree: FATAL,      │
//! │                          reported rather than silently retried          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (discount id, field name, ...)
//! 3. Errors are enum variants, never String
//! 4. Calculation paths never return these for business-data reasons;
//!    malformed configuration is caught by `validate_tax_settings` first

use thiserror::Error;

// =============================================================================
// Pricing Error
// =============================================================================

/// Errors the engine reports to its callers.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Input validation failure. Always recoverable; no partial state is
    /// written.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Unknown discount id.
    #[error("Discount not found: {0}")]
    DiscountNotFound(String),

    /// Unknown catalog discount type id.
    #[error("Discount type not found: {0}")]
    DiscountTypeNotFound(String),

    /// The job line or part the discount targets is not in the snapshot.
    #[error("Discount owner not found: {0}")]
    OwnerNotFound(String),

    /// The work order is closed/invoiced and rejects discount edits.
    #[error("Work order {0} is not editable")]
    WorkOrderLocked(String),

    /// Illegal lifecycle transition, e.g. approving a discount that is not
    /// pending. Rejected entirely, no side effects.
    #[error("Discount {discount_id} is {state}, cannot perform transition")]
    InvalidState { discount_id: String, state: String },

    /// The discount state and its audit trail would disagree. This breaks
    /// the append-only audit guarantee and is fatal-and-reportable.
    #[error("Audit write failed for discount {discount_id} during {action}; state not committed")]
    ConsistencyFault { discount_id: String, action: String },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when a request doesn't meet requirements. Used for early
/// validation before any state changes.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be non-negative.
    #[error("{field} must not be negative")]
    MustBePositive { field: String },

    /// A catalog discount type attached to an owner category outside its
    /// declared scope.
    #[error("discount type {discount_type} does not apply to {scope}")]
    ScopeMismatch {
        discount_type: String,
        scope: String,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with PricingError.
pub type PricingResult<T> = Result<T, PricingError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PricingError::InvalidState {
            discount_id: "d-1".to_string(),
            state: "approved".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Discount d-1 is approved, cannot perform transition"
        );

        let err = PricingError::WorkOrderLocked("wo-9".to_string());
        assert_eq!(err.to_string(), "Work order wo-9 is not editable");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "reason".to_string(),
        };
        assert_eq!(err.to_string(), "reason is required");

        let err = ValidationError::OutOfRange {
            field: "value".to_string(),
            min: 0,
            max: 10000,
        };
        assert_eq!(err.to_string(), "value must be between 0 and 10000");
    }

    #[test]
    fn test_validation_converts_to_pricing_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "value".to_string(),
        };
        let err: PricingError = validation_err.into();
        assert!(matches!(err, PricingError::Validation(_)));
    }
}
