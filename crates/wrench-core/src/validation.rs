//! # Validation Module
//!
//! Input validation for discount values and tax settings.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Two Kinds of Outcome                               │
//! │                                                                         │
//! │  Errors (block the save)            Warnings (allowed, surfaced)       │
//! │  ──────────────────────             ─────────────────────────────      │
//! │  rate outside 0-100%                rate above 15%                     │
//! │  missing tax description            both categories untaxed            │
//! │  negative fleet discount            compound with mismatched rates     │
//! │                                                                         │
//! │  Calculators never re-check this: a configuration that reaches the     │
//! │  tax engine has already passed validation, so calculation is a total   │
//! │  function over valid input.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{DiscountValue, TaxConfiguration, TaxMethod, TaxValidationResult};
use crate::{HIGH_RATE_WARNING_BPS, MAX_RATE_BPS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Discount Value Validators
// =============================================================================

/// Validates a discount value.
///
/// ## Rules
/// - Percentage must be between 0 and 10000 bps (0% to 100%)
/// - Fixed amount must be non-negative (clamping handles oversized values
///   later; a negative "discount" is never meaningful)
///
/// ## Example
/// ```rust
/// use wrench_core::types::DiscountValue;
/// use wrench_core::validation::validate_discount_value;
///
/// assert!(validate_discount_value(&DiscountValue::Percentage(1000)).is_ok());
/// assert!(validate_discount_value(&DiscountValue::Percentage(10001)).is_err());
/// assert!(validate_discount_value(&DiscountValue::FixedAmount(-1)).is_err());
/// ```
pub fn validate_discount_value(value: &DiscountValue) -> ValidationResult<()> {
    match value {
        DiscountValue::Percentage(bps) => {
            if *bps > MAX_RATE_BPS {
                return Err(ValidationError::OutOfRange {
                    field: "value".to_string(),
                    min: 0,
                    max: MAX_RATE_BPS as i64,
                });
            }
        }
        DiscountValue::FixedAmount(cents) => {
            if *cents < 0 {
                return Err(ValidationError::MustBePositive {
                    field: "value".to_string(),
                });
            }
        }
    }

    Ok(())
}

/// Validates a discount reason string for a discount that requires approval.
pub fn validate_reason(reason: Option<&str>) -> ValidationResult<()> {
    match reason {
        Some(r) if !r.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::Required {
            field: "reason".to_string(),
        }),
    }
}

// =============================================================================
// Tax Settings Validation
// =============================================================================

/// Validates a tax configuration before it is saved.
///
/// Pure function: errors block the save, warnings are surfaced but allowed.
/// Compound method with divergent rates is deliberately a warning, not an
/// error, since some shops run that configuration on purpose.
pub fn validate_tax_settings(config: &TaxConfiguration) -> TaxValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if config.labor_tax_rate_bps > MAX_RATE_BPS {
        errors.push("Labor tax rate must be between 0% and 100%".to_string());
    }
    if config.parts_tax_rate_bps > MAX_RATE_BPS {
        errors.push("Parts tax rate must be between 0% and 100%".to_string());
    }
    if config.tax_description.trim().is_empty() {
        errors.push("Tax description is required".to_string());
    }
    if config.fleet_discount_cents < 0 {
        errors.push("Fleet discount must not be negative".to_string());
    }

    if config.labor_tax_rate_bps > HIGH_RATE_WARNING_BPS
        && config.labor_tax_rate_bps <= MAX_RATE_BPS
    {
        warnings.push("Labor tax rate is above 15%".to_string());
    }
    if config.parts_tax_rate_bps > HIGH_RATE_WARNING_BPS
        && config.parts_tax_rate_bps <= MAX_RATE_BPS
    {
        warnings.push("Parts tax rate is above 15%".to_string());
    }
    if !config.apply_tax_to_labor && !config.apply_tax_to_parts {
        warnings.push("Tax is disabled for both labor and parts".to_string());
    }
    if config.method == TaxMethod::Compound
        && config.labor_tax_rate_bps != config.parts_tax_rate_bps
    {
        warnings.push(
            "Compound method with different labor and parts rates uses a blended rate"
                .to_string(),
        );
    }

    TaxValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
