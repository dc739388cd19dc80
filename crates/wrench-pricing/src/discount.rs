//! # Discount Application
//!
//! Computes the monetary effect of a discount against its base, and defines
//! the request DTOs for attaching and modifying discounts.
//!
//! ## Amount Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  compute_discount_amount(value, base, cap)                             │
//! │                                                                         │
//! │  fixed_amount ──► raw = value                                          │
//! │  percentage ────► raw = base × value / 100   (half-up, single round)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  clamp: 0 ≤ raw ≤ base     (a discount never makes a line negative)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cap:  raw = min(raw, max_discount_amount)   (when the type caps it)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use wrench_core::money::{Money, Percent};
use wrench_core::types::{DiscountOwner, DiscountScope, DiscountValue};

// =============================================================================
// Amount Computation
// =============================================================================

/// Computes the monetary effect of `value` against `base`, clamped to the
/// base and optionally capped by the discount type's maximum.
///
/// ## Example
/// ```rust
/// use wrench_core::money::Money;
/// use wrench_core::types::DiscountValue;
/// use wrench_pricing::discount::compute_discount_amount;
///
/// // A $300 fixed discount on a $200 base clamps to $200
/// let amount = compute_discount_amount(
///     &DiscountValue::FixedAmount(30_000),
///     Money::from_cents(20_000),
///     None,
/// );
/// assert_eq!(amount.cents(), 20_000);
/// ```
pub fn compute_discount_amount(
    value: &DiscountValue,
    base: Money,
    cap: Option<Money>,
) -> Money {
    let raw = match value {
        DiscountValue::FixedAmount(cents) => Money::from_cents(*cents),
        DiscountValue::Percentage(bps) => base.percent_of(Percent::from_bps(*bps)),
    };

    let clamped = raw.max(Money::zero()).min(base.max(Money::zero()));

    match cap {
        Some(max) => clamped.min(max.max(Money::zero())),
        None => clamped,
    }
}

/// Whether a catalog scope admits the given owner.
pub fn scope_allows(scope: DiscountScope, owner: &DiscountOwner) -> bool {
    match (scope, owner) {
        (DiscountScope::Any, _) => true,
        (DiscountScope::Labor, DiscountOwner::JobLine { .. }) => true,
        (DiscountScope::Parts, DiscountOwner::Part { .. }) => true,
        (DiscountScope::WorkOrder, DiscountOwner::WorkOrder { .. }) => true,
        _ => false,
    }
}

// =============================================================================
// Request DTOs
// =============================================================================

/// Request to attach a discount to a job line, part, or work order.
///
/// With `discount_type_id` set, name/value/approval default from the catalog
/// entry (the request may override name and value). Without it this is an ad
/// hoc discount and `name` + `value` are required; `requires_approval` then
/// comes from the request flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyDiscountRequest {
    pub owner: DiscountOwner,
    pub discount_type_id: Option<String>,
    pub name: Option<String>,
    pub value: Option<DiscountValue>,
    pub reason: Option<String>,
    /// Ad hoc discounts only; ignored when a catalog type is referenced.
    #[serde(default)]
    pub requires_approval: bool,
}

impl ApplyDiscountRequest {
    /// Convenience constructor for a catalog-typed request.
    pub fn of_type(owner: DiscountOwner, discount_type_id: &str) -> Self {
        ApplyDiscountRequest {
            owner,
            discount_type_id: Some(discount_type_id.to_string()),
            name: None,
            value: None,
            reason: None,
            requires_approval: false,
        }
    }

    /// Convenience constructor for an ad hoc request.
    pub fn ad_hoc(owner: DiscountOwner, name: &str, value: DiscountValue) -> Self {
        ApplyDiscountRequest {
            owner,
            discount_type_id: None,
            name: Some(name.to_string()),
            value: Some(value),
            reason: None,
            requires_approval: false,
        }
    }

    /// Sets the justification.
    pub fn with_reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }
}

/// Request to change an existing discount.
///
/// Only value and reason can change; ownership and the type binding are
/// frozen at apply time (re-parenting is a remove + apply).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifyDiscountRequest {
    pub value: Option<DiscountValue>,
    pub reason: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_amount_within_base() {
        let amount = compute_discount_amount(
            &DiscountValue::FixedAmount(5_000),
            Money::from_cents(20_000),
            None,
        );
        assert_eq!(amount.cents(), 5_000);
    }

    #[test]
    fn test_fixed_amount_clamps_to_base() {
        // $300 discount on a $200 base → exactly $200, never negative
        let amount = compute_discount_amount(
            &DiscountValue::FixedAmount(30_000),
            Money::from_cents(20_000),
            None,
        );
        assert_eq!(amount.cents(), 20_000);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        // 10% of $500.00 = $50.00
        let amount = compute_discount_amount(
            &DiscountValue::Percentage(1000),
            Money::from_cents(50_000),
            None,
        );
        assert_eq!(amount.cents(), 5_000);

        // 12.5% of $10.33 = $1.29125 → $1.29
        let amount = compute_discount_amount(
            &DiscountValue::Percentage(1250),
            Money::from_cents(1_033),
            None,
        );
        assert_eq!(amount.cents(), 129);
    }

    #[test]
    fn test_hundred_percent_is_entire_base() {
        let base = Money::from_cents(33_333);
        let amount = compute_discount_amount(&DiscountValue::Percentage(10000), base, None);
        assert_eq!(amount, base);
    }

    #[test]
    fn test_cap_applies_after_clamp() {
        // 50% of $400 = $200, but the type caps at $75
        let amount = compute_discount_amount(
            &DiscountValue::Percentage(5000),
            Money::from_cents(40_000),
            Some(Money::from_cents(7_500)),
        );
        assert_eq!(amount.cents(), 7_500);
    }

    #[test]
    fn test_zero_base_yields_zero() {
        let amount = compute_discount_amount(
            &DiscountValue::Percentage(1000),
            Money::zero(),
            None,
        );
        assert!(amount.is_zero());

        let amount = compute_discount_amount(
            &DiscountValue::FixedAmount(5_000),
            Money::zero(),
            None,
        );
        assert!(amount.is_zero());
    }

    #[test]
    fn test_scope_allows() {
        let line = DiscountOwner::JobLine {
            job_line_id: "jl-1".to_string(),
        };
        let part = DiscountOwner::Part {
            part_id: "p-1".to_string(),
        };
        let wo = DiscountOwner::WorkOrder {
            work_order_id: "wo-1".to_string(),
            applies_to: wrench_core::types::WorkOrderBase::Total,
        };

        assert!(scope_allows(DiscountScope::Any, &line));
        assert!(scope_allows(DiscountScope::Any, &wo));
        assert!(scope_allows(DiscountScope::Labor, &line));
        assert!(!scope_allows(DiscountScope::Labor, &part));
        assert!(scope_allows(DiscountScope::Parts, &part));
        assert!(!scope_allows(DiscountScope::Parts, &wo));
        assert!(scope_allows(DiscountScope::WorkOrder, &wo));
        assert!(!scope_allows(DiscountScope::WorkOrder, &line));
    }
}
