//! # Domain Types
//!
//! Core domain types for the pricing, discount and tax engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────┐      │
//! │  │  DiscountType   │   │ AppliedDiscount │   │ TaxConfiguration │      │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────  │      │
//! │  │  catalog entry  │   │  owner (tagged) │   │  rates (bps)     │      │
//! │  │  default value  │   │  frozen name    │   │  method          │      │
//! │  │  approval flag  │   │  approval state │   │  fleet discount  │      │
//! │  └─────────────────┘   └─────────────────┘   └──────────────────┘      │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────┐      │
//! │  │    JobLine      │   │      Part       │   │ WorkOrderSnapshot│      │
//! │  │  (labor total)  │   │  (parts total)  │   │  (lines + parts) │      │
//! │  └─────────────────┘   └─────────────────┘   └──────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! An applied discount freezes `discount_name` at apply time, so a later
//! catalog rename never changes what the customer was shown. Likewise the
//! calculation consumes a `WorkOrderSnapshot` rather than live rows: same
//! snapshot in, identical result out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Percent};

// =============================================================================
// Discount Value
// =============================================================================

/// The value of a discount: a percentage of its base, or a fixed amount.
///
/// Serialized as `{ "kind": "percentage", "value": 1000 }`; the tag/content
/// pair matches the `kind` + `value` columns the host application stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DiscountValue {
    /// Percentage of the base, in basis points (1000 = 10%).
    Percentage(u32),
    /// Fixed amount in cents.
    FixedAmount(i64),
}

impl DiscountValue {
    /// Checks whether this is a percentage discount.
    #[inline]
    pub const fn is_percentage(&self) -> bool {
        matches!(self, DiscountValue::Percentage(_))
    }
}

// =============================================================================
// Discount Catalog Entry
// =============================================================================

/// Which owner category a catalog discount type may attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountScope {
    /// Job-line (labor) discounts only.
    Labor,
    /// Part discounts only.
    Parts,
    /// Work-order-level discounts only.
    WorkOrder,
    /// Any owner category.
    Any,
}

/// A discount type from the catalog.
///
/// Consumed as a point-in-time snapshot: once referenced by an applied
/// discount the entry is immutable for the purposes of this engine (catalog
/// edits version entries upstream).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountType {
    pub id: String,

    /// Display name ("Loyalty 10%", "Manager Override", ...).
    pub name: String,

    /// Default value used when an application doesn't supply its own.
    pub default_value: DiscountValue,

    /// Which owner category this type may attach to.
    pub applies_to: DiscountScope,

    /// Inactive types stay resolvable (already-applied discounts must keep
    /// computing) but are excluded from offer listings.
    pub is_active: bool,

    /// Whether applications of this type start `pending` until approved.
    pub requires_approval: bool,

    /// Optional cap on the computed discount amount, in cents.
    pub max_discount_amount_cents: Option<i64>,
}

impl DiscountType {
    /// Returns the cap as Money, if set.
    #[inline]
    pub fn max_discount_amount(&self) -> Option<Money> {
        self.max_discount_amount_cents.map(Money::from_cents)
    }
}

// =============================================================================
// Applied Discount
// =============================================================================

/// Which base a work-order-level discount subtracts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderBase {
    /// Subtracts from the post-discount labor base.
    Labor,
    /// Subtracts from the post-discount parts base.
    Parts,
    /// Subtracts from the combined post-discount total.
    Total,
}

/// The entity a discount is attached to.
///
/// One tagged variant instead of three parallel record types: the three
/// discount shapes share every field except the owner reference, and
/// `applies_to` is only meaningful for the work-order variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "owner_kind", rename_all = "snake_case")]
pub enum DiscountOwner {
    /// Attached to a single job line (labor).
    JobLine { job_line_id: String },
    /// Attached to a single part.
    Part { part_id: String },
    /// Attached to the whole work order, routed by `applies_to`.
    WorkOrder {
        work_order_id: String,
        applies_to: WorkOrderBase,
    },
}

/// Lifecycle state of an applied discount with respect to approval.
///
/// ```text
/// not_required ──────────────────────────► (active immediately, terminal)
///
/// pending ──► approved  (terminal, active)
///        └──► rejected  (terminal, never counts toward totals)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalState {
    /// The discount type did not require approval; active from creation.
    NotRequired,
    /// Awaiting an approve/reject decision. Contributes zero to totals.
    Pending,
    /// Approved exactly once. Active.
    Approved,
    /// Rejected exactly once. Kept for audit history, never active.
    Rejected,
}

impl ApprovalState {
    /// Whether a discount in this state counts toward totals.
    #[inline]
    pub const fn is_active(&self) -> bool {
        matches!(self, ApprovalState::NotRequired | ApprovalState::Approved)
    }

    /// Whether an approve/reject decision is still possible.
    #[inline]
    pub const fn is_pending(&self) -> bool {
        matches!(self, ApprovalState::Pending)
    }
}

/// A concrete discount attached to a job line, a part, or a work order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppliedDiscount {
    pub id: String,

    /// Work order this discount belongs to (also for job-line/part owners).
    pub work_order_id: String,

    /// The entity the discount is attached to.
    pub owner: DiscountOwner,

    /// Catalog type, or None for an ad hoc discount.
    pub discount_type_id: Option<String>,

    /// Name at apply time (frozen: catalog renames don't reach here).
    pub discount_name: String,

    /// Percentage or fixed value.
    pub value: DiscountValue,

    /// Computed monetary effect in cents, against the base at apply time.
    /// Stored for display (including the pending effect); the aggregator
    /// re-derives effective amounts on every calculation.
    pub discount_amount_cents: i64,

    /// Justification. Required when the discount needs approval.
    pub reason: Option<String>,

    pub approval: ApprovalState,

    /// Set together with `approved_at`, never one without the other.
    pub approved_by: Option<String>,
    #[ts(as = "Option<String>")]
    pub approved_at: Option<DateTime<Utc>>,

    pub created_by: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl AppliedDiscount {
    /// Returns the stored discount amount as Money.
    #[inline]
    pub fn discount_amount(&self) -> Money {
        Money::from_cents(self.discount_amount_cents)
    }

    /// Whether this discount counts toward totals.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.approval.is_active()
    }
}

// =============================================================================
// Work Order Snapshot
// =============================================================================

/// A billable labor operation on a work order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JobLine {
    pub id: String,
    pub work_order_id: String,
    pub description: String,
    /// Billed labor amount for this line, in cents.
    pub total_amount_cents: i64,
}

impl JobLine {
    /// Returns the line amount as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

/// A part billed on a work order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Part {
    pub id: String,
    pub work_order_id: String,
    pub description: String,
    /// Extended price for this part row (unit price × quantity), in cents.
    pub total_price_cents: i64,
}

impl Part {
    /// Returns the part total as Money.
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

/// Point-in-time view of a work order's billable content.
///
/// The engine never reads live rows; the caller assembles this snapshot and
/// the calculation is a pure function of it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WorkOrderSnapshot {
    pub work_order_id: String,
    pub job_lines: Vec<JobLine>,
    pub parts: Vec<Part>,
}

impl WorkOrderSnapshot {
    /// Sum of job-line amounts.
    pub fn labor_subtotal(&self) -> Money {
        self.job_lines
            .iter()
            .map(JobLine::total_amount)
            .fold(Money::zero(), |acc, m| acc + m)
    }

    /// Sum of part totals.
    pub fn parts_subtotal(&self) -> Money {
        self.parts
            .iter()
            .map(Part::total_price)
            .fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Tax Configuration
// =============================================================================

/// How tax is computed across the labor and parts categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxMethod {
    /// Labor and parts taxed independently, rounded independently.
    /// Safe for any rate combination; the default.
    Additive,
    /// One blended rate over the combined base, single rounding, then
    /// apportioned back per category. Meaningful when both rates match.
    Compound,
}

impl Default for TaxMethod {
    fn default() -> Self {
        TaxMethod::Additive
    }
}

/// Tax settings for a work order's shop/customer combination.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxConfiguration {
    /// Labor tax rate in basis points (800 = 8%).
    pub labor_tax_rate_bps: u32,
    /// Parts tax rate in basis points.
    pub parts_tax_rate_bps: u32,

    pub apply_tax_to_labor: bool,
    pub apply_tax_to_parts: bool,

    pub method: TaxMethod,

    /// Shown on invoices ("TX State + County", ...). Required.
    pub tax_description: String,

    /// Flat pre-tax reduction for commercial fleet accounts, in cents.
    /// Subtracted from the combined base before tax, never after.
    pub fleet_discount_cents: i64,
}

impl TaxConfiguration {
    /// Returns the labor rate.
    #[inline]
    pub fn labor_tax_rate(&self) -> Percent {
        Percent::from_bps(self.labor_tax_rate_bps)
    }

    /// Returns the parts rate.
    #[inline]
    pub fn parts_tax_rate(&self) -> Percent {
        Percent::from_bps(self.parts_tax_rate_bps)
    }

    /// Returns the fleet discount as Money.
    #[inline]
    pub fn fleet_discount(&self) -> Money {
        Money::from_cents(self.fleet_discount_cents)
    }
}

// =============================================================================
// Calculation Result
// =============================================================================

/// The complete pricing breakdown for one work-order snapshot.
///
/// A pure derived value: recomputing from the same inputs yields an
/// identical result. Nothing here is persisted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountCalculationResult {
    pub labor_subtotal_cents: i64,
    pub labor_discounts_cents: i64,
    pub labor_total_cents: i64,

    pub parts_subtotal_cents: i64,
    pub parts_discounts_cents: i64,
    pub parts_total_cents: i64,

    pub work_order_discounts_cents: i64,
    pub subtotal_before_wo_discounts_cents: i64,
    pub total_discounts_cents: i64,

    /// Pre-tax fleet reduction actually applied (clamped to the base).
    pub fleet_discount_cents: i64,

    pub labor_tax_cents: i64,
    pub parts_tax_cents: i64,
    pub total_tax_cents: i64,

    pub final_total_cents: i64,
}

impl DiscountCalculationResult {
    /// Labor subtotal as Money.
    #[inline]
    pub fn labor_total(&self) -> Money {
        Money::from_cents(self.labor_total_cents)
    }

    /// Parts total as Money.
    #[inline]
    pub fn parts_total(&self) -> Money {
        Money::from_cents(self.parts_total_cents)
    }

    /// Total tax as Money.
    #[inline]
    pub fn total_tax(&self) -> Money {
        Money::from_cents(self.total_tax_cents)
    }

    /// Final billable total as Money.
    #[inline]
    pub fn final_total(&self) -> Money {
        Money::from_cents(self.final_total_cents)
    }
}

// =============================================================================
// Tax Settings Validation Result
// =============================================================================

/// Outcome of validating a [`TaxConfiguration`] before it is saved.
///
/// Errors block the save; warnings are surfaced to the user but allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_value_serde_shape() {
        let pct = DiscountValue::Percentage(1000);
        let json = serde_json::to_value(&pct).unwrap();
        assert_eq!(json["kind"], "percentage");
        assert_eq!(json["value"], 1000);

        let fixed = DiscountValue::FixedAmount(5000);
        let json = serde_json::to_value(&fixed).unwrap();
        assert_eq!(json["kind"], "fixed_amount");
        assert_eq!(json["value"], 5000);
    }

    #[test]
    fn test_owner_serde_tag() {
        let owner = DiscountOwner::WorkOrder {
            work_order_id: "wo-1".to_string(),
            applies_to: WorkOrderBase::Total,
        };
        let json = serde_json::to_value(&owner).unwrap();
        assert_eq!(json["owner_kind"], "work_order");
        assert_eq!(json["applies_to"], "total");
    }

    #[test]
    fn test_approval_state_activity() {
        assert!(ApprovalState::NotRequired.is_active());
        assert!(ApprovalState::Approved.is_active());
        assert!(!ApprovalState::Pending.is_active());
        assert!(!ApprovalState::Rejected.is_active());

        assert!(ApprovalState::Pending.is_pending());
        assert!(!ApprovalState::Approved.is_pending());
    }

    #[test]
    fn test_snapshot_subtotals() {
        let snapshot = WorkOrderSnapshot {
            work_order_id: "wo-1".to_string(),
            job_lines: vec![
                JobLine {
                    id: "jl-1".to_string(),
                    work_order_id: "wo-1".to_string(),
                    description: "Brake service".to_string(),
                    total_amount_cents: 30_000,
                },
                JobLine {
                    id: "jl-2".to_string(),
                    work_order_id: "wo-1".to_string(),
                    description: "Oil change".to_string(),
                    total_amount_cents: 20_000,
                },
            ],
            parts: vec![Part {
                id: "p-1".to_string(),
                work_order_id: "wo-1".to_string(),
                description: "Brake pads".to_string(),
                total_price_cents: 20_000,
            }],
        };

        assert_eq!(snapshot.labor_subtotal().cents(), 50_000);
        assert_eq!(snapshot.parts_subtotal().cents(), 20_000);
    }

    #[test]
    fn test_tax_method_default() {
        assert_eq!(TaxMethod::default(), TaxMethod::Additive);
    }
}
