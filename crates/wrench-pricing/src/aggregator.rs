//! # Pricing Aggregator
//!
//! Orchestrates discounts and tax into one deterministic
//! [`DiscountCalculationResult`] for a work-order snapshot.
//!
//! ## Fixed Step Order (part of the contract)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. labor_subtotal  = Σ job-line totals                                 │
//! │  2. parts_subtotal  = Σ part totals                                     │
//! │  3. active job-line discounts   → labor_discounts, labor_total          │
//! │  4. active part discounts       → parts_discounts, parts_total          │
//! │  5. subtotal_before_wo = labor_total + parts_total                      │
//! │  6. active work-order discounts, in creation order, each routed by      │
//! │     applies_to against the remaining labor / parts / combined base      │
//! │  7. total_discounts = labor + parts + work-order discounts              │
//! │  8. tax on the post-discount labor/parts bases (fleet comes off first)  │
//! │  9. final_total = subtotal_before_wo − wo_discounts − fleet + tax,      │
//! │     floored at 0                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is re-derived from scratch on every call: no counters, no
//! cached running totals, no timestamps in the output. Same snapshot in,
//! byte-identical result out. Step 6 processes work-order discounts in
//! creation order (tie-broken by id) because that decides which discount
//! exhausts a capped base first.

use std::collections::HashMap;

use wrench_core::catalog::DiscountCatalog;
use wrench_core::money::Money;
use wrench_core::types::{
    AppliedDiscount, DiscountCalculationResult, DiscountOwner, TaxConfiguration,
    WorkOrderBase, WorkOrderSnapshot,
};

use crate::discount::compute_discount_amount;
use crate::tax::{effective_fleet_discount, TaxEngine};

// =============================================================================
// Base Ledger
// =============================================================================

/// Running per-owner bases while discounts are folded in.
///
/// Shared between the calculation below and the engine's apply-time amount
/// computation, so a discount's stored display amount and its effect inside
/// `calculate` come from the same arithmetic.
#[derive(Debug)]
pub(crate) struct BaseLedger {
    line_bases: HashMap<String, Money>,
    part_bases: HashMap<String, Money>,
    labor_subtotal: Money,
    parts_subtotal: Money,
    labor_discounts: Money,
    parts_discounts: Money,
    /// Labor base remaining after line discounts and labor-routed
    /// work-order discounts.
    labor_rem: Money,
    parts_rem: Money,
    /// Total-routed work-order reductions (they lower the amount owed but
    /// not the per-category tax bases).
    total_reduction: Money,
}

impl BaseLedger {
    /// Folds the active discounts of `snapshot`'s work order into running
    /// bases, in creation order.
    pub(crate) fn build(
        catalog: &DiscountCatalog,
        snapshot: &WorkOrderSnapshot,
        discounts: &[AppliedDiscount],
    ) -> Self {
        let mut ledger = BaseLedger {
            line_bases: snapshot
                .job_lines
                .iter()
                .map(|l| (l.id.clone(), l.total_amount()))
                .collect(),
            part_bases: snapshot
                .parts
                .iter()
                .map(|p| (p.id.clone(), p.total_price()))
                .collect(),
            labor_subtotal: snapshot.labor_subtotal(),
            parts_subtotal: snapshot.parts_subtotal(),
            labor_discounts: Money::zero(),
            parts_discounts: Money::zero(),
            labor_rem: Money::zero(),
            parts_rem: Money::zero(),
            total_reduction: Money::zero(),
        };

        // Creation order, tie-broken by id so the fold is total and
        // recomputation deterministic.
        let mut active: Vec<&AppliedDiscount> = discounts
            .iter()
            .filter(|d| d.is_active() && d.work_order_id == snapshot.work_order_id)
            .collect();
        active.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));

        // Line and part discounts first; each stacks on what earlier ones
        // left of its own line.
        for discount in &active {
            let cap = Self::cap_of(catalog, discount);
            match &discount.owner {
                DiscountOwner::JobLine { job_line_id } => {
                    // A dangling reference (line since removed) contributes zero
                    if let Some(base) = ledger.line_bases.get_mut(job_line_id) {
                        let amount = compute_discount_amount(&discount.value, *base, cap);
                        *base -= amount;
                        ledger.labor_discounts += amount;
                    }
                }
                DiscountOwner::Part { part_id } => {
                    if let Some(base) = ledger.part_bases.get_mut(part_id) {
                        let amount = compute_discount_amount(&discount.value, *base, cap);
                        *base -= amount;
                        ledger.parts_discounts += amount;
                    }
                }
                DiscountOwner::WorkOrder { .. } => {}
            }
        }

        ledger.labor_rem = ledger.labor_total();
        ledger.parts_rem = ledger.parts_total();

        // Work-order discounts, routed by applies_to against running bases.
        for discount in &active {
            if let DiscountOwner::WorkOrder { applies_to, .. } = &discount.owner {
                let cap = Self::cap_of(catalog, discount);
                match applies_to {
                    WorkOrderBase::Labor => {
                        let amount =
                            compute_discount_amount(&discount.value, ledger.labor_rem, cap);
                        ledger.labor_rem -= amount;
                    }
                    WorkOrderBase::Parts => {
                        let amount =
                            compute_discount_amount(&discount.value, ledger.parts_rem, cap);
                        ledger.parts_rem -= amount;
                    }
                    WorkOrderBase::Total => {
                        let amount = compute_discount_amount(
                            &discount.value,
                            ledger.combined_rem(),
                            cap,
                        );
                        ledger.total_reduction += amount;
                    }
                }
            }
        }

        ledger
    }

    /// The type's cap, when the discount references a catalog type that
    /// still resolves. A dangling type id just means no cap.
    fn cap_of(catalog: &DiscountCatalog, discount: &AppliedDiscount) -> Option<Money> {
        discount
            .discount_type_id
            .as_deref()
            .and_then(|id| catalog.resolve(id))
            .and_then(|t| t.max_discount_amount())
    }

    pub(crate) fn labor_subtotal(&self) -> Money {
        self.labor_subtotal
    }

    pub(crate) fn parts_subtotal(&self) -> Money {
        self.parts_subtotal
    }

    pub(crate) fn labor_discounts(&self) -> Money {
        self.labor_discounts
    }

    pub(crate) fn parts_discounts(&self) -> Money {
        self.parts_discounts
    }

    pub(crate) fn labor_total(&self) -> Money {
        self.labor_subtotal.sub_floor_zero(self.labor_discounts)
    }

    pub(crate) fn parts_total(&self) -> Money {
        self.parts_subtotal.sub_floor_zero(self.parts_discounts)
    }

    pub(crate) fn subtotal_before_wo_discounts(&self) -> Money {
        self.labor_total() + self.parts_total()
    }

    pub(crate) fn work_order_discounts(&self) -> Money {
        (self.labor_total() - self.labor_rem)
            + (self.parts_total() - self.parts_rem)
            + self.total_reduction
    }

    fn combined_rem(&self) -> Money {
        (self.labor_rem + self.parts_rem).sub_floor_zero(self.total_reduction)
    }

    pub(crate) fn labor_tax_base(&self) -> Money {
        self.labor_rem
    }

    pub(crate) fn parts_tax_base(&self) -> Money {
        self.parts_rem
    }

    /// The base a *new* discount attached to `owner` would compute against
    /// right now. None when the owner is not in the snapshot.
    pub(crate) fn base_for(&self, owner: &DiscountOwner) -> Option<Money> {
        match owner {
            DiscountOwner::JobLine { job_line_id } => {
                self.line_bases.get(job_line_id).copied()
            }
            DiscountOwner::Part { part_id } => self.part_bases.get(part_id).copied(),
            DiscountOwner::WorkOrder { applies_to, .. } => Some(match applies_to {
                WorkOrderBase::Labor => self.labor_rem,
                WorkOrderBase::Parts => self.parts_rem,
                WorkOrderBase::Total => self.combined_rem(),
            }),
        }
    }
}

// =============================================================================
// Calculation
// =============================================================================

/// Computes the full pricing breakdown for one work-order snapshot.
///
/// Pure and side-effect-free: all discount writes happen in the engine before
/// this runs, and only `approved`/`not_required` discounts count. Pending and
/// rejected discounts change nothing.
pub fn calculate(
    catalog: &DiscountCatalog,
    snapshot: &WorkOrderSnapshot,
    discounts: &[AppliedDiscount],
    config: &TaxConfiguration,
    is_exempt: bool,
) -> DiscountCalculationResult {
    let ledger = BaseLedger::build(catalog, snapshot, discounts);

    let subtotal_before_wo = ledger.subtotal_before_wo_discounts();
    let wo_discounts = ledger.work_order_discounts();
    let total_discounts = ledger.labor_discounts() + ledger.parts_discounts() + wo_discounts;

    let pre_tax_total = subtotal_before_wo.sub_floor_zero(wo_discounts);

    // Clamped once, against the amount actually still owed; the tax engine
    // and the reported fleet_discount_cents both use this number.
    let fleet = effective_fleet_discount(config, pre_tax_total);

    let tax = TaxEngine::compute(
        ledger.labor_tax_base(),
        ledger.parts_tax_base(),
        fleet,
        config,
        is_exempt,
    );

    let final_total = pre_tax_total.sub_floor_zero(fleet) + tax.total_tax;

    DiscountCalculationResult {
        labor_subtotal_cents: ledger.labor_subtotal().cents(),
        labor_discounts_cents: ledger.labor_discounts().cents(),
        labor_total_cents: ledger.labor_total().cents(),
        parts_subtotal_cents: ledger.parts_subtotal().cents(),
        parts_discounts_cents: ledger.parts_discounts().cents(),
        parts_total_cents: ledger.parts_total().cents(),
        work_order_discounts_cents: wo_discounts.cents(),
        subtotal_before_wo_discounts_cents: subtotal_before_wo.cents(),
        total_discounts_cents: total_discounts.cents(),
        fleet_discount_cents: fleet.cents(),
        labor_tax_cents: tax.labor_tax.cents(),
        parts_tax_cents: tax.parts_tax.cents(),
        total_tax_cents: tax.total_tax.cents(),
        final_total_cents: final_total.max(Money::zero()).cents(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
