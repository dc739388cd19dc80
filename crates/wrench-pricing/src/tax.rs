//! # Tax Engine
//!
//! Computes labor and parts tax on post-discount bases.
//!
//! ## Methods
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  additive (default)                                                     │
//! │    laborTax = laborBase × laborRate     rounded independently           │
//! │    partsTax = partsBase × partsRate     rounded independently           │
//! │    Safe for any rate combination.                                       │
//! │                                                                         │
//! │  compound                                                               │
//! │    One blended rate over the combined base (weighted by base size),     │
//! │    a single rounding, then apportioned back to labor/parts pro rata.    │
//! │    Meaningful when both rates match; a mismatch still computes but is   │
//! │    flagged by validate_tax_settings as a warning.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The fleet discount (a flat pre-tax reduction for commercial accounts) is
//! subtracted from the combined base *before* tax is computed, never after.
//! The caller clamps the configured amount once, via
//! [`effective_fleet_discount`], and passes the result in; the engine and the
//! reported `fleet_discount_cents` therefore always agree on one number.
//! Exempt customers always get zero tax regardless of configuration.

use wrench_core::money::Money;
use wrench_core::types::{TaxConfiguration, TaxMethod};

/// Per-category tax amounts for one calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaxBreakdown {
    pub labor_tax: Money,
    pub parts_tax: Money,
    pub total_tax: Money,
}

/// The fleet discount that actually applies against a combined base:
/// non-negative and never more than the base itself.
pub fn effective_fleet_discount(config: &TaxConfiguration, combined_base: Money) -> Money {
    config
        .fleet_discount()
        .max(Money::zero())
        .min(combined_base.max(Money::zero()))
}

/// Stateless tax calculator.
pub struct TaxEngine;

impl TaxEngine {
    /// Computes tax on the post-discount labor and parts bases.
    ///
    /// `fleet_discount` is the already-clamped effective amount (see
    /// [`effective_fleet_discount`]); it must not exceed the combined base.
    ///
    /// Total function over validated configuration: never fails for
    /// business-data reasons. Out-of-range rates are stopped upstream by
    /// `validate_tax_settings` before a configuration is ever saved.
    pub fn compute(
        labor_base: Money,
        parts_base: Money,
        fleet_discount: Money,
        config: &TaxConfiguration,
        is_exempt: bool,
    ) -> TaxBreakdown {
        if is_exempt {
            return TaxBreakdown::default();
        }

        // Fleet reduction comes off the combined base first, split pro rata
        // so labor share + parts share equals the whole reduction exactly.
        let combined = labor_base + parts_base;
        let fleet = fleet_discount.max(Money::zero()).min(combined.max(Money::zero()));
        let fleet_labor = fleet.pro_rata(labor_base, combined);
        let labor_base = labor_base.sub_floor_zero(fleet_labor);
        let parts_base = parts_base.sub_floor_zero(fleet - fleet_labor);

        // Per-category gating zeroes a disabled base entirely.
        let labor_base = if config.apply_tax_to_labor {
            labor_base
        } else {
            Money::zero()
        };
        let parts_base = if config.apply_tax_to_parts {
            parts_base
        } else {
            Money::zero()
        };

        match config.method {
            TaxMethod::Additive => {
                let labor_tax = labor_base.percent_of(config.labor_tax_rate());
                let parts_tax = parts_base.percent_of(config.parts_tax_rate());
                TaxBreakdown {
                    labor_tax,
                    parts_tax,
                    total_tax: labor_tax + parts_tax,
                }
            }
            TaxMethod::Compound => Self::compute_compound(labor_base, parts_base, config),
        }
    }

    /// Blended-rate computation: one rounding over the combined base, then
    /// apportioned back in proportion to base size.
    fn compute_compound(
        labor_base: Money,
        parts_base: Money,
        config: &TaxConfiguration,
    ) -> TaxBreakdown {
        let combined = labor_base + parts_base;
        if combined.is_zero() {
            return TaxBreakdown::default();
        }

        // combined × weighted_rate == labor×laborRate + parts×partsRate,
        // so compute the numerator exactly and round once (half-up).
        let numerator = labor_base.cents() as i128 * config.labor_tax_rate_bps as i128
            + parts_base.cents() as i128 * config.parts_tax_rate_bps as i128;
        let total_tax = Money::from_cents(((numerator + 5000) / 10000) as i64);

        let labor_tax = total_tax.pro_rata(labor_base, combined);
        TaxBreakdown {
            labor_tax,
            parts_tax: total_tax - labor_tax,
            total_tax,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config(labor_bps: u32, parts_bps: u32, method: TaxMethod) -> TaxConfiguration {
        TaxConfiguration {
            labor_tax_rate_bps: labor_bps,
            parts_tax_rate_bps: parts_bps,
            apply_tax_to_labor: true,
            apply_tax_to_parts: true,
            method,
            tax_description: "State sales tax".to_string(),
            fleet_discount_cents: 0,
        }
    }

    #[test]
    fn test_additive_independent_rounding() {
        // $450.00 at 8% = $36.00, $200.00 at 6% = $12.00
        let breakdown = TaxEngine::compute(
            Money::from_cents(45_000),
            Money::from_cents(20_000),
            Money::zero(),
            &config(800, 600, TaxMethod::Additive),
            false,
        );

        assert_eq!(breakdown.labor_tax.cents(), 3_600);
        assert_eq!(breakdown.parts_tax.cents(), 1_200);
        assert_eq!(breakdown.total_tax.cents(), 4_800);
    }

    #[test]
    fn test_exempt_customer_pays_no_tax() {
        let breakdown = TaxEngine::compute(
            Money::from_cents(45_000),
            Money::from_cents(20_000),
            Money::zero(),
            &config(800, 600, TaxMethod::Additive),
            true,
        );

        assert_eq!(breakdown, TaxBreakdown::default());
    }

    #[test]
    fn test_category_gating() {
        let mut cfg = config(800, 600, TaxMethod::Additive);
        cfg.apply_tax_to_labor = false;

        let breakdown = TaxEngine::compute(
            Money::from_cents(45_000),
            Money::from_cents(20_000),
            Money::zero(),
            &cfg,
            false,
        );

        assert!(breakdown.labor_tax.is_zero());
        assert_eq!(breakdown.parts_tax.cents(), 1_200);
    }

    #[test]
    fn test_both_categories_disabled() {
        let mut cfg = config(800, 600, TaxMethod::Additive);
        cfg.apply_tax_to_labor = false;
        cfg.apply_tax_to_parts = false;

        let breakdown = TaxEngine::compute(
            Money::from_cents(45_000),
            Money::from_cents(20_000),
            Money::zero(),
            &cfg,
            false,
        );

        assert_eq!(breakdown, TaxBreakdown::default());
    }

    #[test]
    fn test_compound_equal_rates_matches_additive_total() {
        let additive = TaxEngine::compute(
            Money::from_cents(45_000),
            Money::from_cents(20_000),
            Money::zero(),
            &config(800, 800, TaxMethod::Additive),
            false,
        );
        let compound = TaxEngine::compute(
            Money::from_cents(45_000),
            Money::from_cents(20_000),
            Money::zero(),
            &config(800, 800, TaxMethod::Compound),
            false,
        );

        // With equal rates the blended total can differ from the per-category
        // sum by at most the one saved rounding step.
        let diff = (additive.total_tax.cents() - compound.total_tax.cents()).abs();
        assert!(diff <= 1);
        assert_eq!(
            compound.total_tax,
            compound.labor_tax + compound.parts_tax
        );
    }

    #[test]
    fn test_compound_divergent_rates_blends() {
        // 8% on 450.00 + 6% on 200.00 = 36.00 + 12.00, blended in one pass
        let breakdown = TaxEngine::compute(
            Money::from_cents(45_000),
            Money::from_cents(20_000),
            Money::zero(),
            &config(800, 600, TaxMethod::Compound),
            false,
        );

        assert_eq!(breakdown.total_tax.cents(), 4_800);
        // Apportioned by base size: 4800 × 450/650 = 3323.07 → 3323
        assert_eq!(breakdown.labor_tax.cents(), 3_323);
        assert_eq!(breakdown.parts_tax.cents(), 1_477);
    }

    #[test]
    fn test_compound_zero_base() {
        let breakdown = TaxEngine::compute(
            Money::zero(),
            Money::zero(),
            Money::zero(),
            &config(800, 600, TaxMethod::Compound),
            false,
        );
        assert_eq!(breakdown, TaxBreakdown::default());
    }

    #[test]
    fn test_fleet_discount_reduces_base_before_tax() {
        // $400 labor + $100 parts, fleet $100 split 80/20 → bases 320/80
        let breakdown = TaxEngine::compute(
            Money::from_cents(40_000),
            Money::from_cents(10_000),
            Money::from_cents(10_000),
            &config(1000, 1000, TaxMethod::Additive),
            false,
        );

        assert_eq!(breakdown.labor_tax.cents(), 3_200);
        assert_eq!(breakdown.parts_tax.cents(), 800);
    }

    #[test]
    fn test_effective_fleet_discount_clamps_to_base() {
        let cfg = config(1000, 1000, TaxMethod::Additive);
        assert_eq!(
            effective_fleet_discount(&cfg, Money::from_cents(5_000)).cents(),
            0
        );

        let mut cfg = cfg;
        cfg.fleet_discount_cents = 10_000;
        assert_eq!(
            effective_fleet_discount(&cfg, Money::from_cents(5_000)).cents(),
            5_000
        );
        // Never negative either
        cfg.fleet_discount_cents = -500;
        assert!(effective_fleet_discount(&cfg, Money::from_cents(5_000)).is_zero());
    }

    #[test]
    fn test_fleet_covering_the_whole_base_zeroes_tax() {
        let breakdown = TaxEngine::compute(
            Money::from_cents(3_000),
            Money::from_cents(2_000),
            Money::from_cents(5_000),
            &config(1000, 1000, TaxMethod::Additive),
            false,
        );
        assert_eq!(breakdown.total_tax.cents(), 0);
    }
}
