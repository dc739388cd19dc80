//! # wrench-pricing: Discount, Approval, Tax & Audit Engine
//!
//! The engine layer of WrenchFlow pricing. Sits on top of [`wrench_core`]
//! and exposes one facade, [`PricingEngine`], to the host application.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      WrenchFlow Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Host Application (web front end)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ wrench-pricing (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌─────┐ ┌────────────┐ ┌───────┐  │   │
//! │  │   │ discount │ │ approval │ │ tax │ │ aggregator │ │ audit │  │   │
//! │  │   │ amounts  │ │   gate   │ │     │ │ calculate  │ │ trail │  │   │
//! │  │   └──────────┘ └──────────┘ └─────┘ └────────────┘ └───────┘  │   │
//! │  │                        engine (facade)                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                     wrench-core (pure domain)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`discount`] - Discount amount computation and request DTOs
//! - [`approval`] - Pending → approved/rejected state machine
//! - [`tax`] - Additive and compound tax computation
//! - [`aggregator`] - Full work-order pricing breakdown ([`calculate`])
//! - [`audit`] - Append-only audit trail (sink trait + in-memory log)
//! - [`engine`] - The [`PricingEngine`] facade
//!
//! ## Design Principles
//!
//! 1. **Recompute, never patch**: `calculate` re-derives every total from the
//!    snapshot and the discount set; stored amounts are display hints only
//! 2. **Audit before commit**: a mutation that cannot be audited does not happen
//! 3. **Approval gates totals**: pending and rejected discounts are visible
//!    but contribute nothing until/unless approved

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregator;
pub mod approval;
pub mod audit;
pub mod discount;
pub mod engine;
pub mod tax;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregator::calculate;
pub use audit::{AuditAction, AuditEntry, AuditError, AuditSink, AuditTable, MemoryAuditLog};
pub use discount::{compute_discount_amount, ApplyDiscountRequest, ModifyDiscountRequest};
pub use engine::{AlwaysEditable, PricingEngine, WorkOrderGate};
pub use tax::{TaxBreakdown, TaxEngine};
