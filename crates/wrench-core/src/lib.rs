//! # wrench-core: Pure Domain Layer for WrenchFlow Pricing
//!
//! This crate is the foundation of the WrenchFlow pricing engine. It contains
//! the domain types and pure validation logic with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      WrenchFlow Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Host Application (web front end)                │   │
//! │  │   work orders • customers • inventory • invoicing UI            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    wrench-pricing (engine)                      │   │
//! │  │   discount application • approval gate • tax • audit log        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ wrench-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │   types   │  │  catalog  │  │ validation│  │   │
//! │  │   │Money/Pct  │  │ discounts │  │  snapshot │  │ tax rules │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money and Percent with integer arithmetic (no floating point!)
//! - [`types`] - Domain types (AppliedDiscount, TaxConfiguration, ...)
//! - [`catalog`] - Point-in-time discount-type catalog snapshot
//! - [`error`] - Domain error types
//! - [`validation`] - Discount value and tax-settings validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every function is deterministic - same input = same output
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are cents (i64), rates are basis points
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use wrench_core::Money` instead of
// `use wrench_core::money::Money`

pub use catalog::DiscountCatalog;
pub use error::{PricingError, PricingResult, ValidationError};
pub use money::{Money, Percent};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum rate in basis points (100%) for discounts and tax rates.
pub const MAX_RATE_BPS: u32 = 10000;

/// Tax rates above this (15%) are flagged with a warning at save time.
///
/// ## Business Reason
/// Combined US sales tax rates top out around 12-13%; anything higher is
/// almost always a data-entry mistake, but a shop may override.
pub const HIGH_RATE_WARNING_BPS: u32 = 1500;
