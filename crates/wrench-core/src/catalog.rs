//! # Discount Catalog
//!
//! Read-only lookup of discount types, injected as a point-in-time snapshot.
//!
//! The catalog is configuration fetched once per calculation, never a live
//! global: `calculate` stays pure and the engine is testable without a
//! database. Inactive entries remain resolvable (an already-applied discount
//! referencing a deactivated type must still compute consistently) but are
//! excluded from offer listings.

use std::collections::HashMap;

use crate::types::DiscountType;

/// A point-in-time snapshot of the discount-type catalog.
#[derive(Debug, Clone, Default)]
pub struct DiscountCatalog {
    entries: HashMap<String, DiscountType>,
}

impl DiscountCatalog {
    /// Builds a catalog from a list of discount types.
    ///
    /// Later entries with a duplicate id replace earlier ones.
    pub fn new(types: Vec<DiscountType>) -> Self {
        DiscountCatalog {
            entries: types.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }

    /// Looks up a discount type by id. Inactive entries resolve too.
    pub fn resolve(&self, discount_type_id: &str) -> Option<&DiscountType> {
        self.entries.get(discount_type_id)
    }

    /// Discount types that may be offered for new applications.
    ///
    /// Filters out `is_active = false` entries; the host UI decides how to
    /// present them.
    pub fn offerable(&self) -> impl Iterator<Item = &DiscountType> {
        self.entries.values().filter(|t| t.is_active)
    }

    /// Number of entries, active or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
