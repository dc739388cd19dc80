//! # Discount Audit Log
//!
//! Append-only record of discount lifecycle events.
//!
//! ## Lifecycle Guarantees
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Audit Trail Rules                                │
//! │                                                                         │
//! │  apply ───────► one `created` entry                                     │
//! │  modify ──────► one `modified` entry (old + new snapshots)              │
//! │  remove ──────► one `deleted` entry (old snapshot)                      │
//! │  approve ─────► one `approved` entry                                    │
//! │  reject ──────► one `rejected` entry (with the rejection reason)        │
//! │                                                                         │
//! │  Entries are never updated or deleted - the audit survives the entity. │
//! │  Deleting a discount does not touch its history.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The sink is a trait so the host application can write entries to its own
//! storage; [`MemoryAuditLog`] is the in-process implementation used in tests
//! and single-session embedding. Neither exposes any mutation of existing
//! entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use wrench_core::types::DiscountOwner;

// =============================================================================
// Audit Vocabulary
// =============================================================================

/// What happened to the discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Modified,
    Deleted,
    Approved,
    Rejected,
}

impl AuditAction {
    /// Stable string name, used in logs and stored rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Created => "created",
            AuditAction::Modified => "modified",
            AuditAction::Deleted => "deleted",
            AuditAction::Approved => "approved",
            AuditAction::Rejected => "rejected",
        }
    }
}

/// Which of the three discount shapes the entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditTable {
    JobLineDiscounts,
    PartDiscounts,
    WorkOrderDiscounts,
}

impl From<&DiscountOwner> for AuditTable {
    fn from(owner: &DiscountOwner) -> Self {
        match owner {
            DiscountOwner::JobLine { .. } => AuditTable::JobLineDiscounts,
            DiscountOwner::Part { .. } => AuditTable::PartDiscounts,
            DiscountOwner::WorkOrder { .. } => AuditTable::WorkOrderDiscounts,
        }
    }
}

// =============================================================================
// Audit Entry
// =============================================================================

/// One immutable audit row.
///
/// `old_values`/`new_values` are opaque JSON snapshots of the discount record
/// before and after the action; readers display them, the engine never parses
/// them back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    pub discount_id: String,
    pub table: AuditTable,
    pub action: AuditAction,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
    pub performed_by: String,
    pub performed_at: DateTime<Utc>,
    pub reason: Option<String>,
}

impl AuditEntry {
    /// Builds an entry with a fresh id and the current timestamp.
    pub fn new(
        discount_id: &str,
        table: AuditTable,
        action: AuditAction,
        old_values: Option<serde_json::Value>,
        new_values: Option<serde_json::Value>,
        performed_by: &str,
        reason: Option<String>,
    ) -> Self {
        AuditEntry {
            id: Uuid::new_v4().to_string(),
            discount_id: discount_id.to_string(),
            table,
            action,
            old_values,
            new_values,
            performed_by: performed_by.to_string(),
            performed_at: Utc::now(),
            reason,
        }
    }
}

// =============================================================================
// Sink
// =============================================================================

/// The audit sink rejected an entry.
///
/// The engine treats this as fatal for the operation in flight: the discount
/// mutation is not committed, so state and audit never disagree.
#[derive(Debug, Error)]
#[error("audit sink rejected entry: {0}")]
pub struct AuditError(pub String);

/// Append-only destination for audit entries.
///
/// Implementations must not reorder or drop entries; there is deliberately no
/// way to update or remove one through this trait.
pub trait AuditSink {
    fn append(&mut self, entry: AuditEntry) -> Result<(), AuditError>;
}

/// In-process audit log backed by a Vec.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Vec<AuditEntry>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of everything recorded so far, in append order.
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Entries for one discount, in append order.
    pub fn entries_for<'a>(
        &'a self,
        discount_id: &'a str,
    ) -> impl Iterator<Item = &'a AuditEntry> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.discount_id == discount_id)
    }
}

impl AuditSink for MemoryAuditLog {
    fn append(&mut self, entry: AuditEntry) -> Result<(), AuditError> {
        self.entries.push(entry);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
