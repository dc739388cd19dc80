//! # Pricing Engine Facade
//!
//! The surface the rest of the application talks to.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      PricingEngine Operations                           │
//! │                                                                         │
//! │  apply_discount ────► validate → compute amount → audit → commit       │
//! │  modify_discount ───► validate → recompute      → audit → commit       │
//! │  remove_discount ───► locate   →                  audit → commit       │
//! │  approve_discount ──► gate transition           → audit → commit       │
//! │  reject_discount ───► gate transition           → audit → commit       │
//! │  calculate_pricing ─► pure read, no writes, no audit                   │
//! │                                                                         │
//! │  The audit append happens BEFORE the in-memory commit. If the sink     │
//! │  refuses the entry the mutation is abandoned and the caller gets a     │
//! │  ConsistencyFault - discount state and audit trail never disagree.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Collaborators are injected: the discount-type catalog as a point-in-time
//! snapshot, the audit sink, and the work-order editability probe. The engine
//! never touches storage or the status workflow directly.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use wrench_core::catalog::DiscountCatalog;
use wrench_core::error::{PricingError, PricingResult, ValidationError};
use wrench_core::types::{
    AppliedDiscount, ApprovalState, DiscountCalculationResult, DiscountOwner,
    TaxConfiguration, TaxValidationResult, WorkOrderSnapshot,
};
use wrench_core::validation::{validate_discount_value, validate_reason, validate_tax_settings};

use crate::aggregator::{self, BaseLedger};
use crate::approval;
use crate::audit::{AuditAction, AuditEntry, AuditSink, AuditTable};
use crate::discount::{
    compute_discount_amount, scope_allows, ApplyDiscountRequest, ModifyDiscountRequest,
};

// =============================================================================
// Work Order Editability Gate
// =============================================================================

/// Read-only probe into the work-order status workflow.
///
/// Closed/invoiced work orders reject discount edits; the workflow itself
/// lives in the host application.
pub trait WorkOrderGate {
    fn is_editable(&self, work_order_id: &str) -> bool;
}

/// Gate that treats every work order as editable. For tests and hosts that
/// enforce editability upstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysEditable;

impl WorkOrderGate for AlwaysEditable {
    fn is_editable(&self, _work_order_id: &str) -> bool {
        true
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Pricing, discount & tax engine for work orders.
///
/// Owns the working set of applied discounts across work orders; callers
/// persist returned records however they like and feed job lines/parts back
/// in as snapshots.
pub struct PricingEngine<S: AuditSink, G: WorkOrderGate> {
    catalog: DiscountCatalog,
    discounts: Vec<AppliedDiscount>,
    audit: S,
    gate: G,
}

impl<S: AuditSink, G: WorkOrderGate> PricingEngine<S, G> {
    pub fn new(catalog: DiscountCatalog, audit: S, gate: G) -> Self {
        PricingEngine {
            catalog,
            discounts: Vec::new(),
            audit,
            gate,
        }
    }

    /// The injected catalog snapshot.
    pub fn catalog(&self) -> &DiscountCatalog {
        &self.catalog
    }

    /// The audit sink (read access for hosts that embed `MemoryAuditLog`).
    pub fn audit(&self) -> &S {
        &self.audit
    }

    /// Looks up a discount in the working set.
    pub fn discount(&self, discount_id: &str) -> Option<&AppliedDiscount> {
        self.discounts.iter().find(|d| d.id == discount_id)
    }

    /// All discounts attached to one work order, in creation order.
    pub fn discounts_for(&self, work_order_id: &str) -> Vec<&AppliedDiscount> {
        self.discounts
            .iter()
            .filter(|d| d.work_order_id == work_order_id)
            .collect()
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Attaches a discount to a job line, part, or work order.
    ///
    /// Validates the request against the catalog and the snapshot, computes
    /// the discount amount against the owner's current remaining base, and
    /// records one `created` audit entry. A discount whose type requires
    /// approval starts `pending`: its amount is stored for display but it
    /// contributes nothing to totals until approved.
    pub fn apply_discount(
        &mut self,
        snapshot: &WorkOrderSnapshot,
        request: ApplyDiscountRequest,
        actor: &str,
    ) -> PricingResult<AppliedDiscount> {
        if !self.gate.is_editable(&snapshot.work_order_id) {
            return Err(PricingError::WorkOrderLocked(snapshot.work_order_id.clone()));
        }

        // Resolve name / value / approval / cap from the catalog type, or
        // from the request itself for an ad hoc discount.
        let (name, value, requires_approval, cap) = match &request.discount_type_id {
            Some(type_id) => {
                let discount_type = self
                    .catalog
                    .resolve(type_id)
                    .ok_or_else(|| PricingError::DiscountTypeNotFound(type_id.clone()))?;
                if !scope_allows(discount_type.applies_to, &request.owner) {
                    return Err(ValidationError::ScopeMismatch {
                        discount_type: discount_type.name.clone(),
                        scope: owner_scope_name(&request.owner).to_string(),
                    }
                    .into());
                }
                (
                    request.name.clone().unwrap_or_else(|| discount_type.name.clone()),
                    request.value.unwrap_or(discount_type.default_value),
                    discount_type.requires_approval,
                    discount_type.max_discount_amount(),
                )
            }
            None => {
                let name = request.name.clone().ok_or(ValidationError::Required {
                    field: "discount_name".to_string(),
                })?;
                let value = request.value.ok_or(ValidationError::Required {
                    field: "value".to_string(),
                })?;
                (name, value, request.requires_approval, None)
            }
        };

        validate_discount_value(&value)?;
        if requires_approval {
            validate_reason(request.reason.as_deref())?;
        }

        let base = self
            .owner_base(snapshot, &request.owner)
            .ok_or_else(|| PricingError::OwnerNotFound(owner_id(&request.owner).to_string()))?;
        let amount = compute_discount_amount(&value, base, cap);

        let discount = AppliedDiscount {
            id: Uuid::new_v4().to_string(),
            work_order_id: snapshot.work_order_id.clone(),
            owner: request.owner,
            discount_type_id: request.discount_type_id,
            discount_name: name,
            value,
            discount_amount_cents: amount.cents(),
            reason: request.reason,
            approval: if requires_approval {
                ApprovalState::Pending
            } else {
                ApprovalState::NotRequired
            },
            approved_by: None,
            approved_at: None,
            created_by: actor.to_string(),
            created_at: Utc::now(),
        };

        self.record(
            &discount.id,
            (&discount.owner).into(),
            AuditAction::Created,
            None,
            Some(snapshot_of(&discount)),
            actor,
            None,
        )?;

        info!(
            discount_id = %discount.id,
            work_order_id = %discount.work_order_id,
            amount_cents = discount.discount_amount_cents,
            pending = requires_approval,
            "discount applied"
        );
        self.discounts.push(discount.clone());
        Ok(discount)
    }

    /// Changes a discount's value and/or reason.
    ///
    /// The amount is recomputed against the owner's current base. Approval
    /// attaches to the discount record, not to a specific value: modifying
    /// an approved discount does not send it back through approval. Rejected
    /// discounts are frozen.
    pub fn modify_discount(
        &mut self,
        snapshot: &WorkOrderSnapshot,
        discount_id: &str,
        request: ModifyDiscountRequest,
        actor: &str,
    ) -> PricingResult<AppliedDiscount> {
        let index = self.index_of(discount_id)?;
        let existing = &self.discounts[index];

        if !self.gate.is_editable(&existing.work_order_id) {
            return Err(PricingError::WorkOrderLocked(existing.work_order_id.clone()));
        }
        if existing.approval == ApprovalState::Rejected {
            return Err(PricingError::InvalidState {
                discount_id: discount_id.to_string(),
                state: "rejected".to_string(),
            });
        }

        let value = request.value.unwrap_or(existing.value);
        validate_discount_value(&value)?;
        if existing.approval == ApprovalState::Pending {
            // A pending discount must keep a justification on file
            validate_reason(
                request
                    .reason
                    .as_deref()
                    .or(existing.reason.as_deref()),
            )?;
        }

        // Base excludes this discount itself: its replacement value computes
        // against what the other discounts leave behind.
        let others: Vec<AppliedDiscount> = self
            .discounts
            .iter()
            .filter(|d| d.id != discount_id)
            .cloned()
            .collect();
        let ledger = BaseLedger::build(&self.catalog, snapshot, &others);
        let base = ledger
            .base_for(&existing.owner)
            .ok_or_else(|| PricingError::OwnerNotFound(owner_id(&existing.owner).to_string()))?;

        let cap = existing
            .discount_type_id
            .as_deref()
            .and_then(|id| self.catalog.resolve(id))
            .and_then(|t| t.max_discount_amount());

        let mut updated = existing.clone();
        updated.value = value;
        updated.discount_amount_cents = compute_discount_amount(&value, base, cap).cents();
        if let Some(reason) = request.reason {
            updated.reason = Some(reason);
        }

        let old = snapshot_of(existing);
        self.record(
            discount_id,
            (&updated.owner).into(),
            AuditAction::Modified,
            Some(old),
            Some(snapshot_of(&updated)),
            actor,
            None,
        )?;

        info!(discount_id = %discount_id, amount_cents = updated.discount_amount_cents, "discount modified");
        self.discounts[index] = updated.clone();
        Ok(updated)
    }

    /// Deletes a discount from the working set.
    ///
    /// The audit history survives the entity: prior entries stay, plus one
    /// final `deleted` entry.
    pub fn remove_discount(&mut self, discount_id: &str, actor: &str) -> PricingResult<()> {
        let index = self.index_of(discount_id)?;
        let existing = &self.discounts[index];

        if !self.gate.is_editable(&existing.work_order_id) {
            return Err(PricingError::WorkOrderLocked(existing.work_order_id.clone()));
        }

        let table: AuditTable = (&existing.owner).into();
        let old = snapshot_of(existing);
        self.record(
            discount_id,
            table,
            AuditAction::Deleted,
            Some(old),
            None,
            actor,
            None,
        )?;

        info!(discount_id = %discount_id, "discount removed");
        self.discounts.remove(index);
        Ok(())
    }

    /// Approves a pending discount; it starts counting toward totals.
    pub fn approve_discount(
        &mut self,
        discount_id: &str,
        actor: &str,
    ) -> PricingResult<AppliedDiscount> {
        let index = self.index_of(discount_id)?;
        let existing = &self.discounts[index];

        let approved = approval::approve(existing, actor, Utc::now()).inspect_err(|_| {
            warn!(discount_id = %discount_id, "approve refused: discount not pending");
        })?;

        let old = snapshot_of(existing);
        self.record(
            discount_id,
            (&approved.owner).into(),
            AuditAction::Approved,
            Some(old),
            Some(snapshot_of(&approved)),
            actor,
            None,
        )?;

        info!(discount_id = %discount_id, approved_by = %actor, "discount approved");
        self.discounts[index] = approved.clone();
        Ok(approved)
    }

    /// Rejects a pending discount; it is kept for audit history but will
    /// never count toward totals.
    pub fn reject_discount(
        &mut self,
        discount_id: &str,
        actor: &str,
        reason: &str,
    ) -> PricingResult<AppliedDiscount> {
        validate_reason(Some(reason))?;
        let index = self.index_of(discount_id)?;
        let existing = &self.discounts[index];

        let rejected = approval::reject(existing).inspect_err(|_| {
            warn!(discount_id = %discount_id, "reject refused: discount not pending");
        })?;

        let old = snapshot_of(existing);
        self.record(
            discount_id,
            (&rejected.owner).into(),
            AuditAction::Rejected,
            Some(old),
            Some(snapshot_of(&rejected)),
            actor,
            Some(reason.to_string()),
        )?;

        info!(discount_id = %discount_id, rejected_by = %actor, "discount rejected");
        self.discounts[index] = rejected.clone();
        Ok(rejected)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Computes the full pricing breakdown for a snapshot. Pure read: no
    /// state change, no audit entry, identical output for identical input.
    pub fn calculate_pricing(
        &self,
        snapshot: &WorkOrderSnapshot,
        config: &TaxConfiguration,
        is_exempt: bool,
    ) -> DiscountCalculationResult {
        aggregator::calculate(&self.catalog, snapshot, &self.discounts, config, is_exempt)
    }

    /// Validates tax settings before the host saves them.
    pub fn validate_tax_settings(&self, config: &TaxConfiguration) -> TaxValidationResult {
        validate_tax_settings(config)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn index_of(&self, discount_id: &str) -> PricingResult<usize> {
        self.discounts
            .iter()
            .position(|d| d.id == discount_id)
            .ok_or_else(|| PricingError::DiscountNotFound(discount_id.to_string()))
    }

    /// The base a new discount on `owner` computes against, given the active
    /// discounts already attached to this work order.
    fn owner_base(
        &self,
        snapshot: &WorkOrderSnapshot,
        owner: &DiscountOwner,
    ) -> Option<wrench_core::Money> {
        if let DiscountOwner::WorkOrder { work_order_id, .. } = owner {
            if *work_order_id != snapshot.work_order_id {
                return None;
            }
        }
        let ledger = BaseLedger::build(&self.catalog, snapshot, &self.discounts);
        ledger.base_for(owner)
    }

    /// Appends one audit entry, mapping a sink refusal to ConsistencyFault.
    /// Callers commit their state change only after this returns Ok.
    #[allow(clippy::too_many_arguments)]
    fn record(
        &mut self,
        discount_id: &str,
        table: AuditTable,
        action: AuditAction,
        old_values: Option<serde_json::Value>,
        new_values: Option<serde_json::Value>,
        actor: &str,
        reason: Option<String>,
    ) -> PricingResult<()> {
        let entry = AuditEntry::new(
            discount_id,
            table,
            action,
            old_values,
            new_values,
            actor,
            reason,
        );
        self.audit.append(entry).map_err(|e| {
            warn!(discount_id = %discount_id, action = action.as_str(), error = %e, "audit append failed; mutation abandoned");
            PricingError::ConsistencyFault {
                discount_id: discount_id.to_string(),
                action: action.as_str().to_string(),
            }
        })
    }
}

/// Opaque JSON snapshot of a discount record for the audit trail.
fn snapshot_of(discount: &AppliedDiscount) -> serde_json::Value {
    // AppliedDiscount serializes infallibly (no maps with non-string keys)
    serde_json::to_value(discount).unwrap_or(serde_json::Value::Null)
}

fn owner_id(owner: &DiscountOwner) -> &str {
    match owner {
        DiscountOwner::JobLine { job_line_id } => job_line_id,
        DiscountOwner::Part { part_id } => part_id,
        DiscountOwner::WorkOrder { work_order_id, .. } => work_order_id,
    }
}

fn owner_scope_name(owner: &DiscountOwner) -> &'static str {
    match owner {
        DiscountOwner::JobLine { .. } => "labor",
        DiscountOwner::Part { .. } => "parts",
        DiscountOwner::WorkOrder { .. } => "work_order",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
