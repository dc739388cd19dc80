//! # Approval Gate
//!
//! State machine governing whether a discount counts toward totals.
//!
//! ```text
//! not_required ─────────────────────────► active immediately (terminal)
//!
//! pending ──► approved   (terminal, active)
//!        └──► rejected   (terminal, excluded from totals forever,
//!                         kept visible for audit history)
//! ```
//!
//! Both transitions are exactly-once: anything other than `pending` refuses
//! with `InvalidState`. `approved_by` and `approved_at` are set together
//! here and nowhere else, which is what keeps the both-or-neither invariant.

use chrono::{DateTime, Utc};

use wrench_core::error::{PricingError, PricingResult};
use wrench_core::types::{AppliedDiscount, ApprovalState};

/// Returns an approved copy of a pending discount.
///
/// Fails with `InvalidState` when the discount is not pending.
pub fn approve(
    discount: &AppliedDiscount,
    actor: &str,
    at: DateTime<Utc>,
) -> PricingResult<AppliedDiscount> {
    require_pending(discount)?;

    let mut approved = discount.clone();
    approved.approval = ApprovalState::Approved;
    approved.approved_by = Some(actor.to_string());
    approved.approved_at = Some(at);
    Ok(approved)
}

/// Returns a rejected copy of a pending discount.
///
/// The discount is not deleted: it stays in the working set, permanently
/// excluded from totals. The rejection reason travels on the audit entry,
/// not on the discount record.
pub fn reject(discount: &AppliedDiscount) -> PricingResult<AppliedDiscount> {
    require_pending(discount)?;

    let mut rejected = discount.clone();
    rejected.approval = ApprovalState::Rejected;
    Ok(rejected)
}

fn require_pending(discount: &AppliedDiscount) -> PricingResult<()> {
    if discount.approval.is_pending() {
        Ok(())
    } else {
        Err(PricingError::InvalidState {
            discount_id: discount.id.clone(),
            state: state_name(discount.approval).to_string(),
        })
    }
}

fn state_name(state: ApprovalState) -> &'static str {
    match state {
        ApprovalState::NotRequired => "not_required",
        ApprovalState::Pending => "pending",
        ApprovalState::Approved => "approved",
        ApprovalState::Rejected => "rejected",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wrench_core::types::{DiscountOwner, DiscountValue};

    fn pending_discount() -> AppliedDiscount {
        AppliedDiscount {
            id: "d-1".to_string(),
            work_order_id: "wo-1".to_string(),
            owner: DiscountOwner::JobLine {
                job_line_id: "jl-1".to_string(),
            },
            discount_type_id: Some("dt-1".to_string()),
            discount_name: "Manager Override".to_string(),
            value: DiscountValue::Percentage(2000),
            discount_amount_cents: 10_000,
            reason: Some("comeback repair".to_string()),
            approval: ApprovalState::Pending,
            approved_by: None,
            approved_at: None,
            created_by: "tech-7".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_approve_pending() {
        let discount = pending_discount();
        let at = Utc::now();

        let approved = approve(&discount, "mgr-1", at).unwrap();

        assert_eq!(approved.approval, ApprovalState::Approved);
        assert_eq!(approved.approved_by.as_deref(), Some("mgr-1"));
        assert_eq!(approved.approved_at, Some(at));
        assert!(approved.is_active());
    }

    #[test]
    fn test_reject_pending() {
        let discount = pending_discount();

        let rejected = reject(&discount).unwrap();

        assert_eq!(rejected.approval, ApprovalState::Rejected);
        // Both approval fields stay unset
        assert!(rejected.approved_by.is_none());
        assert!(rejected.approved_at.is_none());
        assert!(!rejected.is_active());
    }

    #[test]
    fn test_approve_then_reject_is_illegal() {
        let discount = pending_discount();
        let approved = approve(&discount, "mgr-1", Utc::now()).unwrap();

        let err = reject(&approved).unwrap_err();
        assert!(matches!(err, PricingError::InvalidState { .. }));
        assert!(err.to_string().contains("approved"));
    }

    #[test]
    fn test_approve_is_exactly_once() {
        let discount = pending_discount();
        let approved = approve(&discount, "mgr-1", Utc::now()).unwrap();

        assert!(approve(&approved, "mgr-2", Utc::now()).is_err());
    }

    #[test]
    fn test_not_required_never_transitions() {
        let mut discount = pending_discount();
        discount.approval = ApprovalState::NotRequired;

        assert!(approve(&discount, "mgr-1", Utc::now()).is_err());
        assert!(reject(&discount).is_err());
    }

    #[test]
    fn test_rejected_is_terminal() {
        let discount = pending_discount();
        let rejected = reject(&discount).unwrap();

        assert!(approve(&rejected, "mgr-1", Utc::now()).is_err());
        assert!(reject(&rejected).is_err());
    }
}
