//! Group approval notification model
//!
//! Carries a pending approve/deny decision between a requesting user and
//! the group's admins. The decision is a single tagged variant, so
//! "approved and denied at once" is unrepresentable, and each notification
//! is consumed at most once.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One-shot decision state of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalDecision {
    Pending,
    Approved,
    Denied,
}

/// Notification raised when a join request needs a human decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupApprovalNotification {
    pub id: Uuid,
    /// The requesting user.
    pub from_user: i64,
    /// The group whose admins must decide.
    pub group_id: i64,
    /// The join request this notification was raised for.
    pub request_id: Uuid,
    decision: ApprovalDecision,
    pub created_at: DateTime<Utc>,
}

impl GroupApprovalNotification {
    pub fn new(from_user: i64, group_id: i64, request_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_user,
            group_id,
            request_id,
            decision: ApprovalDecision::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn decision(&self) -> ApprovalDecision {
        self.decision
    }

    pub fn is_pending(&self) -> bool {
        self.decision == ApprovalDecision::Pending
    }

    pub fn is_approved(&self) -> bool {
        self.decision == ApprovalDecision::Approved
    }

    pub fn is_denied(&self) -> bool {
        self.decision == ApprovalDecision::Denied
    }

    /// Apply the approve decision. Returns true iff this call performed the
    /// transition; an already-consumed notification is left untouched.
    pub fn mark_approved(&mut self) -> bool {
        if self.decision != ApprovalDecision::Pending {
            return false;
        }
        self.decision = ApprovalDecision::Approved;
        true
    }

    /// Apply the deny decision. Same one-shot contract as `mark_approved`.
    pub fn mark_denied(&mut self) -> bool {
        if self.decision != ApprovalDecision::Pending {
            return false;
        }
        self.decision = ApprovalDecision::Denied;
        true
    }
}
