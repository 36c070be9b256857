//! Notifier collaborator interface
//!
//! The notifier applies one-shot approve/deny decisions to group approval
//! notifications and records them wherever the embedding application
//! delivers notifications (chat, email, in-app inbox). Success is explicit
//! in the return value: `true` iff this call applied the decision.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::models::notification::GroupApprovalNotification;
use crate::models::user::User;
use crate::utils::errors::Result;

/// Dispatches and records approval decisions
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Apply the approve decision. Returns true iff the notification was
    /// still pending and this call consumed it.
    async fn approve_notification(
        &self,
        admin: &User,
        notification: &mut GroupApprovalNotification,
    ) -> Result<bool>;

    /// Apply the deny decision. Same one-shot contract as approval.
    async fn deny_notification(
        &self,
        admin: &User,
        notification: &mut GroupApprovalNotification,
    ) -> Result<bool>;
}

/// Callback fired after group lifecycle events so other subsystems
/// (session scheduling, file storage) can cascade cleanup. Passed at
/// construction time; no back-reference wiring after the fact.
#[async_trait]
pub trait GroupLifecycleHook: Send + Sync {
    async fn group_deleted(&self, group_id: i64) -> Result<()>;
}

/// Default notifier that applies the decision in memory and records it
/// through the tracing pipeline.
#[derive(Debug, Clone, Default)]
pub struct LoggingNotifier;

impl LoggingNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn approve_notification(
        &self,
        admin: &User,
        notification: &mut GroupApprovalNotification,
    ) -> Result<bool> {
        let applied = notification.mark_approved();
        if applied {
            info!(
                notification_id = %notification.id,
                group_id = notification.group_id,
                from_user = notification.from_user,
                admin_id = admin.id,
                "Join request approved"
            );
        } else {
            warn!(
                notification_id = %notification.id,
                admin_id = admin.id,
                "Approval ignored: notification already consumed"
            );
        }
        Ok(applied)
    }

    async fn deny_notification(
        &self,
        admin: &User,
        notification: &mut GroupApprovalNotification,
    ) -> Result<bool> {
        let applied = notification.mark_denied();
        if applied {
            info!(
                notification_id = %notification.id,
                group_id = notification.group_id,
                from_user = notification.from_user,
                admin_id = admin.id,
                "Join request denied"
            );
        } else {
            warn!(
                notification_id = %notification.id,
                admin_id = admin.id,
                "Denial ignored: notification already consumed"
            );
        }
        Ok(applied)
    }
}
