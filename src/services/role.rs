//! Role service implementation
//!
//! This service handles role assignment within a group: admin checks,
//! promotion and demotion. Mutations are written through to storage
//! before the in-memory group is touched, so the snapshot never diverges
//! from persisted state on success and stays unchanged on failure.

use std::sync::Arc;

use tracing::{info, debug};

use crate::models::group::{Group, GroupRole};
use crate::models::user::User;
use crate::services::authorization::AuthorizationService;
use crate::storage::GroupStore;
use crate::utils::errors::{StudyBuddyError, Result};

/// Role service for managing per-group privileges
#[derive(Clone)]
pub struct RoleService {
    groups: Arc<dyn GroupStore>,
    authorization: AuthorizationService,
}

impl RoleService {
    /// Create a new RoleService instance
    pub fn new(groups: Arc<dyn GroupStore>, authorization: AuthorizationService) -> Self {
        Self { groups, authorization }
    }

    /// True iff the user is the identity-equal owner or the role map says
    /// admin.
    pub fn is_admin(&self, group: &Group, user: &User) -> bool {
        self.authorization.has_admin_privileges(user, group)
    }

    /// Tri-state role lookup, delegated to the authorization service
    pub fn get_user_role(&self, group: &Group, user: &User) -> Option<GroupRole> {
        self.authorization.user_role(user, group)
    }

    /// Promote a member to admin. Requires admin privilege from the
    /// promoter; the storage write is conditional on the target currently
    /// being an ordinary member.
    pub async fn promote_to_admin(&self, group: &mut Group, promoter: &User, target_id: i64) -> Result<()> {
        debug!(group_id = group.id(), promoter_id = promoter.id, target_id = target_id, "Promoting member to admin");

        if !self.is_admin(group, promoter) {
            return Err(StudyBuddyError::PermissionDenied(
                format!("User {} is not an admin of group {}", promoter.username, group.name)
            ));
        }

        let promoted = self.groups.promote_to_admin(group.id(), target_id, promoter.id).await?;
        if !promoted {
            return Err(StudyBuddyError::Conflict(
                format!("User {} could not be promoted in group {}", target_id, group.name)
            ));
        }

        group.set_role_entry(target_id, GroupRole::Admin);
        info!(group_id = group.id(), promoter_id = promoter.id, target_id = target_id, "Member promoted to admin");
        Ok(())
    }

    /// Demote an admin back to member. The owner can never be demoted;
    /// that is decided by identity comparison, not by the role map.
    pub async fn demote_admin(&self, group: &mut Group, demoter: &User, target_id: i64) -> Result<()> {
        debug!(group_id = group.id(), demoter_id = demoter.id, target_id = target_id, "Demoting admin to member");

        if !self.is_admin(group, demoter) {
            return Err(StudyBuddyError::PermissionDenied(
                format!("User {} is not an admin of group {}", demoter.username, group.name)
            ));
        }

        if group.is_owner(target_id) {
            return Err(StudyBuddyError::PermissionDenied(
                format!("The owner of group {} cannot be demoted", group.name)
            ));
        }

        let demoted = self.groups.demote_admin(group.id(), target_id, demoter.id).await?;
        if !demoted {
            return Err(StudyBuddyError::Conflict(
                format!("User {} is not currently an admin of group {}", target_id, group.name)
            ));
        }

        group.set_role_entry(target_id, GroupRole::Member);
        info!(group_id = group.id(), demoter_id = demoter.id, target_id = target_id, "Admin demoted to member");
        Ok(())
    }
}
