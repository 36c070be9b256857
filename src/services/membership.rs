//! Membership service implementation
//!
//! This service orchestrates group CRUD and the membership lifecycle:
//! joining, the approval workflow for restricted groups, kicking, and
//! deletion. Permission and validation checks run before any mutation is
//! attempted, and storage writes always precede the in-memory mirror.

use std::sync::Arc;

use regex::Regex;
use tracing::debug;
use uuid::Uuid;

use crate::config::Settings;
use crate::models::group::{Group, GroupRole, CreateGroupRequest};
use crate::models::join_request::{JoinRequest, JoinRequestStatus};
use crate::models::notification::GroupApprovalNotification;
use crate::models::user::User;
use crate::services::notifier::{Notifier, GroupLifecycleHook};
use crate::services::role::RoleService;
use crate::storage::{GroupStore, JoinRequestStore, UserStore};
use crate::utils::errors::{StudyBuddyError, Result};
use crate::utils::logging::{log_admin_action, log_group_event, log_join_request, log_membership_change};

/// What a `join_group` call did.
///
/// `Unchanged` is the intentional idempotent no-op for a user who is
/// already a member or already has a pending request; it is not an error,
/// but callers can still tell it apart from a fresh join or request.
#[derive(Debug)]
pub enum JoinOutcome {
    /// The user was added to the group directly (approval not required).
    Joined,
    /// A join request was created and awaits an admin decision.
    ApprovalRequested {
        request: JoinRequest,
        notification: GroupApprovalNotification,
    },
    /// Nothing happened: already a member or already pending.
    Unchanged,
}

/// Membership service for group and membership operations
#[derive(Clone)]
pub struct MembershipService {
    groups: Arc<dyn GroupStore>,
    join_requests: Arc<dyn JoinRequestStore>,
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
    roles: RoleService,
    settings: Settings,
    name_pattern: Regex,
    lifecycle_hook: Option<Arc<dyn GroupLifecycleHook>>,
}

impl MembershipService {
    /// Create a new MembershipService instance
    pub fn new(
        groups: Arc<dyn GroupStore>,
        join_requests: Arc<dyn JoinRequestStore>,
        users: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
        roles: RoleService,
        settings: Settings,
    ) -> Result<Self> {
        let name_pattern = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 _-]*$")
            .map_err(|e| StudyBuddyError::Config(format!("Invalid group name pattern: {}", e)))?;

        Ok(Self {
            groups,
            join_requests,
            users,
            notifier,
            roles,
            settings,
            name_pattern,
            lifecycle_hook: None,
        })
    }

    /// Attach the lifecycle hook that cascades group deletion into other
    /// subsystems (session cleanup). Wired at construction time.
    pub fn with_lifecycle_hook(mut self, hook: Arc<dyn GroupLifecycleHook>) -> Self {
        self.lifecycle_hook = Some(hook);
        self
    }

    /// Create a new group with the owner auto-added as its first member.
    ///
    /// The group id is assigned by the storage layer; a failed persist
    /// leaves no group behind.
    pub async fn create_group(&self, request: CreateGroupRequest, owner: &User) -> Result<Group> {
        debug!(owner_id = owner.id, name = %request.name, "Creating group");

        self.validate_group_fields(&request.name, &request.description)?;

        if self.groups.exists_by_name(&request.name).await? {
            return Err(StudyBuddyError::DuplicateGroup { name: request.name });
        }

        let mut group = Group::new(
            request.name,
            request.description,
            request.require_approval,
            owner.id,
        );

        let group_id = self.groups.add_group(&group).await?;
        group.set_id(group_id);

        log_group_event(group_id, "created", Some(owner.id), None);
        Ok(group)
    }

    /// Toggle the approval requirement.
    ///
    /// No permission check at this layer: callers must have verified
    /// `can_edit_group_settings` upstream.
    pub async fn set_require_approval(&self, group: &mut Group, flag: bool) -> Result<()> {
        self.groups.set_require_approval(group.id(), flag).await?;
        group.require_approval = flag;

        log_group_event(group.id(), "require_approval_changed", None, Some(if flag { "on" } else { "off" }));
        Ok(())
    }

    /// Directly add a user by username, bypassing the join workflow.
    /// Only the identity-equal owner may do this.
    pub async fn add_member(&self, group: &mut Group, requester: &User, username: &str) -> Result<User> {
        debug!(group_id = group.id(), requester_id = requester.id, username = %username, "Adding member directly");

        if !group.is_owner(requester.id) {
            return Err(StudyBuddyError::PermissionDenied(
                format!("Only the owner of group {} can add members directly", group.name)
            ));
        }

        let user = self.users.find_by_username(username).await?
            .ok_or_else(|| StudyBuddyError::UserNotFound { username: username.to_string() })?;

        if self.join_requests.is_user_member_of_group(group.id(), user.id).await? {
            return Err(StudyBuddyError::Conflict(
                format!("User {} is already a member of group {}", user.username, group.name)
            ));
        }

        self.groups.add_to_group(group.id(), user.id).await?;
        group.add_member_entry(user.id, GroupRole::Member);

        log_membership_change(group.id(), user.id, "added", requester.id);
        Ok(user)
    }

    /// Join a group, or request to join when approval is required.
    ///
    /// Open groups add the member immediately; callers must not
    /// double-invoke for a user who is already a member (the membership
    /// uniqueness constraint rejects the second write). Restricted groups
    /// get exactly one pending request per user: repeat calls while a
    /// request is pending, or calls from an existing member, return
    /// `JoinOutcome::Unchanged` without error so join attempts are safely
    /// repeatable from a UI.
    pub async fn join_group(&self, group: &mut Group, user: &User) -> Result<JoinOutcome> {
        debug!(group_id = group.id(), user_id = user.id, require_approval = group.require_approval, "Join attempt");

        if !group.require_approval {
            self.groups.add_to_group(group.id(), user.id).await?;
            group.add_member_entry(user.id, GroupRole::Member);

            log_membership_change(group.id(), user.id, "joined", user.id);
            return Ok(JoinOutcome::Joined);
        }

        if self.join_requests.is_user_member_of_group(group.id(), user.id).await?
            || self.join_requests.has_user_requested_to_join(group.id(), user.id).await?
        {
            debug!(group_id = group.id(), user_id = user.id, "Join attempt is a no-op");
            return Ok(JoinOutcome::Unchanged);
        }

        let request = self.join_requests.create_join_request(group.id(), user.id).await?;
        let notification = GroupApprovalNotification::new(user.id, group.id(), request.id);

        log_join_request(group.id(), user.id, request.status.as_str(), None);
        Ok(JoinOutcome::ApprovalRequested { request, notification })
    }

    /// Approve a join request through its notification.
    ///
    /// The notifier's return value is the source of truth for the one-shot
    /// consumption; the linked join request then transitions through the
    /// same conditional write as `process_join_request`, so racing
    /// decisions on one request can never both add the member.
    pub async fn approve_request(
        &self,
        group: &mut Group,
        admin: &User,
        notification: &mut GroupApprovalNotification,
    ) -> Result<()> {
        self.check_notification(group, admin, notification)?;

        let applied = self.notifier.approve_notification(admin, notification).await?;
        if !applied {
            return Err(StudyBuddyError::InvalidState(
                format!("Notification {} was not approved by the notifier", notification.id)
            ));
        }

        let transitioned = self.join_requests
            .process_join_request(notification.request_id, JoinRequestStatus::Approved, admin.id)
            .await?;
        if !transitioned {
            return Err(StudyBuddyError::Conflict(
                format!("Join request {} was already processed", notification.request_id)
            ));
        }

        self.groups.add_to_group(group.id(), notification.from_user).await?;
        group.add_member_entry(notification.from_user, GroupRole::Member);

        log_join_request(group.id(), notification.from_user, "approved", Some(admin.id));
        Ok(())
    }

    /// Deny a join request through its notification.
    pub async fn deny_request(
        &self,
        group: &mut Group,
        admin: &User,
        notification: &mut GroupApprovalNotification,
    ) -> Result<()> {
        self.check_notification(group, admin, notification)?;

        let applied = self.notifier.deny_notification(admin, notification).await?;
        if !applied {
            return Err(StudyBuddyError::InvalidState(
                format!("Notification {} was not denied by the notifier", notification.id)
            ));
        }

        let transitioned = self.join_requests
            .process_join_request(notification.request_id, JoinRequestStatus::Rejected, admin.id)
            .await?;
        if !transitioned {
            return Err(StudyBuddyError::Conflict(
                format!("Join request {} was already processed", notification.request_id)
            ));
        }

        log_join_request(group.id(), notification.from_user, "rejected", Some(admin.id));
        Ok(())
    }

    /// Process a join request by id.
    ///
    /// On approval the member list and role map are reloaded from storage
    /// rather than patched, so concurrent approvals of other requests for
    /// the same group converge on the persisted state.
    pub async fn process_join_request(
        &self,
        group: &mut Group,
        admin: &User,
        request_id: Uuid,
        approve: bool,
    ) -> Result<()> {
        debug!(group_id = group.id(), admin_id = admin.id, request_id = %request_id, approve = approve, "Processing join request");

        if !self.roles.is_admin(group, admin) {
            return Err(StudyBuddyError::PermissionDenied(
                format!("User {} is not an admin of group {}", admin.username, group.name)
            ));
        }

        let request = self.join_requests.find_by_id(request_id).await?
            .filter(|r| r.group_id == group.id())
            .ok_or(StudyBuddyError::RequestNotFound { request_id })?;

        let status = if approve { JoinRequestStatus::Approved } else { JoinRequestStatus::Rejected };
        let transitioned = self.join_requests
            .process_join_request(request_id, status, admin.id)
            .await?;
        if !transitioned {
            return Err(StudyBuddyError::Conflict(
                format!("Join request {} was already processed", request_id)
            ));
        }

        if approve {
            self.groups.add_to_group(group.id(), request.user_id).await?;
            let members = self.groups.get_group_members(group.id()).await?;
            group.apply_members(members);
        }

        log_join_request(group.id(), request.user_id, status.as_str(), Some(admin.id));
        Ok(())
    }

    /// Remove a member from the group. Admin-gated; the owner can never
    /// be kicked.
    pub async fn kick_member(&self, group: &mut Group, admin: &User, target_id: i64) -> Result<()> {
        debug!(group_id = group.id(), admin_id = admin.id, target_id = target_id, "Kicking member");

        if !self.roles.is_admin(group, admin) {
            return Err(StudyBuddyError::PermissionDenied(
                format!("User {} is not an admin of group {}", admin.username, group.name)
            ));
        }

        if group.is_owner(target_id) {
            return Err(StudyBuddyError::PermissionDenied(
                format!("The owner of group {} cannot be removed", group.name)
            ));
        }

        let removed = self.groups.remove_member(group.id(), target_id, admin.id).await?;
        if !removed {
            return Err(StudyBuddyError::Conflict(
                format!("User {} is not a member of group {}", target_id, group.name)
            ));
        }

        group.remove_member_entry(target_id);

        log_membership_change(group.id(), target_id, "kicked", admin.id);
        Ok(())
    }

    /// Delete a group. Owner-only by identity comparison; the role map is
    /// not consulted.
    pub async fn delete_group(&self, group: &Group, user: &User) -> Result<()> {
        if !group.is_owner(user.id) {
            return Err(StudyBuddyError::PermissionDenied(
                format!("Only the owner can delete group {}", group.name)
            ));
        }

        let deleted = self.groups.delete_group(group.id()).await?;
        if !deleted {
            return Err(StudyBuddyError::GroupNotFound { group_id: group.id() });
        }

        if let Some(hook) = &self.lifecycle_hook {
            hook.group_deleted(group.id()).await?;
        }

        log_admin_action(user.id, "delete_group", Some(&group.name), None);
        Ok(())
    }

    fn check_notification(
        &self,
        group: &Group,
        admin: &User,
        notification: &GroupApprovalNotification,
    ) -> Result<()> {
        if notification.group_id != group.id() {
            return Err(StudyBuddyError::Validation(
                format!("Notification {} does not belong to group {}", notification.id, group.name)
            ));
        }

        if !self.roles.is_admin(group, admin) {
            return Err(StudyBuddyError::PermissionDenied(
                format!("User {} is not an admin of group {}", admin.username, group.name)
            ));
        }

        Ok(())
    }

    fn validate_group_fields(&self, name: &str, description: &str) -> Result<()> {
        let policy = &self.settings.groups;

        if name.len() < policy.name_min_length {
            return Err(StudyBuddyError::Validation(
                format!("Group name must be at least {} characters", policy.name_min_length)
            ));
        }

        if name.len() > policy.name_max_length {
            return Err(StudyBuddyError::Validation(
                format!("Group name cannot exceed {} characters", policy.name_max_length)
            ));
        }

        if !self.name_pattern.is_match(name) {
            return Err(StudyBuddyError::Validation(
                "Group name may only contain letters, digits, spaces, hyphens and underscores".to_string()
            ));
        }

        if description.len() > policy.description_max_length {
            return Err(StudyBuddyError::Validation(
                format!("Group description cannot exceed {} characters", policy.description_max_length)
            ));
        }

        Ok(())
    }
}
