//! Authorization service implementation
//!
//! Pure role-based access checks for group operations. Every check is a
//! function of a (user, group) snapshot and carries no hidden state, so
//! for a fixed snapshot the answers are identical regardless of call
//! order.

use crate::models::group::{Group, GroupRole};
use crate::models::user::User;

/// Closed set of group actions subject to authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupAction {
    ViewGroup,
    CreateSession,
    UploadFiles,
    PostMessages,
    EditGroup,
    ManageMembers,
    EditSession,
    DeleteSession,
    DeleteFiles,
    DeleteGroup,
}

impl GroupAction {
    /// Minimum role required to perform this action
    pub fn minimum_role(&self) -> GroupRole {
        match self {
            GroupAction::ViewGroup
            | GroupAction::CreateSession
            | GroupAction::UploadFiles
            | GroupAction::PostMessages => GroupRole::Member,
            GroupAction::EditGroup
            | GroupAction::ManageMembers
            | GroupAction::EditSession
            | GroupAction::DeleteSession
            | GroupAction::DeleteFiles => GroupRole::Admin,
            GroupAction::DeleteGroup => GroupRole::Owner,
        }
    }
}

/// Stateless authorization checks derived from a user's role in a group
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationService;

impl AuthorizationService {
    pub fn new() -> Self {
        Self
    }

    /// Tri-state role lookup: owner by identity, then the role map,
    /// `None` for non-members.
    pub fn user_role(&self, user: &User, group: &Group) -> Option<GroupRole> {
        group.role_of(user.id)
    }

    /// Whether the user holds admin-level privilege (admin or owner)
    pub fn has_admin_privileges(&self, user: &User, group: &Group) -> bool {
        matches!(self.user_role(user, group), Some(GroupRole::Admin) | Some(GroupRole::Owner))
    }

    pub fn can_manage_members(&self, user: &User, group: &Group) -> bool {
        self.has_permission(user, group, GroupAction::ManageMembers)
    }

    pub fn can_delete_group(&self, user: &User, group: &Group) -> bool {
        self.has_permission(user, group, GroupAction::DeleteGroup)
    }

    pub fn can_edit_group_settings(&self, user: &User, group: &Group) -> bool {
        self.has_permission(user, group, GroupAction::EditGroup)
    }

    pub fn can_create_session(&self, user: &User, group: &Group) -> bool {
        self.has_permission(user, group, GroupAction::CreateSession)
    }

    pub fn can_upload_files(&self, user: &User, group: &Group) -> bool {
        self.has_permission(user, group, GroupAction::UploadFiles)
    }

    /// Check the action against the minimum-role matrix. Non-members are
    /// denied everything; this never fails.
    pub fn has_permission(&self, user: &User, group: &Group, action: GroupAction) -> bool {
        match self.user_role(user, group) {
            Some(role) => role >= action.minimum_role(),
            None => false,
        }
    }
}
