//! Group model
//!
//! A study group with an ordered member list and per-member roles. The
//! member list and role map are private: all mutation goes through the
//! membership and role services, which persist before mirroring.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::utils::errors::StudyBuddyError;

/// Privilege tier within a single group.
///
/// Declaration order gives the total privilege order `Member < Admin < Owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupRole {
    Member,
    Admin,
    Owner,
}

impl GroupRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupRole::Member => "member",
            GroupRole::Admin => "admin",
            GroupRole::Owner => "owner",
        }
    }
}

impl FromStr for GroupRole {
    type Err = StudyBuddyError;

    /// Parse a stored role value. Called once at the persistence-read
    /// boundary; business logic only ever sees the closed enum.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "member" => Ok(GroupRole::Member),
            "admin" => Ok(GroupRole::Admin),
            "owner" => Ok(GroupRole::Owner),
            other => Err(StudyBuddyError::InvalidRole { value: other.to_string() }),
        }
    }
}

impl std::fmt::Display for GroupRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group membership row as stored: user, role, and join time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMember {
    pub user_id: i64,
    pub role: GroupRole,
    pub joined_at: DateTime<Utc>,
}

/// In-memory representation of a study group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    id: i64,
    pub name: String,
    pub description: String,
    pub require_approval: bool,
    owner_id: i64,
    pub created_at: DateTime<Utc>,
    member_ids: Vec<i64>,
    roles: HashMap<i64, GroupRole>,
}

impl Group {
    /// Create a new group with the owner auto-added as its first member.
    ///
    /// The group id stays unassigned (0) until the group is persisted;
    /// `MembershipService::create_group` assigns it from the storage layer
    /// before the group is handed to callers.
    pub fn new(name: String, description: String, require_approval: bool, owner_id: i64) -> Self {
        let mut roles = HashMap::new();
        roles.insert(owner_id, GroupRole::Owner);

        Self {
            id: 0,
            name,
            description,
            require_approval,
            owner_id,
            created_at: Utc::now(),
            member_ids: vec![owner_id],
            roles,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Owner identity. Immutable for the lifetime of the group.
    pub fn owner_id(&self) -> i64 {
        self.owner_id
    }

    /// Ordered member identifiers.
    pub fn member_ids(&self) -> &[i64] {
        &self.member_ids
    }

    pub fn member_count(&self) -> usize {
        self.member_ids.len()
    }

    pub fn is_member(&self, user_id: i64) -> bool {
        self.member_ids.contains(&user_id)
    }

    /// Identity comparison against the owner field, independent of the
    /// mutable role map.
    pub fn is_owner(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }

    /// Tri-state role lookup: `None` means not a member. The owner always
    /// resolves to `Owner` by identity, even if the role map entry is
    /// missing or stale. A listed member without a role entry is an
    /// ordinary member; non-members never get a default.
    pub fn role_of(&self, user_id: i64) -> Option<GroupRole> {
        if self.is_owner(user_id) {
            return Some(GroupRole::Owner);
        }
        if !self.is_member(user_id) {
            return None;
        }
        Some(self.roles.get(&user_id).copied().unwrap_or(GroupRole::Member))
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    pub(crate) fn add_member_entry(&mut self, user_id: i64, role: GroupRole) {
        if !self.member_ids.contains(&user_id) {
            self.member_ids.push(user_id);
        }
        self.roles.insert(user_id, role);
    }

    pub(crate) fn remove_member_entry(&mut self, user_id: i64) {
        self.member_ids.retain(|&id| id != user_id);
        self.roles.remove(&user_id);
    }

    pub(crate) fn set_role_entry(&mut self, user_id: i64, role: GroupRole) {
        self.roles.insert(user_id, role);
    }

    /// Replace the member list and role map with a snapshot reloaded from
    /// storage. Used after join-request approval so concurrent approvals
    /// for the same group converge on the persisted state.
    pub(crate) fn apply_members(&mut self, members: Vec<GroupMember>) {
        self.member_ids = members.iter().map(|m| m.user_id).collect();
        self.roles = members.into_iter().map(|m| (m.user_id, m.role)).collect();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub description: String,
    pub require_approval: bool,
}
