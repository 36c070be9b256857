//! In-memory storage implementations for service-level tests
//!
//! These mirror the conditional-write semantics of the sqlx repositories:
//! mutating operations that return `bool` only apply when the record's
//! current state matches the precondition, including re-verifying the
//! acting admin's privilege.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use StudyBuddy::models::{Group, GroupMember, GroupRole, JoinRequest, JoinRequestStatus, User};
use StudyBuddy::storage::{GroupStore, JoinRequestStore, UserStore};
use StudyBuddy::utils::errors::{StudyBuddyError, Result};

#[derive(Debug, Clone)]
struct StoredGroup {
    name: String,
    require_approval: bool,
}

#[derive(Debug, Clone)]
struct MemberRecord {
    user_id: i64,
    role: GroupRole,
    joined_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    next_group_id: i64,
    next_user_id: i64,
    users: Vec<User>,
    groups: HashMap<i64, StoredGroup>,
    members: HashMap<i64, Vec<MemberRecord>>,
    requests: HashMap<Uuid, JoinRequest>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user and return it
    pub fn add_user(&self, username: &str) -> User {
        let mut state = self.state.lock().unwrap();
        state.next_user_id += 1;
        let user = User {
            id: state.next_user_id,
            username: username.to_string(),
            first_name: None,
            last_name: None,
            is_active: true,
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        user
    }

    /// Number of pending requests recorded for a group
    pub fn pending_request_count(&self, group_id: i64) -> usize {
        let state = self.state.lock().unwrap();
        state.requests.values()
            .filter(|r| r.group_id == group_id && r.status == JoinRequestStatus::Pending)
            .count()
    }

    /// Current status of a stored request
    pub fn request_status(&self, request_id: Uuid) -> Option<JoinRequestStatus> {
        let state = self.state.lock().unwrap();
        state.requests.get(&request_id).map(|r| r.status)
    }

    /// Persisted approval requirement of a group
    pub fn require_approval(&self, group_id: i64) -> Option<bool> {
        let state = self.state.lock().unwrap();
        state.groups.get(&group_id).map(|g| g.require_approval)
    }

    fn has_privilege(members: &[MemberRecord], user_id: i64) -> bool {
        members.iter().any(|m| {
            m.user_id == user_id && matches!(m.role, GroupRole::Admin | GroupRole::Owner)
        })
    }
}

#[async_trait]
impl GroupStore for InMemoryStore {
    async fn group_exists(&self, group_id: i64) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.groups.contains_key(&group_id))
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.groups.values().any(|g| g.name == name))
    }

    async fn add_group(&self, group: &Group) -> Result<i64> {
        let mut state = self.state.lock().unwrap();
        state.next_group_id += 1;
        let group_id = state.next_group_id;

        state.groups.insert(group_id, StoredGroup {
            name: group.name.clone(),
            require_approval: group.require_approval,
        });

        let records = group.member_ids().iter().map(|&user_id| MemberRecord {
            user_id,
            role: group.role_of(user_id).unwrap_or(GroupRole::Member),
            joined_at: Utc::now(),
        }).collect();
        state.members.insert(group_id, records);

        Ok(group_id)
    }

    async fn add_to_group(&self, group_id: i64, user_id: i64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let members = state.members.entry(group_id).or_default();
        if members.iter().any(|m| m.user_id == user_id) {
            return Err(StudyBuddyError::Conflict(
                format!("User {} is already a member of group {}", user_id, group_id)
            ));
        }
        members.push(MemberRecord {
            user_id,
            role: GroupRole::Member,
            joined_at: Utc::now(),
        });
        Ok(())
    }

    async fn remove_member(&self, group_id: i64, user_id: i64, acting_admin_id: i64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let Some(members) = state.members.get_mut(&group_id) else {
            return Ok(false);
        };
        if !InMemoryStore::has_privilege(members, acting_admin_id) {
            return Ok(false);
        }
        let before = members.len();
        members.retain(|m| !(m.user_id == user_id && m.role != GroupRole::Owner));
        Ok(members.len() < before)
    }

    async fn is_admin(&self, group_id: i64, user_id: i64) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.members.get(&group_id)
            .map(|members| InMemoryStore::has_privilege(members, user_id))
            .unwrap_or(false))
    }

    async fn promote_to_admin(&self, group_id: i64, user_id: i64, acting_admin_id: i64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let Some(members) = state.members.get_mut(&group_id) else {
            return Ok(false);
        };
        if !InMemoryStore::has_privilege(members, acting_admin_id) {
            return Ok(false);
        }
        match members.iter_mut().find(|m| m.user_id == user_id && m.role == GroupRole::Member) {
            Some(member) => {
                member.role = GroupRole::Admin;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn demote_admin(&self, group_id: i64, user_id: i64, acting_admin_id: i64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let Some(members) = state.members.get_mut(&group_id) else {
            return Ok(false);
        };
        if !InMemoryStore::has_privilege(members, acting_admin_id) {
            return Ok(false);
        }
        match members.iter_mut().find(|m| m.user_id == user_id && m.role == GroupRole::Admin) {
            Some(member) => {
                member.role = GroupRole::Member;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_require_approval(&self, group_id: i64, flag: bool) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(group) = state.groups.get_mut(&group_id) {
            group.require_approval = flag;
        }
        Ok(())
    }

    async fn delete_group(&self, group_id: i64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        state.members.remove(&group_id);
        Ok(state.groups.remove(&group_id).is_some())
    }

    async fn get_group_members(&self, group_id: i64) -> Result<Vec<GroupMember>> {
        let state = self.state.lock().unwrap();
        Ok(state.members.get(&group_id)
            .map(|members| members.iter().map(|m| GroupMember {
                user_id: m.user_id,
                role: m.role,
                joined_at: m.joined_at,
            }).collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl JoinRequestStore for InMemoryStore {
    async fn has_user_requested_to_join(&self, group_id: i64, user_id: i64) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.requests.values().any(|r| {
            r.group_id == group_id && r.user_id == user_id && r.status == JoinRequestStatus::Pending
        }))
    }

    async fn is_user_member_of_group(&self, group_id: i64, user_id: i64) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.members.get(&group_id)
            .map(|members| members.iter().any(|m| m.user_id == user_id))
            .unwrap_or(false))
    }

    async fn create_join_request(&self, group_id: i64, user_id: i64) -> Result<JoinRequest> {
        let mut state = self.state.lock().unwrap();
        let request = JoinRequest {
            id: Uuid::new_v4(),
            group_id,
            user_id,
            status: JoinRequestStatus::Pending,
            requested_at: Utc::now(),
            processed_at: None,
            processed_by: None,
        };
        state.requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn find_by_id(&self, request_id: Uuid) -> Result<Option<JoinRequest>> {
        let state = self.state.lock().unwrap();
        Ok(state.requests.get(&request_id).cloned())
    }

    async fn process_join_request(
        &self,
        request_id: Uuid,
        status: JoinRequestStatus,
        acting_admin_id: i64,
    ) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        match state.requests.get_mut(&request_id) {
            Some(request) if request.status == JoinRequestStatus::Pending => {
                request.status = status;
                request.processed_at = Some(Utc::now());
                request.processed_by = Some(acting_admin_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }
}
