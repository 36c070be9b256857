//! Storage collaborator interfaces
//!
//! The membership and role services persist through these traits rather
//! than through concrete repositories, so the sqlx implementations under
//! `database::repositories` and the in-memory doubles used by tests are
//! interchangeable. Mutating operations that return `bool` are
//! conditionally applied at the storage layer: `false` means the record's
//! current state did not match the precondition (already changed by a
//! concurrent writer, or absent), and nothing was written.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Group, GroupMember, JoinRequest, JoinRequestStatus, User};
use crate::utils::errors::Result;

/// Persistence surface for groups and their memberships.
#[async_trait]
pub trait GroupStore: Send + Sync {
    async fn group_exists(&self, group_id: i64) -> Result<bool>;

    async fn exists_by_name(&self, name: &str) -> Result<bool>;

    /// Persist a new group (including its initial members) and return the
    /// assigned group id.
    async fn add_group(&self, group: &Group) -> Result<i64>;

    /// Add a user to a group with the default member role.
    async fn add_to_group(&self, group_id: i64, user_id: i64) -> Result<()>;

    /// Remove a member. The acting admin's privilege is re-verified in the
    /// same conditional write. Returns false when nothing was removed.
    async fn remove_member(&self, group_id: i64, user_id: i64, acting_admin_id: i64) -> Result<bool>;

    async fn is_admin(&self, group_id: i64, user_id: i64) -> Result<bool>;

    /// Flip a current member row to admin. Returns false when the target is
    /// not currently an ordinary member or the acting admin lost privilege.
    async fn promote_to_admin(&self, group_id: i64, user_id: i64, acting_admin_id: i64) -> Result<bool>;

    /// Flip a current admin row back to member. Returns false when the
    /// target is not currently an admin or the acting admin lost privilege.
    async fn demote_admin(&self, group_id: i64, user_id: i64, acting_admin_id: i64) -> Result<bool>;

    async fn set_require_approval(&self, group_id: i64, flag: bool) -> Result<()>;

    /// Delete a group. Returns false when the group row was already gone.
    async fn delete_group(&self, group_id: i64) -> Result<bool>;

    /// Load the full membership snapshot, in join order.
    async fn get_group_members(&self, group_id: i64) -> Result<Vec<GroupMember>>;
}

/// Persistence surface for the join-approval workflow.
#[async_trait]
pub trait JoinRequestStore: Send + Sync {
    /// Whether the user has a *pending* request for this group.
    async fn has_user_requested_to_join(&self, group_id: i64, user_id: i64) -> Result<bool>;

    async fn is_user_member_of_group(&self, group_id: i64, user_id: i64) -> Result<bool>;

    async fn create_join_request(&self, group_id: i64, user_id: i64) -> Result<JoinRequest>;

    async fn find_by_id(&self, request_id: Uuid) -> Result<Option<JoinRequest>>;

    /// Atomically transition a pending request to a terminal status, keyed
    /// by the acting admin. Returns false when the request was not pending
    /// anymore; the transition out of pending happens exactly once.
    async fn process_join_request(
        &self,
        request_id: Uuid,
        status: JoinRequestStatus,
        acting_admin_id: i64,
    ) -> Result<bool>;
}

/// User lookup surface.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}
