//! Group repository implementation
//!
//! Role values cross the persistence-read boundary exactly once, in
//! `MemberRow::try_into`; everything above this layer works with the
//! closed `GroupRole` enum. The mutating queries for promote, demote and
//! kick are conditional writes: they re-verify the current row state and
//! the acting admin's privilege inside the statement, so concurrent admins
//! cannot both win.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::models::group::{Group, GroupMember, GroupRole};
use crate::storage::GroupStore;
use crate::utils::errors::{StudyBuddyError, Result};

#[derive(Debug, FromRow)]
struct MemberRow {
    user_id: i64,
    role: String,
    joined_at: DateTime<Utc>,
}

impl TryFrom<MemberRow> for GroupMember {
    type Error = StudyBuddyError;

    fn try_from(row: MemberRow) -> Result<Self> {
        Ok(GroupMember {
            user_id: row.user_id,
            role: row.role.parse()?,
            joined_at: row.joined_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check if user is member of group
    pub async fn is_member(&self, group_id: i64, user_id: i64) -> Result<bool> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM group_members WHERE group_id = $1 AND user_id = $2"
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Aggregate counts for the admin dashboard
    pub async fn get_stats(&self) -> Result<serde_json::Value> {
        let groups: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM groups")
            .fetch_one(&self.pool)
            .await?;
        let members: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM group_members")
            .fetch_one(&self.pool)
            .await?;
        let pending: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM join_requests WHERE status = 'pending'"
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(serde_json::json!({
            "total_groups": groups.0,
            "total_memberships": members.0,
            "pending_join_requests": pending.0,
        }))
    }
}

#[async_trait]
impl GroupStore for GroupRepository {
    async fn group_exists(&self, group_id: i64) -> Result<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM groups WHERE id = $1")
            .bind(group_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0 > 0)
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM groups WHERE name = $1")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0 > 0)
    }

    async fn add_group(&self, group: &Group) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO groups (name, description, require_approval, owner_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#
        )
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.require_approval)
        .bind(group.owner_id())
        .bind(group.created_at)
        .fetch_one(&mut *tx)
        .await?;

        let group_id = row.0;
        for &user_id in group.member_ids() {
            let role = group.role_of(user_id).unwrap_or(GroupRole::Member);
            sqlx::query(
                "INSERT INTO group_members (group_id, user_id, role) VALUES ($1, $2, $3)"
            )
            .bind(group_id)
            .bind(user_id)
            .bind(role.as_str())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(group_id)
    }

    async fn add_to_group(&self, group_id: i64, user_id: i64) -> Result<()> {
        sqlx::query(
            "INSERT INTO group_members (group_id, user_id, role) VALUES ($1, $2, 'member')"
        )
        .bind(group_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_member(&self, group_id: i64, user_id: i64, acting_admin_id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM group_members
            WHERE group_id = $1 AND user_id = $2 AND role <> 'owner'
              AND EXISTS (
                  SELECT 1 FROM group_members a
                  WHERE a.group_id = $1 AND a.user_id = $3 AND a.role IN ('admin', 'owner')
              )
            "#
        )
        .bind(group_id)
        .bind(user_id)
        .bind(acting_admin_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn is_admin(&self, group_id: i64, user_id: i64) -> Result<bool> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM group_members WHERE group_id = $1 AND user_id = $2 AND role IN ('admin', 'owner')"
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    async fn promote_to_admin(&self, group_id: i64, user_id: i64, acting_admin_id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE group_members SET role = 'admin'
            WHERE group_id = $1 AND user_id = $2 AND role = 'member'
              AND EXISTS (
                  SELECT 1 FROM group_members a
                  WHERE a.group_id = $1 AND a.user_id = $3 AND a.role IN ('admin', 'owner')
              )
            "#
        )
        .bind(group_id)
        .bind(user_id)
        .bind(acting_admin_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn demote_admin(&self, group_id: i64, user_id: i64, acting_admin_id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE group_members SET role = 'member'
            WHERE group_id = $1 AND user_id = $2 AND role = 'admin'
              AND EXISTS (
                  SELECT 1 FROM group_members a
                  WHERE a.group_id = $1 AND a.user_id = $3 AND a.role IN ('admin', 'owner')
              )
            "#
        )
        .bind(group_id)
        .bind(user_id)
        .bind(acting_admin_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_require_approval(&self, group_id: i64, flag: bool) -> Result<()> {
        sqlx::query("UPDATE groups SET require_approval = $2 WHERE id = $1")
            .bind(group_id)
            .bind(flag)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_group(&self, group_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(group_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_group_members(&self, group_id: i64) -> Result<Vec<GroupMember>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            "SELECT user_id, role, joined_at FROM group_members WHERE group_id = $1 ORDER BY joined_at ASC, id ASC"
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(GroupMember::try_from).collect()
    }
}
