//! Join request repository implementation
//!
//! `process_join_request` is the single conditional-write point that takes
//! a request out of the pending state; every caller path funnels through
//! it, so the transition happens exactly once even under concurrent
//! admins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::join_request::{JoinRequest, JoinRequestStatus};
use crate::storage::JoinRequestStore;
use crate::utils::errors::{StudyBuddyError, Result};

#[derive(Debug, FromRow)]
struct JoinRequestRow {
    id: Uuid,
    group_id: i64,
    user_id: i64,
    status: String,
    requested_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
    processed_by: Option<i64>,
}

impl TryFrom<JoinRequestRow> for JoinRequest {
    type Error = StudyBuddyError;

    fn try_from(row: JoinRequestRow) -> Result<Self> {
        Ok(JoinRequest {
            id: row.id,
            group_id: row.group_id,
            user_id: row.user_id,
            status: row.status.parse()?,
            requested_at: row.requested_at,
            processed_at: row.processed_at,
            processed_by: row.processed_by,
        })
    }
}

#[derive(Debug, Clone)]
pub struct JoinRequestRepository {
    pool: PgPool,
}

impl JoinRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Pending requests for a group, oldest first
    pub async fn list_pending_for_group(&self, group_id: i64) -> Result<Vec<JoinRequest>> {
        let rows = sqlx::query_as::<_, JoinRequestRow>(
            r#"
            SELECT id, group_id, user_id, status, requested_at, processed_at, processed_by
            FROM join_requests
            WHERE group_id = $1 AND status = 'pending'
            ORDER BY requested_at ASC
            "#
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(JoinRequest::try_from).collect()
    }
}

#[async_trait]
impl JoinRequestStore for JoinRequestRepository {
    async fn has_user_requested_to_join(&self, group_id: i64, user_id: i64) -> Result<bool> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM join_requests WHERE group_id = $1 AND user_id = $2 AND status = 'pending'"
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    async fn is_user_member_of_group(&self, group_id: i64, user_id: i64) -> Result<bool> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM group_members WHERE group_id = $1 AND user_id = $2"
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    async fn create_join_request(&self, group_id: i64, user_id: i64) -> Result<JoinRequest> {
        let row = sqlx::query_as::<_, JoinRequestRow>(
            r#"
            INSERT INTO join_requests (id, group_id, user_id, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING id, group_id, user_id, status, requested_at, processed_at, processed_by
            "#
        )
        .bind(Uuid::new_v4())
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, request_id: Uuid) -> Result<Option<JoinRequest>> {
        let row = sqlx::query_as::<_, JoinRequestRow>(
            r#"
            SELECT id, group_id, user_id, status, requested_at, processed_at, processed_by
            FROM join_requests
            WHERE id = $1
            "#
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(JoinRequest::try_from).transpose()
    }

    async fn process_join_request(
        &self,
        request_id: Uuid,
        status: JoinRequestStatus,
        acting_admin_id: i64,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE join_requests
            SET status = $2, processed_at = now(), processed_by = $3
            WHERE id = $1 AND status = 'pending'
            "#
        )
        .bind(request_id)
        .bind(status.as_str())
        .bind(acting_admin_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
