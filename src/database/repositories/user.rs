//! User repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::user::{User, CreateUserRequest};
use crate::storage::UserStore;
use crate::utils::errors::{StudyBuddyError, Result};

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, first_name, last_name)
            VALUES ($1, $2, $3)
            RETURNING id, username, first_name, last_name, is_active, created_at
            "#
        )
        .bind(request.username)
        .bind(request.first_name)
        .bind(request.last_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, first_name, last_name, is_active, created_at FROM users WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, first_name, last_name, is_active, created_at FROM users WHERE username = $1"
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by username, failing when absent
    pub async fn get_by_username(&self, username: &str) -> Result<User> {
        self.find_by_username(username)
            .await?
            .ok_or_else(|| StudyBuddyError::UserNotFound { username: username.to_string() })
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>> {
        UserRepository::find_by_id(self, user_id).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        UserRepository::find_by_username(self, username).await
    }
}
