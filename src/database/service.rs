//! Database service layer
//!
//! This module provides a high-level aggregate over the repositories

use crate::database::{DatabasePool, UserRepository, GroupRepository, JoinRequestRepository};
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub groups: GroupRepository,
    pub join_requests: JoinRequestRepository,
    pool: DatabasePool,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            groups: GroupRepository::new(pool.clone()),
            join_requests: JoinRequestRepository::new(pool.clone()),
            pool,
        }
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<()> {
        super::connection::health_check(&self.pool).await
    }
}
