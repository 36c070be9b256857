//! Services module
//!
//! This module contains business logic services

pub mod authorization;
pub mod membership;
pub mod notifier;
pub mod role;

// Re-export commonly used services
pub use authorization::{AuthorizationService, GroupAction};
pub use membership::{MembershipService, JoinOutcome};
pub use notifier::{Notifier, LoggingNotifier, GroupLifecycleHook};
pub use role::RoleService;

use std::sync::Arc;

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::storage::{GroupStore, JoinRequestStore, UserStore};
use crate::utils::errors::Result;

/// Service factory wiring every service from explicitly passed
/// collaborators. There is no process-wide singleton: construct one of
/// these at startup and hand it to the embedding layer.
#[derive(Clone)]
pub struct ServiceFactory {
    pub authorization_service: AuthorizationService,
    pub role_service: RoleService,
    pub membership_service: MembershipService,
}

impl ServiceFactory {
    /// Create a ServiceFactory backed by the sqlx repositories
    pub fn new(
        database: DatabaseService,
        notifier: Arc<dyn Notifier>,
        settings: Settings,
    ) -> Result<Self> {
        let groups: Arc<dyn GroupStore> = Arc::new(database.groups.clone());
        let join_requests: Arc<dyn JoinRequestStore> = Arc::new(database.join_requests.clone());
        let users: Arc<dyn UserStore> = Arc::new(database.users.clone());

        Self::from_stores(groups, join_requests, users, notifier, settings)
    }

    /// Create a ServiceFactory from arbitrary storage implementations
    pub fn from_stores(
        groups: Arc<dyn GroupStore>,
        join_requests: Arc<dyn JoinRequestStore>,
        users: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
        settings: Settings,
    ) -> Result<Self> {
        let authorization_service = AuthorizationService::new();
        let role_service = RoleService::new(groups.clone(), authorization_service);
        let membership_service = MembershipService::new(
            groups,
            join_requests,
            users,
            notifier,
            role_service.clone(),
            settings,
        )?;

        Ok(Self {
            authorization_service,
            role_service,
            membership_service,
        })
    }
}
