//! Test helpers: in-memory storage and a ready-wired service context

pub mod memory;

use std::sync::Arc;

use StudyBuddy::config::Settings;
use StudyBuddy::models::{CreateGroupRequest, Group, User};
use StudyBuddy::services::{LoggingNotifier, ServiceFactory};
use StudyBuddy::storage::{GroupStore, JoinRequestStore, UserStore};

use memory::InMemoryStore;

/// A service factory wired against a shared in-memory store
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub factory: ServiceFactory,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let groups: Arc<dyn GroupStore> = store.clone();
        let join_requests: Arc<dyn JoinRequestStore> = store.clone();
        let users: Arc<dyn UserStore> = store.clone();

        let factory = ServiceFactory::from_stores(
            groups,
            join_requests,
            users,
            Arc::new(LoggingNotifier::new()),
            Settings::default(),
        )
        .expect("service factory");

        Self { store, factory }
    }

    pub fn user(&self, username: &str) -> User {
        self.store.add_user(username)
    }

    /// Create a group owned by `owner`
    pub async fn group(&self, name: &str, require_approval: bool, owner: &User) -> Group {
        self.factory
            .membership_service
            .create_group(
                CreateGroupRequest {
                    name: name.to_string(),
                    description: format!("{} study group", name),
                    require_approval,
                },
                owner,
            )
            .await
            .expect("create group")
    }
}
