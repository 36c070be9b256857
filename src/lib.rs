//! StudyBuddy
//!
//! A library for collaborative study group management: group creation,
//! membership lifecycle, role-based authorization, and the approval
//! workflow for users requesting to join restricted groups. Consumed by a
//! UI or API layer; persistence and notification delivery are pluggable
//! collaborators.

#![allow(non_snake_case)]

pub mod config;
pub mod services;
pub mod models;
pub mod database;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{StudyBuddyError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use models::{Group, GroupRole, JoinRequest, JoinRequestStatus, GroupApprovalNotification, User};
pub use services::{ServiceFactory, MembershipService, RoleService, AuthorizationService, JoinOutcome};
pub use storage::{GroupStore, JoinRequestStore, UserStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
