//! Error handling for StudyBuddy
//!
//! This module defines the main error types used throughout the library
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for StudyBuddy operations
#[derive(Error, Debug)]
pub enum StudyBuddyError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unknown role value: {value}")]
    InvalidRole { value: String },

    #[error("A group named '{name}' already exists")]
    DuplicateGroup { name: String },

    #[error("User not found: {username}")]
    UserNotFound { username: String },

    #[error("Group not found: {group_id}")]
    GroupNotFound { group_id: i64 },

    #[error("Join request not found: {request_id}")]
    RequestNotFound { request_id: uuid::Uuid },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for StudyBuddy operations
pub type Result<T> = std::result::Result<T, StudyBuddyError>;

impl StudyBuddyError {
    /// Check if the error is recoverable by retrying the operation
    pub fn is_recoverable(&self) -> bool {
        match self {
            StudyBuddyError::Database(_) => false,
            StudyBuddyError::Migration(_) => false,
            StudyBuddyError::Config(_) => false,
            StudyBuddyError::Validation(_) => false,
            StudyBuddyError::InvalidRole { .. } => false,
            StudyBuddyError::DuplicateGroup { .. } => false,
            StudyBuddyError::UserNotFound { .. } => false,
            StudyBuddyError::GroupNotFound { .. } => false,
            StudyBuddyError::RequestNotFound { .. } => false,
            StudyBuddyError::PermissionDenied(_) => false,
            // A lost conditional write means another admin won the race;
            // the caller may reload and retry against the new state.
            StudyBuddyError::Conflict(_) => true,
            StudyBuddyError::InvalidState(_) => false,
            StudyBuddyError::Serialization(_) => false,
            StudyBuddyError::Io(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            StudyBuddyError::Database(_) => ErrorSeverity::Critical,
            StudyBuddyError::Migration(_) => ErrorSeverity::Critical,
            StudyBuddyError::Config(_) => ErrorSeverity::Critical,
            StudyBuddyError::InvalidRole { .. } => ErrorSeverity::Critical,
            StudyBuddyError::PermissionDenied(_) => ErrorSeverity::Warning,
            StudyBuddyError::Conflict(_) => ErrorSeverity::Warning,
            StudyBuddyError::Validation(_) => ErrorSeverity::Info,
            StudyBuddyError::DuplicateGroup { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
