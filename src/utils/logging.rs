//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for consumers of the StudyBuddy library.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "studybuddy.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log group lifecycle events
pub fn log_group_event(group_id: i64, event: &str, user_id: Option<i64>, details: Option<&str>) {
    info!(
        group_id = group_id,
        event = event,
        user_id = user_id,
        details = details,
        "Group event occurred"
    );
}

/// Log membership changes (joins, kicks, role transitions)
pub fn log_membership_change(group_id: i64, user_id: i64, change: &str, acting_user_id: i64) {
    info!(
        group_id = group_id,
        user_id = user_id,
        change = change,
        acting_user_id = acting_user_id,
        "Membership change applied"
    );
}

/// Log admin actions
pub fn log_admin_action(admin_id: i64, action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}

/// Log join request workflow transitions
pub fn log_join_request(group_id: i64, user_id: i64, status: &str, processed_by: Option<i64>) {
    info!(
        group_id = group_id,
        user_id = user_id,
        status = status,
        processed_by = processed_by,
        "Join request transition"
    );
}
