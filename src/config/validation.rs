//! Configuration validation module
//!
//! This module provides validation functions for library configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{StudyBuddyError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_logging_config(&settings.logging)?;
    validate_group_policy_config(&settings.groups)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(StudyBuddyError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(StudyBuddyError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(StudyBuddyError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(StudyBuddyError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(StudyBuddyError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

/// Validate group policy configuration
fn validate_group_policy_config(config: &super::GroupPolicyConfig) -> Result<()> {
    if config.name_min_length == 0 {
        return Err(StudyBuddyError::Config(
            "Group name minimum length must be greater than 0".to_string()
        ));
    }

    if config.name_min_length > config.name_max_length {
        return Err(StudyBuddyError::Config(
            "Group name minimum length cannot exceed maximum length".to_string()
        ));
    }

    if config.description_max_length == 0 {
        return Err(StudyBuddyError::Config(
            "Group description maximum length must be greater than 0".to_string()
        ));
    }

    Ok(())
}
