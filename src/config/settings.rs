//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub groups: GroupPolicyConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

/// Policy knobs for group creation and membership
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GroupPolicyConfig {
    pub name_min_length: usize,
    pub name_max_length: usize,
    pub description_max_length: usize,
    pub require_approval_default: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("STUDYBUDDY"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::StudyBuddyError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/studybuddy".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/studybuddy".to_string(),
            },
            groups: GroupPolicyConfig {
                name_min_length: 3,
                name_max_length: 64,
                description_max_length: 500,
                require_approval_default: false,
            },
        }
    }
}
