//! Shared domain types and configuration for Parsifly.
//!
//! Every other crate in the workspace speaks in terms of [`Platform`] and the
//! canonical [`Post`] record defined here.

pub mod app_config;
pub mod config;
pub mod platform;
pub mod post;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use platform::{normalize_profile_handle, EngagementBasis, Platform};
pub use post::{Post, PostAnalysis, PostTimestamp, ERROR_SENTINEL, NOT_AVAILABLE};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
