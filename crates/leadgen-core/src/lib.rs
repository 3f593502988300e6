pub mod app_config;
pub mod company;
pub mod config;
pub mod query;

pub use app_config::{AppConfig, Environment};
pub use company::{derive_contact_email, first_present, Company, SearchHistoryItem};
pub use config::{load_app_config, load_app_config_from_env};
pub use query::{encode_component, RequestError, SearchRequest};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
