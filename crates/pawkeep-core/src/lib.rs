use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod geo;
pub mod pricing;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{format_distance, haversine_km, search_nearby, GeoPoint, Locatable};
pub use pricing::{billed_days, estimate_daily, estimate_hourly};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
