//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML, path in FIB_CONFIG)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: PROJECT_NAME, HNY_KEY, ...)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never reloaded
//! - All fields have defaults to allow running with no file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, CONFIG_PATH_ENV};
pub use schema::AppConfig;
pub use schema::ExporterConfig;
pub use schema::FanoutConfig;
pub use schema::ListenerConfig;
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::ServiceConfig;
