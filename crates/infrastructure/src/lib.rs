//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: venue, region and
//! case data adapters with retry, SQLite persistence, artifact rendering,
//! configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod rendering;
pub mod retry;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, DatabaseConfig};
pub use persistence::{
    ConnectionPool, DatabaseError, SqliteCredentialStore, SqliteRequestStore, create_pool,
};
pub use rendering::{ArtifactRenderer, TemplateEngine, TemplateError};
pub use retry::{RetryConfig, Retryable, retry};
pub use telemetry::{TelemetryError, init_logging};
