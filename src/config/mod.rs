//! Configuration management for Curator.
//!
//! Curator reads a TOML file, substitutes `${VAR_NAME}` references from the
//! environment, applies `CURATOR_<SECTION>_<KEY>` overrides and validates the
//! result before anything is started.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use curator::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("curator.toml")?;
//! println!("Listening on {}", config.server.bind_address);
//! println!("Publishing to {}", config.publisher.topic_id);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ServerConfig`] - Bind address and request timeout
//! - [`ProcessingConfig`] - Ineligible-record policy, publish timeout, payload modes
//! - [`StoreConfig`] - Record store backend and transaction retry budget
//! - [`PostgreSQLConfig`] - PostgreSQL connection pool
//! - [`PublisherConfig`] - Downstream topic and Pub/Sub connection
//! - [`LoggingConfig`] - Local JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [store]
//! target = "postgresql"
//!
//! [postgresql]
//! connection_string = "${CURATOR_DATABASE_URL}"
//!
//! [publisher]
//! target = "pubsub"
//! project_id = "memory-library"
//! topic_id = "integrate-article"
//! access_token = "${CURATOR_PUBSUB_TOKEN}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_str};
pub use schema::{
    ApplicationConfig, CuratorConfig, Environment, IneligiblePolicy, LoggingConfig,
    PostgreSQLConfig, ProcessingConfig, PublisherConfig, PublisherTarget, ServerConfig,
    StoreConfig, StoreTarget,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
