//! Validate config command implementation
//!
//! Loads the configuration the same way `serve` does and prints a summary.

use crate::config::load_config;
use crate::config::schema::{PublisherTarget, StoreTarget};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Bind Address: {}", config.server.bind_address);
        println!(
            "  Request Timeout: {}s",
            config.server.request_timeout_seconds
        );
        println!(
            "  Ineligible Policy: {:?}",
            config.processing.ineligible_policy
        );
        println!(
            "  Legacy Plain Ids: {}",
            config.processing.accept_legacy_plain_id
        );

        match config.store.target {
            StoreTarget::Memory => println!("  Store: memory"),
            StoreTarget::PostgreSQL => {
                if let Some(ref pg_config) = config.postgresql {
                    use secrecy::ExposeSecret;
                    println!("  Store: PostgreSQL");
                    println!(
                        "  PostgreSQL Host: {}",
                        pg_config
                            .connection_string
                            .expose_secret()
                            .as_str()
                            .rsplit('@')
                            .next()
                            .unwrap_or("***")
                    );
                    println!("  PostgreSQL Table: {}", pg_config.table);
                    println!("  Max Connections: {}", pg_config.max_connections);
                }
            }
        }
        println!(
            "  Transaction Attempts: {}",
            config.store.max_transaction_attempts
        );

        match config.publisher.target {
            PublisherTarget::Log => println!("  Publisher: log"),
            PublisherTarget::PubSub => {
                println!("  Publisher: Pub/Sub ({})", config.publisher.endpoint);
                println!("  Project: {}", config.publisher.project_id);
            }
        }
        println!("  Topic: {}", config.publisher.topic_id);
        println!(
            "  Publish Timeout: {}s",
            config.processing.publish_timeout_seconds
        );
        println!();
        Ok(0)
    }
}
