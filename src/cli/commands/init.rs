//! Init command implementation
//!
//! Writes an example configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "curator.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Curator configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, example_config()) {
            Ok(()) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set store.target to 'postgresql' and export CURATOR_PG_URL");
                println!("  3. Set publisher.target to 'pubsub' and fill in project_id");
                println!("  4. Validate configuration: curator validate-config");
                println!("  5. Run the webhook: curator serve");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }
}

/// Example configuration; every value shown is the default unless noted
pub fn example_config() -> &'static str {
    r#"# Curator Configuration File
# Staged article processing webhook

environment = "development"  # development | staging | production

[application]
log_level = "info"

[server]
bind_address = "0.0.0.0:8080"  # PORT overrides the port
request_timeout_seconds = 60

[processing]
# How to answer deliveries for records that are no longer queued or have
# no text: "acknowledge" (204) or "reject" (400). Missing records are
# always acknowledged.
ineligible_policy = "acknowledge"
publish_timeout_seconds = 30
accept_legacy_plain_id = false

[store]
target = "memory"  # memory | postgresql
max_transaction_attempts = 5

# [postgresql]
# connection_string = "${CURATOR_PG_URL}"
# max_connections = 10
# connection_timeout_seconds = 30
# statement_timeout_seconds = 60
# table = "staging_articles"

[publisher]
target = "log"  # log | pubsub
project_id = ""
topic_id = "integrate-article"
endpoint = "https://pubsub.googleapis.com"
# Service account tokens from the metadata server (Cloud Run, GCE), refreshed
# before they expire:
# metadata_token_url = "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token"
# A fixed token expires after about an hour; use it only for short runs:
# access_token = "${CURATOR_PUBSUB_TOKEN}"
timeout_seconds = 30

[logging]
local_enabled = false
local_path = "/var/log/curator"
local_rotation = "daily"  # daily | hourly
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_str;
    use tempfile::TempDir;

    #[test]
    fn test_example_config_is_valid() {
        let config = load_config_str(example_config()).unwrap();
        assert_eq!(config.server.bind_address.rsplit(':').count(), 2);
        assert_eq!(config.publisher.topic_id, "integrate-article");
    }

    #[tokio::test]
    async fn test_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("curator.toml");
        fs::write(&output, "# existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "# existing");

        let args = InitArgs {
            force: true,
            ..args
        };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&output)
            .unwrap()
            .contains("[processing]"));
    }
}
