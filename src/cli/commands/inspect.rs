//! Inspect command implementation
//!
//! Prints one stored record as JSON. Useful when chasing a delivery that was
//! skipped or redelivered.

use crate::adapters::store::create_record_store;
use crate::config::load_config;
use crate::domain::DocumentId;
use clap::Args;

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Document id to look up
    pub document_id: String,
}

impl InspectArgs {
    /// Execute the inspect command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let document_id = match DocumentId::new(self.document_id.as_str()) {
            Ok(id) => id,
            Err(e) => {
                println!("❌ Invalid document id: {e}");
                return Ok(2);
            }
        };

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let store = match create_record_store(&config) {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to create record store");
                println!("   Error: {e}");
                return Ok(4);
            }
        };

        match store.get(&document_id).await {
            Ok(Some(record)) => {
                println!("{}", serde_json::to_string_pretty(&record)?);
                Ok(0)
            }
            Ok(None) => {
                println!("No record found for {document_id}");
                Ok(3)
            }
            Err(e) => {
                println!("❌ Failed to read record");
                println!("   Error: {e}");
                Ok(4)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_invalid_document_id() {
        let args = InspectArgs {
            document_id: "  ".to_string(),
        };
        assert_eq!(args.execute("unused.toml").await.unwrap(), 2);
    }
}
