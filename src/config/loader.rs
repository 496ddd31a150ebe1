//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{CuratorConfig, IneligiblePolicy, PublisherTarget, StoreTarget};
use super::secret::{secret_string, secret_string_opt};
use crate::domain::errors::CuratorError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into CuratorConfig
/// 4. Applies environment variable overrides (CURATOR_* prefix, then PORT)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`CuratorError::Configuration`] if the file cannot be read or
/// parsed, a referenced variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use curator::config::load_config;
///
/// let config = load_config("curator.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CuratorConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CuratorError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CuratorError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_str(&contents)
}

/// Loads configuration from TOML text
///
/// Same pipeline as [`load_config`] without the file read.
pub fn load_config_str(contents: &str) -> Result<CuratorConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: CuratorConfig = toml::from_str(&contents)
        .map_err(|e| CuratorError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        CuratorError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| CuratorError::Unexpected(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(CuratorError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env(name) {
        Some(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CuratorError::Configuration(format!("Invalid value for {name}: '{val}'"))),
        None => Ok(None),
    }
}

fn parse_store_target(val: &str) -> Result<StoreTarget> {
    match val.to_ascii_lowercase().as_str() {
        "memory" => Ok(StoreTarget::Memory),
        "postgresql" | "postgres" => Ok(StoreTarget::PostgreSQL),
        other => Err(CuratorError::Configuration(format!(
            "Invalid CURATOR_STORE_TARGET '{other}'. Must be one of: memory, postgresql"
        ))),
    }
}

fn parse_publisher_target(val: &str) -> Result<PublisherTarget> {
    match val.to_ascii_lowercase().as_str() {
        "log" => Ok(PublisherTarget::Log),
        "pubsub" => Ok(PublisherTarget::PubSub),
        other => Err(CuratorError::Configuration(format!(
            "Invalid CURATOR_PUBLISHER_TARGET '{other}'. Must be one of: log, pubsub"
        ))),
    }
}

fn parse_policy(val: &str) -> Result<IneligiblePolicy> {
    match val.to_ascii_lowercase().as_str() {
        "acknowledge" => Ok(IneligiblePolicy::Acknowledge),
        "reject" => Ok(IneligiblePolicy::Reject),
        other => Err(CuratorError::Configuration(format!(
            "Invalid CURATOR_PROCESSING_INELIGIBLE_POLICY '{other}'. Must be one of: acknowledge, reject"
        ))),
    }
}

/// Applies environment variable overrides using CURATOR_* prefix
///
/// Environment variables follow the pattern: CURATOR_<SECTION>_<KEY>
/// For example: CURATOR_STORE_TARGET, CURATOR_PUBLISHER_TOPIC_ID.
/// `PORT`, as set by container platforms, replaces the port of
/// `server.bind_address` last.
fn apply_env_overrides(config: &mut CuratorConfig) -> Result<()> {
    // Application
    if let Some(val) = env("CURATOR_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Server
    if let Some(val) = env("CURATOR_SERVER_BIND_ADDRESS") {
        config.server.bind_address = val;
    }
    if let Some(val) = env_parsed("CURATOR_SERVER_REQUEST_TIMEOUT_SECONDS")? {
        config.server.request_timeout_seconds = val;
    }

    // Processing
    if let Some(val) = env("CURATOR_PROCESSING_INELIGIBLE_POLICY") {
        config.processing.ineligible_policy = parse_policy(&val)?;
    }
    if let Some(val) = env_parsed("CURATOR_PROCESSING_PUBLISH_TIMEOUT_SECONDS")? {
        config.processing.publish_timeout_seconds = val;
    }
    if let Some(val) = env_parsed("CURATOR_PROCESSING_ACCEPT_LEGACY_PLAIN_ID")? {
        config.processing.accept_legacy_plain_id = val;
    }

    // Store
    if let Some(val) = env("CURATOR_STORE_TARGET") {
        config.store.target = parse_store_target(&val)?;
    }
    if let Some(val) = env_parsed("CURATOR_STORE_MAX_TRANSACTION_ATTEMPTS")? {
        config.store.max_transaction_attempts = val;
    }

    // PostgreSQL (the section is created from the connection string alone)
    if let Some(val) = env("CURATOR_POSTGRESQL_CONNECTION_STRING") {
        match config.postgresql {
            Some(ref mut pg) => pg.connection_string = secret_string(val),
            None => {
                let section = format!("connection_string = {}", toml_string(&val));
                config.postgresql = Some(toml::from_str(&section)?);
            }
        }
    }
    if let Some(ref mut pg) = config.postgresql {
        if let Some(val) = env_parsed("CURATOR_POSTGRESQL_MAX_CONNECTIONS")? {
            pg.max_connections = val;
        }
        if let Some(val) = env("CURATOR_POSTGRESQL_TABLE") {
            pg.table = val;
        }
    }

    // Publisher
    if let Some(val) = env("CURATOR_PUBLISHER_TARGET") {
        config.publisher.target = parse_publisher_target(&val)?;
    }
    if let Some(val) = env("CURATOR_PUBLISHER_PROJECT_ID") {
        config.publisher.project_id = val;
    }
    if let Some(val) = env("CURATOR_PUBLISHER_TOPIC_ID") {
        config.publisher.topic_id = val;
    }
    if let Some(val) = env("CURATOR_PUBLISHER_ENDPOINT") {
        config.publisher.endpoint = val;
    }
    if let Some(val) = env("CURATOR_PUBLISHER_ACCESS_TOKEN") {
        config.publisher.access_token = secret_string_opt(Some(val));
    }
    if let Some(val) = env("CURATOR_PUBLISHER_METADATA_TOKEN_URL") {
        config.publisher.metadata_token_url = Some(val).filter(|v| !v.trim().is_empty());
    }
    if let Some(val) = env_parsed("CURATOR_PUBLISHER_TIMEOUT_SECONDS")? {
        config.publisher.timeout_seconds = val;
    }

    // Logging
    if let Some(val) = env_parsed("CURATOR_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Some(val) = env("CURATOR_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    if let Some(port) = env_parsed::<u16>("PORT")? {
        config.server.bind_address = replace_port(&config.server.bind_address, port);
    }

    Ok(())
}

/// Quote a value as a TOML basic string
fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

/// Swap the port of a `host:port` address, keeping the host
fn replace_port(bind_address: &str, port: u16) -> String {
    match bind_address.rsplit_once(':') {
        Some((host, _)) if !host.is_empty() => format!("{host}:{port}"),
        _ => format!("0.0.0.0:{port}"),
    }
}
