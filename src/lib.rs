// Curator - Staged Article Processing Service
// Copyright (c) 2025 Curator Contributors
// Licensed under the MIT License

//! # Curator - Staged Article Processing
//!
//! Curator receives push deliveries from a message queue, each naming one
//! staged article. For every delivery it moves the article through
//! `queued -> processing -> processed` inside a single store transaction,
//! attaches derived fields, and only after that transaction commits
//! publishes a follow-up message announcing the article is ready to be
//! integrated.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`web`] - HTTP push endpoint and health probe
//! - [`core`] - Decoding, lifecycle rules, analysis, orchestration
//! - [`adapters`] - Record stores (memory, PostgreSQL) and notifiers (log, Pub/Sub)
//! - [`domain`] - Identifiers, records, messages, errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use curator::cli::commands::serve::build_orchestrator;
//! use curator::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("curator.toml")?;
//! let orchestrator = build_orchestrator(&config)?;
//!
//! let body = br#"{"message":{"data":"eyJkb2N1bWVudElkIjoiZG9jMSJ9"}}"#;
//! let ack = orchestrator.handle_delivery(body).await;
//! println!("status {}", ack.status_code());
//! # Ok(())
//! # }
//! ```
//!
//! ## Delivery Guarantees
//!
//! The record write is the source of truth. A publish failure after commit
//! is logged and answered with a retryable status; the redelivery then finds
//! the record already processed and is skipped, so the follow-up message is
//! published at most once per committed transition.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod web;
