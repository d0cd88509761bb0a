//! Shared utilities for trade-bot
//!
//! This crate provides common functionality used across the trade-bot workspace,
//! including logging setup and environment-driven configuration helpers.

pub mod config;
pub mod logging;

pub use config::{EnvError, env_parse};
pub use logging::{init_tracing, init_tracing_with};
