//! Shared utilities for the analysis suite
//!
//! This crate provides the functionality every binary in the workspace needs
//! before it does anything else: tracing setup and application-level
//! configuration.

pub mod config;
pub mod logging;

pub use config::{Config, LogFormat};
pub use logging::init_tracing_with;
