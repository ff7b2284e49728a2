//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the library core:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that other modules depend on.
//! It establishes the logging conventions used throughout the system and the
//! fail-fast configuration that wires host bridges into the core.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{CoreConfig, CoreConfigBuilder, LibrarySettings};
pub use error::{Error, Result};
