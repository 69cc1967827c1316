//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the mini-app core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that every other core crate
//! depends on. It establishes the logging conventions, the validated
//! configuration handed to the facade, and the broadcast channel through
//! which session, mutation and content outcomes are published.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{AppConfig, AppConfigBuilder};
pub use error::{Error, Result};
pub use events::{CoreEvent, EventBus};
