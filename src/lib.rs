//! Workspace umbrella crate.
//!
//! This crate exists to expose the feature flags that map to the individual
//! workspace crates (`core-service` and, through it, the desktop bridges).
//! Host applications can depend on `civic-miniapp` and enable the documented
//! features without wiring each crate individually.

#[cfg(feature = "desktop-shims")]
pub use core_service::{AppConfig, CoreError, MiniAppCore};
