//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop and headless hosts
//! (macOS, Windows, Linux, CI).
//!
//! ## Overview
//!
//! This crate provides ready-to-use implementations of the bridge traits
//! using desktop-appropriate libraries:
//! - `HttpClient` using `reqwest`
//! - `HostBridge` as a headless stand-in that records alerts and haptics
//!
//! The headless host never carries a signed identity payload unless one is
//! supplied explicitly (or through `MINIAPP_INIT_DATA`), so a session booted
//! against it takes the guest path.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{HeadlessHostBridge, ReqwestHttpClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let http_client = ReqwestHttpClient::new()?;
//!     let host = HeadlessHostBridge::from_env();
//!
//!     // Use in core configuration
//! }
//! ```

mod host;
mod http;

pub use host::{HeadlessHostBridge, HeadlessHostBridgeBuilder, INIT_DATA_ENV};
pub use http::ReqwestHttpClient;
