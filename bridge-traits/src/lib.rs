//! # Host Bridge Traits
//!
//! Capability contracts that each host environment must implement.
//!
//! ## Overview
//!
//! The mini-app core never talks to the network or to the chat platform SDK
//! directly. Every such capability is expressed here as a trait so that the
//! same core can run inside the platform's in-app browser, in a headless
//! desktop harness, or under test with scripted fakes.
//!
//! ## Traits
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Single-attempt async HTTP transport
//!
//! ### Platform Integration
//! - [`HostBridge`](host::HostBridge) - Identity payload, user hint, haptics,
//!   alerts, inline sharing and the ready/expand lifecycle signals
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform            | Implementation Crate | Status         |
//! |---------------------|----------------------|----------------|
//! | Desktop / headless  | `bridge-desktop`     | ✅ Available   |
//! | In-app browser      | TBD (wasm)           | 📋 Planned     |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert platform-specific errors into it and keep messages actionable.
//!
//! ## Thread Safety
//!
//! Bridge traits are bounded by [`PlatformSendSync`](platform::PlatformSendSync),
//! which is `Send + Sync` on native targets and a no-op on `wasm32`.
//!
//! ## Examples
//!
//! ### Implementing HttpClient
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         // Implementation
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod host;
pub mod http;
pub mod platform;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use host::{HapticIntensity, HostBridge, UserHint};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use time::{Clock, FixedClock, LogEntry, LogLevel, LoggerSink, SystemClock};
