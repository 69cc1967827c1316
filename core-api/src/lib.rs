//! # API Gateway Client
//!
//! Typed access to the organization's backend.
//!
//! ## Overview
//!
//! Every backend call goes through [`ApiClient::request`], which:
//! - joins the endpoint onto the configured base URL
//! - attaches `Authorization: Bearer <token>` when a credential is held
//! - serializes the body as JSON and decodes the JSON response
//! - maps non-2xx responses to [`ApiError::Server`] and transport failures to
//!   [`ApiError::Transport`]
//!
//! Each call is a single attempt. Retrying, falling back to seed content or
//! applying a mutation locally is the caller's decision.
//!
//! The bearer credential lives in a [`SessionHandle`] owned by the client.
//! Only [`ApiClient::authenticate`] writes to it.
//!
//! ## Usage
//!
//! ```ignore
//! use core_api::{ApiClient, SessionHandle};
//!
//! let api = ApiClient::new(config.api_base_url.clone(), config.http_client.clone(), SessionHandle::new());
//! let auth = api.authenticate(&init_data).await?;
//! let events = api.events(Some("Хайфа")).await?;
//! ```

pub mod client;
pub mod credential;
pub mod error;
pub mod models;

pub use client::ApiClient;
pub use credential::{Credential, SessionHandle};
pub use error::{ApiError, Result};
pub use models::{
    AuthResponse, Event, FeedbackKind, FeedbackPayload, FeedbackReceipt, NewsItem, Poll,
    PollOption, ProfileUpdate, User, YouthLeader, YouthProgram,
};
