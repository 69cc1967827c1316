//! # Content Reads
//!
//! Read side of the mini-app: news, events, polls and the youth section.
//!
//! Every read has a static seed dataset. When the backend cannot be reached
//! or rejects the request, the seed is served instead and the outcome is
//! tagged as [`Fetched::Fallback`], so screens always have something to show.
//!
//! Seed dates are computed from the injected [`Clock`](bridge_traits::Clock),
//! which keeps them "upcoming" or "recent" whenever the app runs.

pub mod fallback;
pub mod seed;
pub mod service;

pub use fallback::{fetch_with_fallback, Fetched};
pub use service::{ContentService, HomeDashboard, YouthSection, ALL_CITIES, CITIES};
