//! Seed fallback for reads

use core_runtime::events::{ContentEvent, CoreEvent, EventBus};
use std::future::Future;
use tracing::{debug, warn};

/// Outcome of a read that may have been served from seed data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    /// The backend answered.
    Live(T),
    /// The backend failed and the seed was served.
    Fallback(T),
}

impl<T> Fetched<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Fetched::Fallback(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Fetched::Live(value) | Fetched::Fallback(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Fetched::Live(value) | Fetched::Fallback(value) => value,
        }
    }

    /// Transform the value, keeping the tag.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Fetched::Live(value) => Fetched::Live(f(value)),
            Fetched::Fallback(value) => Fetched::Fallback(f(value)),
        }
    }
}

/// Run `operation`; on any error serve `seed()` instead.
///
/// The seed is only built when needed. Each fallback is logged at `warn` and
/// published as [`ContentEvent::FallbackServed`].
pub async fn fetch_with_fallback<T, Fut, S>(
    event_bus: &EventBus,
    resource: &str,
    operation: Fut,
    seed: S,
) -> Fetched<T>
where
    Fut: Future<Output = core_api::Result<T>>,
    S: FnOnce() -> T,
{
    match operation.await {
        Ok(value) => {
            debug!(resource, "Served live content");
            Fetched::Live(value)
        }
        Err(e) => serve_seed(event_bus, resource, &e.to_string(), seed),
    }
}

/// Treat a live but empty list as missing and serve the seed.
pub(crate) fn fallback_if_empty<T, S>(
    event_bus: &EventBus,
    resource: &str,
    fetched: Fetched<Vec<T>>,
    seed: S,
) -> Fetched<Vec<T>>
where
    S: FnOnce() -> Vec<T>,
{
    match fetched {
        Fetched::Live(items) if items.is_empty() => {
            serve_seed(event_bus, resource, "empty response", seed)
        }
        other => other,
    }
}

pub(crate) fn serve_seed<T, S>(event_bus: &EventBus, resource: &str, error: &str, seed: S) -> Fetched<T>
where
    S: FnOnce() -> T,
{
    warn!(resource, error, "Serving seed content");
    let _ = event_bus.emit(CoreEvent::Content(ContentEvent::FallbackServed {
        resource: resource.to_string(),
        error: error.to_string(),
    }));
    Fetched::Fallback(seed())
}
