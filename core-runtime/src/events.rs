//! # Event Bus System
//!
//! Provides an event-driven architecture for the mini-app core using `tokio::sync::broadcast`.
//! Core modules report what happened (a session was established, a mutation was
//! assumed after a network failure, seed content was served) without knowing
//! who listens.
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **Event Types**: Strongly-typed enum hierarchies for each domain
//! - **EventBus**: Central broadcast channel for publishing events
//! - **EventStream**: Wrapper for consuming events with filtering
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────┐   emit    ┌───────────┐
//! │ SessionManager ├──────────>│           │
//! └────────────────┘           │ EventBus  │   subscribe   ┌────────────┐
//! ┌────────────────┐   emit    │ (broadcast├──────────────>│ Subscriber │
//! │OptimisticEngine├──────────>│  channel) │               └────────────┘
//! └────────────────┘           │           │
//! ┌────────────────┐   emit    │           │
//! │ ContentService ├──────────>│           │
//! └────────────────┘           └───────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, SessionEvent};
//!
//! let event_bus = EventBus::new(100);
//! let event = CoreEvent::Session(SessionEvent::Authenticated { user_id: 1 });
//!
//! // No subscribers yet: emission reports an error the caller may ignore
//! assert!(event_bus.emit(event).is_err());
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: Subscriber was too slow and missed `n` events.
//!   This is non-fatal; the subscriber can continue receiving new events.
//! - **`RecvError::Closed`**: All senders have been dropped. This indicates shutdown.
//!
//! Publishers never fail because of the bus: every call site discards the
//! result of [`EventBus::emit`].

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;
use uuid::Uuid;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Session bootstrap and profile events
    Session(SessionEvent),
    /// Optimistic mutation outcomes
    Mutation(MutationEvent),
    /// Content read outcomes
    Content(ContentEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Session(e) => e.description(),
            CoreEvent::Mutation(e) => e.description(),
            CoreEvent::Content(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Session(SessionEvent::GuestFallback { .. }) => EventSeverity::Warning,
            CoreEvent::Session(SessionEvent::ProfileRefreshFailed { .. }) => {
                EventSeverity::Warning
            }
            CoreEvent::Mutation(MutationEvent::Assumed { .. }) => EventSeverity::Warning,
            CoreEvent::Content(ContentEvent::FallbackServed { .. }) => EventSeverity::Warning,
            CoreEvent::Session(SessionEvent::Authenticated { .. }) => EventSeverity::Info,
            CoreEvent::Mutation(MutationEvent::Confirmed { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Session Events
// ============================================================================

/// Events emitted by the session bootstrap and profile refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum SessionEvent {
    /// Bootstrap started reading the host identity.
    BootstrapStarted,
    /// Identity exchange succeeded and a bearer credential is held.
    Authenticated {
        /// Server-side user id.
        user_id: i64,
    },
    /// The session continues as a guest with a synthesized profile.
    GuestFallback {
        /// Why no server session was established.
        reason: String,
    },
    /// The profile was re-fetched from the server.
    ProfileRefreshed { user_id: i64 },
    /// Re-fetching the profile failed; the previous profile stays.
    ProfileRefreshFailed { message: String },
    /// The profile was replaced locally (after an edit).
    ProfileUpdated { user_id: i64 },
}

impl SessionEvent {
    fn description(&self) -> &str {
        match self {
            SessionEvent::BootstrapStarted => "Session bootstrap started",
            SessionEvent::Authenticated { .. } => "Session authenticated",
            SessionEvent::GuestFallback { .. } => "Continuing as guest",
            SessionEvent::ProfileRefreshed { .. } => "Profile refreshed",
            SessionEvent::ProfileRefreshFailed { .. } => "Profile refresh failed",
            SessionEvent::ProfileUpdated { .. } => "Profile updated",
        }
    }
}

// ============================================================================
// Mutation Events
// ============================================================================

/// Outcome of a user-initiated mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum MutationEvent {
    /// The server accepted the mutation and its entity was adopted.
    Confirmed {
        mutation_id: Uuid,
        /// Mutation kind, e.g. `"event.register"`.
        kind: String,
        entity_id: String,
    },
    /// The server call failed; the local transformation was applied instead.
    Assumed {
        mutation_id: Uuid,
        kind: String,
        entity_id: String,
        /// Failure that triggered the local path.
        error: String,
    },
    /// A client-side guard refused the mutation before any network call.
    Rejected {
        kind: String,
        entity_id: String,
        reason: String,
    },
}

impl MutationEvent {
    fn description(&self) -> &str {
        match self {
            MutationEvent::Confirmed { .. } => "Mutation confirmed by server",
            MutationEvent::Assumed { .. } => "Mutation applied locally after failure",
            MutationEvent::Rejected { .. } => "Mutation rejected by client guard",
        }
    }
}

// ============================================================================
// Content Events
// ============================================================================

/// Events emitted by content reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum ContentEvent {
    /// A read failed and built-in seed content was served in its place.
    FallbackServed {
        /// Resource name, e.g. `"events"` or `"news/2"`.
        resource: String,
        error: String,
    },
}

impl ContentEvent {
    fn description(&self) -> &str {
        match self {
            ContentEvent::FallbackServed { .. } => "Seed content served",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to core events.
///
/// Cloning is cheap; clones share the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// When a subscriber falls behind by more than `capacity` events, it
    /// receives `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// if there are no active subscribers.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
///
/// # Example
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let event_bus = EventBus::new(100);
/// let mutations = EventStream::new(event_bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Mutation(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events that match `predicate` are returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter (if any).
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no matching events are currently available.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn assumed(entity_id: &str) -> CoreEvent {
        CoreEvent::Mutation(MutationEvent::Assumed {
            mutation_id: Uuid::new_v4(),
            kind: "event.register".to_string(),
            entity_id: entity_id.to_string(),
            error: "network error".to_string(),
        })
    }

    #[tokio::test]
    async fn test_event_bus_subscription() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);

        let _sub1 = bus.subscribe();
        let _sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        assert!(bus.emit(CoreEvent::Session(SessionEvent::BootstrapStarted)).is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let event = CoreEvent::Session(SessionEvent::Authenticated { user_id: 42 });
        assert_eq!(bus.emit(event.clone()).unwrap(), 2);

        assert_eq!(sub1.recv().await.unwrap(), event);
        assert_eq!(sub2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, CoreEvent::Mutation(_)));

        bus.emit(CoreEvent::Content(ContentEvent::FallbackServed {
            resource: "events".to_string(),
            error: "network error".to_string(),
        }))
        .ok();
        let mutation = assumed("1");
        bus.emit(mutation.clone()).ok();

        assert_eq!(stream.recv().await.unwrap(), mutation);
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for i in 0..5 {
            bus.emit(assumed(&i.to_string())).ok();
        }

        assert!(matches!(sub.recv().await, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(assumed("1").severity(), EventSeverity::Warning);
        assert_eq!(
            CoreEvent::Session(SessionEvent::Authenticated { user_id: 1 }).severity(),
            EventSeverity::Info
        );
        assert_eq!(
            CoreEvent::Session(SessionEvent::BootstrapStarted).severity(),
            EventSeverity::Debug
        );
    }

    #[test]
    fn test_event_description() {
        let event = CoreEvent::Session(SessionEvent::GuestFallback {
            reason: "no identity payload".to_string(),
        });
        assert_eq!(event.description(), "Continuing as guest");
    }

    #[test]
    fn test_event_serialization() {
        let event = assumed("2");
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"Mutation\""));
        assert!(json.contains("\"event\":\"Assumed\""));

        let deserialized: CoreEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);
    }

    #[tokio::test]
    async fn test_try_recv() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe());
        assert!(stream.try_recv().is_none());

        let event = CoreEvent::Session(SessionEvent::ProfileUpdated { user_id: 5 });
        bus.emit(event.clone()).ok();

        assert_eq!(stream.try_recv().unwrap().unwrap(), event);
    }
}
