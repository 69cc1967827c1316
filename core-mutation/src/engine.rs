//! # Optimistic Engine
//!
//! Every user mutation follows the same two-phase contract:
//!
//! 1. Send the request.
//! 2. On success adopt the server's entity verbatim ([`Committed::Confirmed`]).
//!    On any failure apply the change locally and carry on as if it had
//!    succeeded ([`Committed::Assumed`]).
//!
//! There is no rollback: an assumed change stays until the next reload shows
//! the server's truth. Failures are logged and published as
//! [`MutationEvent::Assumed`], never returned.

use core_runtime::events::{CoreEvent, EventBus, MutationEvent};
use std::fmt;
use std::future::Future;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{MutationError, ValidationError};

/// What a mutation changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    RegisterEvent,
    UnregisterEvent,
    Vote,
    UpdateProfile,
    ToggleNotifications,
    SubmitFeedback,
}

impl MutationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::RegisterEvent => "event.register",
            MutationKind::UnregisterEvent => "event.unregister",
            MutationKind::Vote => "poll.vote",
            MutationKind::UpdateProfile => "profile.update",
            MutationKind::ToggleNotifications => "profile.notifications",
            MutationKind::SubmitFeedback => "feedback.submit",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a committed mutation, tagged with the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Committed<T> {
    /// The server accepted the change and returned this entity.
    Confirmed(T),
    /// The request failed; this is the locally applied change.
    Assumed(T),
}

impl<T> Committed<T> {
    pub fn is_assumed(&self) -> bool {
        matches!(self, Committed::Assumed(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Committed::Confirmed(value) | Committed::Assumed(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Committed::Confirmed(value) | Committed::Assumed(value) => value,
        }
    }
}

/// Runs mutations under the optimistic contract.
#[derive(Clone)]
pub struct OptimisticEngine {
    event_bus: EventBus,
}

impl OptimisticEngine {
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }

    /// Await `call`; if it fails, return `local_apply(current)` instead.
    ///
    /// `local_apply` is not invoked when the server answers.
    #[instrument(skip(self, current, call, local_apply))]
    pub async fn commit<T, Fut, L>(
        &self,
        kind: MutationKind,
        entity_id: &str,
        current: T,
        call: Fut,
        local_apply: L,
    ) -> Committed<T>
    where
        Fut: Future<Output = core_api::Result<T>>,
        L: FnOnce(T) -> T,
    {
        let mutation_id = Uuid::new_v4();

        match call.await {
            Ok(confirmed) => {
                info!(%mutation_id, "Mutation confirmed by server");
                let _ = self
                    .event_bus
                    .emit(CoreEvent::Mutation(MutationEvent::Confirmed {
                        mutation_id,
                        kind: kind.to_string(),
                        entity_id: entity_id.to_string(),
                    }));
                Committed::Confirmed(confirmed)
            }
            Err(e) => {
                warn!(%mutation_id, error = %e, "Mutation failed, applying locally");
                let _ = self
                    .event_bus
                    .emit(CoreEvent::Mutation(MutationEvent::Assumed {
                        mutation_id,
                        kind: kind.to_string(),
                        entity_id: entity_id.to_string(),
                        error: e.user_message().to_string(),
                    }));
                Committed::Assumed(local_apply(current))
            }
        }
    }

    /// Record a mutation refused before any request was made.
    pub fn reject(
        &self,
        kind: MutationKind,
        entity_id: &str,
        error: ValidationError,
    ) -> MutationError {
        info!(%kind, entity_id, reason = %error, "Mutation rejected");
        let _ = self
            .event_bus
            .emit(CoreEvent::Mutation(MutationEvent::Rejected {
                kind: kind.to_string(),
                entity_id: entity_id.to_string(),
                reason: error.to_string(),
            }));
        MutationError::Validation(error)
    }
}
