//! # Optimistic Mutations
//!
//! User-initiated changes (event registration, voting, profile edits and
//! feedback) that never appear to fail.
//!
//! Each screen owns a state holder ([`EventBoard`], [`EventDetail`],
//! [`PollBoard`], [`ProfileEditor`], [`FeedbackForm`]). Holders check
//! client-side preconditions, then hand the request to the
//! [`OptimisticEngine`], which adopts the server's answer or applies the
//! change locally when the request fails.
//!
//! Only [`ValidationError`]s and duplicate submissions are reported to the
//! caller. Network and server failures surface as [`Committed::Assumed`].

pub mod engine;
pub mod error;
pub mod events;
pub mod feedback;
pub mod in_flight;
pub mod polls;
pub mod profile;

#[cfg(test)]
mod test_support;

pub use engine::{Committed, MutationKind, OptimisticEngine};
pub use error::{MutationError, Result, ValidationError, MAX_FEEDBACK_LENGTH};
pub use events::{apply_register, apply_unregister, EventBoard, EventDetail};
pub use feedback::{FeedbackForm, FeedbackStage, FEEDBACK_EMPTY_MESSAGE, FEEDBACK_THANKS_MESSAGE};
pub use in_flight::{InFlight, InFlightGuard};
pub use polls::{apply_vote, PollBoard, PollFilter};
pub use profile::{ProfileEditor, ProfileForm, PROFILE_SAVED_MESSAGE};
