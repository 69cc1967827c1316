//! # Session Bootstrap
//!
//! Establishes who the user is, once per launch, and never lets that fail.
//!
//! ## Overview
//!
//! [`SessionManager::bootstrap`] walks a small state machine:
//!
//! ```text
//! Uninitialized ──> Bootstrapping ──┬──> Authenticated
//!                                   ├──> Guest(ExchangeFailed)
//!                                   └──> Guest(NoIdentityPayload)
//! ```
//!
//! - With a signed identity payload from the host, the payload is exchanged
//!   for a bearer credential. Success means `Authenticated`.
//! - If the exchange fails for any reason, the session continues as a guest
//!   built from the host's unverified user hint.
//! - Without a payload (running outside the chat platform) the exchange is
//!   skipped and a development guest with a synthetic credential is used.
//!
//! Every terminal state is ready for rendering. Failures are logged and
//! published on the event bus, never returned.

pub mod guest;
pub mod manager;
pub mod session;

pub use guest::{GUEST_CITY, GUEST_FIRST_NAME, GUEST_PLATFORM_ID, GUEST_USERNAME};
pub use manager::SessionManager;
pub use session::{GuestReason, Session, SessionStatus};
