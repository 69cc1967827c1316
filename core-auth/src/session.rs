//! Session snapshot types

use core_api::{Credential, User};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a session continues without a server-backed credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuestReason {
    /// The identity exchange was attempted and failed.
    ExchangeFailed,
    /// The host supplied no identity payload; the exchange was skipped.
    NoIdentityPayload,
}

impl fmt::Display for GuestReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuestReason::ExchangeFailed => f.write_str("identity exchange failed"),
            GuestReason::NoIdentityPayload => f.write_str("no identity payload"),
        }
    }
}

/// Bootstrap state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    Uninitialized,
    Bootstrapping,
    Authenticated,
    Guest(GuestReason),
}

impl SessionStatus {
    /// Terminal states are ready for rendering.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Authenticated | SessionStatus::Guest(_))
    }
}

/// The per-launch session.
///
/// `is_authenticated` keeps its historical meaning: it is `true` for
/// `Authenticated` and also for `Guest(NoIdentityPayload)`. Use
/// [`Session::has_server_session`] to know whether server-backed features
/// really work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: Option<Credential>,
    pub user: Option<User>,
    pub is_loading: bool,
    pub is_authenticated: bool,
    pub status: SessionStatus,
}

impl Session {
    pub(crate) fn initial() -> Self {
        Self {
            token: None,
            user: None,
            is_loading: true,
            is_authenticated: false,
            status: SessionStatus::Uninitialized,
        }
    }

    /// Whether requests carry a real bearer credential.
    pub fn has_server_session(&self) -> bool {
        self.status == SessionStatus::Authenticated
            && self.token.as_ref().is_some_and(|t| !t.is_synthetic())
    }

    pub fn is_ready(&self) -> bool {
        !self.is_loading && self.status.is_terminal()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_session_is_loading() {
        let session = Session::default();
        assert!(session.is_loading);
        assert!(!session.is_ready());
        assert!(!session.has_server_session());
        assert_eq!(session.status, SessionStatus::Uninitialized);
    }

    #[test]
    fn test_synthetic_credential_is_not_a_server_session() {
        let session = Session {
            token: Some(Credential::synthetic("dev-token")),
            user: None,
            is_loading: false,
            is_authenticated: true,
            status: SessionStatus::Guest(GuestReason::NoIdentityPayload),
        };

        assert!(session.is_ready());
        assert!(session.is_authenticated);
        assert!(!session.has_server_session());
    }

    #[test]
    fn test_guest_reason_display() {
        assert_eq!(GuestReason::ExchangeFailed.to_string(), "identity exchange failed");
    }
}
