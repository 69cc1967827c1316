//! Host Platform Abstraction
//!
//! The chat platform embeds the mini-app in an in-app browser and exposes an
//! SDK for identity, haptics, dialogs and sharing. The core consumes that SDK
//! only through [`HostBridge`]; every call is either a synchronous read or a
//! fire-and-forget signal, and none of them is retried.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::platform::PlatformSendSync;

/// Strength of a haptic impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticIntensity {
    #[default]
    Light,
    Medium,
    Heavy,
}

impl HapticIntensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            HapticIntensity::Light => "light",
            HapticIntensity::Medium => "medium",
            HapticIntensity::Heavy => "heavy",
        }
    }
}

impl fmt::Display for HapticIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unverified user information the platform exposes alongside the signed
/// identity payload.
///
/// The hint is only good enough for display; it must never be treated as
/// proof of identity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserHint {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl UserHint {
    pub fn new(id: i64, first_name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            first_name: Some(first_name.into()),
            last_name: None,
            username: None,
        }
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

/// Host platform bridge trait
///
/// Implementations wrap the platform's embedded SDK:
/// - **In-app browser**: the platform's JavaScript web-app object
/// - **Desktop / tests**: a headless stand-in without identity payload
///
/// # Example
///
/// ```ignore
/// use bridge_traits::host::{HostBridge, HapticIntensity};
///
/// fn confirm(host: &dyn HostBridge) {
///     host.haptic(HapticIntensity::Medium);
///     host.alert("Saved");
/// }
/// ```
pub trait HostBridge: PlatformSendSync {
    /// Signal that the app finished loading. Idempotent.
    fn ready(&self);

    /// Ask the host to expand the web view to full height. Idempotent.
    fn expand(&self);

    /// Signed identity payload supplied by the platform, if any.
    fn identity_payload(&self) -> Option<String>;

    /// Unverified user details supplied by the platform, if any.
    fn user_hint(&self) -> Option<UserHint>;

    /// Trigger a haptic impact.
    fn haptic(&self, intensity: HapticIntensity);

    /// Show a blocking alert dialog.
    fn alert(&self, message: &str);

    /// Open the platform's inline-share picker prefilled with `text`.
    ///
    /// # Errors
    ///
    /// Returns an error when the host cannot share from the current context.
    fn share_inline(&self, text: &str) -> Result<()>;

    /// Close the mini-app.
    fn close(&self) {}
}
