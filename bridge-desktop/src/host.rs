//! Headless host bridge
//!
//! Stands in for the chat platform when the core runs outside the in-app
//! browser. Alerts, haptics and shares are logged and recorded so callers can
//! inspect what the user would have seen.

use bridge_traits::{
    error::{BridgeError, Result},
    host::{HapticIntensity, HostBridge, UserHint},
};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// Environment variable holding a signed identity payload for headless runs.
pub const INIT_DATA_ENV: &str = "MINIAPP_INIT_DATA";

#[derive(Debug, Default)]
struct Recorded {
    alerts: Vec<String>,
    haptics: Vec<HapticIntensity>,
    shares: Vec<String>,
    ready_calls: usize,
    expand_calls: usize,
    closed: bool,
}

/// Desktop/test implementation of [`HostBridge`].
#[derive(Debug, Default)]
pub struct HeadlessHostBridge {
    identity_payload: Option<String>,
    user_hint: Option<UserHint>,
    share_enabled: bool,
    recorded: Mutex<Recorded>,
}

impl HeadlessHostBridge {
    /// A host without identity payload or hint; sharing is unavailable.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> HeadlessHostBridgeBuilder {
        HeadlessHostBridgeBuilder::default()
    }

    /// Build a host whose identity payload comes from [`INIT_DATA_ENV`].
    pub fn from_env() -> Self {
        let payload = std::env::var(INIT_DATA_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty());

        Self::builder().identity_payload_opt(payload).build()
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Alerts shown so far, oldest first.
    pub fn alerts(&self) -> Vec<String> {
        self.recorded().alerts.clone()
    }

    /// Haptic impacts triggered so far, oldest first.
    pub fn haptics(&self) -> Vec<HapticIntensity> {
        self.recorded().haptics.clone()
    }

    /// Texts passed to the inline-share picker.
    pub fn shares(&self) -> Vec<String> {
        self.recorded().shares.clone()
    }

    pub fn ready_calls(&self) -> usize {
        self.recorded().ready_calls
    }

    pub fn expand_calls(&self) -> usize {
        self.recorded().expand_calls
    }

    pub fn is_closed(&self) -> bool {
        self.recorded().closed
    }
}

impl HostBridge for HeadlessHostBridge {
    fn ready(&self) {
        self.recorded().ready_calls += 1;
    }

    fn expand(&self) {
        self.recorded().expand_calls += 1;
    }

    fn identity_payload(&self) -> Option<String> {
        self.identity_payload.clone()
    }

    fn user_hint(&self) -> Option<UserHint> {
        self.user_hint.clone()
    }

    fn haptic(&self, intensity: HapticIntensity) {
        debug!(%intensity, "Haptic impact");
        self.recorded().haptics.push(intensity);
    }

    fn alert(&self, message: &str) {
        info!(message, "Host alert");
        self.recorded().alerts.push(message.to_string());
    }

    fn share_inline(&self, text: &str) -> Result<()> {
        if !self.share_enabled {
            return Err(BridgeError::NotAvailable(
                "Inline sharing requires the platform client".to_string(),
            ));
        }
        self.recorded().shares.push(text.to_string());
        Ok(())
    }

    fn close(&self) {
        self.recorded().closed = true;
    }
}

/// Builder for [`HeadlessHostBridge`].
#[derive(Debug, Default)]
pub struct HeadlessHostBridgeBuilder {
    identity_payload: Option<String>,
    user_hint: Option<UserHint>,
    share_enabled: bool,
}

impl HeadlessHostBridgeBuilder {
    pub fn identity_payload(mut self, payload: impl Into<String>) -> Self {
        self.identity_payload = Some(payload.into());
        self
    }

    fn identity_payload_opt(mut self, payload: Option<String>) -> Self {
        self.identity_payload = payload;
        self
    }

    pub fn user_hint(mut self, hint: UserHint) -> Self {
        self.user_hint = Some(hint);
        self
    }

    pub fn share_enabled(mut self, enabled: bool) -> Self {
        self.share_enabled = enabled;
        self
    }

    pub fn build(self) -> HeadlessHostBridge {
        HeadlessHostBridge {
            identity_payload: self.identity_payload,
            user_hint: self.user_hint,
            share_enabled: self.share_enabled,
            recorded: Mutex::new(Recorded::default()),
        }
    }
}
