//! Bearer credential and the slot that holds it

use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Opaque bearer token issued by the identity exchange.
///
/// A *synthetic* credential stands in for a session that never talked to the
/// backend; it is never sent on the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    synthetic: bool,
}

impl Credential {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            synthetic: false,
        }
    }

    pub fn synthetic(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            synthetic: true,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"[REDACTED]")
            .field("synthetic", &self.synthetic)
            .finish()
    }
}

/// Shared slot for the credential attached to outgoing requests.
///
/// Clones share the slot. Readers are the request path and the profile
/// refresh; the only writer is [`ApiClient::authenticate`](crate::ApiClient::authenticate).
#[derive(Clone, Default, Debug)]
pub struct SessionHandle {
    slot: Arc<RwLock<Option<Credential>>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The credential currently held, if any.
    pub async fn current(&self) -> Option<Credential> {
        self.slot.read().await.clone()
    }

    /// Token to send as `Authorization: Bearer`, if a real credential is held.
    pub async fn bearer_token(&self) -> Option<String> {
        self.slot
            .read()
            .await
            .as_ref()
            .filter(|credential| !credential.is_synthetic())
            .map(|credential| credential.token().to_string())
    }

    /// Whether requests are currently authenticated.
    pub async fn is_authenticated(&self) -> bool {
        self.bearer_token().await.is_some()
    }

    pub(crate) async fn install(&self, credential: Credential) {
        *self.slot.write().await = Some(credential);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let credential = Credential::bearer("jwt-secret-value");
        let rendered = format!("{:?}", credential);
        assert!(!rendered.contains("jwt-secret-value"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_synthetic_credential_is_not_a_bearer() {
        let handle = SessionHandle::new();
        handle.install(Credential::synthetic("dev-token")).await;

        assert!(handle.current().await.is_some());
        assert_eq!(handle.bearer_token().await, None);
        assert!(!handle.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_clones_share_the_slot() {
        let handle = SessionHandle::new();
        let reader = handle.clone();
        assert!(!reader.is_authenticated().await);

        handle.install(Credential::bearer("abc")).await;
        assert_eq!(reader.bearer_token().await.as_deref(), Some("abc"));
    }
}
