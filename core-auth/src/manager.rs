//! # Session Manager
//!
//! Owns the per-launch [`Session`] and the bootstrap that produces it.
//!
//! ## Usage
//!
//! ```no_run
//! use core_auth::SessionManager;
//! # use core_api::ApiClient;
//! # use core_runtime::events::EventBus;
//! # use bridge_traits::{Clock, HostBridge};
//! # use std::sync::Arc;
//! # async fn run(api: ApiClient, host: Arc<dyn HostBridge>, clock: Arc<dyn Clock>) {
//! let manager = SessionManager::new(api, host, clock, EventBus::new(100));
//!
//! // Always yields a renderable session, whatever the network does
//! let session = manager.bootstrap().await;
//! assert!(session.is_ready());
//! # }
//! ```

use bridge_traits::{Clock, HostBridge};
use core_api::{ApiClient, Credential, User};
use core_runtime::events::{CoreEvent, EventBus, SessionEvent};
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::guest::{guest_user, DEV_TOKEN};
use crate::session::{GuestReason, Session, SessionStatus};

/// Establishes and holds the session for one launch.
pub struct SessionManager {
    api: ApiClient,
    host: Arc<dyn HostBridge>,
    clock: Arc<dyn Clock>,
    event_bus: EventBus,
    state: Arc<RwLock<Session>>,
    bootstrapped: OnceCell<()>,
}

impl SessionManager {
    pub fn new(
        api: ApiClient,
        host: Arc<dyn HostBridge>,
        clock: Arc<dyn Clock>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            api,
            host,
            clock,
            event_bus,
            state: Arc::new(RwLock::new(Session::initial())),
            bootstrapped: OnceCell::new(),
        }
    }

    /// Run the bootstrap once and return the resulting session.
    ///
    /// Concurrent and repeated callers wait for the first run and receive its
    /// outcome; the host is signalled and the identity exchange attempted at
    /// most once per manager.
    pub async fn bootstrap(&self) -> Session {
        self.bootstrapped
            .get_or_init(|| self.run_bootstrap())
            .await;
        self.snapshot().await
    }

    #[instrument(skip(self))]
    async fn run_bootstrap(&self) {
        {
            let mut state = self.state.write().await;
            state.status = SessionStatus::Bootstrapping;
            state.is_loading = true;
        }
        let _ = self
            .event_bus
            .emit(CoreEvent::Session(SessionEvent::BootstrapStarted));

        self.host.ready();
        self.host.expand();

        let payload = self
            .host
            .identity_payload()
            .filter(|payload| !payload.trim().is_empty());

        let session = match payload {
            Some(payload) => self.exchange(&payload).await,
            None => {
                debug!("No identity payload from host, using development guest");
                self.guest(GuestReason::NoIdentityPayload)
            }
        };

        *self.state.write().await = session;
    }

    async fn exchange(&self, payload: &str) -> Session {
        match self.api.authenticate(payload).await {
            Ok(response) => {
                info!(user_id = response.user.id, "Session authenticated");
                let _ = self
                    .event_bus
                    .emit(CoreEvent::Session(SessionEvent::Authenticated {
                        user_id: response.user.id,
                    }));
                Session {
                    token: Some(Credential::bearer(response.token)),
                    user: Some(response.user),
                    is_loading: false,
                    is_authenticated: true,
                    status: SessionStatus::Authenticated,
                }
            }
            Err(e) => {
                warn!(error = %e, "Identity exchange failed, continuing as guest");
                self.guest(GuestReason::ExchangeFailed)
            }
        }
    }

    fn guest(&self, reason: GuestReason) -> Session {
        let hint = self.host.user_hint();
        let user = guest_user(hint.as_ref(), reason, self.clock.now());

        let _ = self
            .event_bus
            .emit(CoreEvent::Session(SessionEvent::GuestFallback {
                reason: reason.to_string(),
            }));

        // The synthetic credential is kept on the session only; the request
        // slot stays empty so nothing is ever sent as a bearer.
        let (token, is_authenticated) = match reason {
            GuestReason::NoIdentityPayload => (Some(Credential::synthetic(DEV_TOKEN)), true),
            GuestReason::ExchangeFailed => (None, false),
        };

        Session {
            token,
            user: Some(user),
            is_loading: false,
            is_authenticated,
            status: SessionStatus::Guest(reason),
        }
    }

    /// Current session state.
    pub async fn snapshot(&self) -> Session {
        self.state.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    /// Reload the profile from the backend.
    ///
    /// Does nothing without a real credential. Failures keep the current
    /// profile and are only logged and published.
    #[instrument(skip(self))]
    pub async fn refresh_user(&self) {
        if !self.api.session().is_authenticated().await {
            debug!("Skipping profile refresh without a server session");
            return;
        }

        match self.api.me().await {
            Ok(user) => {
                let user_id = user.id;
                self.state.write().await.user = Some(user);
                let _ = self
                    .event_bus
                    .emit(CoreEvent::Session(SessionEvent::ProfileRefreshed { user_id }));
            }
            Err(e) => {
                warn!(error = %e, "Profile refresh failed");
                let _ = self
                    .event_bus
                    .emit(CoreEvent::Session(SessionEvent::ProfileRefreshFailed {
                        message: e.user_message().to_string(),
                    }));
            }
        }
    }

    /// Replace the held profile, e.g. after an edit.
    pub async fn set_user(&self, user: User) {
        let user_id = user.id;
        self.state.write().await.user = Some(user);
        let _ = self
            .event_bus
            .emit(CoreEvent::Session(SessionEvent::ProfileUpdated { user_id }));
    }

    /// The backend client sharing this session's credential slot.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn host(&self) -> &Arc<dyn HostBridge> {
        &self.host
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_desktop::HeadlessHostBridge;
    use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
    use bridge_traits::{BridgeError, FixedClock, UserHint};
    use chrono::{TimeZone, Utc};
    use core_api::SessionHandle;
    use mockall::mock;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> bridge_traits::error::Result<HttpResponse>;
        }
    }

    const AUTH_JSON: &str = r#"{"token":"jwt-1","user":{"id":7,"telegramId":555,"firstName":"Dana",
        "joinedAt":"2025-01-01T00:00:00Z","notificationsEnabled":true,"eventsCount":2,"pollsCount":4}}"#;

    const ME_JSON: &str = r#"{"id":7,"telegramId":555,"firstName":"Dana","city":"Хайфа",
        "joinedAt":"2025-01-01T00:00:00Z","notificationsEnabled":false,"eventsCount":3,"pollsCount":4}"#;

    fn manager(http: MockHttpClient, host: HeadlessHostBridge) -> SessionManager {
        let api = ApiClient::new("https://api.test/api/v1", Arc::new(http), SessionHandle::new());
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());
        SessionManager::new(api, Arc::new(host), Arc::new(clock), EventBus::new(16))
    }

    fn ok(body: &str) -> bridge_traits::error::Result<HttpResponse> {
        Ok(HttpResponse::with_json_body(200, body))
    }

    #[tokio::test]
    async fn test_without_payload_skips_network() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(0);

        let host = HeadlessHostBridge::new();
        let manager = manager(http, host);
        let session = manager.bootstrap().await;

        assert_eq!(session.status, SessionStatus::Guest(GuestReason::NoIdentityPayload));
        assert!(session.is_ready());
        assert!(session.is_authenticated);
        assert!(!session.has_server_session());
        assert!(session.token.as_ref().unwrap().is_synthetic());
        assert!(!manager.api().session().is_authenticated().await);

        let user = session.user.unwrap();
        assert_eq!(user.first_name, "Гость");
        assert_eq!((user.events_count, user.polls_count), (3, 7));
    }

    #[tokio::test]
    async fn test_successful_exchange_authenticates() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|req| req.method == HttpMethod::Post && req.url.ends_with("/auth/telegram"))
            .times(1)
            .returning(|_| ok(AUTH_JSON));

        let host = HeadlessHostBridge::builder()
            .identity_payload("query_id=abc&hash=f00")
            .build();
        let manager = manager(http, host);
        let mut events = manager.event_bus().subscribe();

        let session = manager.bootstrap().await;

        assert_eq!(session.status, SessionStatus::Authenticated);
        assert!(session.has_server_session());
        assert_eq!(session.user.unwrap().id, 7);
        assert_eq!(
            manager.api().session().bearer_token().await.as_deref(),
            Some("jwt-1")
        );

        assert_eq!(
            events.recv().await.unwrap(),
            CoreEvent::Session(SessionEvent::BootstrapStarted)
        );
        assert_eq!(
            events.recv().await.unwrap(),
            CoreEvent::Session(SessionEvent::Authenticated { user_id: 7 })
        );
    }

    #[tokio::test]
    async fn test_failed_exchange_falls_back_to_hint() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .returning(|_| Err(BridgeError::ConnectionFailed("offline".to_string())));

        let host = HeadlessHostBridge::builder()
            .identity_payload("query_id=abc&hash=f00")
            .user_hint(UserHint::new(555, "Dana").with_username("dana"))
            .build();
        let manager = manager(http, host);
        let session = manager.bootstrap().await;

        assert_eq!(session.status, SessionStatus::Guest(GuestReason::ExchangeFailed));
        assert!(session.is_ready());
        assert!(!session.is_authenticated);
        assert!(session.token.is_none());

        let user = session.user.unwrap();
        assert_eq!(user.platform_id, 555);
        assert_eq!(user.first_name, "Dana");
        assert_eq!(user.username.as_deref(), Some("dana"));
        assert_eq!((user.events_count, user.polls_count), (0, 0));
    }

    #[tokio::test]
    async fn test_server_rejection_also_falls_back() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse::with_json_body(
                401,
                r#"{"message":"invalid signature"}"#,
            ))
        });

        let host = HeadlessHostBridge::builder()
            .identity_payload("tampered")
            .build();
        let session = manager(http, host).bootstrap().await;

        assert_eq!(session.status, SessionStatus::Guest(GuestReason::ExchangeFailed));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_bootstrap_runs_once() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(1).returning(|_| ok(AUTH_JSON));

        let host = Arc::new(
            HeadlessHostBridge::builder()
                .identity_payload("query_id=abc&hash=f00")
                .build(),
        );
        let api = ApiClient::new("https://api.test/api/v1", Arc::new(http), SessionHandle::new());
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());
        let manager = Arc::new(SessionManager::new(
            api,
            host.clone(),
            Arc::new(clock),
            EventBus::new(16),
        ));

        let first = tokio::spawn({
            let manager = manager.clone();
            async move { manager.bootstrap().await }
        });
        let second = tokio::spawn({
            let manager = manager.clone();
            async move { manager.bootstrap().await }
        });

        let (first, second) = (first.await.unwrap(), second.await.unwrap());
        assert_eq!(first, second);
        assert_eq!(manager.bootstrap().await, first);
        assert_eq!(host.ready_calls(), 1);
        assert_eq!(host.expand_calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_user_without_credential_is_noop() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(0);

        let manager = manager(http, HeadlessHostBridge::new());
        let before = manager.bootstrap().await;
        manager.refresh_user().await;

        assert_eq!(manager.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_refresh_user_replaces_profile() {
        let mut seq = mockall::Sequence::new();
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| ok(AUTH_JSON));
        http.expect_execute()
            .withf(|req| req.method == HttpMethod::Get && req.url.ends_with("/me"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| ok(ME_JSON));

        let host = HeadlessHostBridge::builder()
            .identity_payload("query_id=abc&hash=f00")
            .build();
        let manager = manager(http, host);
        manager.bootstrap().await;
        manager.refresh_user().await;

        let user = manager.current_user().await.unwrap();
        assert_eq!(user.city.as_deref(), Some("Хайфа"));
        assert!(!user.notifications_enabled);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_profile() {
        let mut seq = mockall::Sequence::new();
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| ok(AUTH_JSON));
        http.expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(BridgeError::Timeout));

        let host = HeadlessHostBridge::builder()
            .identity_payload("query_id=abc&hash=f00")
            .build();
        let manager = manager(http, host);
        let before = manager.bootstrap().await;
        let mut events = manager.event_bus().subscribe();

        manager.refresh_user().await;

        assert_eq!(manager.snapshot().await, before);
        assert!(matches!(
            events.recv().await.unwrap(),
            CoreEvent::Session(SessionEvent::ProfileRefreshFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_set_user_publishes_update() {
        let mut http = MockHttpClient::new();
        http.expect_execute().times(0);

        let manager = manager(http, HeadlessHostBridge::new());
        let mut user = manager.bootstrap().await.user.unwrap();
        user.phone = Some("+972-50-123-4567".to_string());
        let mut events = manager.event_bus().subscribe();

        manager.set_user(user.clone()).await;

        assert_eq!(manager.current_user().await, Some(user));
        assert_eq!(
            events.recv().await.unwrap(),
            CoreEvent::Session(SessionEvent::ProfileUpdated { user_id: 1 })
        );
    }
}
