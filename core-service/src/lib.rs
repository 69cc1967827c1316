//! Core service façade and bootstrap helpers.
//!
//! This crate wires the host-provided bridges from an [`AppConfig`] into the
//! shared core and hands out the per-screen state holders. Desktop and test
//! hosts typically enable the `desktop-shims` feature (the default), which
//! fills in the reqwest transport and the headless host bridge.
//!
//! ```text
//!            AppConfig
//!                │
//!                ▼
//!          MiniAppCore ──► EventBus ──► subscribers
//!           │    │    │
//!           │    │    └─► OptimisticEngine ──► EventBoard / PollBoard / ...
//!           │    └──────► ContentService (seed fallback)
//!           └───────────► SessionManager ──► ApiClient (credential slot)
//! ```

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::HostBridge;
use core_api::{ApiClient, SessionHandle};
use core_auth::{Session, SessionManager};
use core_content::ContentService;
use core_mutation::{
    EventBoard, EventDetail, FeedbackForm, OptimisticEngine, PollBoard, ProfileEditor,
};
use core_runtime::events::{EventBus, EventSeverity, EventStream, Receiver};
use tracing::{info, instrument};

pub use core_runtime::{AppConfig, AppConfigBuilder, CoreEvent};

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop::{HeadlessHostBridge, ReqwestHttpClient};

/// Primary façade exposed to host applications.
///
/// Cloning is cheap; every clone shares the same session, credential slot and
/// event bus.
#[derive(Clone)]
pub struct MiniAppCore {
    config: AppConfig,
    event_bus: EventBus,
    api: ApiClient,
    session: Arc<SessionManager>,
    content: ContentService,
    engine: OptimisticEngine,
}

impl MiniAppCore {
    /// Create the core from a validated configuration.
    ///
    /// No network traffic happens here; call [`MiniAppCore::bootstrap`] once
    /// the host is ready.
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;

        let event_bus = EventBus::new(config.event_buffer_size);
        let api = ApiClient::new(
            config.api_base_url.clone(),
            Arc::clone(&config.http_client),
            SessionHandle::new(),
        )
        .with_timeout(config.request_timeout);

        let session = Arc::new(SessionManager::new(
            api.clone(),
            Arc::clone(&config.host_bridge),
            Arc::clone(&config.clock),
            event_bus.clone(),
        ));
        let content = ContentService::new(
            api.clone(),
            Arc::clone(&config.host_bridge),
            Arc::clone(&config.clock),
            event_bus.clone(),
        );
        let engine = OptimisticEngine::new(event_bus.clone());

        info!(base_url = %config.api_base_url, "Mini-app core created");

        Ok(Self {
            config,
            event_bus,
            api,
            session,
            content,
            engine,
        })
    }

    /// Build the core from `MINIAPP_*` environment variables with the desktop
    /// bridges.
    #[cfg(feature = "desktop-shims")]
    pub fn from_env() -> Result<Self> {
        let config = AppConfig::from_env()?.build()?;
        Self::new(config)
    }

    /// Establish the session. Runs once; later calls return the settled
    /// session without touching the host or the network.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self) -> Session {
        self.session.bootstrap().await
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn content(&self) -> &ContentService {
        &self.content
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn host(&self) -> &Arc<dyn HostBridge> {
        &self.config.host_bridge
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Subscribe to session, mutation and content events.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.event_bus.subscribe()
    }

    /// Subscribe to the events matching `predicate` only.
    pub fn subscribe_filtered<F>(&self, predicate: F) -> EventStream
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        EventStream::new(self.event_bus.subscribe()).filter(predicate)
    }

    /// Events where the core degraded silently: guest fallback, failed
    /// profile refresh, seed content served, mutations applied locally.
    pub fn degradations(&self) -> EventStream {
        self.subscribe_filtered(|event| event.severity() >= EventSeverity::Warning)
    }

    pub fn event_board(&self) -> EventBoard {
        EventBoard::new(
            self.content.clone(),
            self.api.clone(),
            self.engine.clone(),
            Arc::clone(&self.config.host_bridge),
        )
    }

    pub fn event_detail(&self) -> EventDetail {
        EventDetail::new(
            self.content.clone(),
            self.api.clone(),
            self.engine.clone(),
            Arc::clone(&self.config.host_bridge),
        )
    }

    pub fn poll_board(&self) -> PollBoard {
        PollBoard::new(
            self.content.clone(),
            self.api.clone(),
            self.engine.clone(),
            Arc::clone(&self.config.host_bridge),
        )
    }

    pub fn profile_editor(&self) -> ProfileEditor {
        ProfileEditor::new(
            Arc::clone(&self.session),
            self.engine.clone(),
            Arc::clone(&self.config.host_bridge),
        )
    }

    pub fn feedback_form(&self) -> FeedbackForm {
        FeedbackForm::new(
            self.api.clone(),
            self.engine.clone(),
            Arc::clone(&self.config.host_bridge),
        )
    }

    /// Ask the host to close the mini-app.
    pub fn close(&self) {
        self.config.host_bridge.close();
    }
}
