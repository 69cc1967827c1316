//! Event registration: list and detail screens

use bridge_traits::{HapticIntensity, HostBridge};
use core_api::{ApiClient, Event};
use core_content::{ContentService, Fetched};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::engine::{Committed, MutationKind, OptimisticEngine};
use crate::error::{Result, ValidationError};
use crate::in_flight::InFlight;

/// Entity id reported when the detail screen has nothing open.
const DETAIL_KEY: &str = "event";

/// Local effect of a registration.
pub fn apply_register(mut event: Event) -> Event {
    event.is_registered = true;
    event.current_participants += 1;
    event
}

/// Local effect of a cancellation.
pub fn apply_unregister(mut event: Event) -> Event {
    event.is_registered = false;
    event.current_participants = event.current_participants.saturating_sub(1);
    event
}

fn check_register(event: &Event) -> std::result::Result<(), ValidationError> {
    if event.is_registered {
        return Err(ValidationError::AlreadyRegistered {
            event_id: event.id.clone(),
        });
    }
    if event.is_full() {
        return Err(ValidationError::EventFull {
            event_id: event.id.clone(),
        });
    }
    Ok(())
}

fn check_unregister(event: &Event) -> std::result::Result<(), ValidationError> {
    if !event.is_registered {
        return Err(ValidationError::NotRegistered {
            event_id: event.id.clone(),
        });
    }
    Ok(())
}

/// Registration calls shared by the list and the detail screen.
#[derive(Clone)]
struct EventActions {
    api: ApiClient,
    engine: OptimisticEngine,
    host: Arc<dyn HostBridge>,
    in_flight: InFlight,
}

impl EventActions {
    async fn register(&self, current: Event) -> Result<Committed<Event>> {
        let _guard = self.in_flight.acquire(&current.id)?;
        if let Err(e) = check_register(&current) {
            return Err(self.engine.reject(MutationKind::RegisterEvent, &current.id, e));
        }

        self.host.haptic(HapticIntensity::Medium);
        let id = current.id.clone();
        Ok(self
            .engine
            .commit(
                MutationKind::RegisterEvent,
                &id,
                current,
                self.api.register_for_event(&id),
                apply_register,
            )
            .await)
    }

    async fn unregister(&self, current: Event) -> Result<Committed<Event>> {
        let _guard = self.in_flight.acquire(&current.id)?;
        if let Err(e) = check_unregister(&current) {
            return Err(self.engine.reject(MutationKind::UnregisterEvent, &current.id, e));
        }

        self.host.haptic(HapticIntensity::Medium);
        let id = current.id.clone();
        Ok(self
            .engine
            .commit(
                MutationKind::UnregisterEvent,
                &id,
                current,
                self.api.unregister_from_event(&id),
                apply_unregister,
            )
            .await)
    }

    fn unknown(&self, kind: MutationKind, event_id: &str) -> crate::error::MutationError {
        self.engine
            .reject(kind, event_id, ValidationError::UnknownEvent(event_id.to_string()))
    }

    fn nothing_open(&self, kind: MutationKind) -> crate::error::MutationError {
        self.engine.reject(kind, DETAIL_KEY, ValidationError::NoEventLoaded)
    }
}

/// State of the events list screen.
pub struct EventBoard {
    content: ContentService,
    actions: EventActions,
    events: RwLock<Vec<Event>>,
    city: RwLock<Option<String>>,
}

impl EventBoard {
    pub fn new(
        content: ContentService,
        api: ApiClient,
        engine: OptimisticEngine,
        host: Arc<dyn HostBridge>,
    ) -> Self {
        Self {
            content,
            actions: EventActions {
                api,
                engine,
                host,
                in_flight: InFlight::new(),
            },
            events: RwLock::new(Vec::new()),
            city: RwLock::new(None),
        }
    }

    /// Reload the list for the selected city.
    pub async fn load(&self) -> Fetched<Vec<Event>> {
        let city = self.city.read().await.clone();
        let fetched = self.content.events(city.as_deref()).await;
        *self.events.write().await = fetched.value().clone();
        fetched
    }

    /// Change the city filter and reload.
    pub async fn select_city(&self, city: Option<&str>) -> Fetched<Vec<Event>> {
        self.actions.host.haptic(HapticIntensity::Light);
        *self.city.write().await = city.map(str::to_string);
        self.load().await
    }

    pub async fn city(&self) -> Option<String> {
        self.city.read().await.clone()
    }

    pub async fn events(&self) -> Vec<Event> {
        self.events.read().await.clone()
    }

    pub async fn event(&self, event_id: &str) -> Option<Event> {
        self.events
            .read()
            .await
            .iter()
            .find(|e| e.id == event_id)
            .cloned()
    }

    /// Whether a registration change for `event_id` is running.
    pub fn is_pending(&self, event_id: &str) -> bool {
        self.actions.in_flight.contains(event_id)
    }

    #[instrument(skip(self))]
    pub async fn register(&self, event_id: &str) -> Result<Committed<Event>> {
        let current = self
            .event(event_id)
            .await
            .ok_or_else(|| self.actions.unknown(MutationKind::RegisterEvent, event_id))?;
        let committed = self.actions.register(current).await?;
        self.replace(committed.value().clone()).await;
        Ok(committed)
    }

    #[instrument(skip(self))]
    pub async fn unregister(&self, event_id: &str) -> Result<Committed<Event>> {
        let current = self
            .event(event_id)
            .await
            .ok_or_else(|| self.actions.unknown(MutationKind::UnregisterEvent, event_id))?;
        let committed = self.actions.unregister(current).await?;
        self.replace(committed.value().clone()).await;
        Ok(committed)
    }

    async fn replace(&self, updated: Event) {
        let mut events = self.events.write().await;
        if let Some(slot) = events.iter_mut().find(|e| e.id == updated.id) {
            *slot = updated;
        }
    }
}

/// State of a single event screen.
pub struct EventDetail {
    content: ContentService,
    actions: EventActions,
    event: RwLock<Option<Event>>,
}

impl EventDetail {
    pub fn new(
        content: ContentService,
        api: ApiClient,
        engine: OptimisticEngine,
        host: Arc<dyn HostBridge>,
    ) -> Self {
        Self {
            content,
            actions: EventActions {
                api,
                engine,
                host,
                in_flight: InFlight::new(),
            },
            event: RwLock::new(None),
        }
    }

    pub async fn load(&self, event_id: &str) -> Fetched<Event> {
        let fetched = self.content.event(event_id).await;
        *self.event.write().await = Some(fetched.value().clone());
        fetched
    }

    pub async fn event(&self) -> Option<Event> {
        self.event.read().await.clone()
    }

    pub fn is_pending(&self) -> bool {
        !self.actions.in_flight.is_empty()
    }

    #[instrument(skip(self))]
    pub async fn register(&self) -> Result<Committed<Event>> {
        let current = self
            .event()
            .await
            .ok_or_else(|| self.actions.nothing_open(MutationKind::RegisterEvent))?;
        let committed = self.actions.register(current).await?;
        *self.event.write().await = Some(committed.value().clone());
        Ok(committed)
    }

    #[instrument(skip(self))]
    pub async fn unregister(&self) -> Result<Committed<Event>> {
        let current = self
            .event()
            .await
            .ok_or_else(|| self.actions.nothing_open(MutationKind::UnregisterEvent))?;
        let committed = self.actions.unregister(current).await?;
        *self.event.write().await = Some(committed.value().clone());
        Ok(committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MutationError;
    use crate::test_support::{clock, MockHttpClient};
    use bridge_desktop::HeadlessHostBridge;
    use bridge_traits::http::{HttpMethod, HttpResponse};
    use bridge_traits::BridgeError;
    use core_api::SessionHandle;
    use core_runtime::events::{CoreEvent, EventBus, MutationEvent};

    struct Fixture {
        board: EventBoard,
        host: Arc<HeadlessHostBridge>,
    }

    fn fixture(http: MockHttpClient) -> Fixture {
        let bus = EventBus::new(32);
        let host = Arc::new(HeadlessHostBridge::new());
        let api = ApiClient::new("https://api.test/api/v1", Arc::new(http), SessionHandle::new());
        let content = ContentService::new(api.clone(), host.clone(), clock(), bus.clone());
        let board = EventBoard::new(content, api, OptimisticEngine::new(bus), host.clone());
        Fixture { board, host }
    }

    fn offline() -> MockHttpClient {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .returning(|_| Err(BridgeError::ConnectionFailed("offline".to_string())));
        http
    }

    #[test]
    fn test_local_effects() {
        let seed = core_content::seed::events(clock().now());
        let registered = apply_register(seed[0].clone());
        assert!(registered.is_registered);
        assert_eq!(registered.current_participants, 68);

        let mut empty = seed[0].clone();
        empty.current_participants = 0;
        empty.is_registered = true;
        let cancelled = apply_unregister(empty);
        assert_eq!(cancelled.current_participants, 0);
        assert!(!cancelled.is_registered);
    }

    #[tokio::test]
    async fn test_offline_register_increments_participants() {
        let Fixture { board, host } = fixture(offline());
        assert!(board.load().await.is_fallback());

        let committed = board.register("1").await.unwrap();

        assert!(committed.is_assumed());
        let event = board.event("1").await.unwrap();
        assert!(event.is_registered);
        assert_eq!(event.current_participants, 68);
        assert_eq!(host.haptics(), vec![HapticIntensity::Medium]);
    }

    #[tokio::test]
    async fn test_offline_unregister_decrements_participants() {
        let Fixture { board, .. } = fixture(offline());
        board.load().await;

        board.unregister("2").await.unwrap();

        let event = board.event("2").await.unwrap();
        assert!(!event.is_registered);
        assert_eq!(event.current_participants, 44);
    }

    #[tokio::test]
    async fn test_server_entity_is_adopted() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|req| req.method == HttpMethod::Get)
            .returning(|_| Err(BridgeError::ConnectionFailed("offline".to_string())));
        http.expect_execute()
            .withf(|req| req.method == HttpMethod::Post && req.url.ends_with("/events/4/register"))
            .times(1)
            .returning(|_| {
                Ok(HttpResponse::with_json_body(
                    200,
                    r#"{"id":"4","title":"t","description":"d","date":"2025-03-29","time":"10:00",
                        "city":"Беэр-Шева","address":"a","maxParticipants":50,
                        "currentParticipants":30,"isRegistered":true}"#,
                ))
            });

        let Fixture { board, .. } = fixture(http);
        board.load().await;
        let committed = board.register("4").await.unwrap();

        assert!(!committed.is_assumed());
        assert_eq!(board.event("4").await.unwrap().current_participants, 30);
    }

    #[tokio::test]
    async fn test_guards_reject_without_network() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|req| req.method == HttpMethod::Get)
            .returning(|_| Err(BridgeError::ConnectionFailed("offline".to_string())));
        http.expect_execute()
            .withf(|req| req.method == HttpMethod::Post)
            .times(0);

        let Fixture { board, host } = fixture(http);
        board.load().await;

        assert_eq!(
            board.register("2").await.unwrap_err(),
            MutationError::Validation(ValidationError::AlreadyRegistered {
                event_id: "2".to_string()
            })
        );
        assert!(matches!(
            board.unregister("1").await,
            Err(MutationError::Validation(ValidationError::NotRegistered { .. }))
        ));
        assert!(matches!(
            board.register("99").await,
            Err(MutationError::Validation(ValidationError::UnknownEvent(_)))
        ));
        assert!(host.haptics().is_empty());
    }

    #[tokio::test]
    async fn test_full_event_rejected() {
        let Fixture { board, .. } = fixture(offline());
        board.load().await;
        {
            let mut events = board.events.write().await;
            events[2].current_participants = events[2].max_participants;
        }

        assert!(matches!(
            board.register("3").await,
            Err(MutationError::Validation(ValidationError::EventFull { .. }))
        ));
    }

    #[tokio::test]
    async fn test_city_selection_filters_seed() {
        let Fixture { board, host } = fixture(offline());

        let fetched = board.select_city(Some("Хайфа")).await;

        assert_eq!(fetched.value().len(), 1);
        assert_eq!(board.city().await.as_deref(), Some("Хайфа"));
        assert_eq!(host.haptics(), vec![HapticIntensity::Light]);
    }

    #[tokio::test]
    async fn test_detail_register_offline() {
        let bus = EventBus::new(8);
        let host = Arc::new(HeadlessHostBridge::new());
        let api = ApiClient::new(
            "https://api.test/api/v1",
            Arc::new(offline()),
            SessionHandle::new(),
        );
        let content = ContentService::new(api.clone(), host.clone(), clock(), bus.clone());
        let mut events = bus.subscribe();
        let detail = EventDetail::new(content, api, OptimisticEngine::new(bus), host);

        assert_eq!(
            detail.register().await.unwrap_err(),
            MutationError::Validation(ValidationError::NoEventLoaded)
        );
        assert!(matches!(
            events.recv().await.unwrap(),
            CoreEvent::Mutation(MutationEvent::Rejected { kind, entity_id, .. })
                if kind == "event.register" && entity_id == "event"
        ));

        detail.load("1").await;
        let committed = detail.register().await.unwrap();

        assert_eq!(committed.value().current_participants, 68);
        assert_eq!(detail.event().await.unwrap().current_participants, 68);
        assert!(!detail.is_pending());
    }
}
