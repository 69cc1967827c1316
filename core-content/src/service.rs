//! # Content Service
//!
//! Typed reads over [`ApiClient`] with seed fallback.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────┐   request    ┌───────────┐
//! │ ContentService ├─────────────>│ ApiClient │
//! └───────┬────────┘              └───────────┘
//!         │ error / empty
//!         v
//! ┌────────────────┐  FallbackServed  ┌──────────┐
//! │  seed datasets ├─────────────────>│ EventBus │
//! └────────────────┘                  └──────────┘
//! ```

use bridge_traits::{Clock, HostBridge};
use core_api::{ApiClient, Event, NewsItem, Poll, YouthLeader, YouthProgram};
use core_runtime::events::EventBus;
use futures::join;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::fallback::{fallback_if_empty, fetch_with_fallback, serve_seed, Fetched};
use crate::seed;

/// City filter value meaning "no filter".
pub const ALL_CITIES: &str = "Все";

/// Cities offered by the event filter, "all" first.
pub const CITIES: [&str; 6] = [
    ALL_CITIES,
    "Тель-Авив",
    "Иерусалим",
    "Хайфа",
    "Беэр-Шева",
    "Нетания",
];

const HOME_NEWS_LIMIT: u32 = 3;

/// Everything the home screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeDashboard {
    pub news: Fetched<Vec<NewsItem>>,
    pub upcoming_event: Fetched<Event>,
    pub active_poll: Fetched<Poll>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YouthSection {
    pub programs: Fetched<Vec<YouthProgram>>,
    pub leaders: Fetched<Vec<YouthLeader>>,
}

/// Read operations for every screen.
#[derive(Clone)]
pub struct ContentService {
    api: ApiClient,
    host: Arc<dyn HostBridge>,
    clock: Arc<dyn Clock>,
    event_bus: EventBus,
}

impl ContentService {
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
        }
    }

    /// Latest news, at most `limit` items when given.
    #[instrument(skip(self))]
    pub async fn news(&self, limit: Option<u32>) -> Fetched<Vec<NewsItem>> {
        let now = self.clock.now();
        fetch_with_fallback(&self.event_bus, "news", self.api.news(limit), || {
            let mut items = seed::news(now);
            if let Some(limit) = limit.filter(|l| *l > 0) {
                items.truncate(limit as usize);
            }
            items
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn news_item(&self, id: &str) -> Fetched<NewsItem> {
        let now = self.clock.now();
        fetch_with_fallback(&self.event_bus, "news.detail", self.api.news_item(id), || {
            seed::news_article(id, now)
        })
        .await
    }

    /// Events, optionally in one city.
    ///
    /// [`ALL_CITIES`] and blank values mean no filter. The seed is filtered
    /// locally, so a city without seed events yields an empty fallback.
    #[instrument(skip(self))]
    pub async fn events(&self, city: Option<&str>) -> Fetched<Vec<Event>> {
        let city = city
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != ALL_CITIES);
        let now = self.clock.now();
        fetch_with_fallback(&self.event_bus, "events", self.api.events(city), || {
            seed::events_in(city, now)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn event(&self, id: &str) -> Fetched<Event> {
        let now = self.clock.now();
        fetch_with_fallback(&self.event_bus, "events.detail", self.api.event(id), || {
            seed::event_detail(id, now)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn polls(&self) -> Fetched<Vec<Poll>> {
        let now = self.clock.now();
        fetch_with_fallback(&self.event_bus, "polls", self.api.polls(), || {
            seed::polls(now)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn poll(&self, id: &str) -> Fetched<Poll> {
        let now = self.clock.now();
        fetch_with_fallback(&self.event_bus, "polls.detail", self.api.poll(id), || {
            seed::poll_detail(id, now)
        })
        .await
    }

    /// Youth programs and leaders, fetched concurrently.
    ///
    /// An empty live list is treated like a failure.
    #[instrument(skip(self))]
    pub async fn youth(&self) -> YouthSection {
        let (programs, leaders) = join!(
            fetch_with_fallback(
                &self.event_bus,
                "youth.programs",
                self.api.youth_programs(),
                seed::youth_programs,
            ),
            fetch_with_fallback(
                &self.event_bus,
                "youth.leaders",
                self.api.youth_leaders(),
                seed::youth_leaders,
            ),
        );

        YouthSection {
            programs: fallback_if_empty(
                &self.event_bus,
                "youth.programs",
                programs,
                seed::youth_programs,
            ),
            leaders: fallback_if_empty(&self.event_bus, "youth.leaders", leaders, seed::youth_leaders),
        }
    }

    /// Home screen: recent news, the next event and an open poll.
    ///
    /// The three reads run concurrently and fall back independently.
    #[instrument(skip(self))]
    pub async fn home(&self) -> HomeDashboard {
        let now = self.clock.now();
        let (news, events, polls) = join!(
            self.news(Some(HOME_NEWS_LIMIT)),
            self.events(None),
            self.polls()
        );

        let upcoming_event = match events {
            Fetched::Live(events) => match events.into_iter().next() {
                Some(event) => Fetched::Live(event),
                None => serve_seed(&self.event_bus, "home.event", "no upcoming events", || {
                    seed::upcoming_event(now)
                }),
            },
            Fetched::Fallback(_) => Fetched::Fallback(seed::upcoming_event(now)),
        };

        let active_poll = match polls {
            Fetched::Live(polls) => match polls.into_iter().find(|p| p.is_active) {
                Some(poll) => Fetched::Live(poll),
                None => serve_seed(&self.event_bus, "home.poll", "no active polls", || {
                    seed::featured_poll(now)
                }),
            },
            Fetched::Fallback(_) => Fetched::Fallback(seed::featured_poll(now)),
        };

        HomeDashboard {
            news,
            upcoming_event,
            active_poll,
        }
    }

    /// Open the host's share picker for a news item.
    ///
    /// Returns whether the host accepted; failures are only logged.
    #[instrument(skip(self, item), fields(news_id = %item.id))]
    pub fn share_news(&self, item: &NewsItem) -> bool {
        match self.host.share_inline(&item.title) {
            Ok(()) => {
                info!("News shared");
                true
            }
            Err(e) => {
                warn!(error = %e, "Sharing is not available");
                false
            }
        }
    }
}
