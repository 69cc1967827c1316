//! Poll voting

use bridge_traits::{HapticIntensity, HostBridge};
use core_api::{ApiClient, Poll};
use core_content::{ContentService, Fetched};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::engine::{Committed, MutationKind, OptimisticEngine};
use crate::error::{Result, ValidationError};
use crate::in_flight::InFlight;

/// Which polls the list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PollFilter {
    #[default]
    Active,
    Completed,
}

impl PollFilter {
    pub fn matches(&self, poll: &Poll) -> bool {
        match self {
            PollFilter::Active => poll.is_active,
            PollFilter::Completed => !poll.is_active,
        }
    }
}

/// Local effect of a vote. Keeps `total_votes` equal to the sum of votes.
pub fn apply_vote(mut poll: Poll, option_id: &str) -> Poll {
    poll.voted_option_id = Some(option_id.to_string());
    poll.total_votes += 1;
    for option in poll.options.iter_mut().filter(|o| o.id == option_id) {
        option.votes += 1;
    }
    poll
}

fn check_vote(poll: &Poll, option_id: &str) -> std::result::Result<(), ValidationError> {
    if poll.has_voted() {
        return Err(ValidationError::AlreadyVoted {
            poll_id: poll.id.clone(),
        });
    }
    if !poll.is_active {
        return Err(ValidationError::PollClosed {
            poll_id: poll.id.clone(),
        });
    }
    if poll.option(option_id).is_none() {
        return Err(ValidationError::UnknownOption {
            poll_id: poll.id.clone(),
            option_id: option_id.to_string(),
        });
    }
    Ok(())
}

/// State of the polls screen.
pub struct PollBoard {
    content: ContentService,
    api: ApiClient,
    engine: OptimisticEngine,
    host: Arc<dyn HostBridge>,
    in_flight: InFlight,
    polls: RwLock<Vec<Poll>>,
    filter: RwLock<PollFilter>,
}

impl PollBoard {
    pub fn new(
        content: ContentService,
        api: ApiClient,
        engine: OptimisticEngine,
        host: Arc<dyn HostBridge>,
    ) -> Self {
        Self {
            content,
            api,
            engine,
            host,
            in_flight: InFlight::new(),
            polls: RwLock::new(Vec::new()),
            filter: RwLock::new(PollFilter::default()),
        }
    }

    pub async fn load(&self) -> Fetched<Vec<Poll>> {
        let fetched = self.content.polls().await;
        *self.polls.write().await = fetched.value().clone();
        fetched
    }

    pub async fn set_filter(&self, filter: PollFilter) {
        self.host.haptic(HapticIntensity::Light);
        *self.filter.write().await = filter;
    }

    pub async fn filter(&self) -> PollFilter {
        *self.filter.read().await
    }

    /// Every loaded poll, regardless of the filter.
    pub async fn polls(&self) -> Vec<Poll> {
        self.polls.read().await.clone()
    }

    /// Polls matching the current filter.
    pub async fn visible(&self) -> Vec<Poll> {
        let filter = self.filter().await;
        self.polls
            .read()
            .await
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect()
    }

    pub async fn poll(&self, poll_id: &str) -> Option<Poll> {
        self.polls
            .read()
            .await
            .iter()
            .find(|p| p.id == poll_id)
            .cloned()
    }

    pub fn is_pending(&self, poll_id: &str) -> bool {
        self.in_flight.contains(poll_id)
    }

    /// Vote for `option_id` in `poll_id`.
    ///
    /// # Errors
    ///
    /// Fails before any request when the poll is unknown, closed or already
    /// voted on, when the option does not exist, or when a vote on the same
    /// poll is still running.
    #[instrument(skip(self))]
    pub async fn vote(&self, poll_id: &str, option_id: &str) -> Result<Committed<Poll>> {
        let _guard = self.in_flight.acquire(poll_id)?;

        let current = match self.poll(poll_id).await {
            Some(poll) => poll,
            None => {
                return Err(self.engine.reject(
                    MutationKind::Vote,
                    poll_id,
                    ValidationError::UnknownPoll(poll_id.to_string()),
                ))
            }
        };
        if let Err(e) = check_vote(&current, option_id) {
            return Err(self.engine.reject(MutationKind::Vote, poll_id, e));
        }

        self.host.haptic(HapticIntensity::Medium);
        let committed = self
            .engine
            .commit(
                MutationKind::Vote,
                poll_id,
                current,
                self.api.vote(poll_id, option_id),
                |poll| apply_vote(poll, option_id),
            )
            .await;

        let mut polls = self.polls.write().await;
        if let Some(slot) = polls.iter_mut().find(|p| p.id == poll_id) {
            *slot = committed.value().clone();
        }
        Ok(committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MutationError;
    use crate::test_support::{clock, MockHttpClient};
    use bridge_desktop::HeadlessHostBridge;
    use bridge_traits::http::HttpMethod;
    use bridge_traits::BridgeError;
    use core_api::SessionHandle;
    use core_runtime::events::EventBus;

    fn board(http: MockHttpClient) -> (PollBoard, Arc<HeadlessHostBridge>) {
        let bus = EventBus::new(32);
        let host = Arc::new(HeadlessHostBridge::new());
        let api = ApiClient::new("https://api.test/api/v1", Arc::new(http), SessionHandle::new());
        let content = ContentService::new(api.clone(), host.clone(), clock(), bus.clone());
        (
            PollBoard::new(content, api, OptimisticEngine::new(bus), host.clone()),
            host,
        )
    }

    fn offline() -> MockHttpClient {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .returning(|_| Err(BridgeError::ConnectionFailed("offline".to_string())));
        http
    }

    #[test]
    fn test_apply_vote_keeps_totals_consistent() {
        let poll = core_content::seed::poll_detail("1", clock().now());
        let voted = apply_vote(poll, "o2");

        assert_eq!(voted.voted_option_id.as_deref(), Some("o2"));
        assert_eq!(voted.total_votes, 365);
        assert_eq!(voted.option("o2").unwrap().votes, 99);
        assert_eq!(
            voted.total_votes,
            voted.options.iter().map(|o| o.votes).sum::<u32>()
        );
    }

    #[tokio::test]
    async fn test_offline_vote_is_assumed() {
        let (board, host) = board(offline());
        board.load().await;

        let committed = board.vote("1", "o2").await.unwrap();

        assert!(committed.is_assumed());
        let poll = board.poll("1").await.unwrap();
        assert_eq!(poll.total_votes, 365);
        assert_eq!(poll.option("o2").unwrap().votes, 99);
        assert!(poll.has_voted());
        assert_eq!(host.haptics(), vec![HapticIntensity::Medium]);
    }

    #[tokio::test]
    async fn test_vote_guards_never_reach_network() {
        let mut http = MockHttpClient::new();
        http.expect_execute()
            .withf(|req| req.method == HttpMethod::Get)
            .returning(|_| Err(BridgeError::ConnectionFailed("offline".to_string())));
        http.expect_execute()
            .withf(|req| req.method == HttpMethod::Post)
            .times(0);

        let (board, _) = board(http);
        board.load().await;

        assert!(matches!(
            board.vote("3", "o9").await,
            Err(MutationError::Validation(ValidationError::AlreadyVoted { .. }))
        ));
        assert!(matches!(
            board.vote("1", "o9").await,
            Err(MutationError::Validation(ValidationError::UnknownOption { .. }))
        ));
        assert!(matches!(
            board.vote("missing", "o1").await,
            Err(MutationError::Validation(ValidationError::UnknownPoll(_)))
        ));

        {
            let mut polls = board.polls.write().await;
            polls[1].is_active = false;
        }
        assert!(matches!(
            board.vote("2", "o5").await,
            Err(MutationError::Validation(ValidationError::PollClosed { .. }))
        ));
    }

    #[tokio::test]
    async fn test_second_vote_after_offline_vote_is_rejected() {
        let (board, _) = board(offline());
        board.load().await;
        board.vote("2", "o6").await.unwrap();

        assert!(matches!(
            board.vote("2", "o5").await,
            Err(MutationError::Validation(ValidationError::AlreadyVoted { .. }))
        ));
        assert_eq!(board.poll("2").await.unwrap().total_votes, 301);
    }

    #[tokio::test]
    async fn test_filter_splits_active_and_completed() {
        let (board, _) = board(offline());
        board.load().await;

        let active: Vec<String> = board.visible().await.into_iter().map(|p| p.id).collect();
        assert_eq!(active, vec!["1", "2"]);

        board.set_filter(PollFilter::Completed).await;
        let completed: Vec<String> = board.visible().await.into_iter().map(|p| p.id).collect();
        assert_eq!(completed, vec!["3"]);
        assert_eq!(board.polls().await.len(), 3);
    }
}
