//! Feedback form

use bridge_traits::{HapticIntensity, HostBridge};
use core_api::{ApiClient, FeedbackKind, FeedbackPayload};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::engine::{Committed, MutationKind, OptimisticEngine};
use crate::error::{Result, ValidationError, MAX_FEEDBACK_LENGTH};
use crate::in_flight::InFlight;

pub const FEEDBACK_THANKS_MESSAGE: &str = "Спасибо за обратную связь!";
pub const FEEDBACK_EMPTY_MESSAGE: &str = "Пожалуйста, введите сообщение";

const FEEDBACK_KEY: &str = "feedback";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FeedbackStage {
    #[default]
    Form,
    ThankYou,
}

#[derive(Debug, Default)]
struct FormState {
    kind: FeedbackKind,
    message: String,
    stage: FeedbackStage,
}

/// State of the feedback screen.
pub struct FeedbackForm {
    api: ApiClient,
    engine: OptimisticEngine,
    host: Arc<dyn HostBridge>,
    in_flight: InFlight,
    state: RwLock<FormState>,
}

impl FeedbackForm {
    pub fn new(api: ApiClient, engine: OptimisticEngine, host: Arc<dyn HostBridge>) -> Self {
        Self {
            api,
            engine,
            host,
            in_flight: InFlight::new(),
            state: RwLock::new(FormState::default()),
        }
    }

    pub async fn set_kind(&self, kind: FeedbackKind) {
        self.host.haptic(HapticIntensity::Light);
        self.state.write().await.kind = kind;
    }

    pub async fn set_message(&self, message: impl Into<String>) {
        self.state.write().await.message = message.into();
    }

    pub async fn kind(&self) -> FeedbackKind {
        self.state.read().await.kind
    }

    pub async fn message(&self) -> String {
        self.state.read().await.message.clone()
    }

    /// Characters typed so far, as shown next to the limit.
    pub async fn message_length(&self) -> usize {
        self.state.read().await.message.chars().count()
    }

    pub async fn stage(&self) -> FeedbackStage {
        self.state.read().await.stage
    }

    pub fn is_sending(&self) -> bool {
        self.in_flight.contains(FEEDBACK_KEY)
    }

    /// Send the feedback and move to the thank-you stage.
    ///
    /// The stage changes the same way whether or not the request succeeds.
    ///
    /// # Errors
    ///
    /// An empty (after trimming) or over-long message is rejected without a
    /// request; the empty case also shows an alert.
    #[instrument(skip(self))]
    pub async fn submit(&self) -> Result<Committed<FeedbackStage>> {
        let _guard = self.in_flight.acquire(FEEDBACK_KEY)?;

        let (payload, current) = {
            let state = self.state.read().await;
            let message = state.message.trim().to_string();
            (
                FeedbackPayload {
                    kind: state.kind,
                    message,
                },
                state.stage,
            )
        };

        if payload.message.is_empty() {
            self.host.alert(FEEDBACK_EMPTY_MESSAGE);
            return Err(self.engine.reject(
                MutationKind::SubmitFeedback,
                FEEDBACK_KEY,
                ValidationError::EmptyMessage,
            ));
        }
        let length = payload.message.chars().count();
        if length > MAX_FEEDBACK_LENGTH {
            return Err(self.engine.reject(
                MutationKind::SubmitFeedback,
                FEEDBACK_KEY,
                ValidationError::MessageTooLong {
                    length,
                    limit: MAX_FEEDBACK_LENGTH,
                },
            ));
        }

        self.host.haptic(HapticIntensity::Medium);
        let call = async {
            self.api
                .submit_feedback(&payload)
                .await
                .map(|_| FeedbackStage::ThankYou)
        };
        let committed = self
            .engine
            .commit(MutationKind::SubmitFeedback, FEEDBACK_KEY, current, call, |_| {
                FeedbackStage::ThankYou
            })
            .await;

        self.state.write().await.stage = *committed.value();
        self.host.alert(FEEDBACK_THANKS_MESSAGE);
        Ok(committed)
    }

    /// Back to an empty form.
    pub async fn reset(&self) {
        *self.state.write().await = FormState::default();
    }
}
