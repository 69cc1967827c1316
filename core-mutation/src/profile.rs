//! Profile editing

use bridge_traits::{HapticIntensity, HostBridge};
use core_api::{ProfileUpdate, User};
use core_auth::SessionManager;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::engine::{Committed, MutationKind, OptimisticEngine};
use crate::error::{Result, ValidationError};
use crate::in_flight::InFlight;

pub const PROFILE_SAVED_MESSAGE: &str = "Профиль обновлён";

const PROFILE_KEY: &str = "profile";

/// Editable profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileForm {
    pub phone: String,
    pub city: String,
    pub notifications_enabled: bool,
}

impl ProfileForm {
    pub fn from_user(user: Option<&User>) -> Self {
        Self {
            phone: user.and_then(|u| u.phone.clone()).unwrap_or_default(),
            city: user.and_then(|u| u.city.clone()).unwrap_or_default(),
            notifications_enabled: user.map_or(true, |u| u.notifications_enabled),
        }
    }

    fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            phone: Some(self.phone.clone()),
            city: Some(self.city.clone()),
            notifications_enabled: Some(self.notifications_enabled),
        }
    }
}

struct EditorState {
    form: ProfileForm,
    editing: bool,
}

/// State of the profile screen.
///
/// Saved changes are written back into the session, so every screen sees
/// the merged profile.
pub struct ProfileEditor {
    session: Arc<SessionManager>,
    engine: OptimisticEngine,
    host: Arc<dyn HostBridge>,
    in_flight: InFlight,
    state: RwLock<EditorState>,
}

impl ProfileEditor {
    pub fn new(
        session: Arc<SessionManager>,
        engine: OptimisticEngine,
        host: Arc<dyn HostBridge>,
    ) -> Self {
        Self {
            session,
            engine,
            host,
            in_flight: InFlight::new(),
            state: RwLock::new(EditorState {
                form: ProfileForm::from_user(None),
                editing: false,
            }),
        }
    }

    /// Start editing from the current profile.
    pub async fn begin_edit(&self) {
        let user = self.session.current_user().await;
        let mut state = self.state.write().await;
        state.form = ProfileForm::from_user(user.as_ref());
        state.editing = true;
    }

    /// Drop unsaved changes.
    pub async fn cancel_edit(&self) {
        let user = self.session.current_user().await;
        let mut state = self.state.write().await;
        state.form = ProfileForm::from_user(user.as_ref());
        state.editing = false;
    }

    pub async fn is_editing(&self) -> bool {
        self.state.read().await.editing
    }

    pub async fn form(&self) -> ProfileForm {
        self.state.read().await.form.clone()
    }

    pub async fn set_phone(&self, phone: impl Into<String>) {
        self.state.write().await.form.phone = phone.into();
    }

    pub async fn set_city(&self, city: impl Into<String>) {
        self.state.write().await.form.city = city.into();
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.contains(PROFILE_KEY)
    }

    /// Save the form.
    ///
    /// Always ends editing and confirms with an alert, whether the server
    /// accepted the change or it was applied locally.
    #[instrument(skip(self))]
    pub async fn save(&self) -> Result<Committed<User>> {
        let _guard = self.in_flight.acquire(PROFILE_KEY)?;
        let user = self.current_user(MutationKind::UpdateProfile).await?;
        let update = self.state.read().await.form.to_update();

        self.host.haptic(HapticIntensity::Medium);
        let committed = self.commit(MutationKind::UpdateProfile, user, update).await;

        self.state.write().await.editing = false;
        self.host.alert(PROFILE_SAVED_MESSAGE);
        Ok(committed)
    }

    /// Flip the notification preference.
    ///
    /// While editing only the form changes and the value is sent on save.
    /// Otherwise the change is committed immediately and `Some` is returned.
    #[instrument(skip(self))]
    pub async fn toggle_notifications(&self) -> Result<Option<Committed<User>>> {
        self.host.haptic(HapticIntensity::Light);

        {
            let mut state = self.state.write().await;
            if state.editing {
                state.form.notifications_enabled = !state.form.notifications_enabled;
                return Ok(None);
            }
        }

        let _guard = self.in_flight.acquire(PROFILE_KEY)?;
        let user = self.current_user(MutationKind::ToggleNotifications).await?;
        let enabled = !user.notifications_enabled;
        self.state.write().await.form.notifications_enabled = enabled;

        let committed = self
            .commit(
                MutationKind::ToggleNotifications,
                user,
                ProfileUpdate::notifications(enabled),
            )
            .await;
        Ok(Some(committed))
    }

    async fn current_user(&self, kind: MutationKind) -> Result<User> {
        match self.session.current_user().await {
            Some(user) => Ok(user),
            None => Err(self.engine.reject(kind, PROFILE_KEY, ValidationError::NoProfile)),
        }
    }

    async fn commit(&self, kind: MutationKind, user: User, update: ProfileUpdate) -> Committed<User> {
        let entity_id = user.id.to_string();
        let api = self.session.api();
        let committed = self
            .engine
            .commit(kind, &entity_id, user, api.update_profile(&update), |current| {
                update.apply_to(&current)
            })
            .await;

        self.session.set_user(committed.value().clone()).await;
        committed
    }
}
