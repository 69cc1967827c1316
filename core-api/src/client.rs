//! Backend client
//!
//! One request function plus a typed helper per endpoint.

use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::form_urlencoded;

use crate::credential::{Credential, SessionHandle};
use crate::error::{ApiError, Result};
use crate::models::{
    AuthRequest, AuthResponse, Event, FeedbackPayload, FeedbackReceipt, Listing, NewsItem, Poll,
    ProfileUpdate, User, VoteRequest, YouthLeader, YouthProgram,
};

/// Client for the organization's backend.
///
/// Cheap to clone; clones share the transport and the credential slot.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http_client: Arc<dyn HttpClient>,
    session: SessionHandle,
    timeout: Option<Duration>,
}

impl ApiClient {
    /// Create a client for `base_url` (absolute, without trailing slash).
    pub fn new(
        base_url: impl Into<String>,
        http_client: Arc<dyn HttpClient>,
        session: SessionHandle,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http_client,
            session,
            timeout: None,
        }
    }

    /// Per-request timeout forwarded to the transport.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The credential slot this client reads from.
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Issue one request and decode the JSON response.
    ///
    /// `endpoint` is appended verbatim to the base URL and must start with
    /// `/`; any query string must already be encoded.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Server`] for any non-2xx status
    /// - [`ApiError::Transport`] when no response arrived or a 2xx body does
    ///   not decode as `T`
    #[instrument(skip(self, body))]
    pub async fn request<T, B>(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: Option<&B>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = HttpRequest::new(method, url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");

        if let Some(token) = self.session.bearer_token().await {
            request = request.bearer_token(token);
        }

        if let Some(body) = body {
            request = request.json(body).map_err(ApiError::from)?;
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        debug!("Sending API request");

        let response = self.http_client.execute(request).await.map_err(|e| {
            warn!(error = %e, "API request failed before a response arrived");
            ApiError::from(e)
        })?;

        if !response.is_success() {
            let error = ApiError::from_response(response.status, &response.body);
            warn!(status = response.status, error = %error, "API request rejected");
            return Err(error);
        }

        response.json::<T>().map_err(|e| {
            warn!(status = response.status, error = %e, "Malformed API response");
            ApiError::transport(format!("malformed response: {}", e))
        })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.request::<T, ()>(endpoint, HttpMethod::Get, None).await
    }

    // ------------------------------------------------------------------
    // Auth & profile
    // ------------------------------------------------------------------

    /// Exchange the platform identity payload for a bearer credential.
    ///
    /// On success the credential is installed into the session slot and every
    /// later request carries it. On failure the slot is left untouched.
    #[instrument(skip(self, init_data))]
    pub async fn authenticate(&self, init_data: &str) -> Result<AuthResponse> {
        let body = AuthRequest { init_data };
        let response: AuthResponse = self
            .request("/auth/telegram", HttpMethod::Post, Some(&body))
            .await?;

        self.session
            .install(Credential::bearer(response.token.clone()))
            .await;
        info!(user_id = response.user.id, "Identity exchange succeeded");

        Ok(response)
    }

    pub async fn me(&self) -> Result<User> {
        self.get("/me").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        self.request("/me", HttpMethod::Patch, Some(update)).await
    }

    // ------------------------------------------------------------------
    // News
    // ------------------------------------------------------------------

    /// Latest news, newest first. `None` or `Some(0)` means no limit.
    pub async fn news(&self, limit: Option<u32>) -> Result<Vec<NewsItem>> {
        match limit.filter(|l| *l > 0) {
            Some(limit) => self.get(&format!("/news?{}", query("limit", &limit.to_string()))).await,
            None => self.get("/news").await,
        }
    }

    pub async fn news_item(&self, id: &str) -> Result<NewsItem> {
        self.get(&format!("/news/{}", segment(id))).await
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Upcoming events, optionally restricted to one city.
    pub async fn events(&self, city: Option<&str>) -> Result<Vec<Event>> {
        match city.filter(|c| !c.is_empty()) {
            Some(city) => self.get(&format!("/events?{}", query("city", city))).await,
            None => self.get("/events").await,
        }
    }

    pub async fn event(&self, id: &str) -> Result<Event> {
        self.get(&format!("/events/{}", segment(id))).await
    }

    pub async fn register_for_event(&self, id: &str) -> Result<Event> {
        self.request::<Event, ()>(
            &format!("/events/{}/register", segment(id)),
            HttpMethod::Post,
            None,
        )
        .await
    }

    pub async fn unregister_from_event(&self, id: &str) -> Result<Event> {
        self.request::<Event, ()>(
            &format!("/events/{}/unregister", segment(id)),
            HttpMethod::Post,
            None,
        )
        .await
    }

    // ------------------------------------------------------------------
    // Polls
    // ------------------------------------------------------------------

    pub async fn polls(&self) -> Result<Vec<Poll>> {
        self.get("/polls").await
    }

    pub async fn poll(&self, id: &str) -> Result<Poll> {
        self.get(&format!("/polls/{}", segment(id))).await
    }

    pub async fn vote(&self, poll_id: &str, option_id: &str) -> Result<Poll> {
        let body = VoteRequest { option_id };
        self.request(
            &format!("/polls/{}/vote", segment(poll_id)),
            HttpMethod::Post,
            Some(&body),
        )
        .await
    }

    // ------------------------------------------------------------------
    // Feedback & youth
    // ------------------------------------------------------------------

    pub async fn submit_feedback(&self, payload: &FeedbackPayload) -> Result<FeedbackReceipt> {
        self.request("/feedback", HttpMethod::Post, Some(payload)).await
    }

    pub async fn youth_programs(&self) -> Result<Vec<YouthProgram>> {
        let listing: Listing<YouthProgram> = self.get("/public/youth/programs").await?;
        Ok(listing.into_vec())
    }

    pub async fn youth_leaders(&self) -> Result<Vec<YouthLeader>> {
        let listing: Listing<YouthLeader> = self.get("/public/youth/leaders").await?;
        Ok(listing.into_vec())
    }
}

/// Percent-encode one path segment; `/`, `?` and `#` never leave it.
fn segment(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn query(key: &str, value: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair(key, value)
        .finish()
}
