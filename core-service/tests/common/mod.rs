//! Shared fixtures for the core-service integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bridge_traits::time::{Clock, FixedClock};
use chrono::{TimeZone, Utc};
use core_service::{AppConfig, HeadlessHostBridge, MiniAppCore};
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "https://api.test/api/v1";

/// HTTP fake answering from a fixed route table.
///
/// Requests without a matching route fail as if the network were down.
#[derive(Default)]
pub struct ScriptedHttpClient {
    routes: Vec<(HttpMethod, String, u16, String)>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn route(mut self, method: HttpMethod, path: &str, status: u16, body: &str) -> Self {
        self.routes
            .push((method, format!("{}{}", BASE_URL, path), status, body.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        let url = format!("{}{}", BASE_URL, path);
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.seen.lock().unwrap().push(request.clone());

        self.routes
            .iter()
            .find(|(method, url, _, _)| *method == request.method && *url == request.url)
            .map(|(_, _, status, body)| HttpResponse::with_json_body(*status, body.as_str()))
            .ok_or_else(|| BridgeError::ConnectionFailed(format!("no route to {}", request.url)))
    }
}

pub fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()))
}

pub fn build_core(http: Arc<ScriptedHttpClient>, host: Arc<HeadlessHostBridge>) -> MiniAppCore {
    let config = AppConfig::builder()
        .api_base_url(BASE_URL)
        .http_client(http)
        .host_bridge(host)
        .clock(clock())
        .build()
        .unwrap();
    MiniAppCore::new(config).unwrap()
}

pub const MEMBER_JSON: &str = r#"{
    "id": 42,
    "telegramId": 777000,
    "firstName": "Давид",
    "lastName": "Леви",
    "city": "Хайфа",
    "joinedAt": "2024-06-01T00:00:00Z",
    "notificationsEnabled": true,
    "eventsCount": 5,
    "pollsCount": 2
}"#;

pub fn auth_json() -> String {
    format!(r#"{{"token":"jwt-abc","user":{}}}"#, MEMBER_JSON)
}
