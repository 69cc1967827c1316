//! Backend wire models
//!
//! All payloads are camelCase JSON. Optional fields are omitted when absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile of the signed-in member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    /// Id of the member on the chat platform.
    #[serde(rename = "telegramId")]
    pub platform_id: i64,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub joined_at: DateTime<Utc>,
    pub notifications_enabled: bool,
    pub events_count: u32,
    pub polls_count: u32,
}

impl User {
    /// First and last name joined for display.
    pub fn display_name(&self) -> String {
        match self.last_name.as_deref().filter(|l| !l.is_empty()) {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

/// Partial profile edit sent as `PATCH /me`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications_enabled: Option<bool>,
}

impl ProfileUpdate {
    pub fn notifications(enabled: bool) -> Self {
        Self {
            notifications_enabled: Some(enabled),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.phone.is_none() && self.city.is_none() && self.notifications_enabled.is_none()
    }

    /// Shallow merge: provided fields overwrite, absent fields are kept.
    pub fn apply_to(&self, user: &User) -> User {
        let mut merged = user.clone();
        if let Some(phone) = &self.phone {
            merged.phone = Some(phone.clone());
        }
        if let Some(city) = &self.city {
            merged.city = Some(city.clone());
        }
        if let Some(enabled) = self.notifications_enabled {
            merged.notifications_enabled = enabled;
        }
        merged
    }
}

/// Response of the identity exchange.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthRequest<'a> {
    pub init_data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VoteRequest<'a> {
    pub option_id: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub category: String,
    pub author: String,
}

/// A party event members can register for.
///
/// `date` and `time` are display values as the backend sends them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub city: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub max_participants: u32,
    pub current_participants: u32,
    pub is_registered: bool,
}

impl Event {
    pub fn is_full(&self) -> bool {
        self.current_participants >= self.max_participants
    }

    pub fn spots_left(&self) -> u32 {
        self.max_participants.saturating_sub(self.current_participants)
    }

    /// Occupancy in `[0.0, 1.0]`.
    pub fn fill_ratio(&self) -> f64 {
        if self.max_participants == 0 {
            return 1.0;
        }
        (f64::from(self.current_participants) / f64::from(self.max_participants)).min(1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOption {
    pub id: String,
    pub text: String,
    pub votes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub id: String,
    pub question: String,
    pub options: Vec<PollOption>,
    pub total_votes: u32,
    #[serde(default)]
    pub voted_option_id: Option<String>,
    pub is_active: bool,
    pub ends_at: DateTime<Utc>,
}

impl Poll {
    pub fn has_voted(&self) -> bool {
        self.voted_option_id.is_some()
    }

    pub fn option(&self, option_id: &str) -> Option<&PollOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// Share of the vote for an option, as a rounded percentage.
    pub fn option_share(&self, option_id: &str) -> Option<u32> {
        let option = self.option(option_id)?;
        if self.total_votes == 0 {
            return Some(0);
        }
        let share = f64::from(option.votes) * 100.0 / f64::from(self.total_votes);
        Some(share.round() as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    #[default]
    Suggestion,
    Complaint,
    Question,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackPayload {
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FeedbackReceipt {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouthProgram {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouthLeader {
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// A list that may arrive bare or wrapped as `{"data": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Wrapped { data } => data,
            Listing::Bare(items) => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user() -> User {
        User {
            id: 1,
            platform_id: 12345,
            first_name: "Гость".to_string(),
            last_name: None,
            username: Some("guest".to_string()),
            phone: None,
            city: Some("Тель-Авив".to_string()),
            joined_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            notifications_enabled: true,
            events_count: 0,
            polls_count: 0,
        }
    }

    #[test]
    fn test_user_wire_names() {
        let json = serde_json::to_value(user()).unwrap();
        assert_eq!(json["telegramId"], 12345);
        assert_eq!(json["firstName"], "Гость");
        assert_eq!(json["notificationsEnabled"], true);
        assert!(json.get("lastName").is_none());
    }

    #[test]
    fn test_profile_update_merge_keeps_absent_fields() {
        let update = ProfileUpdate {
            phone: Some("+972-50-000-0000".to_string()),
            city: None,
            notifications_enabled: Some(false),
        };

        let merged = update.apply_to(&user());
        assert_eq!(merged.phone.as_deref(), Some("+972-50-000-0000"));
        assert_eq!(merged.city.as_deref(), Some("Тель-Авив"));
        assert!(!merged.notifications_enabled);
    }

    #[test]
    fn test_profile_update_serializes_only_present_fields() {
        let json = serde_json::to_string(&ProfileUpdate::notifications(true)).unwrap();
        assert_eq!(json, r#"{"notificationsEnabled":true}"#);
        assert!(ProfileUpdate::default().is_empty());
    }

    #[test]
    fn test_event_capacity_helpers() {
        let event: Event = serde_json::from_str(
            r#"{"id":"3","title":"t","description":"d","date":"2025-03-01","time":"20:00",
                "city":"Хайфа","address":"a","maxParticipants":120,
                "currentParticipants":112,"isRegistered":false}"#,
        )
        .unwrap();

        assert!(!event.is_full());
        assert_eq!(event.spots_left(), 8);
        assert!((event.fill_ratio() - 112.0 / 120.0).abs() < f64::EPSILON);
        assert_eq!(event.image_url, None);
    }

    #[test]
    fn test_poll_option_share_rounds() {
        let poll: Poll = serde_json::from_str(
            r#"{"id":"1","question":"q","options":[
                    {"id":"o1","text":"a","votes":145},{"id":"o2","text":"b","votes":98}],
                "totalVotes":243,"votedOptionId":null,"isActive":true,
                "endsAt":"2025-03-03T12:00:00Z"}"#,
        )
        .unwrap();

        assert!(!poll.has_voted());
        assert_eq!(poll.option_share("o1"), Some(60));
        assert_eq!(poll.option_share("o2"), Some(40));
        assert_eq!(poll.option_share("missing"), None);
    }

    #[test]
    fn test_feedback_payload_wire_shape() {
        let payload = FeedbackPayload {
            kind: FeedbackKind::Complaint,
            message: "Нет парковки".to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "complaint");
        assert_eq!(json["message"], "Нет парковки");
    }

    #[test]
    fn test_listing_accepts_both_shapes() {
        let wrapped: Listing<YouthLeader> =
            serde_json::from_str(r#"{"data":[{"id":"1","name":"n","role":"r"}]}"#).unwrap();
        assert_eq!(wrapped.into_vec().len(), 1);

        let bare: Listing<YouthLeader> = serde_json::from_str(r#"[]"#).unwrap();
        assert!(bare.into_vec().is_empty());
    }
}
