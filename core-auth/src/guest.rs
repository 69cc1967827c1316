//! Locally synthesized guest profiles

use bridge_traits::UserHint;
use chrono::{DateTime, Utc};
use core_api::User;

use crate::session::GuestReason;

pub const GUEST_PLATFORM_ID: i64 = 12345;
pub const GUEST_FIRST_NAME: &str = "Гость";
pub const GUEST_USERNAME: &str = "guest";
pub const GUEST_CITY: &str = "Тель-Авив";

/// Token of the synthetic credential held by development guests.
pub(crate) const DEV_TOKEN: &str = "dev-token";

/// Placeholder local id; guests have no server-side record.
const GUEST_USER_ID: i64 = 1;

/// Build the profile a guest session shows.
///
/// Uses whatever the unverified host hint provides and fixed defaults for the
/// rest. Development guests (no identity payload) get non-zero activity
/// counters so profile screens have something to display.
pub fn guest_user(hint: Option<&UserHint>, reason: GuestReason, now: DateTime<Utc>) -> User {
    let hint = hint.cloned().unwrap_or_default();
    let (events_count, polls_count) = match reason {
        GuestReason::NoIdentityPayload => (3, 7),
        GuestReason::ExchangeFailed => (0, 0),
    };

    User {
        id: GUEST_USER_ID,
        platform_id: hint.id.filter(|id| *id != 0).unwrap_or(GUEST_PLATFORM_ID),
        first_name: non_empty(hint.first_name).unwrap_or_else(|| GUEST_FIRST_NAME.to_string()),
        last_name: non_empty(hint.last_name),
        username: non_empty(hint.username).or_else(|| Some(GUEST_USERNAME.to_string())),
        phone: None,
        city: Some(GUEST_CITY.to_string()),
        joined_at: now,
        notifications_enabled: true,
        events_count,
        polls_count,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_defaults_without_hint() {
        let user = guest_user(None, GuestReason::ExchangeFailed, now());

        assert_eq!(user.platform_id, GUEST_PLATFORM_ID);
        assert_eq!(user.first_name, GUEST_FIRST_NAME);
        assert_eq!(user.username.as_deref(), Some(GUEST_USERNAME));
        assert_eq!(user.city.as_deref(), Some(GUEST_CITY));
        assert_eq!(user.joined_at, now());
        assert_eq!((user.events_count, user.polls_count), (0, 0));
    }

    #[test]
    fn test_hint_fields_take_precedence() {
        let hint = UserHint::new(777, "Анна").with_last_name("Левина");
        let user = guest_user(Some(&hint), GuestReason::ExchangeFailed, now());

        assert_eq!(user.platform_id, 777);
        assert_eq!(user.first_name, "Анна");
        assert_eq!(user.last_name.as_deref(), Some("Левина"));
        assert_eq!(user.username.as_deref(), Some(GUEST_USERNAME));
    }

    #[test]
    fn test_development_guest_counters() {
        let user = guest_user(None, GuestReason::NoIdentityPayload, now());
        assert_eq!((user.events_count, user.polls_count), (3, 7));
        assert!(user.notifications_enabled);
    }
}
