use chrono::Duration;
use serde::{Deserialize, Serialize};

/// How long a remembered login stays valid.
pub const LOGIN_TTL: Duration = Duration::hours(24);

/// The authenticated user remembered in the local store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub username: String,
    /// Epoch milliseconds of the successful login.
    pub login_time: i64,
}

impl AuthUser {
    #[must_use]
    pub fn new(username: impl Into<String>, login_time: i64) -> Self {
        Self {
            username: username.into(),
            login_time,
        }
    }

    /// True once more than [`LOGIN_TTL`] has passed since login.
    #[must_use]
    pub fn is_expired(&self, now_millis: i64) -> bool {
        now_millis.saturating_sub(self.login_time) > LOGIN_TTL.num_milliseconds()
    }
}
