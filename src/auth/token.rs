//! The session token stored in the auth cookie.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::UserID;

// Fixed width so that midnight is written as "00:00:00.0" and parses back.
time::serde::format_description!(
    expiry_format,
    OffsetDateTime,
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour sign:mandatory]:[offset_minute]:[offset_second]"
);

/// A token for authorization and authentication.
///
/// The token identifies the logged in user and the time after which the
/// session is no longer valid.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Token {
    pub user_id: UserID,

    #[serde(with = "expiry_format")]
    pub expires_at: OffsetDateTime,
}

impl Token {
    /// Whether the token has expired at `now`.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}
