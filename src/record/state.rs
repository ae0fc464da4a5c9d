use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;

use crate::AppState;

/// The state needed by the expense and income pages and endpoints.
#[derive(Debug, Clone)]
pub struct RecordState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for managing records.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The key for the flash message cookie.
    pub cookie_key: Key,
}

impl FromRef<AppState> for RecordState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
            cookie_key: state.cookie_key.clone(),
        }
    }
}

impl FromRef<RecordState> for Key {
    fn from_ref(state: &RecordState) -> Self {
        state.cookie_key.clone()
    }
}

#[cfg(test)]
impl RecordState {
    pub fn for_test(db_connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            local_timezone: crate::test_utils::TEST_TIMEZONE.to_owned(),
            db_connection,
            cookie_key: crate::test_utils::get_test_cookie_key(),
        }
    }
}
