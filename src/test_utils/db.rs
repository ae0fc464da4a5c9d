use std::sync::{Arc, Mutex};

use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;

use crate::{
    app_state::create_cookie_key,
    auth::{Email, PasswordHash, User, create_user},
    db::initialize,
    flash::{Flash, take_flash},
};

pub(crate) const TEST_TIMEZONE: &str = "Etc/UTC";

#[track_caller]
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

#[track_caller]
pub(crate) fn get_shared_test_connection() -> Arc<Mutex<Connection>> {
    Arc::new(Mutex::new(get_test_connection()))
}

/// Create a user with a fixed, unhashed password hash.
#[track_caller]
pub(crate) fn create_test_user(email: &str, connection: &Connection) -> User {
    create_user(
        "Test User",
        Email::new_unchecked(email),
        PasswordHash::new_unchecked("hunter2"),
        connection,
    )
    .expect("Could not create test user")
}

pub(crate) fn get_test_cookie_key() -> Key {
    create_cookie_key("42")
}

pub(crate) fn get_test_jar() -> PrivateCookieJar {
    PrivateCookieJar::new(get_test_cookie_key())
}

/// The flash message stored in `jar`, if any.
pub(crate) fn get_flash(jar: PrivateCookieJar) -> Option<Flash> {
    take_flash(jar).1
}
