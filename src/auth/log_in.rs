//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The auth module handles the lower level authentication and cookie auth logic.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use axum_htmx::HxRequest;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        Email, get_user_by_email, normalize_redirect_url, set_auth_cookie,
        cookie::get_token_from_cookies,
    },
    endpoints,
    flash::{Flash, take_flash},
    html::{InputField, base, link, log_in_register, password_input, submit_button},
    routing::redirect_to,
    validation::{FieldErrors, required},
};

/// How long the auth cookie should last if the user selects "remember me" at log-in.
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Invalid email or password";

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// The raw data entered by the user in the log-in form.
///
/// The password is stored as a plain string. There is no need for validation here since
/// it will be compared against the password hash in the database.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct LogInForm {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,

    /// Whether to extend the initial auth cookie duration.
    ///
    /// This value comes from a checkbox, so it either has a string value or is not set
    /// (see the [MDN docs](https://developer.mozilla.org/en-US/docs/Web/HTML/Element/input/checkbox#value_2)).
    /// The `Some` variant should be interpreted as `true` irregardless of the
    /// string value, and the `None` variant should be interpreted as `false`.
    pub remember_me: Option<String>,

    /// Optional URL to redirect to after logging in.
    pub redirect_url: Option<String>,
}

fn log_in_form(
    email: &str,
    errors: &FieldErrors,
    error_message: Option<&str>,
    redirect_url: Option<&str>,
) -> Markup {
    html! {
        form
            id="log-in-form"
            method="post"
            action=(endpoints::LOG_IN_VIEW)
            hx-post=(endpoints::LOG_IN_VIEW)
            hx-select="#log-in-form"
            hx-target="this"
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(error_message) = error_message {
                (Flash::danger(error_message).into_html())
            }

            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (InputField {
                name: "email",
                label: "Email",
                input_type: "email",
                value: email,
                required: true,
            }.into_html(errors))

            (password_input("password", "Password", errors))

            div class="flex items-center gap-x-3"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    tabindex="0"
                    class="rounded-xs";

                label
                    for="remember_me"
                    class="block text-sm font-medium text-gray-900 dark:text-white"
                {
                    "Keep me logged in for one week"
                }
            }

            (submit_button("Log in"))

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Don't have an account? "
                (link(endpoints::REGISTER_VIEW, "Register here"))
            }
        }
    }
}

fn log_in_view(form: Markup, flash: Option<&Flash>) -> Markup {
    base("Log In", &log_in_register("Log in to your account", flash, &form))
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    match raw_url.and_then(normalize_redirect_url) {
        Some(redirect_url) => Some(redirect_url),
        None => {
            if let Some(redirect_url) = raw_url {
                tracing::warn!("Invalid redirect URL from {source}: {redirect_url}");
            }
            None
        }
    }
}

/// Display the log-in page, or go straight to the dashboard if the user is
/// already logged in.
pub async fn get_log_in_page(
    jar: PrivateCookieJar,
    Query(query): Query<RedirectQuery>,
) -> Response {
    if get_token_from_cookies(&jar).is_ok() {
        return Redirect::to(endpoints::DASHBOARD_VIEW).into_response();
    }

    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");
    let (jar, flash) = take_flash(jar);
    let form = log_in_form("", &FieldErrors::new(), None, redirect_url.as_deref());

    (jar, log_in_view(form, flash.as_ref())).into_response()
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie is set and the client is redirected to the
/// requested page, or the dashboard if none was given.
/// Otherwise, the form is returned with an error message explaining the problem.
///
/// # Errors
///
/// Returns an error if the database lock could not be acquired or an internal error occurred
/// while verifying the password.
pub async fn post_log_in(
    State(state): State<LoginState>,
    HxRequest(is_hx_request): HxRequest,
    jar: PrivateCookieJar,
    Form(form): Form<LogInForm>,
) -> Result<Response, Error> {
    let redirect_url = parse_redirect_url(form.redirect_url.as_deref(), "log-in form");
    let redirect_url = redirect_url.as_deref();

    let mut errors = FieldErrors::new();
    let email = required("email", &form.email, &mut errors);
    let password = required("password", &form.password, &mut errors);

    let (Some(email), Some(_)) = (email, password) else {
        let form = log_in_form(&form.email, &errors, None, redirect_url);
        return Ok(log_in_view(form, None).into_response());
    };

    let invalid_credentials = || {
        tracing::warn!("Failed log-in attempt for {email}");
        let form = log_in_form(
            email,
            &FieldErrors::new(),
            Some(INVALID_CREDENTIALS_ERROR_MSG),
            redirect_url,
        );
        log_in_view(form, None).into_response()
    };

    let Ok(email) = Email::new(email) else {
        return Ok(invalid_credentials());
    };

    let user = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        match get_user_by_email(&email, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => return Ok(invalid_credentials()),
            Err(error) => return Err(error),
        }
    };

    let is_password_valid = user
        .password_hash
        .verify(&form.password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !is_password_valid {
        return Ok(invalid_credentials());
    }

    let cookie_duration = if form.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    let jar = set_auth_cookie(jar, user.id, cookie_duration)?;
    let redirect_url = redirect_url.unwrap_or(endpoints::DASHBOARD_VIEW);

    Ok((jar, redirect_to(is_hx_request, redirect_url)).into_response())
}
