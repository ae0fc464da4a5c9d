//! Authentication middleware that validates cookies, extends sessions, and handles redirects.

use axum::{
    extract::{FromRef, Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRequest;
use time::Duration;

use crate::{
    AppState,
    auth::{
        build_log_in_redirect_url,
        cookie::{COOKIE_TOKEN, extend_auth_cookie_duration_if_needed, get_token_from_cookies},
    },
    flash::{Flash, set_flash},
    routing::redirect_to,
};

/// The message shown on the log-in page when a user tries to access a
/// protected page without a valid session.
pub const LOG_IN_REQUIRED_MSG: &str = "Please log in to continue.";

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that checks for a valid authorization cookie.
///
/// If the cookie is valid, the user ID is placed into the request extensions,
/// the request is executed normally and the session is extended. Otherwise
/// the client is redirected to the log-in page, via `HX-Redirect` for htmx
/// requests.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(
    State(state): State<AuthState>,
    HxRequest(is_hx_request): HxRequest,
    jar: PrivateCookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let user_id = match get_token_from_cookies(&jar) {
        Ok(token) => token.user_id,
        Err(error) => {
            tracing::debug!(
                "Rejected request to {}: {error}. Redirecting to log in page.",
                request.uri().path()
            );
            let log_in_redirect_url = build_log_in_redirect_url(&request);
            let jar = set_flash(jar, &Flash::info(LOG_IN_REQUIRED_MSG));

            return (jar, redirect_to(is_hx_request, &log_in_redirect_url)).into_response();
        }
    };

    request.extensions_mut().insert(user_id);
    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();

    // Handlers such as log out set the auth cookie themselves.
    let token_cookie_prefix = format!("{COOKIE_TOKEN}=");
    let handler_set_token = parts
        .headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.starts_with(&token_cookie_prefix));

    if handler_set_token {
        return Response::from_parts(parts, body);
    }

    let jar = match extend_auth_cookie_duration_if_needed(jar.clone(), state.cookie_duration) {
        Ok(updated_jar) => updated_jar,
        Err(err) => {
            tracing::error!("Error extending cookie duration: {err:?}. Rolling back cookie jar.");
            jar
        }
    };
    for (key, val) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, val.to_owned());
    }

    Response::from_parts(parts, body)
}
