//! One-shot notices that are shown on the next rendered page.
//!
//! A flash message is stored in a private cookie by the handler that
//! produces it (usually right before a redirect) and removed by the first
//! page that displays it.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

/// The name of the cookie holding the flash message.
pub(crate) const COOKIE_FLASH: &str = "flash";

/// How a flash message should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Danger,
}

/// A one-shot message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: &str) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.to_owned(),
        }
    }

    pub fn info(message: &str) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.to_owned(),
        }
    }

    pub fn danger(message: &str) -> Self {
        Self {
            level: FlashLevel::Danger,
            message: message.to_owned(),
        }
    }

    pub fn into_html(&self) -> Markup {
        let style = match self.level {
            FlashLevel::Success => {
                "text-green-800 bg-green-50 border-green-300 \
                dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
            }
            FlashLevel::Info => {
                "text-blue-800 bg-blue-50 border-blue-300 \
                dark:bg-gray-800 dark:text-blue-400 dark:border-blue-800"
            }
            FlashLevel::Danger => {
                "text-red-800 bg-red-50 border-red-300 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
            }
        };

        html! {
            div
                id="flash"
                role="alert"
                class={"w-full p-4 mb-4 text-sm border rounded-lg " (style)}
            {
                (self.message)
            }
        }
    }
}

/// Store `flash` in the cookie jar so that it is shown on the next page.
///
/// If the message cannot be serialized it is logged and dropped.
pub fn set_flash(jar: PrivateCookieJar, flash: &Flash) -> PrivateCookieJar {
    match serde_json::to_string(flash) {
        Ok(value) => jar.add(
            Cookie::build((COOKIE_FLASH, value))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Strict)
                .secure(true),
        ),
        Err(error) => {
            tracing::error!("Could not serialize flash message {flash:?}: {error}");
            jar
        }
    }
}

/// Remove the flash message from the cookie jar and return it.
///
/// Cookies that cannot be decrypted or parsed are removed and ignored.
pub fn take_flash(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(COOKIE_FLASH) else {
        return (jar, None);
    };

    let flash = serde_json::from_str(cookie.value_trimmed())
        .inspect_err(|error| tracing::warn!("Could not parse flash message: {error}"))
        .ok();

    (jar.remove(Cookie::build(COOKIE_FLASH).path("/")), flash)
}
