//! The registration page for creating a new account.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use axum_htmx::HxRequest;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, PasswordHash, ValidatedPassword,
    auth::{Email, create_user, get_user_by_email},
    endpoints,
    flash::{Flash, set_flash, take_flash},
    html::{InputField, base, link, log_in_register, password_input, submit_button},
    routing::redirect_to,
    validation::{FieldErrors, check_max_length, parse_email, required},
};

/// The longest name or email address that can be registered.
pub const MAX_NAME_LENGTH: usize = 100;

pub const DUPLICATE_USER_MSG: &str = "User name or email already exist";
pub const ACCOUNT_CREATED_MSG: &str = "Account created, please log in.";
pub const PASSWORD_MISMATCH_MSG: &str = "Passwords do not match.";

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    pub db_connection: Arc<Mutex<Connection>>,
    /// The bcrypt cost used to hash new passwords.
    pub password_hash_cost: u32,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
            password_hash_cost: state.password_hash_cost,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

fn registration_form(form: &RegisterForm, errors: &FieldErrors) -> Markup {
    html! {
        form
            id="register-form"
            method="post"
            action=(endpoints::REGISTER_VIEW)
            hx-post=(endpoints::REGISTER_VIEW)
            hx-select="#register-form"
            hx-target="this"
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            (InputField {
                name: "name",
                label: "Name",
                input_type: "text",
                value: &form.name,
                required: true,
            }.into_html(errors))

            (InputField {
                name: "email",
                label: "Email",
                input_type: "email",
                value: &form.email,
                required: true,
            }.into_html(errors))

            (password_input("password", "Password", errors))
            (password_input("confirm_password", "Confirm Password", errors))

            (submit_button("Create account"))

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                (link(endpoints::LOG_IN_VIEW, "Log in here"))
            }
        }
    }
}

fn register_view(form: &RegisterForm, errors: &FieldErrors, flash: Option<&Flash>) -> Markup {
    base(
        "Register",
        &log_in_register("Create an account", flash, &registration_form(form, errors)),
    )
}

/// Display the registration page.
pub async fn get_register_page(jar: PrivateCookieJar) -> Response {
    let (jar, flash) = take_flash(jar);

    (
        jar,
        register_view(&RegisterForm::default(), &FieldErrors::new(), flash.as_ref()),
    )
        .into_response()
}

struct NewUser {
    name: String,
    email: Email,
    password: ValidatedPassword,
}

fn validate(form: &RegisterForm) -> Result<NewUser, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = required("name", &form.name, &mut errors);
    if let Some(name) = name {
        check_max_length("name", name, MAX_NAME_LENGTH, &mut errors);
    }

    check_max_length("email", form.email.trim(), MAX_NAME_LENGTH, &mut errors);
    let email = parse_email("email", &form.email, &mut errors);

    let password = required("password", &form.password, &mut errors).and_then(|_| {
        ValidatedPassword::new(&form.password, &[&form.name, &form.email])
            .inspect_err(|error| {
                let message = match error {
                    Error::TooWeak(feedback) if !feedback.is_empty() => {
                        format!("Password is too weak. {feedback}")
                    }
                    _ => "Password is too weak.".to_owned(),
                };
                errors.insert("password", message);
            })
            .ok()
    });

    if required("confirm_password", &form.confirm_password, &mut errors).is_some()
        && form.password != form.confirm_password
    {
        errors.insert("confirm_password", PASSWORD_MISMATCH_MSG);
    }

    match (name, email, password) {
        (Some(name), Some(email), Some(password)) if errors.is_empty() => Ok(NewUser {
            name: name.to_owned(),
            email,
            password,
        }),
        _ => Err(errors),
    }
}

/// Create a new account.
///
/// Invalid forms are rendered again with the error messages. If the email
/// address is already registered the client is sent back to the
/// registration page with a flash message, otherwise to the log-in page.
pub async fn register_user(
    State(state): State<RegistrationState>,
    HxRequest(is_hx_request): HxRequest,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, Error> {
    let new_user = match validate(&form) {
        Ok(new_user) => new_user,
        Err(errors) => return Ok(register_view(&form, &errors, None).into_response()),
    };

    let duplicate_user = |jar: PrivateCookieJar| {
        tracing::info!("Rejected registration for existing email {}", new_user.email);
        let jar = set_flash(jar, &Flash::danger(DUPLICATE_USER_MSG));
        (jar, redirect_to(is_hx_request, endpoints::REGISTER_VIEW)).into_response()
    };

    let email_taken = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        match get_user_by_email(&new_user.email, &connection) {
            Ok(_) => true,
            Err(Error::NotFound) => false,
            Err(error) => return Err(error),
        }
    };

    if email_taken {
        return Ok(duplicate_user(jar));
    }

    let password_hash = PasswordHash::new(new_user.password, state.password_hash_cost)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match create_user(
        &new_user.name,
        new_user.email.clone(),
        password_hash,
        &connection,
    ) {
        Ok(user) => {
            tracing::info!("Registered user {}", user.id);
            let jar = set_flash(jar, &Flash::success(ACCOUNT_CREATED_MSG));
            Ok((jar, redirect_to(is_hx_request, endpoints::LOG_IN_VIEW)).into_response())
        }
        Err(Error::DuplicateUser) => Ok(duplicate_user(jar)),
        Err(error) => Err(error),
    }
}
