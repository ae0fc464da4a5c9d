//! Defines the endpoint for adding an expense or income.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar};
use axum_htmx::HxRequest;

use crate::{
    Error,
    auth::UserID,
    flash::{Flash, set_flash},
    record::{
        RecordKind, create_page::create_record_view, create_record, form::RecordForm,
        state::RecordState,
    },
    routing::redirect_to,
    timezone::local_today,
};

/// A route handler for adding a record for the logged in user.
///
/// Invalid forms are rendered again with the error messages, otherwise the
/// client is redirected to the list of records.
pub async fn create_record_endpoint<K: RecordKind>(
    State(state): State<RecordState>,
    Extension(user_id): Extension<UserID>,
    HxRequest(is_hx_request): HxRequest,
    jar: PrivateCookieJar,
    Form(form): Form<RecordForm>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let fields = match form.validate::<K>(today) {
        Ok(fields) => fields,
        Err(errors) => return Ok(create_record_view::<K>(&form, &errors).into_response()),
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    create_record(&fields, user_id, &connection)?;

    let jar = set_flash(jar, &Flash::success(&format!("{} added.", K::NAME)));

    Ok((jar, redirect_to(is_hx_request, K::LIST_VIEW)).into_response())
}
