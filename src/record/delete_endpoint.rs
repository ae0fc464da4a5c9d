//! Defines the endpoint for deleting an expense or income.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRequest;

use crate::{
    Error,
    auth::UserID,
    flash::{Flash, set_flash},
    record::{RecordId, RecordKind, delete_record, get_owned_record, state::RecordState},
    routing::redirect_to,
};

/// A route handler for deleting a record owned by the logged in user,
/// redirects to the list of records on success.
pub async fn delete_record_endpoint<K: RecordKind>(
    State(state): State<RecordState>,
    Extension(user_id): Extension<UserID>,
    Path(record_id): Path<RecordId>,
    HxRequest(is_hx_request): HxRequest,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_owned_record::<K>(record_id, user_id, &connection)?;
    delete_record::<K>(record_id, user_id, &connection)?;

    let jar = set_flash(jar, &Flash::success(&format!("{} deleted.", K::NAME)));

    Ok((jar, redirect_to(is_hx_request, K::LIST_VIEW)).into_response())
}
