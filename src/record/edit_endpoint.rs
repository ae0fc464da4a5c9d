//! Defines the endpoint for updating an expense or income.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar};
use axum_htmx::HxRequest;

use crate::{
    Error,
    auth::UserID,
    flash::{Flash, set_flash},
    record::{
        RecordId, RecordKind, edit_page::edit_record_view, form::RecordForm, get_owned_record,
        state::RecordState, update_record,
    },
    routing::redirect_to,
    timezone::local_today,
};

/// A route handler for updating a record owned by the logged in user.
///
/// Ownership is checked before the form is validated.
pub async fn edit_record_endpoint<K: RecordKind>(
    State(state): State<RecordState>,
    Extension(user_id): Extension<UserID>,
    Path(record_id): Path<RecordId>,
    HxRequest(is_hx_request): HxRequest,
    jar: PrivateCookieJar,
    Form(form): Form<RecordForm>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_owned_record::<K>(record_id, user_id, &connection)?;

    let fields = match form.validate::<K>(today) {
        Ok(fields) => fields,
        Err(errors) => {
            return Ok(edit_record_view::<K>(record_id, &form, &errors).into_response());
        }
    };

    update_record(record_id, user_id, &fields, &connection)?;

    let jar = set_flash(jar, &Flash::success(&format!("{} updated.", K::NAME)));

    Ok((jar, redirect_to(is_hx_request, K::LIST_VIEW)).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;
    use axum_htmx::HxRequest;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        auth::User,
        flash::Flash,
        record::{
            Income, IncomeSource, Record, RecordFields, create_record, form::RecordForm,
            get_record, state::RecordState,
        },
        test_utils::{
            assert_field_error, assert_hx_redirect, create_test_user, get_flash,
            get_shared_test_connection, jar_from_response, get_test_jar, must_get_form,
            parse_html_document,
        },
        validation::AMOUNT_TOO_SMALL_MSG,
    };

    use super::edit_record_endpoint;

    fn setup() -> (Arc<Mutex<Connection>>, User, User, Record<Income>) {
        let shared_connection = get_shared_test_connection();
        let (owner, other_user, record) = {
            let connection = shared_connection.lock().unwrap();
            let owner = create_test_user("owner@bar.baz", &connection);
            let other_user = create_test_user("other@bar.baz", &connection);
            let record = create_record(
                &RecordFields::<Income> {
                    label: IncomeSource::Salary,
                    description: None,
                    amount: 100.0,
                    date: date!(2024 - 03 - 01),
                },
                owner.id,
                &connection,
            )
            .unwrap();
            (owner, other_user, record)
        };

        (shared_connection, owner, other_user, record)
    }

    fn bonus_form(amount: &str) -> RecordForm {
        RecordForm {
            label: "bonus".to_owned(),
            amount: amount.to_owned(),
            date: "2024-02-15".to_owned(),
            description: "quarterly".to_owned(),
        }
    }

    #[tokio::test]
    async fn owner_can_update_record() {
        let (connection, owner, _, record) = setup();
        let state = RecordState::for_test(connection.clone());

        let response = edit_record_endpoint::<Income>(
            State(state),
            Extension(owner.id),
            Path(record.id),
            HxRequest(true),
            get_test_jar(),
            Form(bonus_form("150")),
        )
        .await
        .unwrap();

        assert_hx_redirect(&response, "/incomes");
        assert_eq!(
            get_flash(jar_from_response(&response)),
            Some(Flash::success("Income updated."))
        );
        let updated = get_record::<Income>(record.id, &connection.lock().unwrap()).unwrap();
        assert_eq!(updated.label, IncomeSource::Bonus);
        assert_eq!(updated.amount, 150.0);
        assert_eq!(updated.date, date!(2024 - 02 - 15));
        assert_eq!(updated.description.as_deref(), Some("quarterly"));
    }

    #[tokio::test]
    async fn other_user_cannot_update_record() {
        let (connection, _, other_user, record) = setup();
        let state = RecordState::for_test(connection.clone());

        let result = edit_record_endpoint::<Income>(
            State(state),
            Extension(other_user.id),
            Path(record.id),
            HxRequest(true),
            get_test_jar(),
            Form(bonus_form("150")),
        )
        .await;

        assert_eq!(result.unwrap_err(), Error::Forbidden);
        assert_eq!(
            get_record::<Income>(record.id, &connection.lock().unwrap()),
            Ok(record)
        );
    }

    #[tokio::test]
    async fn missing_record_is_not_found() {
        let (connection, owner, _, record) = setup();
        let state = RecordState::for_test(connection);

        let result = edit_record_endpoint::<Income>(
            State(state),
            Extension(owner.id),
            Path(record.id + 100),
            HxRequest(true),
            get_test_jar(),
            Form(bonus_form("150")),
        )
        .await;

        assert_eq!(result.unwrap_err(), Error::NotFound);
    }

    #[tokio::test]
    async fn invalid_form_renders_errors_and_keeps_record() {
        let (connection, owner, _, record) = setup();
        let state = RecordState::for_test(connection.clone());

        let response = edit_record_endpoint::<Income>(
            State(state),
            Extension(owner.id),
            Path(record.id),
            HxRequest(true),
            get_test_jar(),
            Form(bonus_form("0")),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        let form = must_get_form(&html, "record-form");
        assert_field_error(&form, "amount", AMOUNT_TOO_SMALL_MSG);
        assert_eq!(
            get_record::<Income>(record.id, &connection.lock().unwrap()),
            Ok(record)
        );
    }
}
