//! Monthly CSV reports of a user's incomes and expenses.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    month::MonthRange,
    record::{Expense, Income, Record, RecordKind, get_records_in_range},
    validation::Choice,
};

/// The column names written as the first row of every report.
pub const CSV_HEADER: [&str; 5] = ["Type", "Date", "Category/Source", "Amount", "Description"];

/// The state needed for exporting reports.
#[derive(Debug, Clone)]
pub struct ExportState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Write the CSV report for the records dated within `month`.
///
/// Incomes are written before expenses, each in date order.
///
/// # Errors
/// Returns an [Error::CsvError] if a row could not be written.
pub fn write_report(
    incomes: &[Record<Income>],
    expenses: &[Record<Expense>],
) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for income in incomes {
        writer.write_record(report_row(income))?;
    }

    for expense in expenses {
        writer.write_record(report_row(expense))?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))
}

fn report_row<K: RecordKind>(record: &Record<K>) -> [String; 5] {
    [
        K::NAME.to_owned(),
        record.date.to_string(),
        record.label.as_str().to_owned(),
        // f64's Display omits a trailing ".0", so 200.0 is written as "200".
        record.amount.to_string(),
        record.description.clone().unwrap_or_default(),
    ]
}

/// Download the report for `year` and `month` as a CSV attachment.
///
/// # Errors
/// Returns an [Error::InvalidMonth] if `month` is not between 1 and 12.
pub async fn export_csv_endpoint(
    State(state): State<ExportState>,
    Extension(user_id): Extension<UserID>,
    Path((year, month)): Path<(i32, u8)>,
) -> Result<Response, Error> {
    let month_range = MonthRange::new(year, month)?;

    let (incomes, expenses) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        (
            get_records_in_range::<Income>(user_id, month_range, &connection)?,
            get_records_in_range::<Expense>(user_id, month_range, &connection)?,
        )
    };

    let report = write_report(&incomes, &expenses)?;
    let content_disposition = format!("attachment; filename=report_{year}_{month}.csv");

    Ok((
        [
            (CONTENT_TYPE, "text/csv".to_owned()),
            (CONTENT_DISPOSITION, content_disposition),
        ],
        report,
    )
        .into_response())
}
