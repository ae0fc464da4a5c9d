//! Expense and income records and the queries for storing them.
//!
//! Expenses and incomes only differ in the name of their table and the set of
//! labels they may be given (categories for expenses, sources for incomes),
//! so both are implemented once, generic over [RecordKind].

use std::fmt::Debug;

use rusqlite::{Connection, Row, params, types::Type};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    endpoints,
    month::MonthRange,
    record::{ExpenseCategory, IncomeSource},
    validation::Choice,
};

/// Describes one kind of record: where it is stored and how it is presented.
pub trait RecordKind: Debug + Clone + Copy + PartialEq + Send + Sync + 'static {
    /// The values the record's label may take.
    type Label: Choice + Debug + PartialEq + Send + Sync;

    /// The name of the database table.
    const TABLE: &'static str;
    /// The name of the label column, which is also the name of the form field.
    const LABEL_COLUMN: &'static str;
    /// The human readable name of the label, e.g. "Category".
    const LABEL_TITLE: &'static str;
    /// The human readable name of the record, e.g. "Expense".
    const NAME: &'static str;
    /// The human readable plural name of the record, e.g. "Expenses".
    const PLURAL: &'static str;

    /// The page listing the records.
    const LIST_VIEW: &'static str;
    /// The page for adding a record.
    const NEW_VIEW: &'static str;
    /// The page for editing a record, with a `{record_id}` parameter.
    const EDIT_VIEW: &'static str;
    /// The route for deleting a record, with a `{record_id}` parameter.
    const DELETE: &'static str;
}

/// Money spent by a user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expense;

impl RecordKind for Expense {
    type Label = ExpenseCategory;

    const TABLE: &'static str = "expense";
    const LABEL_COLUMN: &'static str = "category";
    const LABEL_TITLE: &'static str = "Category";
    const NAME: &'static str = "Expense";
    const PLURAL: &'static str = "Expenses";

    const LIST_VIEW: &'static str = endpoints::EXPENSES_VIEW;
    const NEW_VIEW: &'static str = endpoints::NEW_EXPENSE_VIEW;
    const EDIT_VIEW: &'static str = endpoints::EDIT_EXPENSE_VIEW;
    const DELETE: &'static str = endpoints::DELETE_EXPENSE;
}

/// Money earned by a user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Income;

impl RecordKind for Income {
    type Label = IncomeSource;

    const TABLE: &'static str = "income";
    const LABEL_COLUMN: &'static str = "source";
    const LABEL_TITLE: &'static str = "Source";
    const NAME: &'static str = "Income";
    const PLURAL: &'static str = "Incomes";

    const LIST_VIEW: &'static str = endpoints::INCOMES_VIEW;
    const NEW_VIEW: &'static str = endpoints::NEW_INCOME_VIEW;
    const EDIT_VIEW: &'static str = endpoints::EDIT_INCOME_VIEW;
    const DELETE: &'static str = endpoints::DELETE_INCOME;
}

pub type RecordId = i64;

/// The validated, user editable fields of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFields<K: RecordKind> {
    /// The expense category or income source.
    pub label: K::Label,
    /// Optional free text, `None` when left blank.
    pub description: Option<String>,
    /// A positive amount of money in dollars.
    pub amount: f64,
    /// The day the money was spent or received.
    pub date: Date,
}

/// An expense or income stored in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<K: RecordKind> {
    pub id: RecordId,
    pub label: K::Label,
    pub description: Option<String>,
    pub amount: f64,
    pub date: Date,
    /// The user that owns the record.
    pub user_id: UserID,
}

pub fn create_record_table<K: RecordKind>(connection: &Connection) -> Result<(), rusqlite::Error> {
    let labels = K::Label::ALL
        .iter()
        .map(|label| format!("'{}'", label.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    connection.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id INTEGER PRIMARY KEY,
            {label} TEXT NOT NULL CHECK ({label} IN ({labels})),
            description TEXT,
            amount REAL NOT NULL CHECK (amount > 0),
            date TEXT NOT NULL,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_{table}_user_date ON {table}(user_id, date);",
        table = K::TABLE,
        label = K::LABEL_COLUMN,
    ))
}

fn select_columns<K: RecordKind>() -> String {
    format!(
        "SELECT id, {}, description, amount, date, user_id FROM {}",
        K::LABEL_COLUMN,
        K::TABLE
    )
}

fn map_row<K: RecordKind>(row: &Row) -> Result<Record<K>, rusqlite::Error> {
    let raw_label: String = row.get(1)?;
    let label = K::Label::parse(&raw_label)
        .ok_or_else(|| rusqlite::Error::InvalidColumnType(1, K::LABEL_COLUMN.to_owned(), Type::Text))?;

    Ok(Record {
        id: row.get(0)?,
        label,
        description: row.get(2)?,
        amount: row.get(3)?,
        date: row.get(4)?,
        user_id: UserID::new(row.get(5)?),
    })
}

/// Create a record owned by `user_id`.
///
/// # Errors
/// Returns an [Error::InvalidUser] if `user_id` does not refer to a registered user,
/// or an [Error::SqlError] if there is some other SQL error.
pub fn create_record<K: RecordKind>(
    fields: &RecordFields<K>,
    user_id: UserID,
    connection: &Connection,
) -> Result<Record<K>, Error> {
    connection.execute(
        &format!(
            "INSERT INTO {} ({}, description, amount, date, user_id) VALUES (?1, ?2, ?3, ?4, ?5)",
            K::TABLE,
            K::LABEL_COLUMN
        ),
        params![
            fields.label.as_str(),
            fields.description,
            fields.amount,
            fields.date,
            user_id.as_i64()
        ],
    )?;

    Ok(Record {
        id: connection.last_insert_rowid(),
        label: fields.label,
        description: fields.description.clone(),
        amount: fields.amount,
        date: fields.date,
        user_id,
    })
}

/// Retrieve a record by its `id`, regardless of who owns it.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid record,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_record<K: RecordKind>(id: RecordId, connection: &Connection) -> Result<Record<K>, Error> {
    connection
        .prepare(&format!("{} WHERE id = :id", select_columns::<K>()))?
        .query_row(&[(":id", &id)], map_row::<K>)
        .map_err(Error::from)
}

/// Retrieve a record by its `id` and check that it belongs to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid record,
/// - [Error::Forbidden] if the record belongs to another user,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_owned_record<K: RecordKind>(
    id: RecordId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Record<K>, Error> {
    let record = get_record::<K>(id, connection)?;

    if record.user_id != user_id {
        tracing::warn!(
            "User {user_id} tried to access {} {id} owned by user {}",
            K::TABLE,
            record.user_id
        );
        return Err(Error::Forbidden);
    }

    Ok(record)
}

/// All of the records owned by `user_id`, newest first.
///
/// Records on the same date are ordered by when they were created, newest first.
pub fn get_records<K: RecordKind>(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Record<K>>, Error> {
    connection
        .prepare(&format!(
            "{} WHERE user_id = :user_id ORDER BY date DESC, id DESC",
            select_columns::<K>()
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row::<K>)?
        .map(|maybe_record| maybe_record.map_err(Error::from))
        .collect()
}

/// The records owned by `user_id` that are dated within `month`, oldest first.
pub fn get_records_in_range<K: RecordKind>(
    user_id: UserID,
    month: MonthRange,
    connection: &Connection,
) -> Result<Vec<Record<K>>, Error> {
    connection
        .prepare(&format!(
            "{} WHERE user_id = ?1 AND date >= ?2 AND date < ?3 ORDER BY date ASC, id ASC",
            select_columns::<K>()
        ))?
        .query_map(params![user_id.as_i64(), month.start, month.end], map_row::<K>)?
        .map(|maybe_record| maybe_record.map_err(Error::from))
        .collect()
}

/// Overwrite the fields of the record `id` owned by `user_id`.
///
/// # Errors
/// Returns an [Error::UpdateMissingRecord] if there is no record `id` owned by `user_id`.
pub fn update_record<K: RecordKind>(
    id: RecordId,
    user_id: UserID,
    fields: &RecordFields<K>,
    connection: &Connection,
) -> Result<Record<K>, Error> {
    let rows_affected = connection.execute(
        &format!(
            "UPDATE {} SET {} = ?1, description = ?2, amount = ?3, date = ?4 \
            WHERE id = ?5 AND user_id = ?6",
            K::TABLE,
            K::LABEL_COLUMN
        ),
        params![
            fields.label.as_str(),
            fields.description,
            fields.amount,
            fields.date,
            id,
            user_id.as_i64()
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingRecord);
    }

    Ok(Record {
        id,
        label: fields.label,
        description: fields.description.clone(),
        amount: fields.amount,
        date: fields.date,
        user_id,
    })
}

/// Delete the record `id` owned by `user_id`.
///
/// # Errors
/// Returns an [Error::DeleteMissingRecord] if there is no record `id` owned by `user_id`.
pub fn delete_record<K: RecordKind>(
    id: RecordId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        &format!("DELETE FROM {} WHERE id = ?1 AND user_id = ?2", K::TABLE),
        params![id, user_id.as_i64()],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingRecord);
    }

    Ok(())
}

/// The total amount of the records owned by `user_id`, optionally only those
/// dated within `month`. Returns zero if there are no matching records.
pub fn sum_amounts<K: RecordKind>(
    user_id: UserID,
    month: Option<MonthRange>,
    connection: &Connection,
) -> Result<f64, Error> {
    let total = match month {
        Some(month) => connection.query_row(
            &format!(
                "SELECT COALESCE(SUM(amount), 0.0) FROM {} \
                WHERE user_id = ?1 AND date >= ?2 AND date < ?3",
                K::TABLE
            ),
            params![user_id.as_i64(), month.start, month.end],
            |row| row.get(0),
        )?,
        None => connection.query_row(
            &format!(
                "SELECT COALESCE(SUM(amount), 0.0) FROM {} WHERE user_id = ?1",
                K::TABLE
            ),
            params![user_id.as_i64()],
            |row| row.get(0),
        )?,
    };

    Ok(total)
}

/// The number of records owned by `user_id`.
pub fn count_records<K: RecordKind>(user_id: UserID, connection: &Connection) -> Result<u64, Error> {
    let count: i64 = connection.query_row(
        &format!("SELECT COUNT(id) FROM {} WHERE user_id = ?1", K::TABLE),
        params![user_id.as_i64()],
        |row| row.get(0),
    )?;

    Ok(count.try_into().unwrap_or_default())
}
