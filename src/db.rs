//! Creates the application's database schema.

use rusqlite::Connection;

use crate::{
    auth::create_user_table,
    record::{Expense, Income, create_record_table},
};

/// Create the tables for the domain models if they do not already exist.
///
/// Foreign key enforcement is enabled on `connection` so that records
/// cannot refer to users that do not exist.
///
/// # Errors
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let transaction = connection.unchecked_transaction()?;

    create_user_table(&transaction)?;
    create_record_table::<Expense>(&transaction)?;
    create_record_table::<Income>(&transaction)?;

    transaction.commit()
}
