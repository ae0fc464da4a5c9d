//! Expenses and incomes: storage, forms, and the pages and endpoints for managing them.

mod category;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod records_page;
mod state;

pub use category::{ExpenseCategory, IncomeSource};
pub use core::{
    Expense, Income, Record, RecordFields, RecordId, RecordKind, count_records, create_record,
    create_record_table, delete_record, get_owned_record, get_records, get_records_in_range,
    sum_amounts, update_record,
};
#[cfg(test)]
pub use core::get_record;
pub use create_endpoint::create_record_endpoint;
pub use create_page::get_create_record_page;
pub use delete_endpoint::delete_record_endpoint;
pub use edit_endpoint::edit_record_endpoint;
pub use edit_page::get_edit_record_page;
pub use records_page::get_records_page;
