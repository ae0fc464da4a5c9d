use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use wallet_rs::{
    Email, Expense, ExpenseCategory, Income, IncomeSource, PasswordHash, RecordFields,
    ValidatedPassword, create_record, create_user, initialize_db,
};

/// A utility for creating a test database for the wallet_rs server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(
        "Test User",
        Email::new("test@example.com")?,
        password_hash,
        &conn,
    )?;

    println!("Creating sample incomes and expenses...");

    let today = OffsetDateTime::now_utc().date();

    for months_ago in 0..3 {
        let payday = today - Duration::days(30 * months_ago);

        create_record(
            &RecordFields::<Income> {
                label: IncomeSource::Salary,
                description: Some("Monthly salary".to_owned()),
                amount: 4200.0,
                date: payday,
            },
            user.id,
            &conn,
        )?;

        let expenses = [
            (ExpenseCategory::Household, "Rent", 1800.0, 0),
            (ExpenseCategory::Internet, "Fibre plan", 79.99, 2),
            (ExpenseCategory::Food, "Groceries", 154.35, 5),
            (ExpenseCategory::Transport, "Bus pass", 60.0, 9),
            (ExpenseCategory::Food, "Dinner out", 48.5, 14),
        ];

        for (category, description, amount, days_before) in expenses {
            create_record(
                &RecordFields::<Expense> {
                    label: category,
                    description: Some(description.to_owned()),
                    amount,
                    date: payday - Duration::days(days_before),
                },
                user.id,
                &conn,
            )?;
        }
    }

    create_record(
        &RecordFields::<Income> {
            label: IncomeSource::Bonus,
            description: None,
            amount: 500.0,
            date: today - Duration::days(45),
        },
        user.id,
        &conn,
    )?;

    println!("Success! Log in with test@example.com and the password \"test\".");

    Ok(())
}
