use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use expense_tracker::{
    expense::{Category, NewExpense, create_expense},
    initialize_db,
};

/// A utility for creating a database filled with example expenses.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many days of expenses to create, counting back from today.
    #[arg(
        long,
        short,
        default_value_t = 400,
        value_parser = clap::value_parser!(i64).range(1..=MAX_DAYS),
    )]
    days: i64,
}

/// Roughly a century, well within the dates `time` can represent.
const MAX_DAYS: i64 = 36_500;

/// The expenses that repeat through the example data: title, category,
/// amount and how often in days.
const RECURRING_EXPENSES: [(&str, Category, f64, i64); 8] = [
    ("Groceries", Category::Food, 86.40, 7),
    ("Coffee", Category::Food, 5.50, 2),
    ("Bus pass", Category::Transport, 45.00, 14),
    ("Fuel", Category::Transport, 72.10, 10),
    ("Streaming subscription", Category::Entertainment, 17.99, 30),
    ("Power bill", Category::Bills, 132.75, 30),
    ("Pharmacy", Category::Health, 23.30, 21),
    ("Clothes", Category::Shopping, 64.00, 45),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating example expenses...");

    let today = OffsetDateTime::now_utc();
    let mut count = 0;

    for day in 0..args.days {
        let date = today - Duration::days(day);

        for (title, category, amount, every_n_days) in RECURRING_EXPENSES {
            if day % every_n_days != 0 {
                continue;
            }

            create_expense(
                &NewExpense {
                    title: title.to_owned(),
                    category,
                    amount,
                    date,
                },
                &conn,
            )?;
            count += 1;
        }
    }

    create_expense(
        &NewExpense {
            title: "Concert tickets".to_owned(),
            category: Category::Other,
            amount: 180.00,
            date: today - Duration::days(60),
        },
        &conn,
    )?;
    count += 1;

    println!("Created {count} expenses.");
    println!("Success!");

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Args, MAX_DAYS};

    #[test]
    fn days_defaults_to_400() {
        let args = Args::try_parse_from(["create_test_db", "-o", "test.db"]).unwrap();

        assert_eq!(args.days, 400);
    }

    #[test]
    fn accepts_max_days() {
        let days = MAX_DAYS.to_string();
        let args =
            Args::try_parse_from(["create_test_db", "-o", "test.db", "--days", &days]).unwrap();

        assert_eq!(args.days, MAX_DAYS);
    }

    #[test]
    fn rejects_days_past_the_representable_dates() {
        let result =
            Args::try_parse_from(["create_test_db", "-o", "test.db", "--days", "9999999999"]);

        assert!(result.is_err());
    }

    #[test]
    fn rejects_zero_days() {
        let result = Args::try_parse_from(["create_test_db", "-o", "test.db", "--days", "0"]);

        assert!(result.is_err());
    }
}
