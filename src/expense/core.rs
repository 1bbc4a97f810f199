//! Defines the core data models and database queries for expenses.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::ExpenseId};

// ============================================================================
// MODELS
// ============================================================================

/// What an expense was spent on.
///
/// The set of categories is fixed. The declaration order is the order used
/// whenever all categories are listed, e.g. in breakdowns and charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Groceries, eating out, snacks.
    Food,
    /// Fuel, public transport, taxis.
    Transport,
    /// Movies, games, concerts.
    Entertainment,
    /// Clothes, electronics, household items.
    Shopping,
    /// Rent, utilities, subscriptions.
    Bills,
    /// Doctor visits, medicine, fitness.
    Health,
    /// Anything that does not fit in the other categories.
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Shopping,
        Category::Bills,
        Category::Health,
        Category::Other,
    ];

    /// The name of the category as it is stored and sent over the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Health => "Health",
            Category::Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Parse a category from its exact name, e.g. "Food".
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == name)
            .ok_or_else(|| Error::InvalidCategory(name.to_owned()))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// A single recorded spending event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense, assigned by the database and never reused.
    pub id: ExpenseId,
    /// A short description of what the money was spent on.
    pub title: String,
    /// What kind of spending this was.
    pub category: Category,
    /// How much was spent, always greater than zero.
    pub amount: f64,
    /// When the money was spent.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

/// The JSON body for creating or updating an expense.
///
/// Every field is optional at the parsing stage so that a missing field is
/// reported with the same error message as an empty one. Use
/// [ExpenseForm::into_new_expense] or [ExpenseForm::into_update] to validate
/// the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseForm {
    /// A short description of the expense.
    #[serde(default)]
    pub title: String,
    /// The name of one of the expense categories, e.g. "Food".
    #[serde(default)]
    pub category: String,
    /// How much was spent.
    #[serde(default)]
    pub amount: Option<f64>,
    /// When the money was spent, as an RFC 3339 date-time.
    ///
    /// Ignored when updating an expense.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
}

/// A validated expense that is ready to be inserted into the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// The trimmed, non-empty title.
    pub title: String,
    /// What kind of spending this was.
    pub category: Category,
    /// How much was spent, always greater than zero.
    pub amount: f64,
    /// When the money was spent.
    pub date: OffsetDateTime,
}

/// The validated fields of an expense that may be changed after it is created.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseUpdate {
    /// The trimmed, non-empty title.
    pub title: String,
    /// What kind of spending this was.
    pub category: Category,
    /// How much was spent, always greater than zero.
    pub amount: f64,
}

impl ExpenseForm {
    /// Validate the form for creating a new expense.
    ///
    /// `now` is used as the date if the form does not specify one.
    ///
    /// # Errors
    /// Returns the same errors as [ExpenseForm::into_update].
    pub fn into_new_expense(self, now: OffsetDateTime) -> Result<NewExpense, Error> {
        let date = self.date.unwrap_or(now);
        let ExpenseUpdate {
            title,
            category,
            amount,
        } = self.into_update()?;

        Ok(NewExpense {
            title,
            category,
            amount,
            date,
        })
    }

    /// Validate the form for updating an existing expense.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::MissingField] if the title or category is empty, or the amount is missing,
    /// - [Error::InvalidCategory] if the category is not one of [Category::ALL],
    /// - [Error::InvalidAmount] if the amount is not a positive, finite number.
    pub fn into_update(self) -> Result<ExpenseUpdate, Error> {
        let title = self.title.trim();

        if title.is_empty() {
            return Err(Error::MissingField("title"));
        }

        if self.category.trim().is_empty() {
            return Err(Error::MissingField("category"));
        }

        let amount = self.amount.ok_or(Error::MissingField("amount"))?;
        let category = self.category.trim().parse()?;

        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidAmount(amount));
        }

        Ok(ExpenseUpdate {
            title: title.to_owned(),
            category,
            amount,
        })
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the expense table.
///
/// `AUTOINCREMENT` stops SQLite from reusing the IDs of deleted rows.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            category TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount > 0),
            date TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Map a row with the columns `id, title, category, amount, date` to an [Expense].
pub fn map_row_to_expense(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        title: row.get(1)?,
        category: row.get(2)?,
        amount: row.get(3)?,
        date: row.get(4)?,
    })
}

/// Insert a new expense and return it with its assigned ID.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn create_expense(expense: &NewExpense, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(
            "INSERT INTO expense (title, category, amount, date)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, title, category, amount, date",
        )?
        .query_row(
            (
                &expense.title,
                expense.category,
                expense.amount,
                expense.date,
            ),
            map_row_to_expense,
        )
        .map_err(Error::from)
}

/// Get a single expense by its ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no expense with `id`,
/// or [Error::SqlError] if there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    connection
        .query_row(
            "SELECT id, title, category, amount, date FROM expense WHERE id = ?1",
            (id,),
            map_row_to_expense,
        )
        .map_err(Error::from)
}

/// Get every expense, most recent first.
///
/// Expenses with the same date are ordered by ID, newest first, so the order
/// is stable between reads.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_all_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, title, category, amount, date FROM expense
             ORDER BY date DESC, id DESC",
        )?
        .query_map([], map_row_to_expense)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Change the title, category and amount of an existing expense.
///
/// The ID and date of the expense are never changed.
///
/// # Errors
/// Returns [Error::UpdateMissingExpense] if there is no expense with `id`,
/// or [Error::SqlError] if there is some other SQL error.
pub fn update_expense(
    id: ExpenseId,
    update: &ExpenseUpdate,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(
            "UPDATE expense SET title = ?1, category = ?2, amount = ?3
             WHERE id = ?4
             RETURNING id, title, category, amount, date",
        )?
        .query_row(
            (&update.title, update.category, update.amount, id),
            map_row_to_expense,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingExpense,
            error => error.into(),
        })
}

/// Delete a single expense.
///
/// # Errors
/// Returns [Error::DeleteMissingExpense] if there is no expense with `id`,
/// or [Error::SqlError] if there is some other SQL error.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// Delete every expense and return how many were deleted.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn delete_all_expenses(connection: &Connection) -> Result<usize, Error> {
    connection
        .execute("DELETE FROM expense", ())
        .map_err(Error::from)
}



#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        expense::{
            Category, Expense, ExpenseUpdate, NewExpense, create_expense, create_expense_table,
            delete_all_expenses, delete_expense, get_all_expenses, get_expense, update_expense,
        },
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_expense_table(&connection).unwrap();
        connection
    }

    fn new_expense(title: &str, category: Category, amount: f64) -> NewExpense {
        NewExpense {
            title: title.to_owned(),
            category,
            amount,
            date: datetime!(2025-06-15 12:00 UTC),
        }
    }

    #[test]
    fn create_table_sql_is_valid() {
        let connection = Connection::open_in_memory().unwrap();

        assert_eq!(Ok(()), create_expense_table(&connection));
    }

    #[test]
    fn create_expense_assigns_id() {
        let connection = get_test_connection();

        let expense =
            create_expense(&new_expense("Groceries", Category::Food, 85.2), &connection).unwrap();

        assert_eq!(
            expense,
            Expense {
                id: 1,
                title: "Groceries".to_owned(),
                category: Category::Food,
                amount: 85.2,
                date: datetime!(2025-06-15 12:00 UTC),
            }
        );
    }

    #[test]
    fn date_keeps_offset() {
        let connection = get_test_connection();
        let date = datetime!(2025-06-30 23:30 +12:00);

        let created = create_expense(
            &NewExpense {
                date,
                ..new_expense("Dinner", Category::Food, 40.0)
            },
            &connection,
        )
        .unwrap();
        let got = get_expense(created.id, &connection).unwrap();

        assert_eq!(got.date, date);
        assert_eq!(got.date.offset(), date.offset());
    }

    #[test]
    fn table_rejects_non_positive_amounts() {
        let connection = get_test_connection();

        let result = create_expense(&new_expense("Refund", Category::Other, -5.0), &connection);

        assert!(matches!(result, Err(Error::SqlError(_))));
    }

    #[test]
    fn get_expense_fails_for_missing_id() {
        let connection = get_test_connection();

        assert_eq!(get_expense(42, &connection), Err(Error::NotFound));
    }

    #[test]
    fn get_all_expenses_orders_newest_first() {
        let connection = get_test_connection();
        let older = create_expense(
            &NewExpense {
                date: datetime!(2025-01-01 09:00 UTC),
                ..new_expense("Older", Category::Bills, 100.0)
            },
            &connection,
        )
        .unwrap();
        let newer = create_expense(
            &NewExpense {
                date: datetime!(2025-02-01 09:00 UTC),
                ..new_expense("Newer", Category::Bills, 100.0)
            },
            &connection,
        )
        .unwrap();
        let same_date_as_newer = create_expense(
            &NewExpense {
                date: datetime!(2025-02-01 09:00 UTC),
                ..new_expense("Same date", Category::Health, 20.0)
            },
            &connection,
        )
        .unwrap();

        let expenses = get_all_expenses(&connection).unwrap();

        assert_eq!(expenses, vec![same_date_as_newer, newer, older]);
    }

    #[test]
    fn get_all_expenses_is_empty_for_new_database() {
        let connection = get_test_connection();

        assert_eq!(get_all_expenses(&connection), Ok(vec![]));
    }

    #[test]
    fn update_changes_fields_but_not_id_or_date() {
        let connection = get_test_connection();
        let expense =
            create_expense(&new_expense("Movie", Category::Entertainment, 18.0), &connection)
                .unwrap();

        let updated = update_expense(
            expense.id,
            &ExpenseUpdate {
                title: "Concert".to_owned(),
                category: Category::Entertainment,
                amount: 95.0,
            },
            &connection,
        )
        .unwrap();

        assert_eq!(
            updated,
            Expense {
                title: "Concert".to_owned(),
                amount: 95.0,
                ..expense
            }
        );
        assert_eq!(get_expense(updated.id, &connection), Ok(updated));
    }

    #[test]
    fn update_fails_for_missing_expense() {
        let connection = get_test_connection();

        let result = update_expense(
            7,
            &ExpenseUpdate {
                title: "Nothing".to_owned(),
                category: Category::Other,
                amount: 1.0,
            },
            &connection,
        );

        assert_eq!(result, Err(Error::UpdateMissingExpense));
    }

    #[test]
    fn delete_removes_expense() {
        let connection = get_test_connection();
        let expense =
            create_expense(&new_expense("Shoes", Category::Shopping, 120.0), &connection).unwrap();

        assert_eq!(delete_expense(expense.id, &connection), Ok(()));
        assert_eq!(get_expense(expense.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_fails_for_missing_expense() {
        let connection = get_test_connection();

        assert_eq!(
            delete_expense(3, &connection),
            Err(Error::DeleteMissingExpense)
        );
    }

    #[test]
    fn delete_all_returns_count() {
        let connection = get_test_connection();
        for amount in [1.0, 2.0, 3.0] {
            create_expense(&new_expense("Snack", Category::Food, amount), &connection).unwrap();
        }

        assert_eq!(delete_all_expenses(&connection), Ok(3));
        assert_eq!(get_all_expenses(&connection), Ok(vec![]));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let connection = get_test_connection();
        let first =
            create_expense(&new_expense("Bus", Category::Transport, 3.5), &connection).unwrap();
        delete_expense(first.id, &connection).unwrap();
        let second =
            create_expense(&new_expense("Bus", Category::Transport, 3.5), &connection).unwrap();
        delete_all_expenses(&connection).unwrap();
        let third =
            create_expense(&new_expense("Bus", Category::Transport, 3.5), &connection).unwrap();

        assert!(second.id > first.id);
        assert!(third.id > second.id);
    }
}
