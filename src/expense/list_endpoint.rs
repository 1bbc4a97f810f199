//! Defines the endpoints for reading expenses.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    aggregation::{Period, filter_by_month},
    database_id::ExpenseId,
    expense::{Expense, get_all_expenses, get_expense},
};

/// The state needed to list expenses.
#[derive(Debug, Clone)]
pub struct ListExpensesState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with every expense, most recent first.
pub async fn get_expenses_endpoint(
    State(state): State<ListExpensesState>,
) -> Result<Json<Vec<Expense>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_all_expenses(&connection).map(Json)
}

/// A route handler that responds with a single expense.
pub async fn get_expense_endpoint(
    State(state): State<ListExpensesState>,
    path: Result<Path<ExpenseId>, PathRejection>,
) -> Result<Json<Expense>, Error> {
    let Path(expense_id) = path?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_expense(expense_id, &connection).map(Json)
}

/// A route handler that responds with the expenses in a single month, most recent first.
///
/// The month in the path is a number from 1 (January) to 12 (December).
pub async fn get_expenses_in_month_endpoint(
    State(state): State<ListExpensesState>,
    path: Result<Path<(i32, u8)>, PathRejection>,
) -> Result<Json<Vec<Expense>>, Error> {
    let Path((year, month)) = path?;
    let period = Period::new(year, month)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expenses = get_all_expenses(&connection)?;
    let expenses_in_month = filter_by_month(&expenses, period.year, period.month)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(expenses_in_month))
}
