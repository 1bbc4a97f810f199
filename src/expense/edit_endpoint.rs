//! Defines the endpoint for updating an existing expense.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{
        FromRef, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::ExpenseId,
    expense::{Expense, ExpenseForm, update_expense},
};

/// The state needed to update an expense.
#[derive(Debug, Clone)]
pub struct EditExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for changing the title, category and amount of an expense.
///
/// Responds with the updated expense. Any date in the request body is ignored.
pub async fn edit_expense_endpoint(
    State(state): State<EditExpenseState>,
    path: Result<Path<ExpenseId>, PathRejection>,
    payload: Result<Json<ExpenseForm>, JsonRejection>,
) -> Result<Json<Expense>, Error> {
    let Path(expense_id) = path?;
    let Json(form) = payload?;
    let update = form
        .into_update()
        .inspect_err(|error| tracing::debug!("Rejected update for expense {expense_id}: {error}"))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = update_expense(expense_id, &update, &connection)?;

    tracing::info!("Updated expense {expense_id}");

    Ok(Json(expense))
}
