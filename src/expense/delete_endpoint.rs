//! Defines the endpoints for deleting a single expense or every expense.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    database_id::ExpenseId,
    expense::{delete_all_expenses, delete_expense},
};

/// The state needed to delete expenses.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The database connection for managing expenses.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The response body confirming a delete.
#[derive(Debug, Serialize)]
pub struct DeleteConfirmation {
    /// A message for displaying to the user.
    pub message: String,
    /// How many expenses were deleted.
    pub deleted: usize,
}

/// A route handler for deleting a single expense.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    path: Result<Path<ExpenseId>, PathRejection>,
) -> Result<Json<DeleteConfirmation>, Error> {
    let Path(expense_id) = path?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_expense(expense_id, &connection)?;

    tracing::info!("Deleted expense {expense_id}");

    Ok(Json(DeleteConfirmation {
        message: "Expense deleted successfully".to_owned(),
        deleted: 1,
    }))
}

/// A route handler for deleting every expense.
pub async fn delete_all_expenses_endpoint(
    State(state): State<DeleteExpenseState>,
) -> Result<Json<DeleteConfirmation>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let deleted = delete_all_expenses(&connection)?;

    tracing::info!("Deleted all {deleted} expenses");

    Ok(Json(DeleteConfirmation {
        message: format!("Deleted {deleted} expenses"),
        deleted,
    }))
}
