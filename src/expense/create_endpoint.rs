//! Defines the endpoint for creating a new expense.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    expense::{Expense, ExpenseForm, create_expense},
    timezone::now_in_timezone,
};

/// The state needed to create an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// Expenses without a date are dated with the current time in this timezone.
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for creating a new expense, responds with the created expense.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    payload: Result<Json<ExpenseForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Expense>), Error> {
    let Json(form) = payload?;
    let now = now_in_timezone(&state.local_timezone)?;
    let new_expense = form
        .into_new_expense(now)
        .inspect_err(|error| tracing::debug!("Rejected new expense: {error}"))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = create_expense(&new_expense, &connection)
        .inspect_err(|error| tracing::error!("Could not create {new_expense:?}: {error}"))?;

    tracing::info!("Created expense {}", expense.id);

    Ok((StatusCode::CREATED, Json(expense)))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};
    use time::macros::datetime;

    use crate::{
        db::initialize,
        endpoints,
        expense::{Category, Expense, ExpenseForm, create_expense_endpoint, get_expense},
    };

    use super::CreateExpenseState;

    fn get_test_state() -> CreateExpenseState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        CreateExpenseState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn get_test_server(state: CreateExpenseState) -> TestServer {
        let app = Router::new()
            .route(endpoints::EXPENSES_API, post(create_expense_endpoint))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn can_create_expense() {
        let state = get_test_state();
        let server = get_test_server(state.clone());

        let response = server
            .post(endpoints::EXPENSES_API)
            .json(&ExpenseForm {
                title: "Lunch".to_owned(),
                category: "Food".to_owned(),
                amount: Some(250.0),
                date: Some(datetime!(2026-02-01 12:00 UTC)),
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let want = Expense {
            id: 1,
            title: "Lunch".to_owned(),
            category: Category::Food,
            amount: 250.0,
            date: datetime!(2026-02-01 12:00 UTC),
        };
        assert_eq!(response.json::<Expense>(), want);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_expense(1, &connection), Ok(want));
    }

    #[tokio::test]
    async fn date_defaults_to_now() {
        let server = get_test_server(get_test_state());
        let before = time::OffsetDateTime::now_utc();

        let expense = server
            .post(endpoints::EXPENSES_API)
            .json(&json!({"title": "Bus", "category": "Transport", "amount": 4.2}))
            .await
            .json::<Expense>();

        let after = time::OffsetDateTime::now_utc();
        assert!(
            before <= expense.date && expense.date <= after,
            "got date {}, want a date between {before} and {after}",
            expense.date
        );
    }

    #[tokio::test]
    async fn rejects_non_positive_amount() {
        let state = get_test_state();
        let server = get_test_server(state.clone());

        let response = server
            .post(endpoints::EXPENSES_API)
            .json(&json!({"title": "Refund", "category": "Other", "amount": -10}))
            .await;

        response.assert_status_bad_request();
        let body = response.json::<Value>();
        assert_eq!(body["error"], "amount must be a positive number, got -10");

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_expense(1, &connection), Err(crate::Error::NotFound));
    }

    #[tokio::test]
    async fn rejects_unknown_category() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::EXPENSES_API)
            .json(&json!({"title": "Rent", "category": "Housing", "amount": 900}))
            .await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>()["error"],
            "\"Housing\" is not a valid category"
        );
    }

    #[tokio::test]
    async fn rejects_missing_title() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::EXPENSES_API)
            .json(&json!({"category": "Food", "amount": 9}))
            .await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>()["error"],
            "missing required field: title"
        );
    }

    #[tokio::test]
    async fn rejects_non_numeric_amount() {
        let server = get_test_server(get_test_state());

        let response = server
            .post(endpoints::EXPENSES_API)
            .json(&json!({"title": "Coffee", "category": "Food", "amount": "lots"}))
            .await;

        response.assert_status_bad_request();
        let message = response.json::<Value>()["error"]
            .as_str()
            .unwrap()
            .to_owned();
        assert!(
            message.starts_with("invalid request body"),
            "got error message {message}"
        );
    }
}
