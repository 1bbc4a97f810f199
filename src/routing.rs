//! Application router configuration.

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    response::Redirect,
    routing::get,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::{
    AppState,
    dashboard::{get_comparison_page, get_dashboard_page},
    endpoints,
    expense::{
        create_expense_endpoint, delete_all_expenses_endpoint, delete_expense_endpoint,
        edit_expense_endpoint, get_expense_endpoint, get_expenses_endpoint,
        get_expenses_in_month_endpoint,
    },
    not_found::get_404_not_found,
    reports::{
        get_categories_endpoint, get_comparison_endpoint, get_overview_endpoint,
        get_summary_endpoint, get_years_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::COMPARISON_VIEW, get(get_comparison_page));

    let api_routes = Router::new()
        .route(
            endpoints::EXPENSES_API,
            get(get_expenses_endpoint)
                .post(create_expense_endpoint)
                .delete(delete_all_expenses_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            get(get_expense_endpoint)
                .put(edit_expense_endpoint)
                .delete(delete_expense_endpoint),
        )
        .route(
            endpoints::EXPENSES_IN_MONTH,
            get(get_expenses_in_month_endpoint),
        )
        .route(endpoints::SUMMARY_API, get(get_summary_endpoint))
        .route(endpoints::CATEGORIES_API, get(get_categories_endpoint))
        .route(endpoints::YEARS_API, get(get_years_endpoint))
        .route(endpoints::OVERVIEW_API, get(get_overview_endpoint))
        .route(endpoints::COMPARISON_API, get(get_comparison_endpoint))
        .layer(api_cors_layer());

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Allow pages served from any other origin to call the REST API.
fn api_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::{
        HeaderValue, Method, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
            ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
        },
    };
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::Html;
    use serde_json::{Value, json};

    use crate::{
        AppState,
        endpoints::{self, format_endpoint},
        expense::Expense,
        test_utils::{assert_json_error, assert_valid_html},
    };

    use super::build_router;

    fn get_test_server() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "Etc/UTC").unwrap();

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    async fn create(
        server: &TestServer,
        title: &str,
        category: &str,
        amount: f64,
        date: &str,
    ) -> Expense {
        let response = server
            .post(endpoints::EXPENSES_API)
            .json(&json!({
                "title": title,
                "category": category,
                "amount": amount,
                "date": date,
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    #[tokio::test]
    async fn expense_lifecycle() {
        let server = get_test_server();

        let groceries = create(&server, "Groceries", "Food", 100.0, "2025-09-10T12:00:00Z").await;
        let bus = create(&server, "Bus", "Transport", 50.0, "2025-09-12T08:00:00Z").await;
        create(&server, "Cinema", "Entertainment", 25.0, "2025-08-20T19:00:00Z").await;

        let summary = server.get(endpoints::SUMMARY_API).await.json::<Value>();
        assert_eq!(summary, json!({"total": 175.0, "count": 3, "average": 58.33}));

        server
            .put(&format_endpoint(endpoints::EXPENSE, &[bus.id]))
            .json(&json!({
                "title": "Train",
                "category": "Transport",
                "amount": 70.0,
                "date": "2025-09-12T08:00:00Z",
            }))
            .await
            .assert_status_ok();

        server
            .delete(&format_endpoint(endpoints::EXPENSE, &[groceries.id]))
            .await
            .assert_status_ok();

        let september = server
            .get(&format_endpoint(endpoints::EXPENSES_IN_MONTH, &[2025, 9]))
            .await
            .json::<Vec<Expense>>();
        assert_eq!(september.len(), 1);
        assert_eq!(september[0].title, "Train");
        assert_eq!(september[0].amount, 70.0);

        let deleted = server.delete(endpoints::EXPENSES_API).await.json::<Value>();
        assert_eq!(deleted, json!({"message": "Deleted 2 expenses", "deleted": 2}));

        let summary = server.get(endpoints::SUMMARY_API).await.json::<Value>();
        assert_eq!(summary, json!({"total": 0.0, "count": 0, "average": 0.0}));
    }

    #[tokio::test]
    async fn api_allows_cross_origin_requests() {
        let server = get_test_server();

        let response = server
            .get(endpoints::EXPENSES_API)
            .add_header(ORIGIN, HeaderValue::from_static("http://localhost:5173"))
            .await;

        response.assert_status_ok();
        assert_eq!(response.header(ACCESS_CONTROL_ALLOW_ORIGIN), "*");
    }

    #[tokio::test]
    async fn api_answers_cors_preflight() {
        let server = get_test_server();

        let response = server
            .method(Method::OPTIONS, endpoints::EXPENSES_API)
            .add_header(ORIGIN, HeaderValue::from_static("http://localhost:5173"))
            .add_header(ACCESS_CONTROL_REQUEST_METHOD, HeaderValue::from_static("DELETE"))
            .await;

        response.assert_status_ok();
        assert_eq!(response.header(ACCESS_CONTROL_ALLOW_ORIGIN), "*");
        let allowed_methods = response.header(ACCESS_CONTROL_ALLOW_METHODS);
        assert!(allowed_methods.to_str().unwrap().contains("DELETE"));
    }

    #[tokio::test]
    async fn invalid_expense_is_rejected_with_json_error() {
        let server = get_test_server();

        let response = server
            .post(endpoints::EXPENSES_API)
            .json(&json!({"title": "Mystery", "category": "Food", "amount": -5.0}))
            .await;

        response.assert_status_bad_request();
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn editing_missing_expense_is_not_found() {
        let server = get_test_server();

        let response = server
            .put(&format_endpoint(endpoints::EXPENSE, &[42]))
            .json(&json!({"title": "Ghost", "category": "Other", "amount": 1.0}))
            .await;

        assert_json_error(&response, StatusCode::NOT_FOUND, "expense not found");
    }

    #[tokio::test]
    async fn pages_render() {
        let server = get_test_server();
        create(&server, "Groceries", "Food", 100.0, "2025-09-10T12:00:00Z").await;

        for page in [
            format!("{}?year=2025", endpoints::DASHBOARD_VIEW),
            format!(
                "{}?year1=2025&month1=9&year2=2025&month2=8",
                endpoints::COMPARISON_VIEW
            ),
        ] {
            let response = server.get(&page).await;

            response.assert_status_ok();
            assert_valid_html(&Html::parse_document(&response.text()));
        }
    }

    #[tokio::test]
    async fn unknown_path_is_not_found_page() {
        let server = get_test_server();

        let response = server.get("/definitely/not/a/page").await;

        response.assert_status_not_found();
        assert!(response.text().contains("404"));
    }
}
