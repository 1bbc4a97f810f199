use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

/// The fallback handler for any route that does not exist.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

pub fn get_404_not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        error_view(
            "Not Found",
            "404",
            "Something's missing.",
            "Sorry, we can't find that page. You'll find lots to explore on the dashboard.",
        ),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode};
    use axum_test::TestServer;

    use crate::test_utils::assert_valid_html;

    use super::get_404_not_found;

    #[tokio::test]
    async fn unknown_route_renders_not_found_page() {
        let app = Router::new().fallback(get_404_not_found);
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server.get("/does-not-exist").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let html = scraper::Html::parse_document(&response.text());
        assert_valid_html(&html);
        assert!(response.text().contains("404"));
    }
}
