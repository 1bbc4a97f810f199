use axum::{
    body::Body,
    http::{StatusCode, header::CONTENT_TYPE},
    response::Response,
};
use axum_test::TestResponse;
use serde_json::Value;

#[track_caller]
pub(crate) fn assert_status_ok(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::OK);
}

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    let header = response
        .headers()
        .get(CONTENT_TYPE)
        .expect("content-type header missing");
    assert_eq!(header, content_type);
}

/// Assert that an API response is an error with `status` and the JSON body `{"error": message}`.
#[track_caller]
pub(crate) fn assert_json_error(response: &TestResponse, status: StatusCode, message: &str) {
    response.assert_status(status);
    assert_eq!(
        response.json::<Value>(),
        serde_json::json!({ "error": message })
    );
}
