use axum::{
    Router,
    body::Body,
    http::{StatusCode, header::CONTENT_TYPE},
    response::Response,
    routing::get,
};
use serde_json::Value;
use tokio::net::TcpListener;

/// Read a response body as JSON.
pub(crate) async fn parse_json_body(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    serde_json::from_slice(&body).expect("Response body is not JSON")
}

#[track_caller]
pub(crate) fn assert_json_error(
    status: StatusCode,
    body: &Value,
    want_status: StatusCode,
    want_message: &str,
) {
    assert_eq!(status, want_status);
    assert_eq!(body, &serde_json::json!({ "error": want_message }));
}

/// Serve `json` at `path` from a real HTTP server on an ephemeral port.
///
/// Returns the full URL of the document. The server runs until the test's
/// runtime shuts down.
pub(crate) async fn serve_json(path: &str, json: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind test listener");
    let address = listener.local_addr().expect("Could not get local address");

    let app = Router::new().route(
        path,
        get(move || async move { ([(CONTENT_TYPE, "application/json")], json) }),
    );

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Test dataset server failed");
    });

    format!("http://{address}{path}")
}
