//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of bytes of a response body to log at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// The request line is logged at the `info` level. The response status and
/// body are logged at the `info` level, with bodies longer than
/// [LOG_BODY_LENGTH_LIMIT] bytes truncated and logged in full at the `debug`
/// level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    tracing::info!("Received request: {} {}", request.method(), request.uri());

    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(body_bytes) => body_bytes,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_response(parts.status, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

fn log_response(status: StatusCode, body: &str) {
    let truncated = truncate_body(body);

    if truncated.len() < body.len() {
        tracing::info!("Sending response: {status}\nbody: {truncated}...");
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {status}\nbody: {body}");
    }
}

/// The longest prefix of `body` that fits in [LOG_BODY_LENGTH_LIMIT] bytes
/// without splitting a character.
fn truncate_body(body: &str) -> &str {
    if body.len() <= LOG_BODY_LENGTH_LIMIT {
        return body;
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}
