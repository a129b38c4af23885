//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{request, response},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::internal_server_error::InternalServerError;

/// The number of bytes of a request or response body that is logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the request or response body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();

    let body_text = match read_body(body).await {
        Ok(body_text) => body_text,
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            return InternalServerError::default().into_response();
        }
    };

    log_request(&parts, &body_text);

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();

    let body_text = match read_body(body).await {
        Ok(body_text) => body_text,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return InternalServerError::default().into_response();
        }
    };

    log_response(&parts, &body_text);

    Response::from_parts(parts, body_text.into())
}

async fn read_body(body: Body) -> Result<String, axum::Error> {
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await?;

    Ok(String::from_utf8_lossy(&body_bytes).to_string())
}

/// The longest prefix of `text` that is at most [LOG_BODY_LENGTH_LIMIT] bytes
/// and does not split a character.
fn truncate(text: &str) -> &str {
    if text.len() <= LOG_BODY_LENGTH_LIMIT {
        return text;
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}

fn log_request(parts: &request::Parts, body: &str) {
    let method = &parts.method;
    let uri = &parts.uri;

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!("Received request: {method} {uri}\nbody: {}...", truncate(body));
        tracing::debug!("Full request: {parts:#?}\nbody: {body:?}");
    } else {
        tracing::info!("Received request: {method} {uri}\nbody: {body:?}");
        tracing::debug!("Request headers: {:#?}", parts.headers);
    }
}

fn log_response(parts: &response::Parts, body: &str) {
    let status = parts.status;

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!("Sending response: {status}\nbody: {}...", truncate(body));
        tracing::debug!("Full response: {parts:#?}\nbody: {body:?}");
    } else {
        tracing::info!("Sending response: {status}\nbody: {body:?}");
        tracing::debug!("Response headers: {:#?}", parts.headers);
    }
}
