//! JSON response builders shared by the routes
//!
//! Client errors carry their message under `err`; server errors carry a
//! generic retry message under `error`.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::types::LodgingError;

pub use crate::db::schemas::INVALID_LODGING;

pub type FullBody = Full<Bytes>;

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<FullBody> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap()
}

/// 204 with an empty body
pub fn no_content() -> Response<FullBody> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// Client error: `{"err": message}`
pub fn client_error(status: StatusCode, message: &str) -> Response<FullBody> {
    json_response(status, &json!({ "err": message }))
}

/// Server error: `{"error": message}`
pub fn server_error(message: &str) -> Response<FullBody> {
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &json!({ "error": message }),
    )
}

/// Map an error to its response via `LodgingError::status_code`.
///
/// Client errors send their own message under `err`. Server errors are
/// logged and answered with `server_message`, never the cause.
pub fn error_response(err: &LodgingError, server_message: &str) -> Response<FullBody> {
    let status = err.status_code();
    if status.is_server_error() {
        error!(error = %err, "{}", server_message);
        server_error(server_message)
    } else {
        client_error(status, err.message())
    }
}

/// Payload above the request body limit
pub fn payload_too_large() -> Response<FullBody> {
    client_error(StatusCode::PAYLOAD_TOO_LARGE, "request entity too large")
}

/// 404 for anything no route handled; echoes the full request target
pub fn not_found_response(target: &str) -> Response<FullBody> {
    client_error(
        StatusCode::NOT_FOUND,
        &format!("The path {} doesn't exist", target),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response<FullBody>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_echoes_target() {
        let response = not_found_response("/nope?x=1");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "err": "The path /nope?x=1 doesn't exist" })
        );
    }

    #[tokio::test]
    async fn test_server_error_shape() {
        let response = server_error("Try again later.");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "error": "Try again later." }));
    }

    #[tokio::test]
    async fn test_no_content_is_empty() {
        let response = no_content();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_error_response_uses_status_code() {
        let response = error_response(
            &LodgingError::Validation(INVALID_LODGING.into()),
            "Try again later.",
        );
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "err": INVALID_LODGING }));

        let response = error_response(
            &LodgingError::Store("connection refused".into()),
            "Try again later.",
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "error": "Try again later." }));
    }

    #[tokio::test]
    async fn test_payload_too_large_shape() {
        let response = payload_too_large();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(response).await, json!({ "err": "request entity too large" }));
    }
}
