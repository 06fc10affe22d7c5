//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use skillswap_types::error::{ExchangeError, FeedError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Negotiation engine errors.
    Exchange(ExchangeError),
    /// Feed ranker errors.
    Feed(FeedError),
    /// Missing or malformed caller identity.
    Unauthorized(String),
    /// Malformed path or query parameter.
    Validation(String),
}

impl From<ExchangeError> for AppError {
    fn from(e: ExchangeError) -> Self {
        AppError::Exchange(e)
    }
}

impl From<FeedError> for AppError {
    fn from(e: FeedError) -> Self {
        AppError::Feed(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Exchange(ExchangeError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone())
            }
            AppError::Exchange(ExchangeError::Forbidden(msg)) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
            }
            AppError::Exchange(ExchangeError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "CONFLICT", msg.clone())
            }
            AppError::Exchange(ExchangeError::InvalidArgument(msg))
            | AppError::Feed(FeedError::InvalidArgument(msg))
            | AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Exchange(e @ ExchangeError::Unavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_UNAVAILABLE", e.to_string())
            }
            AppError::Feed(e @ FeedError::Unavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_UNAVAILABLE", e.to_string())
            }
            AppError::Exchange(e @ ExchangeError::Storage(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }
            AppError::Feed(e @ FeedError::Storage(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(code, %message, "request failed");
        }

        let request_id = uuid::Uuid::now_v7().to_string();
        (status, Json(ApiResponse::error(code, &message, request_id, 0))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_exchange_errors_map_to_status() {
        let cases = [
            (ExchangeError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (ExchangeError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (ExchangeError::Conflict("twice".into()), StatusCode::CONFLICT),
            (ExchangeError::InvalidArgument("bad".into()), StatusCode::BAD_REQUEST),
            (ExchangeError::Unavailable("busy".into()), StatusCode::SERVICE_UNAVAILABLE),
            (ExchangeError::Storage("disk".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let (status, _) = render(err.into()).await;
            assert_eq!(status, expected);
        }
    }

    #[tokio::test]
    async fn test_feed_errors_map_to_status() {
        let (status, body) = render(FeedError::InvalidArgument("page".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");

        let (status, _) = render(FeedError::Unavailable("pool".into()).into()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_error_body_is_envelope() {
        let (status, body) = render(AppError::Unauthorized("who?".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.get("data").is_none());
        assert_eq!(body["errors"][0]["message"], "who?");
        assert!(body["meta"]["request_id"].is_string());
    }
}
