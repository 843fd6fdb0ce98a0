use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::AuthError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Token error: {0}")]
    Token(#[from] crate::auth::tokens::IssueError),

    #[error("Hash error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Blocking task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Auth(e) => {
                let status = match e {
                    AuthError::MalformedHeader => StatusCode::UNPROCESSABLE_ENTITY,
                    _ => StatusCode::UNAUTHORIZED,
                };
                (status, e.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::UpstreamUnavailable(msg) => {
                tracing::error!("Store unavailable: {}", msg);
                (StatusCode::BAD_GATEWAY, "Internal server error".to_string())
            }
            AppError::Pool(e) => {
                tracing::error!("Pool error: {}", e);
                (StatusCode::BAD_GATEWAY, "Internal server error".to_string())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Token(e) => {
                tracing::error!("Token error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Hash(e) => {
                tracing::error!("Hash error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Blocking(e) => {
                tracing::error!("Blocking task failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "msg": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn response_status(err: AppError) -> StatusCode {
        let response = err.into_response();
        response.status()
    }

    #[test]
    fn not_found_returns_404() {
        assert_eq!(
            response_status(AppError::NotFound("gone".into())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn unauthorized_returns_401() {
        assert_eq!(
            response_status(AppError::Unauthorized("nope".into())),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn auth_failures_return_401_except_malformed_header() {
        for e in [
            AuthError::MissingToken,
            AuthError::Expired,
            AuthError::Revoked,
            AuthError::InvalidSignature,
        ] {
            assert_eq!(response_status(AppError::Auth(e)), StatusCode::UNAUTHORIZED);
        }
        assert_eq!(
            response_status(AppError::Auth(AuthError::MalformedHeader)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn bad_request_returns_400() {
        assert_eq!(
            response_status(AppError::BadRequest("oops".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn upstream_unavailable_returns_502() {
        assert_eq!(
            response_status(AppError::UpstreamUnavailable("down".into())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn store_failures_return_500() {
        assert_eq!(
            response_status(AppError::Database(rusqlite::Error::InvalidQuery)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn panicked_blocking_task_returns_500() {
        let join_error = tokio::task::spawn_blocking(|| panic!("boom"))
            .await
            .unwrap_err();
        assert_eq!(
            response_status(AppError::from(join_error)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn body_carries_msg_field() {
        let response = AppError::Auth(AuthError::Revoked).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["msg"], "Token has been revoked");
    }
}
