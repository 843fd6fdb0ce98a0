use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::auth::credentials;
use crate::auth::gate::{self, AuthError};
use crate::error::AppError;
use crate::state::AppState;

/// The user behind a verified, unrevoked bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    /// Id of the token that authenticated this request.
    pub jti: String,
    /// Expiry of that token, unix seconds.
    pub exp: i64,
}

/// Extractor that runs the auth gate.
/// Rejects with the gate's typed failure (401, or 422 for a malformed header).
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = &state.config.auth;
        let token = gate::token_from_parts(parts, &auth.token_locations, &auth.cookie_name)
            .map_err(|e| {
                tracing::debug!("Auth gate rejected request to {}: {}", parts.uri.path(), e);
                e
            })?;

        let conn = state.db.get()?;
        let claims = gate::authenticate(&state.keys, &conn, token)?;

        // A validly signed token naming nobody is treated like a forged one
        let user = credentials::find_by_username(&conn, &claims.sub)?
            .ok_or(AppError::Auth(AuthError::InvalidSignature))?;

        Ok(CurrentUser {
            id: user.id,
            username: user.username,
            jti: claims.jti,
            exp: claims.exp,
        })
    }
}

/// `Json` that turns every body rejection into a 400 with a `msg`.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(AppError::BadRequest(rejection_message(&rejection))),
        }
    }
}

fn rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected a JSON body with Content-Type: application/json".to_string()
        }
        other => other.body_text(),
    }
}

/// Ensure a required body field is present and not blank.
pub fn required(field: &'static str, value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::BadRequest(format!("{}: Can not be blank", field))),
    }
}
