use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::auth::credentials::{self, SignupOutcome};
use crate::auth::revocation;
use crate::db::models::User;
use crate::error::{AppError, AppResult};
use crate::extractors::{required, ApiJson, CurrentUser};
use crate::state::AppState;

const BAD_CREDENTIALS: &str = "Bad credentials! Login again or signup";

// -- Request types --

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsRequest {
    fn into_parts(self) -> AppResult<(String, String)> {
        let username = required("username", self.username)?;
        let password = required("password", self.password)?;
        Ok((username.trim().to_string(), password))
    }
}

// -- Handlers --

/// POST /api/signup: create a user; 202 if the username is taken
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> AppResult<Response> {
    let (username, password) = req.into_parts()?;

    // bcrypt is CPU-bound; keep it off the async workers
    let pool = state.db.clone();
    let cost = state.config.auth.bcrypt_cost;
    let name = username.clone();
    let outcome = tokio::task::spawn_blocking(move || -> AppResult<SignupOutcome> {
        let conn = pool.get()?;
        credentials::create_user(&conn, &name, &password, cost)
    })
    .await?
    .map_err(|e| match e {
        AppError::Database(err) => AppError::UpstreamUnavailable(err.to_string()),
        other => other,
    })?;

    match outcome {
        SignupOutcome::Created(id) => {
            tracing::info!("User {} signed up (id {})", username, id);
            Ok(Json(json!({ "msg": format!("User {} successfully signed up", username) }))
                .into_response())
        }
        SignupOutcome::AlreadyExists => {
            tracing::info!("Signup for existing user {}", username);
            Ok((
                StatusCode::ACCEPTED,
                Json(json!({ "msg": format!("User {} already exist", username) })),
            )
                .into_response())
        }
    }
}

/// POST /api/login: exchange credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> AppResult<Response> {
    let (username, password) = req.into_parts()?;

    let pool = state.db.clone();
    let name = username.clone();
    let user = tokio::task::spawn_blocking(move || -> AppResult<Option<User>> {
        let conn = pool.get()?;
        credentials::verify_login(&conn, &name, &password)
    })
    .await??;

    let Some(user) = user else {
        tracing::info!("Failed login for {}", username);
        return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
    };

    let (token, _claims) = state.keys.issue(&user.username)?;
    tracing::info!("User {} logged in", user.username);

    Ok(Json(json!({
        "msg": format!("User {} successfully logged in", user.username),
        "token": token,
    }))
    .into_response())
}

/// POST /api/logout: revoke the token used for this request
pub async fn logout(State(state): State<AppState>, user: CurrentUser) -> AppResult<Response> {
    let conn = state.db.get()?;
    revocation::revoke(&conn, &user.jti, user.exp)?;
    tracing::info!("User {} logged out", user.username);

    Ok(Json(json!({ "msg": "You are successfully logged out" })).into_response())
}
