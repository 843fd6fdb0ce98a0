//! Bearer tokens carried in a JSON request body.
//!
//! The middleware buffers JSON bodies, lifts an `access_token` field into the
//! request extensions as a [`BodyToken`], and hands the untouched bytes on to
//! the handler. The auth gate picks it up when the `json` location is enabled.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use serde::Deserialize;

use crate::config::TokenLocation;
use crate::error::AppError;
use crate::state::AppState;

/// Same ceiling axum's `Json` extractor applies by default.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Token found in the `access_token` field of a JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyToken(pub String);

#[derive(Deserialize)]
struct TokenField {
    access_token: Option<String>,
}

pub fn token_from_json(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<TokenField>(body)
        .ok()?
        .access_token
        .filter(|token| !token.trim().is_empty())
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start().starts_with("application/json"))
        .unwrap_or(false)
}

pub async fn capture_body_token(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let enabled = state
        .config
        .auth
        .token_locations
        .contains(&TokenLocation::Json);
    if !enabled || !is_json(req.headers()) {
        return Ok(next.run(req).await);
    }

    let (mut parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read request body: {}", e)))?;

    if let Some(token) = token_from_json(&bytes) {
        parts.extensions.insert(BodyToken(token));
    }

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}
