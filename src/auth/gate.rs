use axum::http::header;
use axum::http::request::Parts;
use rusqlite::Connection;

use crate::auth::body_token::BodyToken;
use crate::auth::revocation;
use crate::auth::tokens::{Claims, DecodeFailure, TokenKeys};
use crate::config::TokenLocation;
use crate::error::{AppError, AppResult};

/// Typed rejection from the auth gate. The display text is what callers see
/// in the `msg` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing Authorization Header")]
    MissingToken,

    #[error("Bad Authorization header. Expected 'Authorization: Bearer <JWT>'")]
    MalformedHeader,

    #[error("Token has expired")]
    Expired,

    #[error("Token has been revoked")]
    Revoked,

    #[error("Signature verification failed")]
    InvalidSignature,
}

impl From<DecodeFailure> for AuthError {
    fn from(failure: DecodeFailure) -> Self {
        match failure {
            DecodeFailure::Expired => AuthError::Expired,
            DecodeFailure::Invalid => AuthError::InvalidSignature,
        }
    }
}

/// Pull the token out of an `Authorization` header value.
/// Exactly `Bearer <token>` is accepted.
pub fn parse_bearer(value: &str) -> Result<&str, AuthError> {
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// Find the raw token in the configured locations, in order. A present but
/// malformed header is reported rather than skipped.
pub fn token_from_parts<'a>(
    parts: &'a Parts,
    locations: &[TokenLocation],
    cookie_name: &str,
) -> Result<&'a str, AuthError> {
    for location in locations {
        match location {
            TokenLocation::Headers => {
                if let Some(value) = parts.headers.get(header::AUTHORIZATION) {
                    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;
                    return parse_bearer(value);
                }
            }
            TokenLocation::Cookies => {
                if let Some(token) = get_cookie_value(parts, cookie_name) {
                    if !token.is_empty() {
                        return Ok(token);
                    }
                }
            }
            TokenLocation::Json => {
                if let Some(BodyToken(token)) = parts.extensions.get::<BodyToken>() {
                    return Ok(token.as_str());
                }
            }
        }
    }
    Err(AuthError::MissingToken)
}

/// Decode and verify the token, then consult the revocation list.
pub fn authenticate(keys: &TokenKeys, conn: &Connection, token: &str) -> AppResult<Claims> {
    let claims = keys.decode(token).map_err(AuthError::from)?;

    if revocation::is_revoked(conn, &claims.jti)? {
        tracing::debug!("Rejected revoked token {}", claims.jti);
        return Err(AppError::Auth(AuthError::Revoked));
    }

    Ok(claims)
}

fn get_cookie_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == name {
                Some(val)
            } else {
                None
            }
        })
}
