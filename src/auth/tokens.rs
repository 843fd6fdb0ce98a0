use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

const ACCESS_TOKEN_TYPE: &str = "access";

/// Claims embedded in every bearer token issued on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the token holder.
    pub sub: String,
    pub iat: i64,
    pub nbf: i64,
    /// Unix seconds.
    pub exp: i64,
    /// Revocation handle, unique per issued token.
    pub jti: String,
    #[serde(rename = "type")]
    pub token_type: String,
}

/// Why a token string could not be turned into claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFailure {
    Expired,
    Invalid,
}

#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    #[error("token expiry out of range")]
    ExpiryOutOfRange,

    #[error(transparent)]
    Jwt(#[from] JwtError),
}

/// HS256 signing material plus the issuance/validation policy.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
    leeway_secs: u64,
}

impl TokenKeys {
    pub fn new(secret: &[u8], ttl_secs: u64, leeway_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs,
            leeway_secs,
        }
    }

    pub fn from_config(secret: &str, auth: &AuthConfig) -> Self {
        Self::new(secret.as_bytes(), auth.token_ttl_secs, auth.leeway_secs)
    }

    pub fn issue(&self, username: &str) -> Result<(String, Claims), IssueError> {
        self.issue_at(username, Utc::now())
    }

    pub fn issue_at(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<(String, Claims), IssueError> {
        let expires = i64::try_from(self.ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or(IssueError::ExpiryOutOfRange)?;

        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires.timestamp(),
            jti: uuid::Uuid::now_v7().to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok((token, claims))
    }

    /// Verify signature, expiry and token type.
    pub fn decode(&self, token: &str) -> Result<Claims, DecodeFailure> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            tracing::debug!("Token rejected: {:?}", e.kind());
            match e.kind() {
                ErrorKind::ExpiredSignature => DecodeFailure::Expired,
                _ => DecodeFailure::Invalid,
            }
        })?;

        if data.claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(DecodeFailure::Invalid);
        }

        Ok(data.claims)
    }
}
