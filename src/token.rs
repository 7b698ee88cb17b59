//! Session token issuing and verification
//!
//! Tokens are HS256 JWTs carrying the user id (`sub`) and an expiry. Nothing is
//! stored server side, so a token stays valid until it expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token encoding failed: {0}")]
    Encoding(String),

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Token expired")]
    Expired,
}

/// JWT claims for session tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    /// Current key first, then the previous one during a rotation
    decoding: Vec<DecodingKey>,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, previous_secret: Option<&str>, ttl: Duration) -> Self {
        let mut decoding = vec![DecodingKey::from_secret(secret.as_bytes())];
        if let Some(previous) = previous_secret {
            decoding.push(DecodingKey::from_secret(previous.as_bytes()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding,
            validation,
            ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.jwt_secret,
            config.jwt_previous_secret.as_deref(),
            Duration::hours(config.token_ttl_hours),
        )
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user_id` that expires one TTL from now
    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if it had been minted at `issued_at`
    pub fn issue_at(&self, user_id: Uuid, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Encoding("token expiry out of range".to_string()))?;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify a token and return the user it was issued for
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let mut last_err = TokenError::BadSignature;

        for key in &self.decoding {
            match decode::<Claims>(token, key, &self.validation) {
                Ok(data) => {
                    return Uuid::parse_str(&data.claims.sub)
                        .map_err(|e| TokenError::Malformed(e.to_string()));
                }
                Err(e) => match e.kind() {
                    // Another key may still match.
                    ErrorKind::InvalidSignature => last_err = TokenError::BadSignature,
                    ErrorKind::ExpiredSignature => return Err(TokenError::Expired),
                    _ => return Err(TokenError::Malformed(e.to_string())),
                },
            }
        }

        Err(last_err)
    }
}
