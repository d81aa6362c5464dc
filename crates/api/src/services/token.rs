//! Bearer tokens.
//!
//! Tokens are HS256 JWTs whose subject is the user id. They are stateless:
//! nothing is stored server-side, so logout cannot revoke them.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hotspots_core::UserId;

/// Errors from issuing or verifying a token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signing failed.
    #[error("failed to issue token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    /// Bad signature, malformed, or expired.
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    /// The subject is not a user id.
    #[error("invalid token subject: {0}")]
    Subject(String),

    /// The lifetime pushes the expiry past the representable range.
    #[error("token lifetime out of range")]
    Lifetime,
}

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a string.
    pub sub: String,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

/// Issues and verifies bearer tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service signing with `secret`; tokens live for `ttl`.
    #[must_use]
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::default(),
            ttl,
        }
    }

    /// Issue a token for `user`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encode` if signing fails and
    /// `TokenError::Lifetime` if the expiry cannot be represented.
    pub fn issue(&self, user: UserId) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::Lifetime)?;
        let claims = Claims {
            sub: user.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(TokenError::Encode)
    }

    /// Verify a token and return the user it was issued for.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` if the token is malformed, tampered with,
    /// or expired, and `TokenError::Subject` if its subject is not a user id.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(TokenError::Invalid)?;

        data.claims
            .sub
            .parse::<UserId>()
            .map_err(|_| TokenError::Subject(data.claims.sub))
    }
}
