//! Bearer access tokens.
//!
//! Tokens are HS256 JWTs carrying a [`Claims`] payload. There is no refresh
//! flow: a client logs in again once `expires_in` seconds have passed.

use jsonwebtoken::errors::Error as JwtError;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use quill_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 30;

/// Payload of every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    pub username: String,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Issue time, seconds since the Unix epoch.
    pub iat: i64,
    /// Random token id (UUID v4).
    pub jti: String,
}

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty) and `JWT_ACCESS_EXPIRY_MINS`
    /// (default 30).
    ///
    /// # Panics
    ///
    /// Panics when the secret is missing or empty, or the expiry is not a
    /// positive integer.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .map(|v| v.parse().expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64"))
            .unwrap_or(DEFAULT_ACCESS_EXPIRY_MINS);
        assert!(
            access_token_expiry_mins > 0,
            "JWT_ACCESS_EXPIRY_MINS must be positive"
        );

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Token lifetime in seconds.
    pub fn expires_in_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.as_bytes())
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.as_bytes())
    }
}

/// A freshly signed token and the lifetime it was signed with.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_in: i64,
}

/// Sign an access token for `user_id`.
pub fn issue_access_token(
    user_id: DbId,
    username: &str,
    config: &JwtConfig,
) -> Result<AccessToken, JwtError> {
    let iat = chrono::Utc::now().timestamp();
    let expires_in = config.expires_in_secs();
    let claims = Claims {
        sub: user_id,
        username: username.to_owned(),
        exp: iat + expires_in,
        iat,
        jti: Uuid::new_v4().to_string(),
    };

    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &config.encoding_key(),
    )?;
    Ok(AccessToken { token, expires_in })
}

/// Check signature and expiry, returning the decoded claims.
pub fn decode_access_token(token: &str, config: &JwtConfig) -> Result<Claims, JwtError> {
    let validation = Validation::new(Algorithm::HS256);
    jsonwebtoken::decode::<Claims>(token, &config.decoding_key(), &validation)
        .map(|data| data.claims)
}
