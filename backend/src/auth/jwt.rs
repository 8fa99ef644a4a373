//! JWT validation
//!
//! Keys are derived once from the shared secret and cached behind `Arc`.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const ACCESS_TOKEN_TYPE: &str = "access";

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID, also the profile ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Only "access" tokens are accepted
    pub token_type: String,
}

/// JWT service for token operations
#[derive(Clone)]
pub struct JwtService {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    access_token_expiry_secs: i64,
}

impl JwtService {
    /// Create a new JWT service with pre-computed keys.
    ///
    /// Call once at startup and store in `AppState`.
    pub fn new(secret: &str, access_token_expiry_secs: i64) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            access_token_expiry_secs,
        }
    }

    /// Issue an access token for a user.
    ///
    /// Used by operators and tests; end-user sessions are issued elsewhere
    /// with the same secret.
    pub fn generate_access_token(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_token_expiry_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to generate access token: {}", e))
    }

    /// Validate an access token and return its claims
    pub fn validate_access_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        let claims = token_data.claims;
        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(anyhow::anyhow!("Not an access token"));
        }
        Ok(claims)
    }

    /// Validate a token and parse its subject as a user ID
    pub fn user_id_from_token(&self, token: &str) -> Result<Uuid> {
        let claims = self.validate_access_token(token)?;
        Uuid::parse_str(&claims.sub).map_err(|_| anyhow::anyhow!("Invalid user ID in token"))
    }
}
