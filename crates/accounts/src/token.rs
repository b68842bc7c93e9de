use crate::error::AccountError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
}

/// Issues and verifies stateless HS256 session tokens carrying the user id.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    ttl_hours: i64,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            secret: secret.to_string(),
            ttl_hours,
        }
    }

    pub fn issue(&self, user_id: i64) -> Result<String, AccountError> {
        let expiration = Utc::now() + Duration::hours(self.ttl_hours);
        let claims = Claims {
            sub: user_id.to_string(),
            exp: expiration.timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|_| AccountError::InvalidToken)
    }

    /// Returns the user id the token was issued for.
    pub fn verify(&self, token: &str) -> Result<i64, AccountError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AccountError::InvalidToken)?;

        data.claims
            .sub
            .parse::<i64>()
            .map_err(|_| AccountError::InvalidToken)
    }
}
