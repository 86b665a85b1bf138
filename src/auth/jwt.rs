use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

use crate::{auth::error::AuthError, config::Config, model::role::Role, models::Claims};

/// Signs and checks session tokens with the server-held HMAC secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: i64,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Refuses to build an issuer without a secret instead of signing with an empty key.
    pub fn from_config(config: &Config) -> Result<Self, AuthError> {
        match config.jwt_secret.as_deref() {
            Some(secret) => Ok(Self::new(secret, config.token_ttl)),
            None => {
                tracing::error!("JWT_SECRET is not configured; refusing to issue tokens");
                Err(AuthError::Configuration)
            }
        }
    }

    pub fn issue(&self, id: i32, role: Role, email: &str) -> Result<String, Error> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            id,
            role,
            email: email.to_string(),
            iat: now,
            exp: now + self.ttl,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, Error> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default()).map(|data| data.claims)
    }
}
