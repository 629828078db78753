use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of tokens minted by [`JwtService::generate_token`].
pub const TOKEN_TTL_HOURS: i64 = 24;
/// Accepted clock skew, in seconds.
const LEEWAY_SECS: u64 = 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).context("token subject is not a user id")
    }
}

/// HS256 bearer tokens. Issuance lives elsewhere; this side mostly verifies.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn generate_token(&self, user_id: Uuid) -> Result<String> {
        self.sign(user_id, Duration::hours(TOKEN_TTL_HOURS))
    }

    fn sign(&self, user_id: Uuid, ttl: Duration) -> Result<String> {
        let issued_at = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (issued_at + ttl).timestamp().max(0) as usize,
            iat: issued_at.timestamp().max(0) as usize,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.leeway = LEEWAY_SECS;
        Ok(decode::<Claims>(token, &self.decoding_key, &validation)?.claims)
    }

    /// Verify and return the user the token was issued to.
    pub fn authenticate(&self, token: &str) -> Result<Uuid> {
        self.verify_token(token)?.user_id()
    }
}
