//! Bearer token issuing and verification (JWT, HS256).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::contract::error::AccountsError;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    /// Expiry as a unix timestamp (seconds).
    pub exp: i64,
}

/// Issues and verifies access tokens with a shared HS256 secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::days(ttl_days),
        }
    }

    /// Issue a token for `user_id`, valid for the configured TTL.
    pub fn issue(&self, user_id: i64) -> Result<String, AccountsError> {
        let claims = Claims {
            user_id,
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| AccountsError::internal(format!("failed to sign token: {err}")))
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AccountsError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|_| AccountsError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_verify() {
        let codec = TokenCodec::new(b"test-secret", 7);
        let token = codec.issue(42).unwrap();
        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn tampered_tokens_are_rejected() {
        let codec = TokenCodec::new(b"test-secret", 7);
        let other = TokenCodec::new(b"other-secret", 7);
        let token = codec.issue(42).unwrap();
        assert_eq!(other.verify(&token), Err(AccountsError::InvalidToken));
        assert_eq!(codec.verify("not-a-token"), Err(AccountsError::InvalidToken));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        // Negative TTL puts the expiry in the past, beyond the default
        // decode leeway.
        let codec = TokenCodec::new(b"test-secret", -1);
        let token = codec.issue(42).unwrap();
        assert_eq!(codec.verify(&token), Err(AccountsError::InvalidToken));
    }
}
