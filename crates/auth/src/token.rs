//! Signed, expiring identity tokens.
//!
//! HS256 JWTs carrying `{sub, exp}`. The signing secret is process-wide
//! configuration fixed at startup; rotating it invalidates all outstanding
//! tokens, which is acceptable for a single trust domain.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::AuthError;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// Issues and verifies bearer tokens with one shared secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is by elapsed time only; no grace window.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `subject`, expiring `ttl` from now.
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, AuthError> {
        let claims = Claims {
            sub: subject.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::internal(format!("token encoding failed: {e}")))
    }

    /// Verify a token and return its subject.
    ///
    /// A tampered signature, malformed structure, or elapsed expiry all fail
    /// with `InvalidToken`; no expired or forged subject is ever returned.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|_| AuthError::InvalidToken)
    }
}

impl core::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Never expose key material through Debug.
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(b"test-secret")
    }

    #[test]
    fn issued_token_verifies_to_its_subject() {
        let codec = codec();
        let token = codec.issue("alice", Duration::minutes(5)).unwrap();
        assert_eq!(codec.verify(&token).unwrap(), "alice");
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = codec();
        let token = codec.issue("alice", Duration::seconds(-30)).unwrap();
        assert!(matches!(codec.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let other = TokenCodec::new(b"other-secret");
        let token = other.issue("alice", Duration::minutes(5)).unwrap();
        assert!(matches!(codec().verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let codec = codec();
        let token_alice = codec.issue("alice", Duration::minutes(5)).unwrap();
        let token_bob = codec.issue("bob", Duration::minutes(5)).unwrap();
        let alice: Vec<&str> = token_alice.split('.').collect();
        let bob: Vec<&str> = token_bob.split('.').collect();
        // Bob's payload under Alice's signature.
        let forged = format!("{}.{}.{}", alice[0], bob[1], alice[2]);
        assert!(matches!(codec.verify(&forged), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn malformed_token_is_rejected() {
        let codec = codec();
        for garbage in ["", "abc", "a.b", "a.b.c.d", "not a token at all"] {
            assert!(matches!(codec.verify(garbage), Err(AuthError::InvalidToken)));
        }
    }
}
