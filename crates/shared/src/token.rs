//! Bearer-token verification.
//!
//! The identity resolver consumes a bearer credential and produces a verified
//! (subject, email) pair. Token issuance belongs to the external identity
//! provider; this service only verifies.

use jsonwebtoken::{DecodingKey, Validation, decode};
use thiserror::Error;

use crate::auth::{Claims, Identity};
use crate::config::AuthConfig;

/// Errors that can occur during token verification.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token is invalid or malformed.
    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Verifies bearer tokens and resolves the caller identity.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("decoding_key", &"[hidden]")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    /// Creates a new verifier from the auth configuration.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::default();
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        Self {
            decoding_key,
            validation,
        }
    }

    /// Verifies a bearer token and returns the caller identity.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` if the token has expired and
    /// `TokenError::Invalid` for any other verification failure.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| Identity::from(data.claims))
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-secret-key-for-testing";

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(&AuthConfig {
            secret: SECRET.to_string(),
            issuer: None,
        })
    }

    fn sign(claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_valid_token() {
        let now = chrono::Utc::now().timestamp();
        let token = sign(&Claims {
            sub: "firebase-uid-123".to_string(),
            email: "alice@example.com".to_string(),
            iat: now,
            exp: now + 3600,
        });

        let identity = verifier().verify(&token).unwrap();
        assert_eq!(identity.user_id, "firebase-uid-123");
        assert_eq!(identity.email, "alice@example.com");
    }

    #[test]
    fn test_verify_expired_token() {
        let now = chrono::Utc::now().timestamp();
        let token = sign(&Claims {
            sub: "uid".to_string(),
            email: "a@b.c".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        });

        assert!(matches!(verifier().verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_verify_garbage_token() {
        assert!(matches!(
            verifier().verify("not.a.token"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_verify_wrong_secret() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "uid".to_string(),
            email: "a@b.c".to_string(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"some-other-secret"),
        )
        .unwrap();

        assert!(verifier().verify(&token).is_err());
    }
}
