//! Identity types produced by bearer-token verification.

use serde::{Deserialize, Serialize};

/// Claims carried by an access token.
///
/// Tokens are minted by the external identity provider; only the fields this
/// service consumes are modeled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the identity provider's opaque user id.
    pub sub: String,
    /// Verified email address of the user.
    pub email: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

/// Verified caller identity, injected into the request context by the auth
/// middleware.
#[derive(Debug, Clone)]
pub struct Identity {
    /// The identity provider's subject id.
    pub user_id: String,
    /// Verified email address.
    pub email: String,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}
