//! Session token port.

use crate::domain::Session;

/// Claims carried by a session token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub subject: String,
    pub session: Session,
}

/// Issues and verifies the tokens a request's [`Session`] is rebuilt from.
pub trait SessionTokenService: Send + Sync {
    /// Seal a session into a token for the given subject.
    fn issue(&self, subject: &str, session: &Session) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Login required")]
    NotLoggedIn,
}
