//! Session extractors.
//!
//! A request's [`Session`] is rebuilt from an optional
//! `Authorization: Bearer <token>` header. Reading a session never fails;
//! [`LoggedIn`] rejects requests whose session lacks the logged-in flag.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use blog_core::domain::{Session, is_logged_in};
use blog_core::ports::AuthError;
use blog_shared::ErrorResponse;

use crate::state::AppState;

/// The session of the current request; empty when no valid token was sent.
#[derive(Debug, Clone, Default)]
pub struct RequestSession(pub Session);

impl RequestSession {
    pub fn is_logged_in(&self) -> bool {
        is_logged_in(&self.0)
    }
}

/// A session that passed the logged-in check.
#[derive(Debug, Clone)]
pub struct LoggedIn(pub Session);

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let error = match &self.0 {
            AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
                .with_detail("Your session token has expired. Please log in again."),
            AuthError::InvalidToken(msg) => {
                ErrorResponse::new(401, "Invalid Token").with_detail(msg.clone())
            }
            AuthError::MissingAuth => ErrorResponse::new(401, "Authentication Required")
                .with_detail("Please provide a session token in the Authorization header."),
            AuthError::NotLoggedIn => {
                ErrorResponse::unauthorized("This session is not logged in.")
            }
        };

        actix_web::HttpResponse::build(self.status_code()).json(error)
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

fn decode_session(req: &HttpRequest) -> Result<Session, AuthError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AuthError::InvalidToken("Server configuration error".to_string())
    })?;

    let token = bearer_token(req)?;
    Ok(state.tokens.verify(token)?.session)
}

impl FromRequest for RequestSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = match decode_session(req) {
            Ok(session) => session,
            Err(AuthError::MissingAuth) => Session::new(),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unusable session token");
                Session::new()
            }
        };

        ready(Ok(RequestSession(session)))
    }
}

impl FromRequest for LoggedIn {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = decode_session(req).and_then(|session| {
            if is_logged_in(&session) {
                Ok(LoggedIn(session))
            } else {
                Err(AuthError::NotLoggedIn)
            }
        });

        ready(result.map_err(AuthenticationError))
    }
}
