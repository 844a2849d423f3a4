use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use crypto_core::JwtError;
use serde_json::json;
use thiserror::Error;

/// Why an access token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("expired")]
    Expired,

    #[error("malformed")]
    MalformedToken,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Account already exists")]
    AlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Email already in use")]
    EmailInUse,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;

impl AuthError {
    /// True for failures that indicate a defect or outage rather than a
    /// normal user-facing outcome
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::Hashing(_) | AuthError::Storage(_) | AuthError::Internal(_)
        )
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::AlreadyExists | AuthError::EmailInUse => StatusCode::CONFLICT,
            AuthError::InvalidCredentials
            | AuthError::InvalidRefreshToken
            | AuthError::NotAuthenticated
            | AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Hashing(_) | AuthError::Storage(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.is_internal() {
            tracing::error!(error = %self, "Request failed");
        }
        let error_message = match &self {
            AuthError::AlreadyExists => "Email already registered".to_string(),
            AuthError::InvalidCredentials => "Invalid email or password".to_string(),
            AuthError::InvalidRefreshToken => "Invalid or expired refresh token".to_string(),
            AuthError::EmailInUse => "Email already in use".to_string(),
            AuthError::NotAuthenticated => "Authentication required".to_string(),
            AuthError::InvalidToken(TokenError::Expired) => "Token expired".to_string(),
            AuthError::InvalidToken(_) => "Invalid token".to_string(),
            AuthError::Validation(msg) => msg.clone(),
            // Internal details stay in the logs
            AuthError::Hashing(_) | AuthError::Storage(_) | AuthError::Internal(_) => {
                "Internal server error".to_string()
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!(error = %err, "Database error");
        AuthError::Storage(err.to_string())
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::InvalidSignature => AuthError::InvalidToken(TokenError::InvalidSignature),
            JwtError::Expired => AuthError::InvalidToken(TokenError::Expired),
            JwtError::MalformedToken => AuthError::InvalidToken(TokenError::MalformedToken),
            JwtError::WeakSecret(_) | JwtError::Signing(_) => AuthError::Internal(err.to_string()),
        }
    }
}
