// web-server/src/error.rs
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use common::{AuthError, AuthErrorKind, AuthResponse};

/// [`AuthError`] rendered as an HTTP response
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub AuthError);

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0.kind() {
            AuthErrorKind::SignatureInvalid | AuthErrorKind::TokenInvalid => StatusCode::UNAUTHORIZED,
            AuthErrorKind::ConfigurationInvalid => StatusCode::INTERNAL_SERVER_ERROR,
            AuthErrorKind::WalletNotFound
            | AuthErrorKind::WalletConnectionFailed
            | AuthErrorKind::WalletNotConnected
            | AuthErrorKind::SigningFailed => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            // Don't leak configuration details to clients
            tracing::error!("Auth configuration error: {}", self.0);
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };

        HttpResponse::build(status).json(AuthResponse::error(message))
    }
}
