use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::response;

/// Error taxonomy shared by every handler. Each variant renders the
/// `{success: false, message}` envelope at its status code.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed required field.
    #[error("{0}")]
    Validation(String),

    /// The id does not resolve, or resolves to a soft-deleted row.
    #[error("{0}")]
    NotFound(String),

    /// Unique-constraint violation with a domain-specific message.
    #[error("{0}")]
    Conflict(String),

    /// Missing, invalid, or expired credential.
    #[error("{0}")]
    Auth(String),

    /// Anything else. The message is generic; detail is logged server-side.
    #[error("{0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        response::fail(self.status_code(), &self.to_string())
    }
}

/// Maps an unrecognized database error to a 500 with a client-safe message,
/// logging the full detail.
pub fn db_error(message: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |err| {
        tracing::error!(error = %err, "{message}");
        AppError::Internal(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use serde_json::{Value, json};

    async fn render(err: AppError) -> (StatusCode, Value) {
        let status = err.status_code();
        let bytes = to_bytes(err.error_response().into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn validation_renders_400_envelope() {
        let (status, body) = render(AppError::Validation("Site name is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("Site name is required"));
    }

    #[actix_web::test]
    async fn conflict_renders_400() {
        let (status, _) = render(AppError::Conflict("Username already exists".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn not_found_renders_404() {
        let (status, body) = render(AppError::NotFound("Staff not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Staff not found"));
    }

    #[actix_web::test]
    async fn auth_renders_401() {
        let (status, _) = render(AppError::Auth("Invalid credentials".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn db_error_hides_detail() {
        let err = db_error("Failed to retrieve sites")(sqlx::Error::PoolClosed);
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], json!("Failed to retrieve sites"));
    }
}
