//! The single error boundary for HTTP handlers and middleware.
//!
//! Every failure (core errors and malformed request bodies alike) becomes an [`ApiError`], which
//! picks the status code from the error kind and renders an [`ErrorRes`] body. Store failures are
//! logged in full and reported to the client only as "Internal server error".

use api_shared::{ErrorBody, ErrorRes};
use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use pvault_core::{ErrorKind, VaultError};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    Vault(VaultError),
    BadRequest(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Vault(err) => status_for(err.kind()),
        }
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::StoreUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<VaultError> for ApiError {
    fn from(err: VaultError) -> Self {
        Self::Vault(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (kind, message) = match &self {
            Self::BadRequest(message) => ("bad_request", message.clone()),
            Self::Vault(err) if err.kind() == ErrorKind::StoreUnavailable => {
                tracing::error!("store error: {:?}", err);
                (err.kind().as_str(), "Internal server error".to_string())
            }
            Self::Vault(err) => (err.kind().as_str(), err.to_string()),
        };

        let body = Json(ErrorRes {
            error: ErrorBody {
                kind: kind.to_string(),
                message,
            },
        });

        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
