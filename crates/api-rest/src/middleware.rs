//! Request stages that run ahead of the patient handlers.

use crate::error::ApiError;
use crate::AppState;
use api_shared::extract_bearer_token;
use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use pvault_core::strip_blank_fields;

/// Largest request body the blank-field stage will buffer.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Resolves the bearer token to a [`pvault_core::Principal`] and stores it in the request
/// extensions. Requests without valid credentials stop here with 401.
pub async fn require_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let token = extract_bearer_token(header)?;
    let principal = state.authenticator.authenticate(token).await?;

    tracing::debug!("authenticated {}", principal.user_id());
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Removes empty-string fields from a JSON request body.
///
/// Bodies that are not JSON are forwarded untouched and left for the handler to reject.
pub async fn remove_blank_fields(request: Request, next: Next) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|err| ApiError::bad_request(format!("Failed to read request body: {err}")))?;

    let body = match serde_json::from_slice(&bytes) {
        Ok(value) => {
            let cleaned = serde_json::to_vec(&strip_blank_fields(value))
                .map_err(|err| ApiError::bad_request(err.to_string()))?;
            parts.headers.remove(header::CONTENT_LENGTH);
            Body::from(cleaned)
        }
        Err(_) => Body::from(bytes),
    };

    Ok(next.run(Request::from_parts(parts, body)).await)
}
