//! Patient endpoints.
//!
//! Every handler runs behind [`crate::middleware::require_token`], so the caller's
//! [`Principal`] is always present in the request extensions.

use crate::error::ApiResult;
use crate::AppState;
use api_shared::{ErrorRes, ListPatientsRes, PatientReq, PatientRes};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use pvault_core::Principal;

#[utoipa::path(
    get,
    path = "/patients",
    tag = "patients",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Patients owned by the caller", body = ListPatientsRes),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Lists the patients owned by the caller, oldest first.
#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<ListPatientsRes>> {
    let patients = state.patients.list(&principal).await?;
    Ok(Json(ListPatientsRes { patients }))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    tag = "patients",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "The patient", body = PatientRes),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 403, description = "Patient belongs to another user", body = ErrorRes),
        (status = 404, description = "No such patient", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<Json<PatientRes>> {
    let patient = state.patients.get(&principal, &id).await?;
    Ok(Json(PatientRes { patient }))
}

#[utoipa::path(
    post,
    path = "/patients",
    tag = "patients",
    security(("bearer" = [])),
    request_body = PatientReq,
    responses(
        (status = 201, description = "Patient created", body = PatientRes),
        (status = 400, description = "Malformed request body", body = ErrorRes),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 422, description = "Patient failed validation", body = ErrorRes)
    )
)]
/// Creates a patient owned by the caller. An `owner` in the body is ignored.
#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<PatientReq>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PatientRes>)> {
    let Json(req) = payload?;
    let patient = state.patients.create(&principal, req.patient).await?;
    Ok((StatusCode::CREATED, Json(PatientRes { patient })))
}

#[utoipa::path(
    patch,
    path = "/patients/{id}",
    tag = "patients",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Patient id")),
    request_body = PatientReq,
    responses(
        (status = 204, description = "Patient updated"),
        (status = 400, description = "Malformed request body", body = ErrorRes),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 403, description = "Patient belongs to another user", body = ErrorRes),
        (status = 404, description = "No such patient", body = ErrorRes),
        (status = 422, description = "Update failed validation", body = ErrorRes)
    )
)]
/// Applies a partial update.
///
/// Empty-string fields have already been removed from the body, so they never overwrite stored
/// values. An `owner` key is dropped as well.
#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Result<Json<PatientReq>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(req) = payload?;
    state.patients.update(&principal, &id, req.patient).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/patients/{id}",
    tag = "patients",
    security(("bearer" = [])),
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 204, description = "Patient deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorRes),
        (status = 403, description = "Patient belongs to another user", body = ErrorRes),
        (status = 404, description = "No such patient", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.patients.delete(&principal, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
