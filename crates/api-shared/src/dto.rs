//! Request and response bodies.
//!
//! Patients travel as free-form JSON objects, so their schema is declared as `Object`.

use pvault_core::Patient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Body of `POST /patients` and `PATCH /patients/{id}`.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct PatientReq {
    #[schema(value_type = Object)]
    pub patient: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct PatientRes {
    #[schema(value_type = Object)]
    pub patient: Patient,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct ListPatientsRes {
    #[schema(value_type = Vec<Object>)]
    pub patients: Vec<Patient>,
}

/// Every error response has this shape.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: ErrorBody,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "not_found")]
    pub kind: String,
    pub message: String,
}
