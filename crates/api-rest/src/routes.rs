use crate::middleware::{remove_blank_fields, require_token};
use crate::patients::{
    __path_create_patient, __path_delete_patient, __path_get_patient, __path_list_patients,
    __path_update_patient, create_patient, delete_patient, get_patient, list_patients,
    update_patient,
};
use crate::AppState;
use api_shared::{
    ErrorBody, ErrorRes, HealthRes, HealthService, ListPatientsRes, PatientReq, PatientRes,
};
use axum::handler::Handler;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Patient Vault API",
        description = "Owner-scoped patient records behind bearer authentication."
    ),
    paths(
        health,
        list_patients,
        get_patient,
        create_patient,
        update_patient,
        delete_patient,
    ),
    components(schemas(HealthRes, PatientReq, PatientRes, ListPatientsRes, ErrorRes, ErrorBody)),
    tags(
        (name = "patients", description = "Patient records owned by the caller"),
        (name = "health", description = "Liveness check")
    )
)]
pub struct ApiDoc;

/// Builds the full application router.
///
/// `/patients` routes sit behind bearer authentication; `PATCH` additionally has blank fields
/// stripped from its body before the handler sees it. `/health` and the Swagger UI are open.
pub fn router(state: AppState) -> Router {
    let patients = Router::new()
        .route("/patients", get(list_patients).post(create_patient))
        .route(
            "/patients/:id",
            get(get_patient)
                .patch(update_patient.layer(from_fn(remove_blank_fields)))
                .delete(delete_patient),
        )
        .route_layer(from_fn_with_state(state.clone(), require_token));

    Router::new()
        .route("/health", get(health))
        .merge(patients)
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint. Needs no credentials.
#[axum::debug_handler]
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        assert!(paths.contains(&"/health".to_string()));
        assert!(paths.contains(&"/patients".to_string()));
        assert!(paths.contains(&"/patients/{id}".to_string()));

        let schemes = doc.components.expect("components").security_schemes;
        assert!(schemes.contains_key("bearer"));
    }
}
