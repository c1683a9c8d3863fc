use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use api_shared::StoreAuthenticator;
use pvault_core::config::required_fields_from_env_value;
use pvault_core::{CoreConfig, FileStore, PatientService};

/// Main entry point for Patient Vault
///
/// Starts the REST server backed by the file store.
///
/// # Environment Variables
/// - `PVAULT_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PVAULT_DATA_DIR`: Directory for patient and user documents (default: "/patient_data")
/// - `PVAULT_REQUIRED_PATIENT_FIELDS`: Comma-separated patient attributes that must be present
///   (default: "name")
///
/// # Errors
/// Returns an error if:
/// - the logging configuration cannot be initialised,
/// - the data directory does not exist or cannot be opened as a store,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pvault_run=info".parse()?)
                .add_directive("pvault_core=info".parse()?)
                .add_directive("api_shared=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("PVAULT_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let patient_data_dir = std::env::var("PVAULT_DATA_DIR")
        .unwrap_or_else(|_| pvault_core::DEFAULT_PATIENT_DATA_DIR.into());
    let patient_data_path = Path::new(&patient_data_dir);
    if !patient_data_path.exists() {
        anyhow::bail!(
            "Patient data directory does not exist: {}",
            patient_data_path.display()
        );
    }

    let required_fields =
        required_fields_from_env_value(std::env::var("PVAULT_REQUIRED_PATIENT_FIELDS").ok());
    let cfg = Arc::new(CoreConfig::new(
        patient_data_path.to_path_buf(),
        required_fields,
    )?);

    let store = Arc::new(FileStore::open(&cfg).await?);
    let state = AppState::new(
        PatientService::new(store.clone()),
        Arc::new(StoreAuthenticator::new(store)),
    );
    let app = api_rest::router(state);

    tracing::info!("-- Starting Patient Vault REST API on {}", rest_addr);
    tracing::info!(
        "-- Required patient fields: {:?}",
        cfg.required_patient_fields()
    );

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
