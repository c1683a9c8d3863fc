use crate::dto::HealthRes;

/// Health service shared by every API surface.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Reports the service as alive. Needs no instance.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Patient Vault is alive".into(),
        }
    }
}
