//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Request and response types for the monthly simulation endpoint."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use crate::{
    engine::simulate,
    errors::ValidationError,
    model::{MonthlyProfile, Parameters, SimulationTable},
    summary::AnnualSummary,
};

#[cfg(feature = "rest-api")]
pub use rest::router;

#[cfg(feature = "rest-api")]
mod rest {
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::json;
    use tracing::warn;

    use super::{SimulationRequest, SimulationResponse};

    pub fn router() -> Router {
        Router::new().route("/api/sim/monthly", post(monthly))
    }

    async fn monthly(
        Json(payload): Json<SimulationRequest>,
    ) -> Result<Json<SimulationResponse>, (StatusCode, Json<serde_json::Value>)> {
        payload.evaluate().map(Json).map_err(|err| {
            warn!(field = ?err.field(), "Rejected simulation request: {err}");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": err.to_string(), "field": err.field() })),
            )
        })
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SimulationRequest {
    pub profile: MonthlyProfile,
    #[serde(default)]
    pub parameters: Option<Parameters>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct SimulationResponse {
    pub table: SimulationTable,
    pub summary: AnnualSummary,
}

impl SimulationRequest {
    pub fn evaluate(&self) -> Result<SimulationResponse, ValidationError> {
        let parameters = self.parameters.clone().unwrap_or_default();
        let table = simulate(&self.profile, &parameters)?;
        let summary = AnnualSummary::from_table(&table, &parameters);
        Ok(SimulationResponse { table, summary })
    }
}
