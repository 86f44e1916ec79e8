//! HTTP handlers for the prediction API

use crate::config::OrgTreeConfig;
use crate::embed::Embedder;
use crate::graph::{EmployeeId, Prediction};
use crate::inference::{HierarchyPipeline, PipelineError, PipelineReport};
use crate::persistence::{read_connections, read_employees, PersistenceError};
use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Shared, read-only server state
pub struct AppState {
    pub config: OrgTreeConfig,
    pub embedder: Arc<dyn Embedder>,
}

/// Body of `POST /predict`
#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    pub employees_csv_base64: Option<String>,
    pub connections_csv_base64: Option<String>,
    /// Overrides `root.employee_id` of the server config for this request
    pub root_employee_id: Option<EmployeeId>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub request_id: String,
    pub predictions: Vec<Prediction>,
    pub report: PipelineReport,
}

/// Errors returned as `{"error": ...}` bodies
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Pipeline(PipelineError),
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        ApiError::Pipeline(e)
    }
}

impl From<PersistenceError> for ApiError {
    fn from(e: PersistenceError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Pipeline(e) => {
                let status = match e {
                    PipelineError::Graph(_) | PipelineError::Persistence(_) => StatusCode::BAD_REQUEST,
                    PipelineError::Embed(_) => StatusCode::BAD_GATEWAY,
                    PipelineError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn decode_csv(field: &str, encoded: Option<String>) -> Result<Vec<u8>, ApiError> {
    let encoded = encoded.ok_or_else(|| {
        ApiError::BadRequest("Missing required fields: employees_csv_base64, connections_csv_base64".to_string())
    })?;
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| ApiError::BadRequest(format!("{} is not valid base64: {}", field, e)))
}

/// Handler for hierarchy prediction
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let request_id = Uuid::new_v4().to_string();
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let employees_csv = decode_csv("employees_csv_base64", request.employees_csv_base64)?;
    let connections_csv = decode_csv("connections_csv_base64", request.connections_csv_base64)?;

    let employees = read_employees(employees_csv.as_slice())?;
    let connections = read_connections(connections_csv.as_slice())?;

    let mut config = state.config.clone();
    if let Some(root) = request.root_employee_id {
        if !root.is_valid() {
            return Err(ApiError::BadRequest(format!(
                "root_employee_id must be a positive employee id, got {}",
                root
            )));
        }
        config.root.employee_id = Some(root);
    }

    info!(%request_id, employees = employees.len(), connections = connections.len(), "predict request");
    let pipeline = HierarchyPipeline::new(config, Arc::clone(&state.embedder));
    let outcome = pipeline.run(&employees, &connections).await.map_err(|e| {
        warn!(%request_id, error = %e, "predict request failed");
        ApiError::from(e)
    })?;

    Ok(Json(PredictResponse {
        request_id,
        predictions: outcome.predictions,
        report: outcome.report,
    }))
}

/// Handler for system status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": crate::VERSION,
        "embedder": state.embedder.name(),
    }))
}
