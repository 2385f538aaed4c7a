//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use heartcure_core::{
    describe, descriptors, Error, Outcome, RawValue, Workflow, WorkflowDescriptor,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::presenter;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/v1/workflows", get(list_workflows))
        .route("/v1/workflows/:workflow", get(get_workflow))
        .route("/v1/workflows/:workflow/predict", post(predict))
        .fallback(fallback)
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

async fn list_workflows() -> Json<Vec<&'static WorkflowDescriptor>> {
    Json(descriptors().collect())
}

async fn get_workflow(
    Path(workflow): Path<String>,
) -> Result<Json<&'static WorkflowDescriptor>, AppError> {
    let workflow: Workflow = workflow.parse()?;
    Ok(Json(describe(workflow)))
}

/// Prediction request body
///
/// Either every value in field order (`null` leaves a field unset) or a map
/// of field key to value.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PredictRequest {
    Ordered(OrderedInput),
    Named(NamedInput),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderedInput {
    pub values: Vec<Option<RawValue>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamedInput {
    #[serde(default)]
    pub fields: HashMap<String, RawValue>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub request_id: String,
    pub workflow: Workflow,
    pub prediction: i64,
    pub outcome: Outcome,
    pub label: String,

    /// Display string for the result
    pub diagnosis: String,
}

async fn predict(
    State(state): State<AppState>,
    Path(workflow): Path<String>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, AppError> {
    let workflow: Workflow = workflow.parse()?;
    let Json(request) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    let request_id = uuid::Uuid::new_v4().to_string();

    metrics::counter!("heartcure_requests_total", "workflow" => workflow.name()).increment(1);
    debug!(request_id = %request_id, workflow = %workflow, "prediction request");

    let diagnosis = match &request {
        PredictRequest::Ordered(input) => state.dispatcher.predict_ordered(workflow, &input.values),
        PredictRequest::Named(input) => state.dispatcher.predict_named(workflow, &input.fields),
    }?;

    info!(
        request_id = %request_id,
        workflow = %workflow,
        outcome = diagnosis.outcome.as_str(),
        "prediction served"
    );

    Ok(Json(PredictResponse {
        request_id,
        workflow,
        prediction: diagnosis.prediction,
        outcome: diagnosis.outcome,
        label: diagnosis.label.to_string(),
        diagnosis: presenter::render_diagnosis(&diagnosis),
    }))
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Error handling
#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    Prediction(Error),
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError::Prediction(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request", msg),
            AppError::Prediction(err) => {
                let status = match &err {
                    Error::UnknownWorkflow(_) => StatusCode::NOT_FOUND,
                    Error::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    e if e.is_recoverable() => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.kind(), err.to_string())
            }
        };

        let body = json!({
            "error": {
                "message": presenter::render_error(&message),
                "type": kind,
            }
        });

        (status, Json(body)).into_response()
    }
}
