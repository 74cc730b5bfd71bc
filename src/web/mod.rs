//! HTTP presentation surface: the input form and its result page

pub mod page;

use crate::metrics::PredictionMetrics;
use crate::models::inference::InferenceEngine;
use crate::types::record::{InputRecord, RecordForm};
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<InferenceEngine>,
    pub metrics: Arc<PredictionMetrics>,
}

impl AppState {
    pub fn new(engine: InferenceEngine) -> Self {
        Self {
            engine: Arc::new(engine),
            metrics: Arc::new(PredictionMetrics::new()),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Request failure, rendered back into the form page
#[derive(Debug)]
pub enum AppError {
    /// The submitted form could not be turned into a record; `record`
    /// keeps whatever the user entered validly.
    Invalid {
        error: anyhow::Error,
        record: InputRecord,
    },
    /// The classifier failed on this record
    Internal(InputRecord),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, record, message) = match self {
            AppError::Invalid { error, record } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                record,
                format!("{:#}", error),
            ),
            AppError::Internal(record) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                record,
                "Prediction failed, please try again.".to_string(),
            ),
        };
        let body = page::render(&record, None, Some(&message));
        (status, Html(body)).into_response()
    }
}

async fn index() -> Html<String> {
    Html(page::render(&InputRecord::default(), None, None))
}

async fn predict(
    State(state): State<AppState>,
    Form(form): Form<RecordForm>,
) -> Result<Html<String>, AppError> {
    let start_time = Instant::now();

    let submitted = form.best_effort();
    let record = form.into_record().map_err(|error| {
        state.metrics.record_failure();
        warn!(error = %error, "Rejected form submission");
        AppError::Invalid {
            error,
            record: submitted,
        }
    })?;

    let prediction = state.engine.predict(&record).map_err(|e| {
        state.metrics.record_failure();
        error!(error = %e, "Inference failed");
        AppError::Internal(record)
    })?;

    let latency = start_time.elapsed();
    state.metrics.record_prediction(prediction.label, latency);

    info!(
        prediction_id = %prediction.prediction_id,
        label = ?prediction.label,
        probability = ?prediction.probability,
        latency_us = latency.as_micros(),
        "Prediction served"
    );

    Ok(Html(page::render(&record, Some(&prediction), None)))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    model: String,
    predictions: u64,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.engine.model_name().to_string(),
        predictions: state.metrics.total_predictions(),
    })
}
