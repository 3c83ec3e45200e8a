use crate::infra::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use grade_calc::error::AppError;
use grade_calc::grading::{
    calculate_custom, CalculationRequest, CalculationResult, CustomCalculationRequest,
    GradeCalculator,
};
use grade_calc::reference::ReferenceDataProvider;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Serialize)]
pub(crate) struct CalculationResponse {
    pub(crate) success: bool,
    #[serde(flatten)]
    pub(crate) result: CalculationResult,
}

impl From<CalculationResult> for CalculationResponse {
    fn from(result: CalculationResult) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

pub(crate) fn grading_router<P>(calculator: Arc<GradeCalculator<P>>) -> Router
where
    P: ReferenceDataProvider + 'static,
{
    Router::new()
        .route("/calculate", post(calculate_endpoint::<P>))
        .route("/calculate_custom", post(calculate_custom_endpoint))
        .with_state(calculator)
}

pub(crate) fn with_grading_routes<P>(calculator: Arc<GradeCalculator<P>>) -> Router
where
    P: ReferenceDataProvider + 'static,
{
    grading_router(calculator)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn calculate_endpoint<P>(
    State(calculator): State<Arc<GradeCalculator<P>>>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Result<Json<CalculationResponse>, AppError>
where
    P: ReferenceDataProvider + 'static,
{
    let Json(request) = payload.map_err(reject_body)?;
    let result = calculator.calculate(&request).map_err(|err| {
        warn!(
            subject = %request.subject_code,
            series = %request.exam_series,
            error = %err,
            "calculation rejected"
        );
        AppError::from(err)
    })?;

    Ok(Json(result.into()))
}

pub(crate) async fn calculate_custom_endpoint(
    payload: Result<Json<CustomCalculationRequest>, JsonRejection>,
) -> Result<Json<CalculationResponse>, AppError> {
    let Json(request) = payload.map_err(reject_body)?;
    let result = calculate_custom(&request).map_err(|err| {
        warn!(error = %err, "custom calculation rejected");
        AppError::from(err)
    })?;

    Ok(Json(result.into()))
}

fn reject_body(rejection: JsonRejection) -> AppError {
    warn!(error = %rejection.body_text(), "request body rejected");
    AppError::from(rejection)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
