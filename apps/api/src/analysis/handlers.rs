use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::interpreter::interpret;
use crate::analysis::prompts::build_prompt;
use crate::analysis::report::{render_report, report_file_name};
use crate::analysis::stats::{history_stats, HistoryStats};
use crate::analysis::views::{dashboard, DashboardView};
use crate::errors::AppError;
use crate::llm_client::models::{catalog, ModelId, ModelInfo};
use crate::models::analysis::{AnalysisMode, AnalysisRequest, AnalysisResult};
use crate::state::AppState;

/// GET /api/v1/models
pub async fn handle_list_models(State(state): State<AppState>) -> Json<Vec<ModelInfo>> {
    Json(catalog(state.config.default_model))
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub mode: AnalysisMode,
    /// Falls back to the configured default model.
    pub model: Option<ModelId>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub result: AnalysisResult,
    pub warning: Option<String>,
}

/// POST /api/v1/sessions/:id/analyze
///
/// Inputs are copied out under the session lock, the model is called with the
/// lock released, and the result is recorded under a fresh lock.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let inputs = session.lock().await.check_ready()?;
    let request = AnalysisRequest {
        mode: req.mode,
        model: req.model.unwrap_or(state.config.default_model),
        job_description: inputs.job_description,
        resume_text: inputs.resume_text,
    };

    let prompt = build_prompt(request.mode, &request.job_description, &request.resume_text);
    let client = state.llm.create(&inputs.api_key)?;
    let raw = client
        .complete(request.model, &prompt.system, &prompt.user)
        .await?;

    let interpretation = interpret(request.mode, &raw);
    let result = AnalysisResult::new(
        request.mode,
        request.model,
        &inputs.file_name,
        &request.job_description,
        interpretation.payload,
    );
    info!(
        "Analysis {} ({}) completed for session {id} with {}",
        result.id,
        request.mode,
        request.model.id()
    );

    session.lock().await.record(result.clone());
    Ok(Json(AnalyzeResponse {
        result,
        warning: interpretation.warning,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Current analysis
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/sessions/:id/current
pub async fn handle_get_current(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<AnalysisResult>>, AppError> {
    let session = state.sessions.get(id).await?;
    let current = session.lock().await.current().cloned();
    Ok(Json(current))
}

/// DELETE /api/v1/sessions/:id/current
pub async fn handle_clear_current(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let session = state.sessions.get(id).await?;
    session.lock().await.clear_current();
    Ok(StatusCode::NO_CONTENT)
}

async fn require_current(state: &AppState, id: Uuid) -> Result<AnalysisResult, AppError> {
    let session = state.sessions.get(id).await?;
    let current = session.lock().await.current().cloned();
    current.ok_or_else(|| AppError::NotFound("No current analysis in this session".to_string()))
}

/// GET /api/v1/sessions/:id/current/dashboard
pub async fn handle_current_dashboard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DashboardView>, AppError> {
    let current = require_current(&state, id).await?;
    let score = current.payload.as_score().ok_or_else(|| {
        AppError::NotFound(format!(
            "Analysis {} has no structured score to chart",
            current.id
        ))
    })?;
    Ok(Json(dashboard(score)))
}

/// GET /api/v1/sessions/:id/current/report
pub async fn handle_current_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let current = require_current(&state, id).await?;
    let disposition = format!("attachment; filename=\"{}\"", report_file_name(Utc::now()));
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        render_report(&current),
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// History
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/sessions/:id/history
/// Newest first.
pub async fn handle_list_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AnalysisResult>>, AppError> {
    let session = state.sessions.get(id).await?;
    let history: Vec<AnalysisResult> =
        session.lock().await.history().iter().rev().cloned().collect();
    Ok(Json(history))
}

/// GET /api/v1/sessions/:id/history/stats
pub async fn handle_history_stats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryStats>, AppError> {
    let session = state.sessions.get(id).await?;
    let stats = history_stats(session.lock().await.history());
    Ok(Json(stats))
}

/// POST /api/v1/sessions/:id/history/:analysis_id/load
pub async fn handle_load_analysis(
    State(state): State<AppState>,
    Path((id, analysis_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AnalysisResult>, AppError> {
    let session = state.sessions.get(id).await?;
    let loaded = session.lock().await.load(analysis_id).cloned();
    loaded
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Analysis {analysis_id} not found")))
}

/// DELETE /api/v1/sessions/:id/history/:analysis_id
pub async fn handle_delete_analysis(
    State(state): State<AppState>,
    Path((id, analysis_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let session = state.sessions.get(id).await?;
    let removed = session.lock().await.remove(analysis_id);
    removed
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| AppError::NotFound(format!("Analysis {analysis_id} not found")))
}
