use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{self, truncate_chars, ExtractionOutcome, StageReport};
use crate::llm_client::ApiKey;
use crate::models::resume::{FileStats, ResumeDocument};
use crate::session::demo::{demo_resume, DEMO_JOB_DESCRIPTION};
use crate::session::PreconditionFailure;
use crate::state::AppState;

/// Characters of extracted text echoed back after an upload.
pub const RESUME_PREVIEW_CHARS: usize = 1500;

/// Multipart field carrying the PDF.
const UPLOAD_FIELD: &str = "file";

/// Part content types accepted for the resume. `application/octet-stream` is
/// what many clients send when they do not sniff the file.
const PDF_CONTENT_TYPES: [&str; 3] = [
    "application/pdf",
    "application/x-pdf",
    "application/octet-stream",
];

#[derive(Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreated>) {
    let session_id = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/clear
pub async fn handle_clear_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let session = state.sessions.get(id).await?;
    session.lock().await.clear();
    info!("Session {id} cleared");
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// API key
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ApiKeyRequest {
    pub api_key: String,
}

/// PUT /api/v1/sessions/:id/api-key
pub async fn handle_set_api_key(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ApiKeyRequest>,
) -> Result<StatusCode, AppError> {
    let key = ApiKey::new(&req.api_key)
        .ok_or_else(|| AppError::Validation("API key must not be empty".to_string()))?;
    let session = state.sessions.get(id).await?;
    session.lock().await.api_key = Some(key);
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub message: String,
}

/// POST /api/v1/sessions/:id/api-key/test
///
/// Builds a client from the stored key without sending a request.
pub async fn handle_test_api_key(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConnectionStatus>, AppError> {
    let session = state.sessions.get(id).await?;
    let key = session
        .lock()
        .await
        .api_key
        .clone()
        .ok_or(PreconditionFailure::MissingApiKey)?;

    let status = match state.llm.create(&key) {
        Ok(_) => ConnectionStatus {
            connected: true,
            message: "API connection successful".to_string(),
        },
        Err(e) => ConnectionStatus {
            connected: false,
            message: format!("Connection failed: {e}"),
        },
    };
    Ok(Json(status))
}

// ────────────────────────────────────────────────────────────────────────────
// Job description
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct JobDescriptionRequest {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct TextCounts {
    pub words: usize,
    pub characters: usize,
}

impl TextCounts {
    fn of(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            characters: text.chars().count(),
        }
    }
}

/// PUT /api/v1/sessions/:id/job-description
pub async fn handle_set_job_description(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<JobDescriptionRequest>,
) -> Result<Json<TextCounts>, AppError> {
    let counts = TextCounts::of(&req.job_description);
    let session = state.sessions.get(id).await?;
    session.lock().await.job_description = req.job_description;
    Ok(Json(counts))
}

// ────────────────────────────────────────────────────────────────────────────
// Resume upload
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub stats: FileStats,
    pub extraction: ExtractionOutcome,
    pub attempts: Vec<StageReport>,
    /// First `RESUME_PREVIEW_CHARS` characters of the text, when there is any.
    pub preview: Option<String>,
}

/// POST /api/v1/sessions/:id/resume
///
/// Accepts a multipart form with a single PDF in the `file` field. Inspection
/// and extraction run on the blocking pool; the bytes are dropped afterwards.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let limit = state.config.max_upload_bytes;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
        let content_type = field.content_type().map(str::to_ascii_lowercase);
        let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
        upload = Some((file_name, content_type, bytes));
        break;
    }

    let (file_name, content_type, bytes) = upload.ok_or_else(|| {
        AppError::Validation(format!("Missing multipart field '{UPLOAD_FIELD}'"))
    })?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if !file_name.to_ascii_lowercase().ends_with(".pdf") {
        return Err(AppError::Validation(format!(
            "Only PDF files are accepted, got '{file_name}'"
        )));
    }
    if let Some(content_type) = content_type {
        if !is_pdf_content_type(&content_type) {
            return Err(AppError::Validation(format!(
                "Only PDF files are accepted, got content type '{content_type}'"
            )));
        }
    }

    let (stats, extraction) = tokio::task::spawn_blocking(move || {
        let stats = extraction::inspect::inspect(&file_name, &bytes);
        let extraction = extraction::extract(&bytes);
        (stats, extraction)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}")))?;

    info!(
        "Resume '{}' uploaded to session {id}: {:.2} MB, pages {:?}, warning={}",
        stats.file_name,
        stats.size_mb,
        stats.page_count,
        extraction.outcome.is_warning()
    );

    let preview = match &extraction.outcome {
        ExtractionOutcome::Text(text) => Some(truncate_chars(text, RESUME_PREVIEW_CHARS).to_string()),
        ExtractionOutcome::Warning(_) => None,
    };
    let response = UploadResponse {
        stats: stats.clone(),
        extraction: extraction.outcome.clone(),
        attempts: extraction.attempts.clone(),
        preview,
    };

    session.lock().await.resume = Some(ResumeDocument::from_extraction(stats, extraction));
    Ok(Json(response))
}

/// Size-limit failures become 413; anything else is a malformed request.
fn multipart_error(e: MultipartError, limit: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "Resume exceeds the upload limit of {}",
            describe_bytes(limit)
        ))
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
    }
}

fn describe_bytes(bytes: usize) -> String {
    const MB: usize = 1024 * 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{} MB", bytes / MB)
    } else {
        format!("{bytes} bytes")
    }
}

/// Ignores parameters such as `; charset=binary`.
fn is_pdf_content_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    PDF_CONTENT_TYPES.contains(&essence)
}

// ────────────────────────────────────────────────────────────────────────────
// Demo
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DemoLoaded {
    pub job_description: TextCounts,
    pub resume: FileStats,
}

/// POST /api/v1/sessions/:id/demo
pub async fn handle_load_demo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DemoLoaded>, AppError> {
    let session = state.sessions.get(id).await?;
    let resume = demo_resume();
    let loaded = DemoLoaded {
        job_description: TextCounts::of(DEMO_JOB_DESCRIPTION),
        resume: resume.stats.clone(),
    };

    let mut session = session.lock().await;
    session.job_description = DEMO_JOB_DESCRIPTION.to_string();
    session.resume = Some(resume);
    Ok(Json(loaded))
}
