use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::score::StructuredScore;
use crate::llm_client::models::ModelId;

/// Characters of the job description kept on each history record.
pub const JOB_DESCRIPTION_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    Detailed,
    AtsScore,
    CoverLetter,
}

impl AnalysisMode {
    pub fn title(&self) -> &'static str {
        match self {
            AnalysisMode::Detailed => "Detailed",
            AnalysisMode::AtsScore => "ATS Score",
            AnalysisMode::CoverLetter => "Cover Letter",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// What the model produced, after interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum AnalysisPayload {
    /// Prose to be shown as-is (markdown from the model).
    RenderableText(String),
    StructuredScore(StructuredScore),
}

impl AnalysisPayload {
    pub fn as_score(&self) -> Option<&StructuredScore> {
        match self {
            AnalysisPayload::StructuredScore(score) => Some(score),
            AnalysisPayload::RenderableText(_) => None,
        }
    }
}

/// One analysis to run. Built once per analyze call and consumed by it.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub mode: AnalysisMode,
    pub model: ModelId,
    pub job_description: String,
    pub resume_text: String,
}

/// One completed analysis. `id` is the identity key for history operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: Uuid,
    pub mode: AnalysisMode,
    pub model: ModelId,
    pub created_at: DateTime<Utc>,
    pub file_name: String,
    pub job_description_preview: String,
    pub payload: AnalysisPayload,
    /// Overall ATS score, present only for parsed ATS results.
    pub score: Option<u8>,
}

impl AnalysisResult {
    pub fn new(
        mode: AnalysisMode,
        model: ModelId,
        file_name: &str,
        job_description: &str,
        payload: AnalysisPayload,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            model,
            created_at: Utc::now(),
            file_name: file_name.to_string(),
            job_description_preview: preview(job_description),
            score: payload.as_score().map(|s| s.overall_score),
            payload,
        }
    }

    pub fn score(&self) -> Option<u8> {
        self.score
    }
}

fn preview(job_description: &str) -> String {
    let head: String = job_description
        .chars()
        .take(JOB_DESCRIPTION_PREVIEW_CHARS)
        .collect();
    format!("{head}...")
}
