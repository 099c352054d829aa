//! Session Store: one isolated workspace per user.
//!
//! A `Session` holds the API key, the job description, the cached resume and
//! the analysis history. The registry hands out `Arc<Mutex<Session>>` so
//! handlers lock only while reading inputs or writing results; the lock is
//! never held across a model call.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::ApiKey;
use crate::models::analysis::AnalysisResult;
use crate::models::resume::ResumeDocument;

pub mod demo;
pub mod handlers;

/// Why an analysis cannot start yet. Each message tells the user what to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PreconditionFailure {
    #[error("Please enter your API key first")]
    MissingApiKey,
    #[error("Please upload your resume first")]
    MissingResume,
    #[error("Please enter a job description first")]
    MissingJobDescription,
    #[error(
        "No text could be extracted from the uploaded resume. \
         Please ensure the PDF has selectable text (not a scanned image)"
    )]
    UnreadableResume,
}

/// Inputs copied out of a session so the model call can run unlocked.
#[derive(Debug, Clone)]
pub struct ReadyInputs {
    pub api_key: ApiKey,
    pub job_description: String,
    pub resume_text: String,
    pub file_name: String,
}

#[derive(Debug, Default)]
pub struct Session {
    pub api_key: Option<ApiKey>,
    pub job_description: String,
    pub resume: Option<ResumeDocument>,
    current: Option<Uuid>,
    history: Vec<AnalysisResult>,
}

impl Session {
    /// Resets everything, including the stored key.
    pub fn clear(&mut self) {
        *self = Session::default();
    }

    /// Appends to history and makes the result current.
    pub fn record(&mut self, result: AnalysisResult) {
        self.current = Some(result.id);
        self.history.push(result);
    }

    pub fn current(&self) -> Option<&AnalysisResult> {
        self.current.and_then(|id| self.find(id))
    }

    pub fn history(&self) -> &[AnalysisResult] {
        &self.history
    }

    pub fn find(&self, id: Uuid) -> Option<&AnalysisResult> {
        self.history.iter().find(|r| r.id == id)
    }

    /// Makes a past result current again.
    pub fn load(&mut self, id: Uuid) -> Option<&AnalysisResult> {
        let index = self.history.iter().position(|r| r.id == id)?;
        self.current = Some(id);
        self.history.get(index)
    }

    /// Removes a result from history, clearing `current` if it pointed there.
    pub fn remove(&mut self, id: Uuid) -> Option<AnalysisResult> {
        let index = self.history.iter().position(|r| r.id == id)?;
        if self.current == Some(id) {
            self.current = None;
        }
        Some(self.history.remove(index))
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    /// Checks, in order: API key, resume, job description, usable resume text.
    pub fn check_ready(&self) -> Result<ReadyInputs, PreconditionFailure> {
        let api_key = self
            .api_key
            .clone()
            .ok_or(PreconditionFailure::MissingApiKey)?;
        let resume = self
            .resume
            .as_ref()
            .ok_or(PreconditionFailure::MissingResume)?;
        if self.job_description.trim().is_empty() {
            return Err(PreconditionFailure::MissingJobDescription);
        }
        let resume_text = resume.text().ok_or(PreconditionFailure::UnreadableResume)?;

        Ok(ReadyInputs {
            api_key,
            job_description: self.job_description.clone(),
            resume_text: resume_text.to_string(),
            file_name: resume.file_name().to_string(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────────────────────────────────────

pub type SharedSession = Arc<Mutex<Session>>;

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SharedSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(Session::default())));
        info!("Session {id} created");
        id
    }

    pub async fn get(&self, id: Uuid) -> Result<SharedSession, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| info!("Session {id} removed"))
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
