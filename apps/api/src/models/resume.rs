use serde::{Deserialize, Serialize};

use crate::extraction::{Extraction, ExtractionOutcome};

/// Metadata reported for an uploaded file. `page_count` is `None` when neither
/// page reader could open the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileStats {
    pub file_name: String,
    pub size_mb: f64,
    pub page_count: Option<u32>,
}

/// A resume held by a session. The uploaded bytes are dropped once extraction
/// has run; only the derived text and metadata are kept.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub stats: FileStats,
    pub extraction: ExtractionOutcome,
}

impl ResumeDocument {
    pub fn from_extraction(stats: FileStats, extraction: Extraction) -> Self {
        Self {
            stats,
            extraction: extraction.outcome,
        }
    }

    /// Usable resume text, or `None` when extraction only produced a warning.
    pub fn text(&self) -> Option<&str> {
        match &self.extraction {
            ExtractionOutcome::Text(text) => Some(text),
            ExtractionOutcome::Warning(_) => None,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.stats.file_name
    }
}
