//! Resume text extraction: an ordered cascade of PDF text strategies.
//!
//! Flow: stage bytes to a temp file → run strategies in order while the
//! accumulated text is thin → truncate or downgrade to a warning.
//!
//! Extraction never returns an error. Failure is reported through
//! `ExtractionOutcome::Warning` plus one `StageReport` per attempted stage.

use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

pub mod inspect;
pub mod strategies;

#[cfg(test)]
pub(crate) mod fixtures;

use strategies::{default_strategies, ExtractionStrategy};

/// Later stages run only while fewer non-whitespace characters than this have
/// been accumulated.
pub const CASCADE_THRESHOLD: usize = 100;
/// Below this many non-whitespace characters the PDF is treated as unreadable.
pub const MIN_TEXT_CHARS: usize = 50;
/// Cap on the text kept per resume.
pub const MAX_TEXT_CHARS: usize = 5000;

pub const NO_TEXT_WARNING: &str =
    "Could not extract text. Please ensure PDF has selectable text (not scanned image).";

// ────────────────────────────────────────────────────────────────────────────
// Result types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    Text(String),
    Warning(String),
}

impl ExtractionOutcome {
    pub fn is_warning(&self) -> bool {
        matches!(self, ExtractionOutcome::Warning(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageStatus {
    Yielded { chars: usize },
    Failed { reason: String },
}

/// What a single cascade stage did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub stage: &'static str,
    #[serde(flatten)]
    pub status: StageStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub outcome: ExtractionOutcome,
    pub attempts: Vec<StageReport>,
}

/// Input handed to every strategy. `path` is `None` when the bytes could not
/// be staged to disk.
pub struct PdfSource<'a> {
    pub bytes: &'a [u8],
    pub path: Option<&'a Path>,
}

// ────────────────────────────────────────────────────────────────────────────
// Cascade
// ────────────────────────────────────────────────────────────────────────────

/// Extracts resume text from raw PDF bytes using the default strategy order.
pub fn extract(bytes: &[u8]) -> Extraction {
    extract_with(bytes, &default_strategies())
}

/// Stages `bytes` to a temp file, runs the cascade, and removes the file.
/// The file is owned by `NamedTempFile` and deleted on drop, on every path.
pub fn extract_with(bytes: &[u8], strategies: &[Box<dyn ExtractionStrategy>]) -> Extraction {
    let staged = stage_to_tempfile(bytes);
    if let Err(e) = &staged {
        warn!("Could not stage PDF to a temp file, path-based stages will fail: {e}");
    }

    let source = PdfSource {
        bytes,
        path: staged.as_ref().ok().map(|f| f.path()),
    };
    let extraction = run_cascade(&source, strategies);

    drop(staged);
    extraction
}

fn stage_to_tempfile(bytes: &[u8]) -> std::io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("resume-")
        .suffix(".pdf")
        .tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file)
}

/// Runs strategies in order, appending each stage's text to the accumulator
/// until it holds `CASCADE_THRESHOLD` non-whitespace characters.
///
/// Third-party PDF parsers can panic on malformed input; a panic inside a
/// stage is recorded as that stage's failure.
pub fn run_cascade(source: &PdfSource<'_>, strategies: &[Box<dyn ExtractionStrategy>]) -> Extraction {
    let mut text = String::new();
    let mut attempts = Vec::with_capacity(strategies.len());

    for strategy in strategies {
        if non_whitespace_len(&text) >= CASCADE_THRESHOLD {
            break;
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| strategy.extract(source)))
            .unwrap_or_else(|_| Err(format!("{} extractor panicked", strategy.name())));

        let status = match result {
            Ok(stage_text) => {
                let chars = non_whitespace_len(&stage_text);
                debug!("Extraction stage '{}' yielded {chars} chars", strategy.name());
                text.push_str(&stage_text);
                StageStatus::Yielded { chars }
            }
            Err(reason) => {
                warn!("Extraction stage '{}' failed: {reason}", strategy.name());
                StageStatus::Failed { reason }
            }
        };
        attempts.push(StageReport {
            stage: strategy.name(),
            status,
        });
    }

    let total = non_whitespace_len(&text);
    let outcome = if total < MIN_TEXT_CHARS {
        info!("PDF yielded only {total} chars after {} stages", attempts.len());
        ExtractionOutcome::Warning(NO_TEXT_WARNING.to_string())
    } else {
        ExtractionOutcome::Text(truncate_chars(&text, MAX_TEXT_CHARS).to_string())
    };

    Extraction { outcome, attempts }
}

pub fn non_whitespace_len(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Returns the first `max` characters of `text` (not bytes).
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
