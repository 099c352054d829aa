//! Response Interpreter: turns raw model output into an `AnalysisPayload`.
//!
//! Prose modes pass through untouched. ATS mode looks for the first balanced
//! `{...}` span (models like to wrap JSON in commentary or code fences) and
//! parses it as a `StructuredScore`. Nothing here fails: unparseable output
//! falls back to the raw text with a warning for the caller.

use serde::Serialize;
use tracing::warn;

use crate::analysis::score::StructuredScore;
use crate::models::analysis::{AnalysisMode, AnalysisPayload};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interpretation {
    pub payload: AnalysisPayload,
    /// Non-fatal notice, set when ATS output had to fall back to raw text.
    pub warning: Option<String>,
}

pub fn interpret(mode: AnalysisMode, raw: &str) -> Interpretation {
    match mode {
        AnalysisMode::Detailed | AnalysisMode::CoverLetter => Interpretation {
            payload: AnalysisPayload::RenderableText(raw.to_string()),
            warning: None,
        },
        AnalysisMode::AtsScore => match parse_score(raw) {
            Ok(score) => Interpretation {
                payload: AnalysisPayload::StructuredScore(score),
                warning: None,
            },
            Err(reason) => {
                warn!("ATS response fell back to raw text: {reason}");
                Interpretation {
                    payload: AnalysisPayload::RenderableText(raw.to_string()),
                    warning: Some(format!("Could not parse JSON: {reason}")),
                }
            }
        },
    }
}

fn parse_score(raw: &str) -> Result<StructuredScore, String> {
    let span = first_json_object(raw)
        .ok_or_else(|| "no complete JSON object found in response".to_string())?;
    serde_json::from_str::<StructuredScore>(span).map_err(|e| e.to_string())
}

/// Returns the first complete brace-balanced span in `text`.
///
/// Braces inside JSON string literals (including escaped quotes) do not count.
/// An opening brace that is never closed is skipped and the scan restarts at
/// the next one, so a stray `{` in commentary does not hide a later object.
pub fn first_json_object(text: &str) -> Option<&str> {
    let mut from = 0;
    while let Some(offset) = text[from..].find('{') {
        let start = from + offset;
        if let Some(len) = balanced_len(&text[start..]) {
            return Some(&text[start..start + len]);
        }
        from = start + 1;
    }
    None
}

/// Byte length of the balanced object opening at the start of `text`, or
/// `None` when input ends before it closes.
fn balanced_len(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset + ch.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::score::{Breakdown, InterviewProbability, Keywords, Prediction};

    #[test]
    fn test_prose_modes_pass_through() {
        let raw = "# Report\n{not json}";
        for mode in [AnalysisMode::Detailed, AnalysisMode::CoverLetter] {
            let result = interpret(mode, raw);
            assert_eq!(result.payload, AnalysisPayload::RenderableText(raw.to_string()));
            assert!(result.warning.is_none());
        }
    }

    #[test]
    fn test_ats_json_inside_commentary_with_defaults() {
        let raw = "Here is the result: {\"overall_score\": 72, \"breakdown\": {\"keyword_match\": 80}} Thanks!";
        let result = interpret(AnalysisMode::AtsScore, raw);
        let score = result.payload.as_score().expect("structured score");
        assert_eq!(score.overall_score, 72);
        assert_eq!(score.breakdown.keyword_match, 80);
        assert_eq!(score.breakdown.experience_match, 0);
        assert_eq!(score.breakdown.education_match, 0);
        assert!(score.keywords.matched.is_empty());
        assert!(result.warning.is_none());
    }

    #[test]
    fn test_ats_wrong_typed_section_keeps_structured_score() {
        let raw = r#"{"overall_score": 72, "breakdown": "see above", "keywords": {"missing": ["Docker"]}}"#;
        let result = interpret(AnalysisMode::AtsScore, raw);
        assert!(result.warning.is_none());
        let score = result.payload.as_score().expect("structured score");
        assert_eq!(score.overall_score, 72);
        assert_eq!(score.breakdown, Breakdown::default());
        assert_eq!(score.keywords.missing, vec!["Docker"]);
    }

    #[test]
    fn test_ats_without_json_falls_back_to_text() {
        let raw = "Sorry, I cannot score this resume.";
        let result = interpret(AnalysisMode::AtsScore, raw);
        assert_eq!(result.payload, AnalysisPayload::RenderableText(raw.to_string()));
        assert!(result.warning.unwrap().starts_with("Could not parse JSON"));
    }

    #[test]
    fn test_ats_malformed_json_falls_back_to_text() {
        let raw = "```json\n{\"overall_score\": 72, \"breakdown\": {\"keyword_match\": }}\n```";
        let result = interpret(AnalysisMode::AtsScore, raw);
        assert_eq!(result.payload, AnalysisPayload::RenderableText(raw.to_string()));
        assert!(result.warning.is_some());
    }

    #[test]
    fn test_ats_unclosed_json_falls_back_to_text() {
        let raw = "{\"overall_score\": 72, \"breakdown\": {";
        let result = interpret(AnalysisMode::AtsScore, raw);
        assert!(result.payload.as_score().is_none());
        assert!(result.warning.is_some());
    }

    #[test]
    fn test_ats_wellformed_score_survives_wrapping() {
        let score = StructuredScore {
            overall_score: 64,
            breakdown: Breakdown {
                keyword_match: 60,
                experience_match: 70,
                skills_match: 55,
                education_match: 90,
                formatting: 80,
                readability: 75,
            },
            prediction: Prediction {
                pass_ats: false,
                interview_probability: InterviewProbability::Low,
                ..Prediction::default()
            },
            keywords: Keywords {
                matched: vec!["REST {API}".into()],
                missing: vec!["AWS".into(), "Docker".into()],
                suggested: vec![],
            },
            improvements: vec!["Add a \"Skills\" section".into()],
            ats_optimization_tips: vec![],
        };
        let raw = format!(
            "Analysis below.\n```json\n{}\n```\nLet me know {{if}} you need more.",
            serde_json::to_string_pretty(&score).unwrap()
        );
        let result = interpret(AnalysisMode::AtsScore, &raw);
        assert_eq!(result.payload, AnalysisPayload::StructuredScore(score));
    }

    #[test]
    fn test_first_json_object_picks_first_balanced_span() {
        let text = r#"a {"x": {"y": 1}} b {"z": 2}"#;
        assert_eq!(first_json_object(text), Some(r#"{"x": {"y": 1}}"#));
    }

    #[test]
    fn test_first_json_object_ignores_braces_in_strings() {
        let text = r#"{"note": "use } and \" carefully {"} tail }"#;
        assert_eq!(
            first_json_object(text),
            Some(r#"{"note": "use } and \" carefully {"}"#)
        );
    }

    #[test]
    fn test_stray_brace_before_json_is_skipped() {
        let raw = "Scores use the {0-100 scale. {\"overall_score\": 72, \"breakdown\": {\"keyword_match\": 80}}";
        assert_eq!(
            first_json_object(raw),
            Some("{\"overall_score\": 72, \"breakdown\": {\"keyword_match\": 80}}")
        );

        let result = interpret(AnalysisMode::AtsScore, raw);
        assert!(result.warning.is_none());
        let score = result.payload.as_score().expect("structured score");
        assert_eq!(score.overall_score, 72);
        assert_eq!(score.breakdown.keyword_match, 80);
    }

    #[test]
    fn test_first_json_object_none_without_braces() {
        assert_eq!(first_json_object("plain text"), None);
        assert_eq!(first_json_object("{ never closed"), None);
    }
}
