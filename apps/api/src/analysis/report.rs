use chrono::{DateTime, Utc};

use crate::models::analysis::{AnalysisPayload, AnalysisResult};

const RULE: &str = "==================================================";

/// Plain-text report for download. Prose payloads are copied verbatim,
/// structured scores are pretty-printed JSON.
pub fn render_report(result: &AnalysisResult) -> String {
    let body = match &result.payload {
        AnalysisPayload::RenderableText(text) => text.clone(),
        AnalysisPayload::StructuredScore(score) => {
            serde_json::to_string_pretty(score).unwrap_or_default()
        }
    };

    format!(
        "ATS RESUME ANALYSIS REPORT\n\
         =========================\n\
         Analysis Type: {mode}\n\
         Date: {date}\n\
         AI Model: {model}\n\
         Resume: {file}\n\
         {RULE}\n\
         {body}\n",
        mode = result.mode.title(),
        date = result.created_at.format("%Y-%m-%d %H:%M:%S"),
        model = result.model.label(),
        file = result.file_name,
    )
}

pub fn report_file_name(now: DateTime<Utc>) -> String {
    format!("ats_report_{}.txt", now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::analysis::score::StructuredScore;
    use crate::llm_client::models::ModelId;
    use crate::models::analysis::AnalysisMode;

    #[test]
    fn test_prose_report_layout() {
        let mut result = AnalysisResult::new(
            AnalysisMode::CoverLetter,
            ModelId::Gemma2,
            "jane.pdf",
            "jd",
            AnalysisPayload::RenderableText("Dear Hiring Manager,".into()),
        );
        result.created_at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();

        let report = render_report(&result);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "ATS RESUME ANALYSIS REPORT");
        assert_eq!(lines[1], "=========================");
        assert_eq!(lines[2], "Analysis Type: Cover Letter");
        assert_eq!(lines[3], "Date: 2024-03-09 14:05:07");
        assert_eq!(lines[4], format!("AI Model: {}", ModelId::Gemma2.label()));
        assert_eq!(lines[5], "Resume: jane.pdf");
        assert_eq!(lines[6].len(), 50);
        assert_eq!(lines[7], "Dear Hiring Manager,");
    }

    #[test]
    fn test_score_report_is_indented_json() {
        let result = AnalysisResult::new(
            AnalysisMode::AtsScore,
            ModelId::default(),
            "cv.pdf",
            "jd",
            AnalysisPayload::StructuredScore(StructuredScore {
                overall_score: 64,
                ..StructuredScore::default()
            }),
        );
        let report = render_report(&result);
        assert!(report.contains("Analysis Type: ATS Score"));
        assert!(report.contains("\n  \"overall_score\": 64,"));
    }

    #[test]
    fn test_report_file_name() {
        let now = Utc.with_ymd_and_hms(2024, 11, 2, 8, 30, 0).unwrap();
        assert_eq!(report_file_name(now), "ats_report_20241102_083000.txt");
    }
}
