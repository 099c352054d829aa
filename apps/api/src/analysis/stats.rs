use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::analysis::{AnalysisMode, AnalysisResult};

/// Aggregate view over a session's history. Score figures only consider ATS
/// results whose output parsed into a structured score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryStats {
    pub total_analyses: usize,
    pub scored_analyses: usize,
    /// Mean overall score, rounded to one decimal.
    pub average_score: Option<f64>,
    pub best_score: Option<u8>,
    pub lowest_score: Option<u8>,
    /// Oldest first, for trend charts.
    pub timeline: Vec<ScorePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorePoint {
    pub created_at: DateTime<Utc>,
    pub score: u8,
}

pub fn history_stats(history: &[AnalysisResult]) -> HistoryStats {
    let timeline: Vec<ScorePoint> = history
        .iter()
        .filter(|r| r.mode == AnalysisMode::AtsScore)
        .filter_map(|r| {
            r.score().map(|score| ScorePoint {
                created_at: r.created_at,
                score,
            })
        })
        .collect();

    let scores = || timeline.iter().map(|p| p.score);
    let average_score = (!timeline.is_empty()).then(|| {
        let sum: f64 = scores().map(f64::from).sum();
        (sum / timeline.len() as f64 * 10.0).round() / 10.0
    });

    HistoryStats {
        total_analyses: history.len(),
        scored_analyses: timeline.len(),
        average_score,
        best_score: scores().max(),
        lowest_score: scores().min(),
        timeline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::score::StructuredScore;
    use crate::llm_client::models::ModelId;
    use crate::models::analysis::AnalysisPayload;

    fn ats(score: u8) -> AnalysisResult {
        AnalysisResult::new(
            AnalysisMode::AtsScore,
            ModelId::default(),
            "cv.pdf",
            "jd",
            AnalysisPayload::StructuredScore(StructuredScore {
                overall_score: score,
                ..StructuredScore::default()
            }),
        )
    }

    fn prose(mode: AnalysisMode) -> AnalysisResult {
        AnalysisResult::new(
            mode,
            ModelId::default(),
            "cv.pdf",
            "jd",
            AnalysisPayload::RenderableText("text".into()),
        )
    }

    #[test]
    fn test_average_best_and_lowest() {
        let history = vec![ats(55), ats(70), ats(90)];
        let stats = history_stats(&history);
        assert_eq!(stats.total_analyses, 3);
        assert_eq!(stats.scored_analyses, 3);
        assert_eq!(stats.average_score, Some(71.7));
        assert_eq!(stats.best_score, Some(90));
        assert_eq!(stats.lowest_score, Some(55));
        let timeline: Vec<u8> = stats.timeline.iter().map(|p| p.score).collect();
        assert_eq!(timeline, vec![55, 70, 90]);
    }

    #[test]
    fn test_unscored_results_only_count_towards_total() {
        let history = vec![
            prose(AnalysisMode::Detailed),
            ats(80),
            prose(AnalysisMode::AtsScore),
            prose(AnalysisMode::CoverLetter),
        ];
        let stats = history_stats(&history);
        assert_eq!(stats.total_analyses, 4);
        assert_eq!(stats.scored_analyses, 1);
        assert_eq!(stats.average_score, Some(80.0));
    }

    #[test]
    fn test_empty_history() {
        let stats = history_stats(&[]);
        assert_eq!(stats.total_analyses, 0);
        assert_eq!(stats.average_score, None);
        assert_eq!(stats.best_score, None);
        assert!(stats.timeline.is_empty());
    }
}
