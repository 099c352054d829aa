//! Chart-ready projections of a `StructuredScore`. The API serves these so a
//! front end can draw the gauge, radar and keyword bars without re-deriving
//! anything from the raw score.

use serde::Serialize;

use crate::analysis::score::StructuredScore;

/// Keyword bars show at most this many entries per list.
pub const KEYWORD_BAR_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Low,
    Medium,
    High,
}

impl ScoreBand {
    pub fn of(score: u8) -> Self {
        match score {
            0..=39 => ScoreBand::Low,
            40..=69 => ScoreBand::Medium,
            _ => ScoreBand::High,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    pub score: u8,
    pub band: ScoreBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarAxis {
    pub key: &'static str,
    pub label: &'static str,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordBars {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionSummary {
    pub verdict: &'static str,
    pub interview_probability: String,
    pub shortlist_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub gauge: Gauge,
    pub radar: Vec<RadarAxis>,
    pub keyword_bars: KeywordBars,
    pub suggested_keywords: Vec<String>,
    pub prediction: PredictionSummary,
    /// Improvements numbered from 1, in model order.
    pub roadmap: Vec<RoadmapStep>,
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapStep {
    pub step: usize,
    pub action: String,
}

fn axis_label(key: &str) -> &'static str {
    match key {
        "keyword_match" => "Keyword Match",
        "experience_match" => "Experience Match",
        "skills_match" => "Skills Match",
        "education_match" => "Education Match",
        "formatting" => "Formatting",
        "readability" => "Readability",
        _ => "Other",
    }
}

pub fn dashboard(score: &StructuredScore) -> DashboardView {
    let radar = score
        .breakdown
        .entries()
        .into_iter()
        .map(|(key, value)| RadarAxis {
            key,
            label: axis_label(key),
            value,
        })
        .collect();

    let top = |list: &[String]| -> Vec<String> {
        list.iter().take(KEYWORD_BAR_LIMIT).cloned().collect()
    };

    DashboardView {
        gauge: Gauge {
            score: score.overall_score,
            band: ScoreBand::of(score.overall_score),
        },
        radar,
        keyword_bars: KeywordBars {
            matched: top(&score.keywords.matched),
            missing: top(&score.keywords.missing),
        },
        suggested_keywords: score.keywords.suggested.clone(),
        prediction: PredictionSummary {
            verdict: if score.prediction.pass_ats { "PASS" } else { "FAIL" },
            interview_probability: score.prediction.interview_probability.to_string(),
            shortlist_time: score.prediction.shortlist_time.to_string(),
        },
        roadmap: score
            .improvements
            .iter()
            .enumerate()
            .map(|(i, action)| RoadmapStep {
                step: i + 1,
                action: action.clone(),
            })
            .collect(),
        tips: score.ats_optimization_tips.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::score::{Breakdown, Keywords};

    #[test]
    fn test_band_boundaries() {
        assert_eq!(ScoreBand::of(0), ScoreBand::Low);
        assert_eq!(ScoreBand::of(39), ScoreBand::Low);
        assert_eq!(ScoreBand::of(40), ScoreBand::Medium);
        assert_eq!(ScoreBand::of(69), ScoreBand::Medium);
        assert_eq!(ScoreBand::of(70), ScoreBand::High);
        assert_eq!(ScoreBand::of(100), ScoreBand::High);
    }

    #[test]
    fn test_dashboard_projects_score() {
        let score = StructuredScore {
            overall_score: 72,
            breakdown: Breakdown {
                keyword_match: 80,
                ..Breakdown::default()
            },
            keywords: Keywords {
                matched: (1..=12).map(|i| format!("kw{i}")).collect(),
                missing: vec!["Docker".into()],
                suggested: vec!["Terraform".into()],
            },
            improvements: vec!["Add metrics".into(), "Mention AWS".into()],
            ..StructuredScore::default()
        };

        let view = dashboard(&score);
        assert_eq!(view.gauge.band, ScoreBand::High);
        assert_eq!(view.radar.len(), 6);
        assert_eq!(view.radar[0].label, "Keyword Match");
        assert_eq!(view.radar[0].value, 80);
        assert_eq!(view.keyword_bars.matched.len(), KEYWORD_BAR_LIMIT);
        assert_eq!(view.keyword_bars.matched[9], "kw10");
        assert_eq!(view.keyword_bars.missing, vec!["Docker"]);
        assert_eq!(view.prediction.verdict, "FAIL");
        assert_eq!(view.prediction.interview_probability, "N/A");
        assert_eq!(view.prediction.shortlist_time, "N/A");
        assert_eq!(view.roadmap[1].step, 2);
        assert_eq!(view.roadmap[1].action, "Mention AWS");
    }
}
