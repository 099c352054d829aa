//! StructuredScore: the JSON shape the ATS prompt asks the model for.
//!
//! Every field is optional on the wire. Missing fields take defaults (0, empty
//! list, `false`, "N/A") so consumers never see an undefined value. Scores are
//! rounded and clamped into 0–100 on the way in.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredScore {
    #[serde(deserialize_with = "score_0_100")]
    pub overall_score: u8,
    #[serde(deserialize_with = "object_or_default")]
    pub breakdown: Breakdown,
    #[serde(deserialize_with = "object_or_default")]
    pub prediction: Prediction,
    #[serde(deserialize_with = "object_or_default")]
    pub keywords: Keywords,
    #[serde(deserialize_with = "string_list")]
    pub improvements: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub ats_optimization_tips: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakdown {
    #[serde(deserialize_with = "score_0_100")]
    pub keyword_match: u8,
    #[serde(deserialize_with = "score_0_100")]
    pub experience_match: u8,
    #[serde(deserialize_with = "score_0_100")]
    pub skills_match: u8,
    #[serde(deserialize_with = "score_0_100")]
    pub education_match: u8,
    #[serde(deserialize_with = "score_0_100")]
    pub formatting: u8,
    #[serde(deserialize_with = "score_0_100")]
    pub readability: u8,
}

impl Breakdown {
    /// Named sub-scores in prompt order, keyed by their wire names.
    pub fn entries(&self) -> [(&'static str, u8); 6] {
        [
            ("keyword_match", self.keyword_match),
            ("experience_match", self.experience_match),
            ("skills_match", self.skills_match),
            ("education_match", self.education_match),
            ("formatting", self.formatting),
            ("readability", self.readability),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prediction {
    #[serde(deserialize_with = "lenient_bool")]
    pub pass_ats: bool,
    pub interview_probability: InterviewProbability,
    pub shortlist_time: ShortlistTime,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keywords {
    #[serde(deserialize_with = "string_list")]
    pub matched: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub missing: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub suggested: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Prediction enums
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InterviewProbability {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl InterviewProbability {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewProbability::High => "High",
            InterviewProbability::Medium => "Medium",
            InterviewProbability::Low => "Low",
            InterviewProbability::Unknown => "N/A",
        }
    }

    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => InterviewProbability::High,
            "medium" => InterviewProbability::Medium,
            "low" => InterviewProbability::Low,
            _ => InterviewProbability::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShortlistTime {
    Immediate,
    OneToThreeDays,
    OneWeekPlus,
    #[default]
    Unknown,
}

impl ShortlistTime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShortlistTime::Immediate => "Immediate",
            ShortlistTime::OneToThreeDays => "1-3 days",
            ShortlistTime::OneWeekPlus => "1 week+",
            ShortlistTime::Unknown => "N/A",
        }
    }

    fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "immediate" | "immediately" => ShortlistTime::Immediate,
            "1-3days" | "1-3day" => ShortlistTime::OneToThreeDays,
            "1week+" | "1weekplus" | "1+week" | "1+weeks" => ShortlistTime::OneWeekPlus,
            _ => ShortlistTime::Unknown,
        }
    }
}

macro_rules! string_enum_serde {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = Value::deserialize(deserializer)?;
                Ok(value.as_str().map(<$ty>::parse).unwrap_or_default())
            }
        }
    };
}

string_enum_serde!(InterviewProbability);
string_enum_serde!(ShortlistTime);

// ────────────────────────────────────────────────────────────────────────────
// Lenient field deserializers
// ────────────────────────────────────────────────────────────────────────────

/// Nested sections: `null`, a missing key, or a value of the wrong shape (a
/// string or array where an object belongs) all become `T::default()`.
fn object_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Accepts integers, floats and numeric strings ("85", "85%"). Anything else
/// becomes 0.
fn score_0_100<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.map(clamp_score).unwrap_or(0))
}

pub fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "pass"
        ),
        _ => false,
    })
}

/// Keeps string items; numbers are stringified; other items and non-array
/// values are dropped.
fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect())
}
