// All LLM prompt constants for the analysis modes, plus the pure builder that
// fills them. Templates use `{job_description}` and `{resume_text}`.

use crate::extraction::truncate_chars;
use crate::models::analysis::AnalysisMode;

/// Character limits applied before interpolation: (job description, resume).
/// `None` keeps the input whole.
pub fn truncation_limits(mode: AnalysisMode) -> (Option<usize>, Option<usize>) {
    match mode {
        AnalysisMode::Detailed => (Some(2000), Some(2000)),
        AnalysisMode::AtsScore => (Some(1000), Some(1000)),
        AnalysisMode::CoverLetter => (None, Some(1500)),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Detailed report
// ────────────────────────────────────────────────────────────────────────────

pub const DETAILED_SYSTEM: &str = "You are an expert HR Director with 20+ years experience in tech recruitment. \
    You analyze resumes against job descriptions with exceptional detail and accuracy. \
    Always provide actionable, specific feedback.";

pub const DETAILED_PROMPT_TEMPLATE: &str = r#"# COMPREHENSIVE RESUME ANALYSIS REPORT

## JOB DESCRIPTION ANALYSIS:
{job_description}

## RESUME CONTENT:
{resume_text}

## PLEASE PROVIDE:

### 1. EXECUTIVE SUMMARY
- Overall Match Score: [0-100]%
- One-line verdict
- Confidence level: High/Medium/Low

### 2. QUANTITATIVE ASSESSMENT
**Skills Match:**
- Technical Skills Alignment: [X/10]
- Soft Skills Match: [X/10]
- Tools & Technologies: [X/10]

**Experience Evaluation:**
- Years of Relevant Experience: [X] vs Required: [Y]
- Role Relevance: [X/10]
- Industry Experience: [X/10]

### 3. STRENGTHS IDENTIFIED
[List 5-7 specific strengths with examples from resume]

### 4. AREAS FOR IMPROVEMENT
[List 5-7 specific gaps with actionable solutions]

### 5. KEYWORD ANALYSIS
- Top 10 Matching Keywords: [list]
- Top 10 Missing Keywords: [list]
- Keyword Density Score: [X/10]

### 6. ATS OPTIMIZATION SCORE: [0-100]
- Formatting: [X/10]
- Readability: [X/10]
- ATS Compliance: [X/10]

### 7. HIRING PROBABILITY PREDICTION
- Pass ATS Screening: Yes/No/Maybe
- Likelihood of Interview: High/Medium/Low
- Estimated Shortlist Time: Immediate/1-3 days/1 week+

### 8. ACTIONABLE RECOMMENDATIONS
[Top 5 specific actions to improve resume]

### 9. COVER LETTER TIPS
[3 key points to highlight in cover letter]

### 10. FINAL VERDICT & NEXT STEPS

Format with emojis, bold headings, and clear bullet points."#;

// ────────────────────────────────────────────────────────────────────────────
// ATS score (JSON only)
// ────────────────────────────────────────────────────────────────────────────

pub const ATS_SYSTEM: &str = "You are an ATS (Applicant Tracking System) algorithm expert. \
    You analyze resumes strictly like an ATS would. \
    Be objective, numerical, and data-driven.";

/// Field names here must match `StructuredScore`.
pub const ATS_PROMPT_TEMPLATE: &str = r#"Generate ONLY a JSON response for ATS analysis:

JOB DESCRIPTION:
{job_description}

RESUME CONTENT:
{resume_text}

Return this EXACT JSON structure:
{
    "overall_score": 0-100,
    "breakdown": {
        "keyword_match": 0-100,
        "experience_match": 0-100,
        "skills_match": 0-100,
        "education_match": 0-100,
        "formatting": 0-100,
        "readability": 0-100
    },
    "prediction": {
        "pass_ats": true/false,
        "interview_probability": "High/Medium/Low",
        "shortlist_time": "Immediate/1-3 days/1 week+"
    },
    "keywords": {
        "matched": ["keyword1", "keyword2", "keyword3", "keyword4", "keyword5"],
        "missing": ["keyword1", "keyword2", "keyword3", "keyword4", "keyword5"],
        "suggested": ["keyword1", "keyword2", "keyword3"]
    },
    "improvements": [
        "Improvement 1",
        "Improvement 2",
        "Improvement 3",
        "Improvement 4",
        "Improvement 5"
    ],
    "ats_optimization_tips": [
        "Tip 1",
        "Tip 2",
        "Tip 3"
    ]
}"#;

// ────────────────────────────────────────────────────────────────────────────
// Cover letter
// ────────────────────────────────────────────────────────────────────────────

pub const COVER_LETTER_SYSTEM: &str =
    "You are a professional cover letter writer specializing in tech roles. \
    Write compelling, personalized cover letters that get interviews.";

pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a professional cover letter based on:

JOB DESCRIPTION:
{job_description}

RESUME CONTENT:
{resume_text}

Format:
1. Professional header with date and contact info
2. Appropriate salutation
3. Strong opening paragraph showing enthusiasm
4. 2-3 body paragraphs matching skills to job requirements
5. Specific examples from resume
6. Closing paragraph expressing interest
7. Professional sign-off

Make it:
- Specific to this job
- Confident but not arrogant
- 250-350 words
- Professional tone"#;

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Renders the prompt pair for `mode`. Pure: no I/O, same inputs give the
/// same output.
pub fn build_prompt(mode: AnalysisMode, job_description: &str, resume_text: &str) -> PromptPair {
    let (system, template) = match mode {
        AnalysisMode::Detailed => (DETAILED_SYSTEM, DETAILED_PROMPT_TEMPLATE),
        AnalysisMode::AtsScore => (ATS_SYSTEM, ATS_PROMPT_TEMPLATE),
        AnalysisMode::CoverLetter => (COVER_LETTER_SYSTEM, COVER_LETTER_PROMPT_TEMPLATE),
    };
    let (jd_limit, resume_limit) = truncation_limits(mode);

    let job_description = limit(job_description, jd_limit);
    let resume_text = limit(resume_text, resume_limit);

    PromptPair {
        system: system.to_string(),
        user: render(
            template,
            &[
                ("{job_description}", job_description),
                ("{resume_text}", resume_text),
            ],
        ),
    }
}

fn limit(text: &str, max: Option<usize>) -> &str {
    match max {
        Some(max) => truncate_chars(text, max),
        None => text,
    }
}

/// Single-pass placeholder substitution. Text coming from a value is never
/// scanned again, so a resume containing `{job_description}` stays literal.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + values.iter().map(|v| v.1.len()).sum::<usize>());
    let mut rest = template;

    'scan: while let Some(brace) = rest.find('{') {
        out.push_str(&rest[..brace]);
        let candidate = &rest[brace..];
        for (placeholder, value) in values {
            if candidate.starts_with(placeholder) {
                out.push_str(value);
                rest = &candidate[placeholder.len()..];
                continue 'scan;
            }
        }
        out.push('{');
        rest = &candidate[1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn between<'a>(text: &'a str, start: &str, end: &str) -> &'a str {
        let from = text.find(start).unwrap() + start.len();
        let to = from + text[from..].find(end).unwrap();
        &text[from..to]
    }

    #[test]
    fn test_build_is_deterministic() {
        for mode in [
            AnalysisMode::Detailed,
            AnalysisMode::AtsScore,
            AnalysisMode::CoverLetter,
        ] {
            assert_eq!(
                build_prompt(mode, "Rust engineer", "Jane Doe"),
                build_prompt(mode, "Rust engineer", "Jane Doe")
            );
        }
    }

    #[test]
    fn test_detailed_truncates_both_to_2000() {
        let jd = "j".repeat(3000);
        let resume = "r".repeat(3000);
        let prompt = build_prompt(AnalysisMode::Detailed, &jd, &resume);
        assert_eq!(prompt.system, DETAILED_SYSTEM);
        assert!(prompt.user.contains(&"j".repeat(2000)));
        assert!(!prompt.user.contains(&"j".repeat(2001)));
        assert!(prompt.user.contains(&"r".repeat(2000)));
        assert!(!prompt.user.contains(&"r".repeat(2001)));
    }

    #[test]
    fn test_ats_truncates_both_to_1000() {
        let jd = "j".repeat(1500);
        let resume = "r".repeat(1500);
        let prompt = build_prompt(AnalysisMode::AtsScore, &jd, &resume);
        let jd_part = between(&prompt.user, "JOB DESCRIPTION:\n", "\n\nRESUME CONTENT:");
        let resume_part = between(&prompt.user, "RESUME CONTENT:\n", "\n\nReturn this");
        assert_eq!(jd_part.chars().count(), 1000);
        assert_eq!(resume_part.chars().count(), 1000);
    }

    #[test]
    fn test_cover_letter_keeps_full_jd_and_1500_resume() {
        let jd = "j".repeat(5000);
        let resume = "r".repeat(5000);
        let prompt = build_prompt(AnalysisMode::CoverLetter, &jd, &resume);
        let jd_part = between(&prompt.user, "JOB DESCRIPTION:\n", "\n\nRESUME CONTENT:");
        let resume_part = between(&prompt.user, "RESUME CONTENT:\n", "\n\nFormat:");
        assert_eq!(jd_part.len(), 5000);
        assert_eq!(resume_part.len(), 1500);
        assert_eq!(prompt.system, COVER_LETTER_SYSTEM);
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let jd = "é".repeat(1200);
        let prompt = build_prompt(AnalysisMode::AtsScore, &jd, "cv");
        let jd_part = between(&prompt.user, "JOB DESCRIPTION:\n", "\n\nRESUME CONTENT:");
        assert_eq!(jd_part.chars().count(), 1000);
    }

    #[test]
    fn test_ats_prompt_spells_out_score_fields() {
        let prompt = build_prompt(AnalysisMode::AtsScore, "jd", "cv");
        for field in [
            "\"overall_score\": 0-100",
            "\"keyword_match\": 0-100",
            "\"education_match\": 0-100",
            "\"pass_ats\": true/false",
            "\"interview_probability\"",
            "\"shortlist_time\"",
            "\"suggested\"",
            "\"ats_optimization_tips\"",
        ] {
            assert!(prompt.user.contains(field), "missing {field}");
        }
        assert!(prompt.user.starts_with("Generate ONLY a JSON response"));
    }

    #[test]
    fn test_placeholders_in_input_are_not_expanded() {
        let prompt = build_prompt(
            AnalysisMode::Detailed,
            "Needs {resume_text} literally",
            "Resume mentions {job_description}",
        );
        assert!(prompt.user.contains("Needs {resume_text} literally"));
        assert!(prompt.user.contains("Resume mentions {job_description}"));
    }

    #[test]
    fn test_render_keeps_unknown_braces() {
        assert_eq!(
            render("{a} {b} {", &[("{a}", "1")]),
            "1 {b} {".to_string()
        );
    }
}
