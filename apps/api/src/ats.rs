//! ATS check: quick keyword, achievement and length score for a single resume.
//!
//! Independent of the topic model: a resume can be checked without being
//! added to the corpus.
//!
//! total = 0.4 × keyword + 0.3 × achievement + 0.3 × length, each on 0–100.

use serde::Serialize;

const TECH_KEYWORDS: &[&str] = &[
    "data analysis",
    "machine learning",
    "sql",
    "python",
    "data visualization",
    "statistical analysis",
    "deep learning",
    "ai",
    "algorithm",
    "data science",
    "tensorflow",
    "keras",
    "pandas",
    "numpy",
    "scikit-learn",
    "jupyter",
];

const ACHIEVEMENT_KEYWORDS: &[&str] = &[
    "increased",
    "improved",
    "reduced",
    "optimized",
    "developed",
    "implemented",
    "designed",
    "led",
    "managed",
    "created",
];

const TARGET_WORD_COUNT: f64 = 500.0;
const KEYWORD_WEIGHT: f64 = 0.4;
const ACHIEVEMENT_WEIGHT: f64 = 0.3;
const LENGTH_WEIGHT: f64 = 0.3;
const ADVISORY_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingSeverity {
    Critical,
    Warning,
    Positive,
}

#[derive(Debug, Clone, Serialize)]
pub struct AtsFinding {
    pub title: String,
    pub message: String,
    pub severity: FindingSeverity,
}

#[derive(Debug, Clone, Serialize)]
pub struct AtsReport {
    pub total_score: f64,
    pub keyword_match: f64,
    pub achievements: f64,
    pub resume_length: f64,
    pub word_count: usize,
    pub matched_keywords: Vec<String>,
    pub findings: Vec<AtsFinding>,
}

/// Scores resume text. Keywords match as case-insensitive substrings.
pub fn analyze(resume_text: &str) -> AtsReport {
    let lowered = resume_text.to_lowercase();

    let matched_keywords: Vec<String> = TECH_KEYWORDS
        .iter()
        .filter(|kw| lowered.contains(*kw))
        .map(|kw| kw.to_string())
        .collect();
    let achievement_hits = ACHIEVEMENT_KEYWORDS
        .iter()
        .filter(|kw| lowered.contains(*kw))
        .count();
    let word_count = resume_text.split_whitespace().count();

    let keyword_match = percent(matched_keywords.len() as f64, TECH_KEYWORDS.len() as f64);
    let achievements = percent(achievement_hits as f64, ACHIEVEMENT_KEYWORDS.len() as f64);
    let resume_length = percent(word_count as f64, TARGET_WORD_COUNT);

    let total_score = keyword_match * KEYWORD_WEIGHT
        + achievements * ACHIEVEMENT_WEIGHT
        + resume_length * LENGTH_WEIGHT;

    let findings = findings(keyword_match, achievements, word_count, &matched_keywords);

    AtsReport {
        total_score: round2(total_score),
        keyword_match: round2(keyword_match),
        achievements: round2(achievements),
        resume_length: round2(resume_length),
        word_count,
        matched_keywords,
        findings,
    }
}

fn findings(
    keyword_match: f64,
    achievements: f64,
    word_count: usize,
    matched: &[String],
) -> Vec<AtsFinding> {
    let mut findings = Vec::new();

    if keyword_match < ADVISORY_THRESHOLD {
        let missing: Vec<&str> = TECH_KEYWORDS
            .iter()
            .copied()
            .filter(|kw| !matched.iter().any(|m| m == kw))
            .collect();
        findings.push(AtsFinding {
            title: "Missing key industry keywords".to_string(),
            message: format!("Add keywords like: {}", missing.join(", ")),
            severity: FindingSeverity::Critical,
        });
    }

    if achievements < ADVISORY_THRESHOLD {
        findings.push(AtsFinding {
            title: "Weak achievement descriptions".to_string(),
            message: "Use more quantitative achievement language".to_string(),
            severity: FindingSeverity::Warning,
        });
    }

    if word_count as f64 > TARGET_WORD_COUNT {
        findings.push(AtsFinding {
            title: "Strong resume content".to_string(),
            message: "Your resume has comprehensive content".to_string(),
            severity: FindingSeverity::Positive,
        });
    }

    findings
}

fn percent(hits: f64, total: f64) -> f64 {
    (hits / total * 100.0).min(100.0)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_scores_zero_with_advice() {
        let report = analyze("");
        assert_eq!(report.total_score, 0.0);
        assert!(report.matched_keywords.is_empty());
        assert_eq!(report.findings.len(), 2);
        assert_eq!(report.findings[0].severity, FindingSeverity::Critical);
        assert!(report.findings[0].message.contains("python"));
    }

    #[test]
    fn test_weighted_total() {
        // 4/16 keywords = 25, 2/10 achievements = 20, 9 words = 1.8
        let text = "Python SQL Pandas NumPy expert; developed and designed things";
        let report = analyze(text);
        assert_eq!(report.keyword_match, 25.0);
        assert_eq!(report.achievements, 20.0);
        assert_eq!(report.word_count, 9);
        assert_eq!(report.resume_length, 1.8);
        assert_eq!(report.total_score, round2(25.0 * 0.4 + 20.0 * 0.3 + 1.8 * 0.3));
    }

    #[test]
    fn test_keywords_match_as_substrings_case_insensitively() {
        let report = analyze("MACHINE LEARNING with TensorFlow");
        assert!(report.matched_keywords.contains(&"machine learning".to_string()));
        assert!(report.matched_keywords.contains(&"tensorflow".to_string()));
        assert!(analyze("maintained").matched_keywords.contains(&"ai".to_string()));
    }

    #[test]
    fn test_long_resume_gets_positive_finding_and_capped_length() {
        let text = "word ".repeat(600);
        let report = analyze(&text);
        assert_eq!(report.resume_length, 100.0);
        assert!(report
            .findings
            .iter()
            .any(|f| f.severity == FindingSeverity::Positive));
    }

    #[test]
    fn test_total_is_bounded() {
        let everything = format!(
            "{} {} {}",
            TECH_KEYWORDS.join(" "),
            ACHIEVEMENT_KEYWORDS.join(" "),
            "filler ".repeat(600)
        );
        let report = analyze(&everything);
        assert_eq!(report.total_score, 100.0);
        assert!(report.findings.iter().all(|f| f.severity == FindingSeverity::Positive));
    }
}
