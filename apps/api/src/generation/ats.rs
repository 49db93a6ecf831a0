//! ATS compatibility scoring: the remote report shape and the local heuristic
//! used when the completion endpoint is unavailable.

use serde::{Deserialize, Serialize};

const BASE_SCORE: u8 = 60;
const SIGNAL_BONUS: u8 = 10;
const HEURISTIC_CAP: u8 = 95;
const LONG_FORM_WORDS: usize = 200;

const HEURISTIC_FEEDBACK: [&str; 4] = [
    "Clear section headers found",
    "Professional formatting detected",
    "Proper contact information included",
    "Skills section well-structured",
];

const HEURISTIC_IMPROVEMENTS: [&str; 4] = [
    "Add more quantifiable achievements",
    "Include relevant keywords for your industry",
    "Consider adding a professional summary",
    "Use action verbs to start bullet points",
];

/// ATS compatibility result. `score` is always within 0–100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtsScore {
    pub score: u8,
    /// Strengths found in the resume.
    pub feedback: Vec<String>,
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Strong,
    Fair,
    Weak,
}

impl AtsScore {
    /// Three-tier rating shown next to the score: ≥80 strong, ≥60 fair.
    pub fn band(&self) -> ScoreBand {
        match self.score {
            80.. => ScoreBand::Strong,
            60..=79 => ScoreBand::Fair,
            _ => ScoreBand::Weak,
        }
    }
}

/// The JSON object the model is asked to return.
#[derive(Debug, Deserialize)]
pub struct RemoteAtsReport {
    pub score: f64,
    #[serde(default)]
    pub feedback: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
}

impl From<RemoteAtsReport> for AtsScore {
    fn from(report: RemoteAtsReport) -> Self {
        AtsScore {
            score: report.score.round().clamp(0.0, 100.0) as u8,
            feedback: report.feedback,
            improvements: report.improvements,
        }
    }
}

/// Local keyword heuristic.
///
/// Base 60, plus 10 each for: more than 200 words, an `@` (contact info),
/// "skill" and "experience" (case-insensitive). Capped at 95. The feedback and
/// improvement lists are fixed and do not depend on the input.
pub fn heuristic_score(resume_text: &str) -> AtsScore {
    let lower = resume_text.to_lowercase();
    let word_count = resume_text.split_whitespace().count();

    let signals = [
        word_count > LONG_FORM_WORDS,
        resume_text.contains('@'),
        lower.contains("skill"),
        lower.contains("experience"),
    ];
    let hits = signals.iter().filter(|hit| **hit).count() as u8;

    AtsScore {
        score: (BASE_SCORE + hits * SIGNAL_BONUS).min(HEURISTIC_CAP),
        feedback: HEURISTIC_FEEDBACK.iter().map(|s| s.to_string()).collect(),
        improvements: HEURISTIC_IMPROVEMENTS.iter().map(|s| s.to_string()).collect(),
    }
}
