//! Resume writer: the dual-path generation/scoring client.
//!
//! Each operation tries the completion endpoint first and degrades to the
//! deterministic local path (template / heuristic) when the endpoint is
//! unconfigured, unreachable, or returns something unusable. Callers always
//! get a value; the `Sourced` tag only reports which path produced it.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::generation::ats::{heuristic_score, AtsScore, RemoteAtsReport};
use crate::generation::prompts::{
    ATS_PROMPT_TEMPLATE, ATS_SYSTEM, RESUME_PROMPT_TEMPLATE, RESUME_WRITER_SYSTEM,
};
use crate::generation::template::render_template;
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION, PLAIN_TEXT_INSTRUCTION};
use crate::llm_client::{complete_json, CompletionApi, CompletionParams, LlmError};
use crate::models::resume::ResumeInput;

pub const GENERATION_PARAMS: CompletionParams = CompletionParams {
    max_tokens: 2000,
    temperature: 0.7,
};

pub const ATS_PARAMS: CompletionParams = CompletionParams {
    max_tokens: 1000,
    temperature: 0.3,
};

/// Why the local path ran instead of the completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FallbackReason {
    #[error("completion endpoint not configured")]
    NotConfigured,

    #[error("completion call failed: {0}")]
    Transport(String),

    #[error("completion response unusable: {0}")]
    Malformed(String),
}

impl From<LlmError> for FallbackReason {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Parse(_) | LlmError::EmptyContent => {
                FallbackReason::Malformed(err.to_string())
            }
            other => FallbackReason::Transport(other.to_string()),
        }
    }
}

/// Which path produced a value, as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Remote,
    Fallback,
}

/// A value tagged with the path that produced it. Both arms carry the same type.
#[derive(Debug, Clone, PartialEq)]
pub enum Sourced<T> {
    Remote(T),
    Fallback { value: T, reason: FallbackReason },
}

impl<T> Sourced<T> {
    pub fn into_inner(self) -> T {
        match self {
            Sourced::Remote(value) | Sourced::Fallback { value, .. } => value,
        }
    }

    pub fn source(&self) -> Source {
        match self {
            Sourced::Remote(_) => Source::Remote,
            Sourced::Fallback { .. } => Source::Fallback,
        }
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            Sourced::Remote(_) => None,
            Sourced::Fallback { reason, .. } => Some(reason),
        }
    }
}

/// Generation and ATS scoring client. Cheap to clone.
///
/// Holds `None` when no usable API key is configured; every call then goes
/// straight to the local path without touching the network.
#[derive(Clone)]
pub struct ResumeWriter {
    completion: Option<Arc<dyn CompletionApi>>,
}

impl ResumeWriter {
    pub fn new(completion: Option<Arc<dyn CompletionApi>>) -> Self {
        Self { completion }
    }

    /// A writer that always uses the local template and heuristic.
    pub fn offline() -> Self {
        Self::new(None)
    }

    pub fn is_remote(&self) -> bool {
        self.completion.is_some()
    }

    /// Generates a plain-text resume. Never fails: any endpoint problem yields
    /// the deterministic template instead.
    pub async fn generate(&self, input: &ResumeInput) -> Sourced<String> {
        let Some(api) = &self.completion else {
            return Sourced::Fallback {
                value: render_template(input),
                reason: FallbackReason::NotConfigured,
            };
        };

        let system = format!("{RESUME_WRITER_SYSTEM} {PLAIN_TEXT_INSTRUCTION}");
        let prompt = build_resume_prompt(input);

        match api.complete(&system, &prompt, GENERATION_PARAMS).await {
            Ok(text) if !text.trim().is_empty() => {
                info!("Resume generated remotely for '{}'", input.full_name);
                Sourced::Remote(text.trim().to_string())
            }
            Ok(_) => fall_back_to_template(input, LlmError::EmptyContent.into()),
            Err(e) => fall_back_to_template(input, e.into()),
        }
    }

    /// Scores resume text for ATS compatibility. Never fails: missing key,
    /// transport failure, or a malformed report yields the local heuristic.
    pub async fn score_ats(&self, resume_text: &str) -> Sourced<AtsScore> {
        let Some(api) = &self.completion else {
            return Sourced::Fallback {
                value: heuristic_score(resume_text),
                reason: FallbackReason::NotConfigured,
            };
        };

        let system = format!("{ATS_SYSTEM} {JSON_ONLY_INSTRUCTION}");
        let prompt = fill_template(ATS_PROMPT_TEMPLATE, &[("resume_text", resume_text)]);

        match complete_json::<RemoteAtsReport>(api.as_ref(), &system, &prompt, ATS_PARAMS).await {
            Ok(report) => Sourced::Remote(report.into()),
            Err(e) => {
                let reason = FallbackReason::from(e);
                warn!("ATS scoring fell back to heuristic: {reason}");
                Sourced::Fallback {
                    value: heuristic_score(resume_text),
                    reason,
                }
            }
        }
    }
}

fn fall_back_to_template(input: &ResumeInput, reason: FallbackReason) -> Sourced<String> {
    warn!("Resume generation fell back to template: {reason}");
    Sourced::Fallback {
        value: render_template(input),
        reason,
    }
}

/// Embeds every form field into the generation prompt. List sections are
/// passed as JSON so the model sees the full entry structure.
pub fn build_resume_prompt(input: &ResumeInput) -> String {
    let skills = input.skills.join(", ");
    let experience = serde_json::to_string(&input.experience).unwrap_or_default();
    let education = serde_json::to_string(&input.education).unwrap_or_default();
    let certifications = input.certifications.join(", ");
    let projects = serde_json::to_string(&input.projects).unwrap_or_default();

    fill_template(
        RESUME_PROMPT_TEMPLATE,
        &[
            ("full_name", input.full_name.as_str()),
            ("job_title", input.job_title.as_str()),
            ("summary", input.summary.as_str()),
            ("skills", skills.as_str()),
            ("experience", experience.as_str()),
            ("education", education.as_str()),
            ("certifications", certifications.as_str()),
            ("projects", projects.as_str()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmClient;
    use crate::models::resume::fixtures::sample_input;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    enum Reply {
        Text(&'static str),
        Status(u16),
    }

    /// Fake completion backend that records each call's parameters.
    struct FakeCompletion {
        reply: Reply,
        calls: Mutex<Vec<(String, CompletionParams)>>,
    }

    impl FakeCompletion {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionApi for FakeCompletion {
        async fn complete(
            &self,
            _system: &str,
            prompt: &str,
            params: CompletionParams,
        ) -> Result<String, LlmError> {
            self.calls.lock().unwrap().push((prompt.to_string(), params));
            match self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Status(status) => Err(LlmError::Api {
                    status,
                    message: "boom".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_generate_without_key_uses_template() {
        let input = sample_input();
        let result = ResumeWriter::offline().generate(&input).await;
        assert_eq!(result.source(), Source::Fallback);
        assert_eq!(result.fallback_reason(), Some(&FallbackReason::NotConfigured));
        assert_eq!(result.into_inner(), render_template(&input));
    }

    #[tokio::test]
    async fn test_generate_returns_remote_text_and_sends_generation_params() {
        let fake = FakeCompletion::new(Reply::Text("  JANE DOE\nRemote resume  "));
        let writer = ResumeWriter::new(Some(fake.clone()));

        let result = writer.generate(&sample_input()).await;
        assert_eq!(result, Sourced::Remote("JANE DOE\nRemote resume".to_string()));

        let calls = fake.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, GENERATION_PARAMS);
        assert!(calls[0].0.contains("Full Name: Jane Doe"));
        assert!(calls[0].0.contains("Skills: Rust, PostgreSQL"));
    }

    #[tokio::test]
    async fn test_generate_falls_back_on_api_error() {
        let input = sample_input();
        let writer = ResumeWriter::new(Some(FakeCompletion::new(Reply::Status(500))));

        let result = writer.generate(&input).await;
        assert!(matches!(
            result.fallback_reason(),
            Some(FallbackReason::Transport(_))
        ));
        assert_eq!(result.into_inner(), render_template(&input));
    }

    #[tokio::test]
    async fn test_generate_falls_back_on_blank_reply() {
        let writer = ResumeWriter::new(Some(FakeCompletion::new(Reply::Text("   "))));
        let result = writer.generate(&sample_input()).await;
        assert!(matches!(
            result.fallback_reason(),
            Some(FallbackReason::Malformed(_))
        ));
        assert!(result.into_inner().contains("JANE DOE"));
    }

    #[tokio::test]
    async fn test_generate_over_http_falls_back_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let client = LlmClient::new("sk-test".to_string(), server.uri())
            .unwrap()
            .with_max_retries(1);
        let writer = ResumeWriter::new(Some(Arc::new(client)));

        let input = sample_input();
        let result = writer.generate(&input).await;
        assert_eq!(result.source(), Source::Fallback);
        assert_eq!(result.into_inner(), render_template(&input));
    }

    #[tokio::test]
    async fn test_score_ats_parses_remote_report() {
        let fake = FakeCompletion::new(Reply::Text(
            r#"{"score": 140, "feedback": ["Good headers"], "improvements": ["Add metrics"]}"#,
        ));
        let writer = ResumeWriter::new(Some(fake.clone()));

        let result = writer.score_ats("resume text").await;
        assert_eq!(result.source(), Source::Remote);
        let score = result.into_inner();
        assert_eq!(score.score, 100);
        assert_eq!(score.feedback, vec!["Good headers".to_string()]);
        assert_eq!(fake.calls.lock().unwrap()[0].1, ATS_PARAMS);
    }

    #[tokio::test]
    async fn test_score_ats_falls_back_on_malformed_report() {
        let writer = ResumeWriter::new(Some(FakeCompletion::new(Reply::Text(
            "Your resume looks great!",
        ))));
        let result = writer.score_ats("skill experience").await;
        assert!(matches!(
            result.fallback_reason(),
            Some(FallbackReason::Malformed(_))
        ));
        assert_eq!(result.into_inner().score, 80);
    }

    #[tokio::test]
    async fn test_score_ats_without_key_uses_heuristic() {
        let text = format!("{} a@b.c skills experience", vec!["w"; 250].join(" "));
        let result = ResumeWriter::offline().score_ats(&text).await;
        assert_eq!(result.source(), Source::Fallback);
        assert_eq!(result.into_inner().score, 95);
    }

    #[test]
    fn test_prompt_embeds_lists_as_json() {
        let prompt = build_resume_prompt(&sample_input());
        assert!(prompt.contains(r#""company":"Acme""#));
        assert!(prompt.contains(r#""institution":"State University""#));
        assert!(prompt.contains("Projects: []"));
        assert!(!prompt.contains("{full_name}"));
    }

    #[test]
    fn test_placeholders_in_user_text_are_not_expanded() {
        let mut input = sample_input();
        input.summary = "Loves {projects} and {full_name}".to_string();
        let prompt = build_resume_prompt(&input);
        assert!(prompt.contains("Summary: Loves {projects} and {full_name}"));
        assert!(prompt.contains("Projects: []"));
        assert!(prompt.contains("Full Name: Jane Doe"));
    }
}
