// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for resume writing.
pub const RESUME_WRITER_SYSTEM: &str =
    "You are an expert resume writer who creates ATS-friendly, professional resumes.";

/// Resume generation prompt. Every `{placeholder}` is replaced before sending.
pub const RESUME_PROMPT_TEMPLATE: &str = "You are an expert resume writer. \
Based on the following data, generate a clean, ATS-friendly resume in plain text format:

Full Name: {full_name}
Job Title: {job_title}
Summary: {summary}
Skills: {skills}
Experience: {experience}
Education: {education}
Certifications: {certifications}
Projects: {projects}

Please format this as a professional, ATS-optimized resume with proper sections and formatting.";

/// System prompt for ATS analysis.
pub const ATS_SYSTEM: &str = "You are an ATS (Applicant Tracking System) expert \
who analyzes resumes for compatibility and optimization.";

/// ATS analysis prompt template. Replace `{resume_text}` before sending.
pub const ATS_PROMPT_TEMPLATE: &str = r#"Analyze the following resume for ATS compatibility and provide a score out of 100, along with specific feedback and improvement suggestions:

{resume_text}

Please respond in JSON format with:
{
  "score": number (0-100),
  "feedback": ["feedback point 1", "feedback point 2", ...],
  "improvements": ["improvement suggestion 1", "improvement suggestion 2", ...]
}"#;
