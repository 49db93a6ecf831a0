// Resume generation and ATS scoring.
// All LLM calls go through llm_client; no direct HTTP calls here.

pub mod ats;
pub mod handlers;
pub mod prompts;
pub mod template;
pub mod validation;
pub mod writer;
