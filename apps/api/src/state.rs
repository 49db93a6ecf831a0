use std::sync::Arc;

use crate::auth::CredentialStore;
use crate::config::Config;
use crate::dashboard::DashboardRegistry;
use crate::generation::writer::ResumeWriter;
use crate::resumes::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<dyn CredentialStore>,
    pub resumes: Arc<dyn ResumeStore>,
    /// Generation/scoring client. Falls back locally when no API key is configured.
    pub writer: ResumeWriter,
    pub dashboards: DashboardRegistry,
    pub config: Config,
}
