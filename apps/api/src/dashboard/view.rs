use serde::Serialize;
use thiserror::Error;

use crate::models::resume::ResumeInput;

/// The screen currently selected on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardView {
    Main,
    Create,
    Upload,
    Preview,
    Edit,
}

/// The text shown in `preview`, tagged by the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum PreviewContent {
    Generated(String),
    Uploaded(String),
}

impl PreviewContent {
    pub fn text(&self) -> &str {
        match self {
            PreviewContent::Generated(text) | PreviewContent::Uploaded(text) => text,
        }
    }
}

/// User actions that can be refused for the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEvent {
    SelectCreate,
    SelectUpload,
    BeginGeneration,
    UploadCompleted,
    Edit,
}

/// Identifies one submission. Only the ticket issued by the latest
/// `begin_generation` can complete or fail it.
pub type GenerationTicket = u64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("'{event:?}' is not allowed from the {from:?} view")]
    NotAllowed {
        from: DashboardView,
        event: DashboardEvent,
    },

    #[error("A resume is already being generated")]
    Busy,

    #[error("The dashboard moved on before the result arrived")]
    Stale,
}

/// Session-scoped dashboard state.
///
/// Invariant: whenever `view` is `Preview`, `preview` is `Some`. A preview is
/// replaced wholesale by whichever path produced it, so exactly one variant is
/// ever authoritative.
#[derive(Debug, Clone)]
pub struct Dashboard {
    view: DashboardView,
    preview: Option<PreviewContent>,
    /// Last submitted form, used to prefill `edit`.
    draft: Option<ResumeInput>,
    /// Ticket of the generation currently loading, if any.
    pending: Option<GenerationTicket>,
    last_ticket: GenerationTicket,
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            view: DashboardView::Main,
            preview: None,
            draft: None,
            pending: None,
            last_ticket: 0,
        }
    }

    pub fn view(&self) -> DashboardView {
        self.view
    }

    pub fn preview(&self) -> Option<&PreviewContent> {
        self.preview.as_ref()
    }

    pub fn draft(&self) -> Option<&ResumeInput> {
        self.draft.as_ref()
    }

    pub fn in_flight(&self) -> bool {
        self.pending.is_some()
    }

    /// Edit is offered only for a generated preview.
    pub fn can_edit(&self) -> bool {
        self.view == DashboardView::Preview
            && matches!(self.preview, Some(PreviewContent::Generated(_)))
    }

    /// The preview text, when the preview screen is showing.
    pub fn preview_text(&self) -> Option<&str> {
        match self.view {
            DashboardView::Preview => self.preview.as_ref().map(PreviewContent::text),
            _ => None,
        }
    }

    pub fn select_create(&mut self) -> Result<(), TransitionError> {
        self.expect_view(&[DashboardView::Main], DashboardEvent::SelectCreate)?;
        self.view = DashboardView::Create;
        Ok(())
    }

    pub fn select_upload(&mut self) -> Result<(), TransitionError> {
        self.expect_view(&[DashboardView::Main], DashboardEvent::SelectUpload)?;
        self.view = DashboardView::Upload;
        Ok(())
    }

    /// Marks a generation as in flight from the form screens and returns the
    /// ticket its result must be delivered with.
    pub fn begin_generation(
        &mut self,
        input: ResumeInput,
    ) -> Result<GenerationTicket, TransitionError> {
        self.expect_view(
            &[DashboardView::Create, DashboardView::Edit],
            DashboardEvent::BeginGeneration,
        )?;
        if self.pending.is_some() {
            return Err(TransitionError::Busy);
        }
        self.last_ticket += 1;
        self.pending = Some(self.last_ticket);
        self.draft = Some(input);
        Ok(self.last_ticket)
    }

    /// Moves to `preview` holding generated text. A result for any ticket but
    /// the pending one is dropped as `Stale`, including one that arrives after
    /// the user went back and submitted again.
    pub fn generation_completed(
        &mut self,
        ticket: GenerationTicket,
        text: String,
    ) -> Result<(), TransitionError> {
        self.finish_generation(ticket)?;
        self.preview = Some(PreviewContent::Generated(text));
        self.view = DashboardView::Preview;
        Ok(())
    }

    /// Clears the loading flag after a failed submission, keeping the form open.
    pub fn generation_failed(&mut self, ticket: GenerationTicket) -> Result<(), TransitionError> {
        self.finish_generation(ticket)
    }

    /// Checks that an upload would be accepted, before its body is read.
    pub fn check_upload(&self) -> Result<(), TransitionError> {
        self.expect_view(&[DashboardView::Upload], DashboardEvent::UploadCompleted)
    }

    pub fn upload_completed(&mut self, text: String) -> Result<(), TransitionError> {
        self.check_upload()?;
        self.preview = Some(PreviewContent::Uploaded(text));
        self.view = DashboardView::Preview;
        Ok(())
    }

    pub fn edit(&mut self) -> Result<(), TransitionError> {
        if !self.can_edit() {
            return Err(TransitionError::NotAllowed {
                from: self.view,
                event: DashboardEvent::Edit,
            });
        }
        self.view = DashboardView::Edit;
        Ok(())
    }

    /// Returns to `main` from anywhere. A no-op on `main` itself.
    pub fn back(&mut self) {
        self.view = DashboardView::Main;
        self.pending = None;
    }

    fn finish_generation(&mut self, ticket: GenerationTicket) -> Result<(), TransitionError> {
        let on_form = matches!(self.view, DashboardView::Create | DashboardView::Edit);
        if !on_form || self.pending != Some(ticket) {
            return Err(TransitionError::Stale);
        }
        self.pending = None;
        Ok(())
    }

    fn expect_view(
        &self,
        allowed: &[DashboardView],
        event: DashboardEvent,
    ) -> Result<(), TransitionError> {
        if allowed.contains(&self.view) {
            Ok(())
        } else {
            Err(TransitionError::NotAllowed {
                from: self.view,
                event,
            })
        }
    }
}
