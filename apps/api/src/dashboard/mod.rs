//! Dashboard: the per-session view-state machine that drives which screen the
//! client renders, plus the upload and export edges around it.

pub mod export;
pub mod handlers;
pub mod registry;
pub mod upload;
pub mod view;

pub use registry::DashboardRegistry;
pub use view::TransitionError;
