use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};

pub const EXPORT_DISPOSITION: &str = "attachment; filename=\"resume.txt\"";
pub const EXPORT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Plain-text download of a resume, always named `resume.txt`.
pub struct ResumeDownload(pub String);

impl IntoResponse for ResumeDownload {
    fn into_response(self) -> Response {
        (
            [
                (
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(EXPORT_CONTENT_TYPE),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    HeaderValue::from_static(EXPORT_DISPOSITION),
                ),
            ],
            self.0,
        )
            .into_response()
    }
}
