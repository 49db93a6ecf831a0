//! Upload classification. Only plain-text resumes are read; PDFs are
//! recognised but not parsed.

/// Upper bound on an uploaded resume body.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const PDF_NOTICE: &str = "PDF parsing is not supported yet. Please upload a .txt file.";
pub const UNSUPPORTED_NOTICE: &str = "Please upload a .txt or .pdf file";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Text,
    Pdf,
    Unsupported,
}

impl UploadKind {
    /// User-facing notice for kinds that are not read.
    pub fn rejection_notice(self) -> Option<&'static str> {
        match self {
            UploadKind::Text => None,
            UploadKind::Pdf => Some(PDF_NOTICE),
            UploadKind::Unsupported => Some(UNSUPPORTED_NOTICE),
        }
    }
}

/// Classifies an upload by file extension, falling back to the declared MIME type.
pub fn classify_upload(file_name: Option<&str>, content_type: Option<&str>) -> UploadKind {
    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("txt") => return UploadKind::Text,
        Some("pdf") => return UploadKind::Pdf,
        _ => {}
    }

    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());

    match mime.as_deref() {
        Some("text/plain") => UploadKind::Text,
        Some("application/pdf") => UploadKind::Pdf,
        _ => UploadKind::Unsupported,
    }
}

/// Decodes an uploaded text file. Invalid UTF-8 sequences are replaced, as a
/// browser text read would do.
pub fn read_text_upload(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(&*text).to_string()
}
