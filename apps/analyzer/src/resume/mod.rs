//! Resume intake: accepted file kinds, text extraction, and the fixed-path store.

pub mod candidate;
pub mod extract;
pub mod handlers;
pub mod store;

use std::path::Path;

use serde::Serialize;

pub const PDF_MIME: &str = "application/pdf";
pub const TXT_MIME: &str = "text/plain";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// The resume formats the service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeKind {
    Pdf,
    Txt,
    Docx,
}

impl ResumeKind {
    /// Order in which stored resumes are looked up.
    pub const PROBE_ORDER: [ResumeKind; 3] = [ResumeKind::Pdf, ResumeKind::Txt, ResumeKind::Docx];

    pub fn extension(self) -> &'static str {
        match self {
            ResumeKind::Pdf => "pdf",
            ResumeKind::Txt => "txt",
            ResumeKind::Docx => "docx",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ResumeKind::Pdf => PDF_MIME,
            ResumeKind::Txt => TXT_MIME,
            ResumeKind::Docx => DOCX_MIME,
        }
    }

    /// Maps a client-declared content type onto the allow-list.
    /// Parameters such as `; charset=utf-8` are ignored.
    pub fn from_mime(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        Self::PROBE_ORDER
            .into_iter()
            .find(|kind| kind.mime() == essence)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        Self::PROBE_ORDER
            .into_iter()
            .find(|kind| kind.extension() == ext)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}
