//! Plain-text extraction from uploaded resumes.
//!
//! Dispatch is purely on the file extension. Unknown extensions yield an empty
//! string rather than an error; callers treat empty text as unreadable.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

use crate::resume::ResumeKind;

const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read {path}: {error}")]
    Io { path: String, error: std::io::Error },

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("DOCX XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("extraction task aborted: {0}")]
    Aborted(String),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ExtractError + '_ {
    move |error| ExtractError::Io {
        path: path.display().to_string(),
        error,
    }
}

/// Extracts trimmed plain text from the resume at `path`.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    match ResumeKind::from_path(path) {
        Some(ResumeKind::Pdf) => extract_pdf(path),
        Some(ResumeKind::Txt) => std::fs::read_to_string(path)
            .map(|text| text.trim().to_string())
            .map_err(io_error(path)),
        Some(ResumeKind::Docx) => extract_docx(path),
        None => Ok(String::new()),
    }
}

/// Runs `extract_text` on the blocking pool; PDF parsing is CPU-bound.
pub async fn extract_text_blocking(path: PathBuf) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || extract_text(&path))
        .await
        .map_err(|e| ExtractError::Aborted(e.to_string()))?
}

fn extract_pdf(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(io_error(path))?;
    let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes)
        .map_err(|e| ExtractError::Pdf(format!("{e:?}")))?;

    let pages: Vec<&str> = pages.iter().map(|page| page.trim()).collect();
    Ok(pages.join("\n").trim().to_string())
}

fn extract_docx(path: &Path) -> Result<String, ExtractError> {
    let file = File::open(path).map_err(io_error(path))?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)?
        .read_to_string(&mut xml)
        .map_err(io_error(path))?;

    Ok(document_paragraphs(&xml)?.join(" ").trim().to_string())
}

/// Collects the text of every body-level `w:p` paragraph, in document order.
/// Paragraphs inside tables are skipped.
fn document_paragraphs(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut table_depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:p" if table_depth == 0 => current = Some(String::new()),
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" if table_depth == 0 => paragraphs.push(String::new()),
                b"w:tab" => {
                    if let Some(p) = current.as_mut() {
                        p.push('\t');
                    }
                }
                b"w:br" | b"w:cr" => {
                    if let Some(p) = current.as_mut() {
                        p.push('\n');
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_text => {
                if let Some(p) = current.as_mut() {
                    p.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:p" if table_depth == 0 => {
                    if let Some(p) = current.take() {
                        paragraphs.push(p);
                    }
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}
