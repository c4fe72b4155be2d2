//! Text extraction from uploaded resume / job description files.
//!
//! Extraction is CPU-bound (PDF parsing in particular); callers on the async
//! runtime run it inside `tokio::task::spawn_blocking`.

use std::io::{Cursor, Read};

use quick_xml::escape::unescape;
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to extract text from PDF '{file_name}': {message}")]
    Pdf { file_name: String, message: String },

    #[error("Failed to extract text from DOCX '{file_name}': {message}")]
    Docx { file_name: String, message: String },

    #[error("Unsupported file format '{file_name}': legacy .doc files are not supported, save it as .docx or PDF")]
    Unsupported { file_name: String },

    #[error("No text could be extracted from '{file_name}'")]
    NoText { file_name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    LegacyDoc,
    PlainText,
}

impl DocumentFormat {
    /// Detects the format from the file extension; anything unknown is read as text.
    pub fn from_file_name(file_name: &str) -> Self {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".pdf") {
            DocumentFormat::Pdf
        } else if lower.ends_with(".docx") {
            DocumentFormat::Docx
        } else if lower.ends_with(".doc") {
            DocumentFormat::LegacyDoc
        } else {
            DocumentFormat::PlainText
        }
    }
}

/// Extracts plain text from an uploaded file.
pub fn extract_text(file_name: &str, data: &[u8]) -> Result<String, ExtractError> {
    let text = match DocumentFormat::from_file_name(file_name) {
        DocumentFormat::Pdf => extract_pdf(file_name, data)?,
        DocumentFormat::Docx => extract_docx(file_name, data)?,
        DocumentFormat::LegacyDoc => {
            return Err(ExtractError::Unsupported {
                file_name: file_name.to_string(),
            })
        }
        DocumentFormat::PlainText => String::from_utf8_lossy(data).into_owned(),
    };

    if text.trim().is_empty() {
        return Err(ExtractError::NoText {
            file_name: file_name.to_string(),
        });
    }

    Ok(text)
}

fn extract_pdf(file_name: &str, data: &[u8]) -> Result<String, ExtractError> {
    let to_err = |message: String| ExtractError::Pdf {
        file_name: file_name.to_string(),
        message,
    };

    // pdf-extract panics on some malformed documents.
    std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data))
        .map_err(|_| to_err("the PDF parser crashed on this document".to_string()))?
        .map_err(|e| to_err(e.to_string()))
}

fn extract_docx(file_name: &str, data: &[u8]) -> Result<String, ExtractError> {
    let to_err = |message: String| ExtractError::Docx {
        file_name: file_name.to_string(),
        message,
    };

    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| to_err(format!("not a valid .docx archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(|e| to_err(format!("missing {DOCX_BODY}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| to_err(format!("failed to read {DOCX_BODY}: {e}")))?;

    document_xml_to_text(&xml).map_err(to_err)
}

/// Collects `w:t` runs, one output line per `w:p` paragraph.
fn document_xml_to_text(xml: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => out.push('\t'),
                b"br" | b"cr" => out.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text_run => {
                let raw = String::from_utf8_lossy(&t);
                let text = unescape(&raw).map_err(|e| e.to_string())?;
                out.push_str(&text);
            }
            Event::GeneralRef(r) if in_text_run => {
                let name = String::from_utf8_lossy(&r).into_owned();
                match resolve_entity(&name) {
                    Some(c) => out.push(c),
                    None => return Err(format!("unknown entity &{name};")),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out.trim_end().to_string())
}

/// Predefined XML entities and numeric character references.
fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse::<u32>().ok()?,
            };
            char::from_u32(value)
        }
    }
}
