//! PDF export of generated documents.
//!
//! US letter, 1" margins, Helvetica 10pt on 13pt leading. Lines are wrapped
//! to the text width; a blank line in the source becomes a paragraph gap.

use printpdf::{BuiltinFont, Mm, PdfDocument};
use serde::Deserialize;
use thiserror::Error;

const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 25.4;
const FONT_SIZE_PT: f32 = 10.0;
const LEADING_PT: f32 = 13.0;
const PARAGRAPH_GAP_PT: f32 = 8.0;
const PT_TO_MM: f32 = 0.352_778;
/// Characters per line at 10pt Helvetica across 6.5".
const WRAP_COLUMNS: usize = 90;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export: the document is empty")]
    EmptyDocument,

    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

impl DocumentKind {
    pub fn title(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "Tailored Resume",
            DocumentKind::CoverLetter => "Cover Letter",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "Jobfit_Tailored.pdf",
            DocumentKind::CoverLetter => "Jobfit_CoverLetter.pdf",
        }
    }
}

/// One printed line, or a vertical gap between paragraphs.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LayoutLine {
    Text(String),
    Gap,
}

/// Wraps every source line and turns runs of blank lines into a single gap.
fn layout(text: &str) -> Vec<LayoutLine> {
    let mut lines = Vec::new();
    for source_line in text.trim().lines() {
        if source_line.trim().is_empty() {
            if lines.last() != Some(&LayoutLine::Gap) {
                lines.push(LayoutLine::Gap);
            }
            continue;
        }
        lines.extend(
            textwrap::wrap(source_line.trim_end(), WRAP_COLUMNS)
                .into_iter()
                .map(|l| LayoutLine::Text(l.into_owned())),
        );
    }
    lines
}

/// Renders `text` as a PDF and returns the file bytes.
pub fn render_pdf(text: &str, kind: DocumentKind) -> Result<Vec<u8>, ExportError> {
    let lines = layout(text);
    if lines.is_empty() {
        return Err(ExportError::EmptyDocument);
    }

    let (doc, first_page, first_layer) = PdfDocument::new(
        kind.title(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    let top = PAGE_HEIGHT_MM - MARGIN_MM;
    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = top;

    for line in &lines {
        let advance = match line {
            LayoutLine::Text(_) => LEADING_PT,
            LayoutLine::Gap => PARAGRAPH_GAP_PT,
        } * PT_TO_MM;

        if y - advance < MARGIN_MM {
            let (page, page_layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            y = top;
            if *line == LayoutLine::Gap {
                continue;
            }
        }

        y -= advance;
        if let LayoutLine::Text(content) = line {
            layer.use_text(content.as_str(), FONT_SIZE_PT, Mm(MARGIN_MM), Mm(y), &font);
        }
    }

    doc.save_to_bytes()
        .map_err(|e| ExportError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_collapses_blank_runs_into_one_gap() {
        let lines = layout("Jane Doe\n\n\n\nExperience");
        assert_eq!(
            lines,
            vec![
                LayoutLine::Text("Jane Doe".to_string()),
                LayoutLine::Gap,
                LayoutLine::Text("Experience".to_string()),
            ]
        );
    }

    #[test]
    fn test_layout_wraps_long_lines() {
        let long = "word ".repeat(60);
        let lines = layout(&long);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| match l {
            LayoutLine::Text(t) => t.chars().count() <= WRAP_COLUMNS,
            LayoutLine::Gap => false,
        }));
    }

    #[test]
    fn test_empty_document_is_rejected() {
        let err = render_pdf("  \n\n ", DocumentKind::Resume).unwrap_err();
        assert!(matches!(err, ExportError::EmptyDocument));
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let bytes = render_pdf("Jane Doe\nRust Engineer", DocumentKind::Resume).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_document_spills_onto_more_pages() {
        let text = (0..200)
            .map(|i| format!("- Bullet number {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let one_page = render_pdf("short", DocumentKind::CoverLetter).unwrap();
        let many_pages = render_pdf(&text, DocumentKind::CoverLetter).unwrap();
        assert!(many_pages.len() > one_page.len());
    }

    #[test]
    fn test_file_names() {
        assert_eq!(DocumentKind::Resume.file_name(), "Jobfit_Tailored.pdf");
        assert_eq!(DocumentKind::CoverLetter.file_name(), "Jobfit_CoverLetter.pdf");
    }
}
