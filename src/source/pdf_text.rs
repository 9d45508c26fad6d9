//! Text from PDF content streams.

use crate::error::{DialogcastError, Result};
use std::path::Path;

#[cfg(feature = "pdf-input")]
use pdf::{content::Operation, file::File, primitive::Primitive};

/// Collect the shown text of every page, one line per text object.
#[cfg(feature = "pdf-input")]
pub fn extract_pdf_text(path: &Path) -> Result<String> {
    let extraction_error = |message: String| DialogcastError::SourceExtraction {
        source_name: path.display().to_string(),
        message,
    };

    let pdf = File::<Vec<u8>>::open(path).map_err(|e| extraction_error(e.to_string()))?;

    let mut pages = Vec::new();
    for (i, page) in pdf.pages().enumerate() {
        let page = page.map_err(|e| extraction_error(format!("page {}: {e}", i + 1)))?;
        let Some(content) = &page.contents else {
            continue;
        };
        let lines = text_lines(&content.operations);
        log::debug!("Page {}: {} text lines", i + 1, lines.len());
        pages.push(lines.join("\n"));
    }

    Ok(pages.join("\n").trim().to_string())
}

#[cfg(not(feature = "pdf-input"))]
pub fn extract_pdf_text(path: &Path) -> Result<String> {
    Err(DialogcastError::SourceExtraction {
        source_name: path.display().to_string(),
        message: "PDF input requires the 'pdf-input' feature".to_string(),
    })
}

/// Text shown between each `BT`/`ET` pair.
#[cfg(feature = "pdf-input")]
fn text_lines(operations: &[Operation]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for Operation { operator, operands } in operations {
        match (operator.as_str(), operands.as_slice()) {
            ("BT", _) => current.clear(),
            ("Tj" | "'", [Primitive::String(text)]) => push_pdf_string(&mut current, text),
            ("\"", [_, _, Primitive::String(text)]) => push_pdf_string(&mut current, text),
            ("TJ", [Primitive::Array(items)]) => {
                for item in items {
                    if let Primitive::String(text) = item {
                        push_pdf_string(&mut current, text);
                    }
                }
            }
            ("ET", _) => {
                let line = current.trim();
                if !line.is_empty() {
                    lines.push(line.to_string());
                }
                current.clear();
            }
            _ => {}
        }
    }

    lines
}

#[cfg(feature = "pdf-input")]
fn push_pdf_string(buf: &mut String, text: &pdf::primitive::PdfString) {
    match text.as_str() {
        Ok(s) => buf.push_str(&s),
        Err(_) => buf.push_str(&String::from_utf8_lossy(text.as_bytes())),
    }
}
