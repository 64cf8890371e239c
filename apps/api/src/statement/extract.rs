//! Extraction: turns uploaded statement bytes into `ExtractedContent`.
//!
//! PDF statements become one block of text, one line-separated segment per page.
//! CSV statements become a `Table` of raw cells; typing happens in `normalize`.

use lopdf::Document;
use thiserror::Error;
use tracing::debug;

use crate::statement::models::{
    Cell, ExtractedContent, MediaType, Table, TransactionRow, UploadedDocument,
};

pub const DATE_COLUMN: &str = "Date";
pub const DESCRIPTION_COLUMN: &str = "Description";
pub const AMOUNT_COLUMN: &str = "Amount";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Missing column: {0}")]
    MissingColumn(&'static str),
}

pub fn extract(document: &UploadedDocument) -> Result<ExtractedContent, ExtractError> {
    match document.media_type() {
        MediaType::Pdf => extract_pages(document.bytes()).map(|pages| {
            debug!("Extracted {} PDF page(s)", pages.len());
            ExtractedContent::PlainText(pages.join("\n"))
        }),
        MediaType::Csv => read_table(document.bytes()).map(|table| {
            debug!("Read {} CSV row(s)", table.len());
            ExtractedContent::Table(table)
        }),
    }
}

/// Text of every page in page order. A page without a usable text layer yields "".
/// Pages keep lopdf's trailing newline, so joined text shows a blank line between pages.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| ExtractError::MalformedDocument(format!("unreadable PDF: {e}")))?;

    let pages = doc
        .get_pages()
        .into_keys()
        .map(|page_number| page_text(&doc, page_number))
        .collect();

    Ok(pages)
}

fn page_text(doc: &Document, page_number: u32) -> String {
    match doc.extract_text(&[page_number]) {
        Ok(text) => text,
        Err(e) => {
            debug!("No text extracted from page {page_number}: {e}");
            String::new()
        }
    }
}

/// Reads a headed CSV into raw rows, preserving file order.
pub fn read_table(bytes: &[u8]) -> Result<Table, ExtractError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| ExtractError::MalformedDocument(format!("unreadable CSV header: {e}")))?
        .clone();

    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(ExtractError::MalformedDocument(
            "CSV has no header row".to_string(),
        ));
    }

    let column = |name: &str| headers.iter().position(|h| h == name);
    let date_idx = column(DATE_COLUMN).ok_or(ExtractError::MissingColumn(DATE_COLUMN))?;
    let amount_idx = column(AMOUNT_COLUMN).ok_or(ExtractError::MissingColumn(AMOUNT_COLUMN))?;
    let description_idx = column(DESCRIPTION_COLUMN);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result
            .map_err(|e| ExtractError::MalformedDocument(format!("unreadable CSV row: {e}")))?;

        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(ExtractError::MalformedDocument(format!(
                "line {line} has {} fields, expected {}",
                record.len(),
                headers.len()
            )));
        }

        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();
        rows.push(TransactionRow {
            date: Cell::Raw(field(date_idx)),
            description: description_idx.map(field).unwrap_or_default(),
            amount: Cell::Raw(field(amount_idx)),
        });
    }

    Ok(Table { rows })
}
