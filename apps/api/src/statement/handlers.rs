use axum::{extract::Multipart, Json};
use serde::Serialize;

use crate::advice::pipeline::prepare;
use crate::errors::AppError;
use crate::statement::models::{ExtractedContent, TransactionRow};
use crate::statement::upload::read_upload;

/// Rows shown in a CSV preview.
pub const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PreviewResponse {
    Pdf {
        page_text: String,
        char_count: usize,
    },
    Csv {
        row_count: usize,
        rows: Vec<TransactionRow>,
    },
}

impl From<ExtractedContent> for PreviewResponse {
    fn from(content: ExtractedContent) -> Self {
        match content {
            ExtractedContent::PlainText(page_text) => PreviewResponse::Pdf {
                char_count: page_text.chars().count(),
                page_text,
            },
            ExtractedContent::Table(table) => PreviewResponse::Csv {
                row_count: table.len(),
                rows: table.rows.into_iter().take(PREVIEW_ROWS).collect(),
            },
        }
    }
}

/// POST /api/v1/statements/preview
///
/// Extracts (and for CSV, normalizes) an uploaded statement without calling the advisor.
pub async fn handle_preview(multipart: Multipart) -> Result<Json<PreviewResponse>, AppError> {
    let document = read_upload(multipart).await?.require_document()?;
    let content = prepare(document).await?;
    Ok(Json(content.into()))
}
