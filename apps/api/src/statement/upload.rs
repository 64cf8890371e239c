use std::collections::HashMap;

use axum::extract::Multipart;

use crate::errors::AppError;
use crate::statement::models::{MediaType, UploadedDocument};

/// Multipart part carrying the statement.
pub const FILE_FIELD: &str = "file";

/// A parsed multipart form: at most one statement plus plain text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub document: Option<UploadedDocument>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn require_document(&mut self) -> Result<UploadedDocument, AppError> {
        self.document
            .take()
            .ok_or_else(|| AppError::Validation(format!("'{FILE_FIELD}' part is required")))
    }
}

pub async fn read_upload(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name != FILE_FIELD {
            let value = field.text().await?;
            form.fields.insert(name, value);
            continue;
        }

        if form.document.is_some() {
            return Err(AppError::Validation(
                "Only one statement may be uploaded per request".to_string(),
            ));
        }

        let media_type =
            MediaType::detect(field.content_type(), field.file_name()).ok_or_else(|| {
                AppError::UnsupportedMediaType(format!(
                    "'{}' ({}) is not a PDF or CSV statement",
                    field.file_name().unwrap_or("upload"),
                    field.content_type().unwrap_or("no content type"),
                ))
            })?;

        let bytes = field.bytes().await?;
        tracing::debug!("Received {} statement ({} bytes)", media_type, bytes.len());
        form.document = Some(UploadedDocument::new(bytes, media_type));
    }

    Ok(form)
}
