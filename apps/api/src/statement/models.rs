use std::fmt;

use bytes::Bytes;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Declared type of an uploaded statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Pdf,
    Csv,
}

impl MediaType {
    /// Resolves the media type from the upload's MIME type, falling back to the
    /// file extension when the MIME type is missing or generic.
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Option<Self> {
        let mime = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase());

        match mime.as_deref() {
            Some("application/pdf") => Some(MediaType::Pdf),
            Some("text/csv") => Some(MediaType::Csv),
            None | Some("") | Some("application/octet-stream") => {
                Self::from_extension(file_name?)
            }
            Some(_) => None,
        }
    }

    fn from_extension(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(MediaType::Pdf),
            "csv" => Some(MediaType::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Pdf => f.write_str("pdf"),
            MediaType::Csv => f.write_str("csv"),
        }
    }
}

/// Raw upload plus its declared type. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    bytes: Bytes,
    media_type: MediaType,
}

impl UploadedDocument {
    pub fn new(bytes: Bytes, media_type: MediaType) -> Self {
        Self { bytes, media_type }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }
}

/// A single CSV cell on its way from text to a typed value.
///
/// `Raw` holds the text as read; normalization turns it into `Value` or `Missing`
/// and leaves the other two variants alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell<T> {
    Raw(String),
    Value(T),
    Missing,
}

#[cfg(test)]
impl<T> Cell<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Cell::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRow {
    #[serde(rename = "Date")]
    pub date: Cell<NaiveDateTime>,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Amount")]
    pub amount: Cell<f64>,
}

/// Statement rows in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub rows: Vec<TransactionRow>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// What extraction produced. The variant always matches the source media type.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedContent {
    PlainText(String),
    Table(Table),
}

impl ExtractedContent {
    pub fn media_type(&self) -> MediaType {
        match self {
            ExtractedContent::PlainText(_) => MediaType::Pdf,
            ExtractedContent::Table(_) => MediaType::Csv,
        }
    }
}
