// Statement ingestion: upload parsing, extraction and CSV normalization.
// Nothing here talks to the advice service.

pub mod extract;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod upload;

pub use extract::{extract, ExtractError};
pub use models::{ExtractedContent, MediaType, UploadedDocument};
pub use normalize::normalize;
