//! The "Analyze and Advise" pipeline.
//!
//! Idle → Extracting → Normalizing (CSV only) → BuildingPrompt → AwaitingResponse → Done | Failed
//!
//! Every step runs once, in order. Any error ends the request in `Failed`;
//! no partial advice is returned.

use std::fmt;

use tracing::{info, warn};

use crate::advice::prompts::{build_prompt, AdvicePrompt, UserContext};
use crate::advisor_client::{AdviceGenerator, AdviceResult};
use crate::errors::AppError;
use crate::statement::{extract, normalize, ExtractError, ExtractedContent, MediaType, UploadedDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Extracting,
    Normalizing,
    BuildingPrompt,
    AwaitingResponse,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Extracting => "extracting",
            Stage::Normalizing => "normalizing",
            Stage::BuildingPrompt => "building_prompt",
            Stage::AwaitingResponse => "awaiting_response",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct AdviceOutcome {
    pub media_type: MediaType,
    pub prompt: AdvicePrompt,
    pub advice: AdviceResult,
}

/// Extracts the statement and, for CSV input, normalizes its table.
pub async fn prepare(document: UploadedDocument) -> Result<ExtractedContent, AppError> {
    let content = tokio::task::spawn_blocking(move || extract_and_normalize(&document))
        .await
        .map_err(|e| anyhow::anyhow!("extraction task failed: {e}"))??;
    Ok(content)
}

fn extract_and_normalize(document: &UploadedDocument) -> Result<ExtractedContent, ExtractError> {
    info!(stage = %Stage::Extracting, media_type = %document.media_type());
    let content = extract(document)?;

    Ok(match content {
        ExtractedContent::Table(table) => {
            if table.is_empty() {
                warn!("Statement has a header row but no transactions");
            }
            info!(stage = %Stage::Normalizing, rows = table.len());
            ExtractedContent::Table(normalize(table))
        }
        text @ ExtractedContent::PlainText(_) => text,
    })
}

/// Runs the full pipeline for one request.
pub async fn analyze_and_advise(
    document: UploadedDocument,
    ctx: &UserContext,
    advisor: &dyn AdviceGenerator,
) -> Result<AdviceOutcome, AppError> {
    info!(stage = %Stage::Idle, "Starting advice request");

    match run(document, ctx, advisor).await {
        Ok(outcome) => {
            info!(
                stage = %Stage::Done,
                prompt_chars = outcome.prompt.as_str().len(),
                advice_chars = outcome.advice.as_str().len()
            );
            Ok(outcome)
        }
        Err(e) => {
            warn!(stage = %Stage::Failed, "Advice request failed: {e}");
            Err(e)
        }
    }
}

async fn run(
    document: UploadedDocument,
    ctx: &UserContext,
    advisor: &dyn AdviceGenerator,
) -> Result<AdviceOutcome, AppError> {
    let content = prepare(document).await?;

    info!(stage = %Stage::BuildingPrompt, media_type = %content.media_type());
    let prompt = build_prompt(&content, ctx);

    info!(stage = %Stage::AwaitingResponse, model = advisor.model());
    let advice = advisor.get_advice(&prompt).await?;

    Ok(AdviceOutcome {
        media_type: content.media_type(),
        prompt,
        advice,
    })
}
