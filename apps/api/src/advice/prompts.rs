// Advice prompt templates and the prompt builder.
// The two templates are fixed; only `{career}` and `{income_range}` are substituted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::statement::ExtractedContent;

/// Template used when the statement was a PDF.
pub const PDF_ADVICE_TEMPLATE: &str = "Generate personalized financial advice for a {career} \
with an annual income in the range of {income_range}, \
based on their financial transactions documented in the provided text.";

/// Template used when the statement was a CSV export.
pub const CSV_ADVICE_TEMPLATE: &str = "Generate personalized financial advice for a {career} \
earning {income_range} annually, \
focusing on high spending and total monthly expenses.";

/// Annual income bracket, chosen from a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomeRange {
    #[serde(rename = "Less than $10,000")]
    Below10k,
    #[serde(rename = "$10,000 - $19,999")]
    From10kTo20k,
    #[serde(rename = "$20,000 - $29,999")]
    From20kTo30k,
    #[serde(rename = "$30,000 - $39,999")]
    From30kTo40k,
    #[serde(rename = "$40,000 - $49,999")]
    From40kTo50k,
    #[serde(rename = "$50,000 - $99,999")]
    From50kTo100k,
    #[serde(rename = "$100,000 - $149,999")]
    From100kTo150k,
    #[serde(rename = "More than $150,000")]
    Above150k,
}

impl IncomeRange {
    /// All brackets in ascending order.
    pub const ALL: [IncomeRange; 8] = [
        IncomeRange::Below10k,
        IncomeRange::From10kTo20k,
        IncomeRange::From20kTo30k,
        IncomeRange::From30kTo40k,
        IncomeRange::From40kTo50k,
        IncomeRange::From50kTo100k,
        IncomeRange::From100kTo150k,
        IncomeRange::Above150k,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IncomeRange::Below10k => "Less than $10,000",
            IncomeRange::From10kTo20k => "$10,000 - $19,999",
            IncomeRange::From20kTo30k => "$20,000 - $29,999",
            IncomeRange::From30kTo40k => "$30,000 - $39,999",
            IncomeRange::From40kTo50k => "$40,000 - $49,999",
            IncomeRange::From50kTo100k => "$50,000 - $99,999",
            IncomeRange::From100kTo150k => "$100,000 - $149,999",
            IncomeRange::Above150k => "More than $150,000",
        }
    }
}

impl fmt::Display for IncomeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a known income range")]
pub struct UnknownIncomeRange(pub String);

impl FromStr for IncomeRange {
    type Err = UnknownIncomeRange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IncomeRange::ALL
            .into_iter()
            .find(|r| r.label() == s)
            .ok_or_else(|| UnknownIncomeRange(s.to_string()))
    }
}

/// What the user told us about themselves for this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    /// Free text, possibly empty. Interpolated as-is.
    pub career: String,
    pub income_range: IncomeRange,
}

/// The single text payload sent to the advice service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AdvicePrompt(String);

impl AdvicePrompt {
    #[cfg(test)]
    pub fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Builds the advice prompt for a statement.
///
/// Only the kind of content matters: the extracted text or rows are not
/// embedded in the prompt.
pub fn build_prompt(content: &ExtractedContent, ctx: &UserContext) -> AdvicePrompt {
    let template = match content {
        ExtractedContent::PlainText(_) => PDF_ADVICE_TEMPLATE,
        ExtractedContent::Table(_) => CSV_ADVICE_TEMPLATE,
    };

    // Career goes in last so its text is never re-scanned for placeholders.
    AdvicePrompt(
        template
            .replace("{income_range}", ctx.income_range.label())
            .replace("{career}", &ctx.career),
    )
}
