use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use super::error::AiError;
use super::extract::{DelimitedExtractor, StructuredExtractor, parse_object};
use super::generator::TextGenerator;

pub const FALLBACK_SUMMARY: &str = "Summary could not be generated.";
pub const FALLBACK_TAG: &str = "general";

/// AI-produced metadata for an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ContentSummary {
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ContentSummary {
    pub fn fallback() -> Self {
        Self {
            summary: FALLBACK_SUMMARY.to_string(),
            tags: vec![FALLBACK_TAG.to_string()],
        }
    }
}

fn summary_prompt(text: &str) -> String {
    format!(
        "Analyze the following text and generate a summary and relevant tags. Provide your \
         response as a single, valid JSON object with two keys: \"summary\" (a concise \
         one-sentence summary of the text) and \"tags\" (an array of relevant tags like \
         [\"web3\", \"monetization\", \"filecoin\"]).\n\nText: \"\"\"\n{text}\n\"\"\""
    )
}

/// Summarizes and tags uploaded text.
///
/// Never fails: any upstream problem is logged and replaced with
/// [`ContentSummary::fallback`].
#[derive(Clone)]
pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
    extractor: Arc<dyn StructuredExtractor>,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self::with_extractor(generator, Arc::new(DelimitedExtractor))
    }

    pub fn with_extractor(
        generator: Arc<dyn TextGenerator>,
        extractor: Arc<dyn StructuredExtractor>,
    ) -> Self {
        Self {
            generator,
            extractor,
        }
    }

    #[instrument(skip_all, fields(len = text.len()))]
    pub async fn summarize(&self, text: &str) -> ContentSummary {
        match self.try_summarize(text).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, "Error getting summary from AI, using fallback");
                ContentSummary::fallback()
            }
        }
    }

    async fn try_summarize(&self, text: &str) -> Result<ContentSummary, AiError> {
        let reply = self.generator.generate(&summary_prompt(text)).await?;
        let mut parsed: ContentSummary = parse_object(self.extractor.as_ref(), &reply)?;
        parsed.summary = parsed.summary.trim().to_string();
        parsed.tags = parsed
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        Ok(parsed)
    }
}
