use std::sync::Arc;

use common::store::normalize_keywords;
use tracing::{debug, instrument, warn};

use super::error::AiError;
use super::extract::{DelimitedExtractor, StructuredExtractor, parse_array};
use super::generator::TextGenerator;

fn keyword_prompt(query: &str) -> String {
    format!(
        "Extract the most relevant keywords from the following search query. Remove common \
         stopwords, filler words, and words like 'the', 'and', 'of', etc. Return the keywords \
         as a JSON array of strings, e.g., [\"ram\", \"bheem\", \"adventure\"].\n\nQuery: \
         \"\"\"{query}\"\"\""
    )
}

/// Turns a natural-language query into search keywords.
///
/// Failures yield an empty list, which callers treat as "no match".
#[derive(Clone)]
pub struct KeywordExtractor {
    generator: Arc<dyn TextGenerator>,
    extractor: Arc<dyn StructuredExtractor>,
}

impl KeywordExtractor {
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

    #[instrument(skip(self))]
    pub async fn extract(&self, query: &str) -> Vec<String> {
        match self.try_extract(query).await {
            Ok(keywords) => {
                debug!(?keywords, "Extracted keywords");
                keywords
            }
            Err(e) => {
                warn!(error = %e, "Error extracting keywords from AI");
                vec![]
            }
        }
    }

    async fn try_extract(&self, query: &str) -> Result<Vec<String>, AiError> {
        let reply = self.generator.generate(&keyword_prompt(query)).await?;
        let raw: Vec<String> = parse_array(self.extractor.as_ref(), &reply)?;
        Ok(normalize_keywords(&raw))
    }
}
