//! Wrappers around the hosted generative model.

mod error;
mod extract;
mod generator;
mod keywords;
mod summarize;

pub use error::AiError;
pub use extract::{DelimitedExtractor, StructuredExtractor, parse_array, parse_object};
pub use generator::{GeminiClient, TextGenerator};
pub use keywords::KeywordExtractor;
pub use summarize::{ContentSummary, FALLBACK_SUMMARY, FALLBACK_TAG, Summarizer};

#[cfg(test)]
pub(crate) use summarize::tests::Scripted;
