use serde::de::DeserializeOwned;

use super::error::AiError;

/// Locates machine-readable JSON inside free-form model output.
pub trait StructuredExtractor: Send + Sync {
    /// The JSON object embedded in `text`, if any.
    fn object<'a>(&self, text: &'a str) -> Option<&'a str>;

    /// The JSON array embedded in `text`, if any.
    fn array<'a>(&self, text: &'a str) -> Option<&'a str>;
}

/// Delimiter scan: an object spans the first `{` to the last `}`, an array
/// spans the first `[` to the next `]`.
///
/// Nested arrays are therefore cut at the first closing bracket, which is
/// fine for flat keyword lists.
#[derive(Debug, Default, Clone, Copy)]
pub struct DelimitedExtractor;

impl StructuredExtractor for DelimitedExtractor {
    fn object<'a>(&self, text: &'a str) -> Option<&'a str> {
        let start = text.find('{')?;
        let end = text.rfind('}')?;
        (end > start).then(|| &text[start..=end])
    }

    fn array<'a>(&self, text: &'a str) -> Option<&'a str> {
        let start = text.find('[')?;
        let len = text[start..].find(']')?;
        Some(&text[start..=start + len])
    }
}

pub fn parse_object<T: DeserializeOwned>(
    extractor: &dyn StructuredExtractor,
    text: &str,
) -> Result<T, AiError> {
    let json = extractor.object(text).ok_or(AiError::NoJson("object"))?;
    Ok(serde_json::from_str(json)?)
}

pub fn parse_array<T: DeserializeOwned>(
    extractor: &dyn StructuredExtractor,
    text: &str,
) -> Result<Vec<T>, AiError> {
    let json = extractor.array(text).ok_or(AiError::NoJson("array"))?;
    Ok(serde_json::from_str(json)?)
}
