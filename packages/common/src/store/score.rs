//! Keyword scoring shared by every content store.

use crate::content::ContentRecord;

/// Lowercase, trim and drop blank keywords, preserving order.
pub fn normalize_keywords(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Lowercased copies of the fields a keyword is matched against.
///
/// Tags are folded from their stored JSON text. SQL backends persist these
/// values so their `LIKE` predicate never depends on the database's own case
/// folding, which is ASCII-only in SQLite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFields {
    pub title: String,
    pub tags: String,
    pub summary: String,
}

impl SearchFields {
    pub fn of(record: &ContentRecord) -> Self {
        Self {
            title: record.title.to_lowercase(),
            tags: record.tags_json().to_lowercase(),
            summary: record.summary.to_lowercase(),
        }
    }

    fn contains(&self, keyword: &str) -> bool {
        self.title.contains(keyword) || self.tags.contains(keyword) || self.summary.contains(keyword)
    }
}

/// Count how many keywords occur in the record's searchable fields.
///
/// Keywords are expected to be normalized with [`normalize_keywords`].
pub fn match_score(record: &ContentRecord, keywords: &[String]) -> u32 {
    let fields = SearchFields::of(record);
    keywords.iter().filter(|k| fields.contains(k)).count() as u32
}
