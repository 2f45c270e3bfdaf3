//! Knowledge types

use crate::{NotebookError, Result};
use serde::{Deserialize, Serialize};

/// A reference to the document passage an answer is grounded in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCitation {
    /// Document file name
    pub filename: String,

    /// Relevance in [0, 1]
    pub relevance_score: f64,

    /// 1-based page number; serialized as `null` when the document has no pages
    #[serde(default)]
    pub page_number: Option<u32>,
}

impl SourceCitation {
    /// Create a citation
    pub fn new(filename: impl Into<String>, relevance_score: f64, page_number: Option<u32>) -> Self {
        Self {
            filename: filename.into(),
            relevance_score,
            page_number,
        }
    }

    /// Relevance as a percentage, e.g. `94.0` for a score of `0.94`
    pub fn relevance_percent(&self) -> f64 {
        self.relevance_score * 100.0
    }

    /// Check the score range and page number
    pub fn validate(&self) -> Result<()> {
        if self.filename.trim().is_empty() {
            return Err(NotebookError::validation("Citation filename cannot be empty"));
        }
        if !(0.0..=1.0).contains(&self.relevance_score) {
            return Err(NotebookError::validation(format!(
                "Relevance score for '{}' must be between 0.0 and 1.0, got {}",
                self.filename, self.relevance_score
            )));
        }
        if self.page_number == Some(0) {
            return Err(NotebookError::validation(format!(
                "Page number for '{}' must be positive",
                self.filename
            )));
        }
        Ok(())
    }
}

/// One keyword-to-answer row of the knowledge table.
///
/// Keywords are matched in order as lowercase substrings of the normalized
/// query. The entry is immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Ordered, lowercase, non-empty keywords
    pub keywords: Vec<String>,

    /// Canned answer text
    pub response: String,

    /// Ordered citations, primary first
    #[serde(default)]
    pub sources: Vec<SourceCitation>,
}

impl KnowledgeEntry {
    /// Create an entry from borrowed keyword literals
    pub fn new(keywords: &[&str], response: impl Into<String>, sources: Vec<SourceCitation>) -> Self {
        Self {
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            response: response.into(),
            sources,
        }
    }

    /// First keyword (in entry order) contained in an already-lowercased query
    pub fn first_match(&self, normalized_query: &str) -> Option<&str> {
        self.keywords
            .iter()
            .map(String::as_str)
            .find(|keyword| normalized_query.contains(keyword))
    }

    /// Check keyword and citation invariants
    pub fn validate(&self) -> Result<()> {
        if self.keywords.is_empty() {
            return Err(NotebookError::validation(
                "Knowledge entry must have at least one keyword",
            ));
        }
        for keyword in &self.keywords {
            if keyword.is_empty() {
                return Err(NotebookError::validation("Keywords cannot be empty"));
            }
            if keyword.to_lowercase() != *keyword {
                return Err(NotebookError::validation(format!(
                    "Keyword '{}' must be lowercase",
                    keyword
                )));
            }
        }
        if self.response.is_empty() {
            return Err(NotebookError::validation(format!(
                "Knowledge entry '{}' has an empty response",
                self.keywords[0]
            )));
        }
        self.sources.iter().try_for_each(SourceCitation::validate)
    }
}
