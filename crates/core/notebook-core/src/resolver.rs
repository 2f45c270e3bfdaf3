//! Keyword response resolver
//!
//! Maps a [`ChatQuery`] to a [`ChatAnswer`] by scanning the knowledge table in
//! load order. The first entry with a keyword contained in the lowercased query
//! wins; keywords are tried in entry order. There is no ranking across entries.
//! When nothing matches, the table's fallback answer is returned.

use crate::knowledge::KnowledgeTable;
use crate::types::{ChatAnswer, ChatQuery, KnowledgeEntry};
use std::sync::Arc;
use tracing::debug;

/// A resolved answer together with what produced it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    /// An entry matched
    Matched {
        /// Index of the entry in the table
        entry_index: usize,
        /// Keyword that matched
        keyword: &'a str,
        /// The matching entry
        entry: &'a KnowledgeEntry,
    },
    /// Nothing matched
    Fallback,
}

/// Stateless resolver over a shared, read-only knowledge table
#[derive(Debug, Clone)]
pub struct ResponseResolver {
    table: Arc<KnowledgeTable>,
}

impl ResponseResolver {
    /// Create a resolver over an injected table
    pub fn new(table: Arc<KnowledgeTable>) -> Self {
        Self { table }
    }

    /// Resolver over the built-in demo table
    pub fn builtin() -> Self {
        Self::new(KnowledgeTable::builtin())
    }

    /// The table this resolver reads
    pub fn table(&self) -> &Arc<KnowledgeTable> {
        &self.table
    }

    /// Find the matching entry without cloning the answer
    pub fn lookup(&self, query: &ChatQuery) -> Resolution<'_> {
        let normalized = query.text.to_lowercase();
        self.table
            .entries()
            .iter()
            .enumerate()
            .find_map(|(entry_index, entry)| {
                entry.first_match(&normalized).map(|keyword| Resolution::Matched {
                    entry_index,
                    keyword,
                    entry,
                })
            })
            .unwrap_or(Resolution::Fallback)
    }

    /// Resolve a query to an answer; total over every input
    pub fn resolve(&self, query: &ChatQuery) -> ChatAnswer {
        match self.lookup(query) {
            Resolution::Matched {
                entry_index,
                keyword,
                entry,
            } => {
                debug!("Query matched entry {} on keyword '{}'", entry_index, keyword);
                ChatAnswer::new(entry.response.clone(), entry.sources.clone())
            }
            Resolution::Fallback => {
                debug!("Query matched no keyword, using fallback answer");
                self.table.fallback().clone()
            }
        }
    }
}

impl Default for ResponseResolver {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceCitation;

    fn resolver() -> ResponseResolver {
        ResponseResolver::builtin()
    }

    fn entry_index(query: &str) -> Option<usize> {
        match resolver().lookup(&ChatQuery::new(query)) {
            Resolution::Matched { entry_index, .. } => Some(entry_index),
            Resolution::Fallback => None,
        }
    }

    #[test]
    fn test_machine_learning_scenario() {
        let answer = resolver().resolve(&ChatQuery::new("What is machine learning?"));
        assert!(answer
            .response
            .starts_with("**Machine learning** is a subset"));
        assert_eq!(
            answer.sources,
            vec![
                SourceCitation::new("Machine_Learning_Basics.pdf", 0.94, Some(3)),
                SourceCitation::new("Neural_Networks_Overview.txt", 0.78, None),
            ]
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let r = resolver();
        let lower = r.resolve(&ChatQuery::new("machine learning"));
        assert_eq!(r.resolve(&ChatQuery::new("Machine Learning")), lower);
        assert_eq!(r.resolve(&ChatQuery::new("MACHINE LEARNING")), lower);
    }

    #[test]
    fn test_greeting_is_not_fallback() {
        assert_eq!(entry_index("hi"), Some(6));
        assert_eq!(entry_index("Hello there"), Some(6));
    }

    #[test]
    fn test_fallback_for_unmatched_and_empty_queries() {
        let r = resolver();
        let fallback = r.table().fallback().clone();
        assert_eq!(r.resolve(&ChatQuery::new("quantum gravity")), fallback);
        assert_eq!(r.resolve(&ChatQuery::new("")), fallback);
        assert_eq!(fallback.sources.len(), 2);
        assert_eq!(fallback.sources[0].filename, "RAG_Architecture_Guide.pdf");
    }

    #[test]
    fn test_table_order_beats_text_order() {
        // "python" (entry 2) appears before "machine learning" (entry 0) in the text
        assert_eq!(entry_index("python tips for machine learning"), Some(0));
        // "rag" (entry 1) beats "data" (entry 4)
        assert_eq!(entry_index("data flow in rag systems"), Some(1));
    }

    #[test]
    fn test_substring_matching() {
        // "ml" inside "html" selects the machine learning entry
        assert_eq!(entry_index("how do I parse HTML?"), Some(0));
    }

    #[test]
    fn test_keyword_order_within_entry() {
        match resolver().lookup(&ChatQuery::new("what is machine learning")) {
            Resolution::Matched { keyword, .. } => assert_eq!(keyword, "machine learning"),
            Resolution::Fallback => panic!("expected a match"),
        }
    }

    #[test]
    fn test_sample_questions_reach_their_topics() {
        assert_eq!(entry_index("Explain the RAG architecture"), Some(1));
        assert_eq!(entry_index("What are Python best practices?"), Some(2));
        assert_eq!(entry_index("How do neural networks work?"), Some(3));
        assert_eq!(entry_index("What is data preprocessing?"), Some(4));
        assert_eq!(entry_index("How do vector embeddings work?"), Some(5));
    }

    #[test]
    fn test_empty_table_always_falls_back() {
        let table = KnowledgeTable::new(vec![], ChatAnswer::new("nothing", vec![])).unwrap();
        let r = ResponseResolver::new(Arc::new(table));
        assert_eq!(r.resolve(&ChatQuery::new("machine learning")).response, "nothing");
    }
}
