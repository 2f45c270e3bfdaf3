//! Knowledge table: the ordered keyword-to-answer configuration of the resolver
//!
//! The table is built once at startup, either from the built-in demo content
//! or from a JSON file of the same shape, and is shared read-only behind an
//! `Arc` afterwards.

use crate::demo_data;
use crate::types::{ChatAnswer, KnowledgeEntry};
use crate::{NotebookError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, OnceLock};

static BUILTIN_TABLE: OnceLock<Arc<KnowledgeTable>> = OnceLock::new();

/// Ordered knowledge entries plus the fallback answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeTable {
    entries: Vec<KnowledgeEntry>,
    fallback: ChatAnswer,
}

impl KnowledgeTable {
    /// Build a table, validating every entry and the fallback
    pub fn new(entries: Vec<KnowledgeEntry>, fallback: ChatAnswer) -> Result<Self> {
        let table = Self { entries, fallback };
        table.validate()?;
        Ok(table)
    }

    /// The built-in demo table, shared across the process
    pub fn builtin() -> Arc<KnowledgeTable> {
        BUILTIN_TABLE
            .get_or_init(|| {
                Arc::new(Self {
                    entries: demo_data::knowledge_entries(),
                    fallback: demo_data::fallback_answer(),
                })
            })
            .clone()
    }

    /// Parse and validate a table from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let table: KnowledgeTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Load and validate a table from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            NotebookError::config(format!(
                "Failed to read knowledge table {}: {}",
                path.display(),
                e
            ))
        })?;
        let table = Self::from_json_str(&raw)?;
        tracing::info!(
            "Loaded knowledge table from {} ({} entries)",
            path.display(),
            table.len()
        );
        Ok(table)
    }

    /// Serialize as pretty JSON, suitable for [`KnowledgeTable::from_json_str`]
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Entries in match order
    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    /// Answer returned when nothing matches
    pub fn fallback(&self) -> &ChatAnswer {
        &self.fallback
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no entries (every query falls back)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn validate(&self) -> Result<()> {
        for (index, entry) in self.entries.iter().enumerate() {
            entry.validate().map_err(|e| match e {
                NotebookError::Validation(msg) => {
                    NotebookError::validation(format!("entry {}: {}", index, msg))
                }
                other => other,
            })?;
        }
        if self.fallback.response.is_empty() {
            return Err(NotebookError::validation(
                "Fallback response cannot be empty",
            ));
        }
        for source in &self.fallback.sources {
            source.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceCitation;
    use std::io::Write;

    #[test]
    fn test_builtin_table_is_valid() {
        let table = KnowledgeTable::builtin();
        assert_eq!(table.len(), 7);
        assert!(table.validate().is_ok());
        assert_eq!(table.fallback().sources.len(), 2);
    }

    #[test]
    fn test_builtin_table_is_shared() {
        let a = KnowledgeTable::builtin();
        let b = KnowledgeTable::builtin();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_json_export_reloads_identically() {
        let table = KnowledgeTable::builtin();
        let json = table.to_json_pretty().unwrap();
        let reloaded = KnowledgeTable::from_json_str(&json).unwrap();
        assert_eq!(&reloaded, table.as_ref());
    }

    #[test]
    fn test_from_json_rejects_invalid_entries() {
        let uppercase = r#"{
            "entries": [{ "keywords": ["Rust"], "response": "r", "sources": [] }],
            "fallback": { "response": "f", "sources": [] }
        }"#;
        let err = KnowledgeTable::from_json_str(uppercase).unwrap_err();
        assert!(err.to_string().contains("entry 0"));

        let bad_score = r#"{
            "entries": [{
                "keywords": ["rust"],
                "response": "r",
                "sources": [{ "filename": "a.md", "relevance_score": 1.5, "page_number": null }]
            }],
            "fallback": { "response": "f", "sources": [] }
        }"#;
        assert!(KnowledgeTable::from_json_str(bad_score).is_err());

        let empty_fallback = r#"{ "entries": [], "fallback": { "response": "" } }"#;
        assert!(KnowledgeTable::from_json_str(empty_fallback).is_err());
    }

    #[test]
    fn test_new_validates() {
        let ok = KnowledgeTable::new(
            vec![KnowledgeEntry::new(&["rust"], "Rust!", vec![])],
            ChatAnswer::new("nothing", vec![SourceCitation::new("a.md", 0.1, None)]),
        );
        assert!(ok.is_ok());

        let bad = KnowledgeTable::new(
            vec![],
            ChatAnswer::new("nothing", vec![SourceCitation::new("a.md", 0.1, Some(0))]),
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "entries": [{{ "keywords": ["tokio"], "response": "async" }}],
                 "fallback": {{ "response": "no idea" }} }}"#
        )
        .unwrap();

        let table = KnowledgeTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.entries()[0].sources.is_empty());

        let missing = KnowledgeTable::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(missing, NotebookError::Config(_)));
    }
}
