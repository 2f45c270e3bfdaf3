//! Wire types for the backend API
//!
//! These shapes are the contract shared by the demo backend, the HTTP backend
//! and the web adaptor, so callers never need to know which mode is active.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Status string reported by a healthy backend
pub const HEALTHY: &str = "healthy";

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// `healthy` or anything else
    pub status: String,

    /// Dependent services
    pub services: ServiceStatus,

    /// Vector store statistics
    pub database: DatabaseStats,

    /// Host resource usage
    pub system: SystemStats,
}

impl HealthReport {
    /// True when the backend reports itself healthy
    pub fn is_healthy(&self) -> bool {
        self.status == HEALTHY
    }

    /// True when both the LLM and the embedding model are loaded
    pub fn models_available(&self) -> bool {
        self.services.models.llm_available && self.services.models.embedding_available
    }
}

/// Connection state of the services behind the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    /// Ollama connection state
    #[serde(default)]
    pub ollama: Option<String>,

    /// ChromaDB connection state
    #[serde(default)]
    pub chromadb: Option<String>,

    /// Configured models
    pub models: ModelStatus,
}

/// Configured models and whether they are loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStatus {
    /// Generation model name
    pub llm: String,

    /// Embedding model name
    pub embedding: String,

    /// Generation model loaded
    pub llm_available: bool,

    /// Embedding model loaded
    pub embedding_available: bool,
}

/// Vector store statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseStats {
    /// Number of indexed documents
    pub document_count: u64,

    /// Number of stored chunks
    #[serde(default)]
    pub total_chunks: Option<u64>,
}

/// Host memory usage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStats {
    /// RAM in use, GB
    #[serde(deserialize_with = "number_or_string")]
    pub ram_used_gb: f64,

    /// Total RAM, GB
    #[serde(deserialize_with = "number_or_string")]
    pub ram_total_gb: f64,

    /// RAM in use, percent
    #[serde(deserialize_with = "number_or_string")]
    pub ram_percent: f64,
}

impl SystemStats {
    /// `6.2/16.0 GB (38.8%)`
    pub fn ram_summary(&self) -> String {
        format!(
            "{:.1}/{:.1} GB ({:.1}%)",
            self.ram_used_gb, self.ram_total_gb, self.ram_percent
        )
    }
}

/// Accept `6.2` as well as `"6.2"`; some backends send RAM figures as strings.
fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse::<f64>().map_err(|e| {
            serde::de::Error::custom(format!("expected a number, got '{}': {}", s, e))
        }),
    }
}

/// Indexed document metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// File name
    pub filename: String,

    /// Extension without the dot, e.g. `pdf`
    pub file_type: String,

    /// Number of chunks stored for this document
    pub chunk_count: u64,

    /// Size in bytes
    #[serde(default)]
    pub file_size: Option<u64>,

    /// When the document was indexed
    #[serde(default)]
    pub indexed_at: Option<DateTime<Utc>>,
}

impl DocumentInfo {
    /// `PDF • 24 chunks`
    pub fn summary(&self) -> String {
        format!(
            "{} \u{2022} {} chunks",
            self.file_type.to_uppercase(),
            self.chunk_count
        )
    }
}

/// Response of `GET /documents/list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentListing {
    /// Documents on this page
    #[serde(default)]
    pub documents: Vec<DocumentInfo>,

    /// Total number of indexed documents
    pub total: u64,

    /// Page number, 1-based
    #[serde(default = "default_page")]
    pub page: u32,

    /// Page size
    #[serde(default = "default_list_limit")]
    pub limit: usize,
}

fn default_page() -> u32 {
    1
}

/// Default page size used by the front end
pub fn default_list_limit() -> usize {
    100
}

/// Query string of `GET /documents/list`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Page size
    #[serde(default = "default_list_limit")]
    pub limit: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: default_list_limit(),
        }
    }
}

/// Body of `POST /documents/index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRequest {
    /// Folder to index; echoed back in the report
    pub folder_path: String,

    /// Descend into sub-folders
    #[serde(default = "default_recursive")]
    pub recursive: bool,

    /// Restrict to these extensions; `null` means every supported type
    #[serde(default)]
    pub file_types: Option<Vec<String>>,
}

fn default_recursive() -> bool {
    true
}

impl IndexRequest {
    /// Recursive request over every supported file type
    pub fn new(folder_path: impl Into<String>) -> Self {
        Self {
            folder_path: folder_path.into(),
            recursive: true,
            file_types: None,
        }
    }

    /// Set the recursive flag
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Restrict to the given extensions; an empty list means no filter
    pub fn with_file_types(mut self, file_types: Vec<String>) -> Self {
        self.file_types = if file_types.is_empty() {
            None
        } else {
            Some(file_types)
        };
        self
    }
}

/// Outcome of an indexing run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexStatus {
    /// Every file indexed
    Success,
    /// Some files failed
    Partial,
    /// Nothing indexed
    Failed,
}

/// Response of `POST /documents/index`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexReport {
    /// Overall outcome
    pub status: IndexStatus,

    /// Folder that was indexed
    #[serde(default)]
    pub folder_path: Option<String>,

    /// Files indexed
    pub indexed_files: u64,

    /// Files that failed
    pub failed_files: u64,

    /// Chunks created
    #[serde(default)]
    pub total_chunks: Option<u64>,

    /// Wall time in seconds
    pub processing_time: f64,

    /// Per-file error messages
    #[serde(default)]
    pub errors: Vec<String>,
}

impl IndexReport {
    /// True when the run indexed everything
    pub fn is_success(&self) -> bool {
        self.status == IndexStatus::Success
    }
}
