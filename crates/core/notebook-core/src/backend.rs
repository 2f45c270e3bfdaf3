//! Backend contract shared by demo and live mode
//!
//! Every front end talks to a [`NotebookBackend`]. The demo implementation
//! lives here; the HTTP implementation lives in the provider crate. Both
//! return the same wire types, so adaptors never branch on the mode.

use crate::demo_data::{self, DEMO_EMBEDDING_MODEL, DEMO_LLM_MODEL, DEMO_PROCESSING_TIME_SECS};
use crate::knowledge::KnowledgeTable;
use crate::latency::{simulate_latency, CancellationToken, LatencyProfile};
use crate::resolver::ResponseResolver;
use crate::types::{
    ChatAnswer, ChatRequest, DatabaseStats, DocumentInfo, DocumentListing, HealthReport,
    IndexReport, IndexRequest, IndexStatus, ModelStatus, ServiceStatus, SystemStats, HEALTHY,
};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Which kind of backend is answering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Static tables with simulated latency
    Demo,
    /// A real backend over HTTP
    Live,
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendMode::Demo => write!(f, "demo"),
            BackendMode::Live => write!(f, "live"),
        }
    }
}

/// The four operations of the document Q&A API
///
/// Implementations must be stateless per call. A cancelled token resolves a
/// pending call with [`crate::NotebookError::Cancelled`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotebookBackend: Send + Sync {
    /// Which kind of backend this is
    fn mode(&self) -> BackendMode;

    /// `GET /health`
    async fn health(&self, cancel: CancellationToken) -> Result<HealthReport>;

    /// `GET /documents/list?limit=N`
    async fn list_documents(
        &self,
        limit: usize,
        cancel: CancellationToken,
    ) -> Result<DocumentListing>;

    /// `POST /documents/index`
    async fn index_folder(
        &self,
        request: IndexRequest,
        cancel: CancellationToken,
    ) -> Result<IndexReport>;

    /// `POST /chat/message`
    async fn chat(&self, request: ChatRequest, cancel: CancellationToken) -> Result<ChatAnswer>;
}

/// Backend answering from static tables after a simulated delay
#[derive(Debug, Clone)]
pub struct DemoBackend {
    resolver: ResponseResolver,
    documents: Arc<Vec<DocumentInfo>>,
    latency: LatencyProfile,
}

impl DemoBackend {
    /// Demo backend over the built-in table and catalog with realistic delays
    pub fn new() -> Self {
        Self {
            resolver: ResponseResolver::builtin(),
            documents: Arc::new(demo_data::sample_documents()),
            latency: LatencyProfile::realistic(),
        }
    }

    /// Replace the latency profile
    pub fn with_latency(mut self, latency: LatencyProfile) -> Self {
        self.latency = latency;
        self
    }

    /// Replace the knowledge table
    pub fn with_table(mut self, table: Arc<KnowledgeTable>) -> Self {
        self.resolver = ResponseResolver::new(table);
        self
    }

    /// Replace the document catalog
    pub fn with_documents(mut self, documents: Vec<DocumentInfo>) -> Self {
        self.documents = Arc::new(documents);
        self
    }

    /// The resolver answering chat messages
    pub fn resolver(&self) -> &ResponseResolver {
        &self.resolver
    }

    /// The pre-indexed catalog
    pub fn documents(&self) -> &[DocumentInfo] {
        &self.documents
    }

    fn total_chunks(&self) -> u64 {
        self.documents.iter().map(|d| d.chunk_count).sum()
    }

    fn document_count(&self) -> u64 {
        self.documents.len() as u64
    }
}

impl Default for DemoBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotebookBackend for DemoBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Demo
    }

    async fn health(&self, cancel: CancellationToken) -> Result<HealthReport> {
        simulate_latency(self.latency.health, &cancel).await?;
        debug!("Demo health probe");
        Ok(HealthReport {
            status: HEALTHY.to_string(),
            services: ServiceStatus {
                ollama: Some("connected".to_string()),
                chromadb: Some("connected".to_string()),
                models: ModelStatus {
                    llm: DEMO_LLM_MODEL.to_string(),
                    embedding: DEMO_EMBEDDING_MODEL.to_string(),
                    llm_available: true,
                    embedding_available: true,
                },
            },
            database: DatabaseStats {
                document_count: self.document_count(),
                total_chunks: Some(self.total_chunks()),
            },
            system: SystemStats {
                ram_used_gb: 6.2,
                ram_total_gb: 16.0,
                ram_percent: 38.8,
            },
        })
    }

    async fn list_documents(
        &self,
        limit: usize,
        cancel: CancellationToken,
    ) -> Result<DocumentListing> {
        simulate_latency(self.latency.list_documents, &cancel).await?;
        debug!("Demo document listing (limit {})", limit);
        Ok(DocumentListing {
            documents: self.documents.iter().take(limit).cloned().collect(),
            total: self.document_count(),
            page: 1,
            limit,
        })
    }

    async fn index_folder(
        &self,
        request: IndexRequest,
        cancel: CancellationToken,
    ) -> Result<IndexReport> {
        simulate_latency(self.latency.index_folder, &cancel).await?;
        info!("Demo indexing of '{}'", request.folder_path);
        Ok(IndexReport {
            status: IndexStatus::Success,
            folder_path: Some(request.folder_path),
            indexed_files: self.document_count(),
            failed_files: 0,
            total_chunks: Some(self.total_chunks()),
            processing_time: DEMO_PROCESSING_TIME_SECS,
            errors: Vec::new(),
        })
    }

    async fn chat(&self, request: ChatRequest, cancel: CancellationToken) -> Result<ChatAnswer> {
        simulate_latency(self.latency.chat, &cancel).await?;
        Ok(self.resolver.resolve(&request.to_query()))
    }
}
