//! Front-end session state
//!
//! A [`Session`] holds what a document Q&A front end shows: connection status,
//! the indexed document list, the chat transcript and the folder to index.
//! Each handler takes the backend plus a cancellation token, updates the
//! session and returns the [`Notice`]s the front end should display.

use crate::backend::NotebookBackend;
use crate::latency::CancellationToken;
use crate::types::{
    default_list_limit, ChatRequest, DocumentInfo, HealthReport, IndexRequest, SourceCitation,
};
use crate::NotebookError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, warn};

/// Assistant message shown when a chat request fails
pub const CHAT_FAILURE_MESSAGE: &str =
    "Sorry, I encountered an error while processing your message. Please try again.";

/// Connection state shown in the status indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStatus {
    /// No health probe has completed yet
    Checking,
    /// Backend healthy
    Connected,
    /// Backend reachable but not healthy
    Unhealthy,
    /// Backend unreachable
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ConnectionStatus::Checking => "Checking...",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Unhealthy => "Unhealthy",
            ConnectionStatus::Disconnected => "Disconnected",
        };
        f.write_str(text)
    }
}

/// Severity of a [`Notice`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Neutral information
    Info,
    /// An operation succeeded
    Success,
    /// Something needs attention
    Warning,
    /// An operation failed
    Error,
}

/// A transient message for the user (a toast in a GUI, a status line in a terminal)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Text to display
    pub message: String,
}

impl Notice {
    /// Info notice
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    /// Success notice
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    /// Warning notice
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    /// Error notice
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Who wrote a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person asking
    User,
    /// The document assistant
    Assistant,
}

/// One message of the chat transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author
    pub role: Role,
    /// Text, possibly with `**bold**` markers
    pub content: String,
    /// Citations shown under assistant answers
    #[serde(default)]
    pub sources: Vec<SourceCitation>,
    /// True for the apology shown after a failed request
    #[serde(default)]
    pub is_error: bool,
}

impl ChatMessage {
    fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: Vec::new(),
            is_error: false,
        }
    }

    fn assistant(content: impl Into<String>, sources: Vec<SourceCitation>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            sources,
            is_error: false,
        }
    }

    fn failure() -> Self {
        Self {
            is_error: true,
            ..Self::assistant(CHAT_FAILURE_MESSAGE, Vec::new())
        }
    }
}

/// State of one front-end session
#[derive(Debug, Clone)]
pub struct Session {
    status: ConnectionStatus,
    health: Option<HealthReport>,
    documents: Vec<DocumentInfo>,
    document_total: u64,
    has_documents: bool,
    transcript: Vec<ChatMessage>,
    folder_path: String,
    list_limit: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Empty session with the default listing page size
    pub fn new() -> Self {
        Self {
            status: ConnectionStatus::Checking,
            health: None,
            documents: Vec::new(),
            document_total: 0,
            has_documents: false,
            transcript: Vec::new(),
            folder_path: String::new(),
            list_limit: default_list_limit(),
        }
    }

    /// Prefill the folder input
    pub fn with_folder(mut self, folder_path: impl Into<String>) -> Self {
        self.folder_path = folder_path.into();
        self
    }

    /// Page size used when listing documents
    pub fn with_list_limit(mut self, list_limit: usize) -> Self {
        self.list_limit = list_limit.max(1);
        self
    }

    /// Connection state
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Last healthy report
    pub fn health(&self) -> Option<&HealthReport> {
        self.health.as_ref()
    }

    /// Documents shown in the sidebar
    pub fn documents(&self) -> &[DocumentInfo] {
        &self.documents
    }

    /// Total indexed documents as reported by the backend
    pub fn document_total(&self) -> u64 {
        self.document_total
    }

    /// True once at least one document is indexed
    pub fn has_documents(&self) -> bool {
        self.has_documents
    }

    /// Chat transcript, oldest first
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Folder currently in the folder input
    pub fn folder_path(&self) -> &str {
        &self.folder_path
    }

    /// Sending requires non-blank input and indexed documents
    pub fn can_send(&self, input: &str) -> bool {
        self.has_documents && !input.trim().is_empty()
    }

    /// Probe health, then load the document list
    pub async fn init(
        &mut self,
        backend: &dyn NotebookBackend,
        cancel: &CancellationToken,
    ) -> Vec<Notice> {
        let mut notices = self.check_health(backend, cancel).await;
        notices.extend(self.refresh_documents(backend, cancel).await);
        notices
    }

    /// Probe backend health and update the status indicator
    pub async fn check_health(
        &mut self,
        backend: &dyn NotebookBackend,
        cancel: &CancellationToken,
    ) -> Vec<Notice> {
        match backend.health(cancel.clone()).await {
            Ok(report) if report.is_healthy() => {
                self.status = ConnectionStatus::Connected;
                let mut notices = Vec::new();
                if !report.models_available() {
                    warn!(
                        "Models unavailable: llm={} ({}), embedding={} ({})",
                        report.services.models.llm,
                        report.services.models.llm_available,
                        report.services.models.embedding,
                        report.services.models.embedding_available
                    );
                    notices.push(Notice::warning(
                        "Warning: Some models are not available. Please check Ollama.",
                    ));
                }
                self.health = Some(report);
                notices
            }
            Ok(report) => {
                warn!("Backend reported status '{}'", report.status);
                self.status = ConnectionStatus::Unhealthy;
                vec![Notice::error("System health check failed")]
            }
            Err(NotebookError::Cancelled(_)) => Vec::new(),
            Err(e) => {
                error!("Health check failed: {}", e);
                self.status = ConnectionStatus::Disconnected;
                vec![Notice::error(
                    "Cannot connect to server. Make sure the backend is running.",
                )]
            }
        }
    }

    /// Reload the document list
    pub async fn refresh_documents(
        &mut self,
        backend: &dyn NotebookBackend,
        cancel: &CancellationToken,
    ) -> Vec<Notice> {
        match backend.list_documents(self.list_limit, cancel.clone()).await {
            Ok(listing) => {
                self.has_documents = !listing.documents.is_empty();
                self.document_total = if self.has_documents { listing.total } else { 0 };
                self.documents = listing.documents;
                debug!("Loaded {} documents", self.documents.len());
                Vec::new()
            }
            Err(NotebookError::Cancelled(_)) => Vec::new(),
            Err(e) => {
                error!("Failed to load documents: {}", e);
                vec![Notice::error("Failed to load documents")]
            }
        }
    }

    /// Index a folder, then refresh the document list (and health on success)
    pub async fn index_folder(
        &mut self,
        backend: &dyn NotebookBackend,
        folder_path: &str,
        cancel: &CancellationToken,
    ) -> Vec<Notice> {
        let folder_path = folder_path.trim();
        if folder_path.is_empty() {
            return vec![Notice::warning("Please enter a folder path")];
        }
        self.folder_path = folder_path.to_string();

        let request = IndexRequest::new(folder_path);
        match backend.index_folder(request, cancel.clone()).await {
            Ok(report) if report.is_success() => {
                let mut notices = vec![Notice::success(format!(
                    "Successfully indexed {} files in {:.2}s",
                    report.indexed_files, report.processing_time
                ))];
                notices.extend(self.refresh_documents(backend, cancel).await);
                notices.extend(self.check_health(backend, cancel).await);
                notices
            }
            Ok(report) => {
                for message in &report.errors {
                    warn!("Indexing error: {}", message);
                }
                let mut notices = vec![Notice::warning(format!(
                    "Indexing completed with errors. {} files failed.",
                    report.failed_files
                ))];
                notices.extend(self.refresh_documents(backend, cancel).await);
                notices
            }
            Err(NotebookError::Cancelled(_)) => Vec::new(),
            Err(e) => {
                error!("Indexing failed: {}", e);
                vec![Notice::error(
                    "Failed to index documents. Check the logs for details.",
                )]
            }
        }
    }

    /// Send a chat message and record the exchange in the transcript
    ///
    /// Does nothing when [`Session::can_send`] is false.
    pub async fn send_message(
        &mut self,
        backend: &dyn NotebookBackend,
        input: &str,
        cancel: &CancellationToken,
    ) -> Vec<Notice> {
        if !self.can_send(input) {
            return Vec::new();
        }
        let message = input.trim();
        self.transcript.push(ChatMessage::user(message));

        match backend.chat(ChatRequest::new(message), cancel.clone()).await {
            Ok(answer) if !answer.response.is_empty() => {
                self.transcript
                    .push(ChatMessage::assistant(answer.response, answer.sources));
                Vec::new()
            }
            Ok(_) => vec![Notice::error("Received empty response from server")],
            Err(NotebookError::Cancelled(_)) => vec![Notice::info("Request cancelled")],
            Err(e) => {
                error!("Chat failed: {}", e);
                self.transcript.push(ChatMessage::failure());
                vec![Notice::error("Failed to get response")]
            }
        }
    }

    /// Drop the transcript
    pub fn clear_chat(&mut self) -> Vec<Notice> {
        self.transcript.clear();
        vec![Notice::success("Chat cleared")]
    }
}
