//! Local Notebook Core
//!
//! This crate provides the types and the backend contract of a document Q&A
//! client for a local RAG backend. It includes:
//!
//! - The wire types shared by demo and live mode
//! - A keyword [`ResponseResolver`] over an injected [`KnowledgeTable`]
//! - Simulated latency raced against a [`CancellationToken`]
//! - The [`NotebookBackend`] trait and the in-process [`DemoBackend`]
//! - [`Session`] state for front ends (status, documents, transcript)
//!
//! # Example: Demo Mode
//!
//! ```no_run
//! use notebook_core::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let backend = DemoBackend::new();
//!     let answer = backend
//!         .chat(ChatRequest::new("What is machine learning?"), CancellationToken::new())
//!         .await?;
//!     println!("{}", answer.response);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod config;
pub mod demo_data;
pub mod error;
pub mod knowledge;
pub mod latency;
pub mod resolver;
pub mod session;
pub mod types;
pub mod utils;

// Re-export main types
pub use backend::{BackendMode, DemoBackend, NotebookBackend};
pub use config::{
    get_env_bool, get_env_int, get_env_or, load_env, load_env_from_path,
    validate_base_url, NotebookConfig, DEFAULT_API_BASE_URL,
};
pub use error::{NotebookError, Result};
pub use knowledge::KnowledgeTable;
pub use latency::{simulate_latency, with_deadline, CancellationToken, LatencyDelay, LatencyProfile};
pub use resolver::{Resolution, ResponseResolver};
pub use session::{ChatMessage, ConnectionStatus, Notice, NoticeLevel, Role, Session};
pub use types::*;
pub use utils::init_logging;
