use anyhow::Context;
use clap::{Parser, Subcommand};
use notebook_adaptor_terminal::render;
use notebook_adaptor_terminal::{TerminalAdaptor, TerminalConfig};
use notebook_adaptor_web::{ApiServerConfig, NotebookApiServer};
use notebook_core::{
    init_logging, load_env, load_env_from_path, with_deadline, CancellationToken, ChatRequest,
    DemoBackend, IndexRequest, KnowledgeTable, NotebookBackend, NotebookConfig,
};
use notebook_provider_http::{HttpBackend, HttpBackendConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "notebook",
    version,
    about = "Ask questions about your local documents through a RAG backend"
)]
struct Cli {
    /// Answer from the built-in demo backend
    #[arg(long, global = true, conflicts_with = "live")]
    demo: bool,

    /// Talk to the real backend at --api-url
    #[arg(long, global = true)]
    live: bool,

    /// Base URL of the real backend
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// JSON knowledge table for demo mode
    #[arg(long, global = true)]
    knowledge: Option<PathBuf>,

    /// Environment file to load instead of ./.env
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Log filter, e.g. `info` or `notebook_core=debug`
    #[arg(long, global = true, env = "NOTEBOOK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print one-shot results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the document Q&A API over HTTP
    Serve {
        /// Bind host
        #[arg(long)]
        host: Option<String>,
        /// Bind port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Interactive chat in the terminal (default)
    Chat,
    /// Ask a single question
    Ask {
        /// The question
        #[arg(required = true)]
        question: Vec<String>,
    },
    /// Show backend health
    Health,
    /// List indexed documents
    Docs {
        /// Page size
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Index a folder
    Index {
        /// Folder to index
        path: String,
        /// Do not descend into sub-folders
        #[arg(long)]
        no_recursive: bool,
        /// Only index these extensions (repeatable)
        #[arg(long = "file-type")]
        file_types: Vec<String>,
    },
}

fn resolve_config(cli: &Cli) -> anyhow::Result<NotebookConfig> {
    let mut config = NotebookConfig::from_env().context("invalid NOTEBOOK_* configuration")?;
    if cli.demo {
        config.demo_mode = true;
    }
    if cli.live {
        config.demo_mode = false;
    }
    if let Some(url) = &cli.api_url {
        notebook_core::validate_base_url(url)?;
        config.api_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(path) = &cli.knowledge {
        config.knowledge_file = Some(path.clone());
    }
    Ok(config)
}

fn build_backend(config: &NotebookConfig) -> anyhow::Result<Arc<dyn NotebookBackend>> {
    if config.demo_mode {
        let mut backend = DemoBackend::new();
        if let Some(path) = &config.knowledge_file {
            let table = KnowledgeTable::load(path)
                .with_context(|| format!("loading knowledge table {}", path.display()))?;
            backend = backend.with_table(Arc::new(table));
        }
        info!("Demo mode: answers come from the built-in knowledge table");
        Ok(Arc::new(backend))
    } else {
        if config.knowledge_file.is_some() {
            warn!("Knowledge table is ignored against a live backend");
        }
        let backend = HttpBackend::new(HttpBackendConfig::from(config))?;
        info!("Live mode: using backend at {}", backend.base_url());
        Ok(Arc::new(backend))
    }
}

/// Token cancelled by the first Ctrl-C
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });
    cancel
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.env_file {
        Some(path) => load_env_from_path(path)?,
        None => load_env()?,
    }
    init_logging(cli.log_level.as_deref());

    let config = resolve_config(&cli)?;
    let backend = build_backend(&config)?;
    let timeout = config.request_timeout;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Serve { host, port } => {
            let mut server_config = ApiServerConfig::from(&config);
            if let Some(host) = host {
                server_config.host = host;
            }
            if let Some(port) = port {
                server_config.port = port;
            }
            NotebookApiServer::new(server_config, backend).run().await?;
        }
        Commands::Chat => {
            TerminalAdaptor::new(TerminalConfig::from_notebook_config(&config), backend)
                .start()
                .await?;
        }
        Commands::Ask { question } => {
            let cancel = cancel_on_ctrl_c();
            let request = ChatRequest::new(question.join(" "));
            let answer =
                with_deadline(timeout, &cancel, backend.chat(request, cancel.clone())).await?;
            if cli.json {
                print_json(&answer)?;
            } else {
                println!("{}", render::format_message(&answer.response, true));
                for (i, source) in answer.sources.iter().enumerate() {
                    println!("{}", render::format_citation(i, source));
                }
            }
        }
        Commands::Health => {
            let cancel = cancel_on_ctrl_c();
            let report = with_deadline(timeout, &cancel, backend.health(cancel.clone())).await?;
            if cli.json {
                print_json(&report)?;
            } else {
                println!("Status:    {}", report.status);
                println!("LLM:       {}", report.services.models.llm);
                println!("Embedding: {}", report.services.models.embedding);
                println!("Documents: {}", report.database.document_count);
                println!("RAM:       {}", report.system.ram_summary());
                if !report.models_available() {
                    println!("Warning: Some models are not available. Please check Ollama.");
                }
            }
        }
        Commands::Docs { limit } => {
            let cancel = cancel_on_ctrl_c();
            let limit = limit.unwrap_or(config.list_limit);
            let listing = with_deadline(
                timeout,
                &cancel,
                backend.list_documents(limit, cancel.clone()),
            )
            .await?;
            if cli.json {
                print_json(&listing)?;
            } else {
                for line in render::format_documents(&listing.documents) {
                    println!("{}", line);
                }
                println!("Total: {}", listing.total);
            }
        }
        Commands::Index {
            path,
            no_recursive,
            file_types,
        } => {
            let cancel = cancel_on_ctrl_c();
            let request = IndexRequest::new(path)
                .recursive(!no_recursive)
                .with_file_types(file_types);
            let report = with_deadline(
                timeout,
                &cancel,
                backend.index_folder(request, cancel.clone()),
            )
            .await?;
            if cli.json {
                print_json(&report)?;
            } else if report.is_success() {
                println!(
                    "Successfully indexed {} files in {:.2}s",
                    report.indexed_files, report.processing_time
                );
            } else {
                println!(
                    "Indexing completed with errors. {} files failed.",
                    report.failed_files
                );
                for error in &report.errors {
                    println!("  {}", error);
                }
            }
        }
    }

    Ok(())
}
