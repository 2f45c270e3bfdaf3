//! Configuration generator for Local Notebook
//!
//! Writes a commented `.env` for demo or live mode and can export the
//! built-in knowledge table as JSON, ready to edit and load with
//! `NOTEBOOK_KNOWLEDGE_FILE`.

use clap::{Parser, ValueEnum};
use notebook_core::{validate_base_url, KnowledgeTable, NotebookConfig, DEFAULT_API_BASE_URL};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output file path
    #[arg(short, long, default_value = ".env")]
    output: PathBuf,

    /// Which backend the front ends should use
    #[arg(short, long, value_enum, default_value = "demo")]
    mode: Mode,

    /// Base URL of the real backend (live mode)
    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    api_url: String,

    /// Also write the built-in knowledge table to this JSON file
    #[arg(long)]
    export_knowledge: Option<PathBuf>,

    /// Force overwrite if files exist
    #[arg(short, long)]
    force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Built-in demo backend, no Ollama or ChromaDB needed
    Demo,
    /// Real backend over HTTP
    Live,
}

fn generate_env_content(cli: &Cli, generated_at: &str) -> String {
    let defaults = NotebookConfig::default();
    let demo = cli.mode == Mode::Demo;

    let knowledge_line = match &cli.export_knowledge {
        Some(path) if demo => format!("NOTEBOOK_KNOWLEDGE_FILE={}", path.display()),
        _ => "# NOTEBOOK_KNOWLEDGE_FILE=knowledge.json".to_string(),
    };
    let folder_line = if demo {
        format!(
            "NOTEBOOK_DEFAULT_FOLDER={}",
            defaults.default_folder.unwrap_or_default()
        )
    } else {
        "# NOTEBOOK_DEFAULT_FOLDER=~/Documents".to_string()
    };

    format!(
        "# ========================================\n\
         # Local Notebook - Environment Configuration\n\
         # ========================================\n\
         # Generated: {}\n\
         # Mode: {:?}\n\
         \n\
         # Backend\n\
         NOTEBOOK_DEMO_MODE={}\n\
         NOTEBOOK_API_BASE_URL={}\n\
         NOTEBOOK_REQUEST_TIMEOUT_SECS={}\n\
         NOTEBOOK_CONNECT_TIMEOUT_SECS={}\n\
         \n\
         # Demo knowledge table (demo mode only)\n\
         {}\n\
         \n\
         # Front end\n\
         {}\n\
         NOTEBOOK_LIST_LIMIT={}\n\
         # Health refresh runs in live mode only\n\
         NOTEBOOK_HEALTH_INTERVAL_SECS={}\n\
         \n\
         # API server (notebook serve)\n\
         NOTEBOOK_SERVER_HOST={}\n\
         NOTEBOOK_SERVER_PORT={}\n\
         \n\
         # Logging Configuration\n\
         NOTEBOOK_LOG_LEVEL=info\n\
         # RUST_LOG=info,notebook_core=debug\n",
        generated_at,
        cli.mode,
        demo,
        cli.api_url.trim_end_matches('/'),
        defaults.request_timeout.as_secs(),
        defaults.connect_timeout.as_secs(),
        knowledge_line,
        folder_line,
        defaults.list_limit,
        defaults.health_interval.as_secs(),
        defaults.server_host,
        defaults.server_port,
    )
}

fn ensure_writable(path: &Path, force: bool) -> Result<(), String> {
    if path.exists() && !force {
        return Err(format!(
            "File {:?} already exists! Use --force to overwrite",
            path
        ));
    }
    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<(), String> {
    fs::write(path, content).map_err(|e| format!("Failed to write {:?}: {}", path, e))
}

fn run(cli: &Cli) -> Result<(), String> {
    validate_base_url(cli.api_url.trim_end_matches('/')).map_err(|e| e.to_string())?;

    // Refuse before writing anything
    ensure_writable(&cli.output, cli.force)?;
    if let Some(path) = &cli.export_knowledge {
        ensure_writable(path, cli.force)?;
    }

    println!("Local Notebook Configuration Generator");
    println!();

    if let Some(path) = &cli.export_knowledge {
        let json = KnowledgeTable::builtin()
            .to_json_pretty()
            .map_err(|e| e.to_string())?;
        write_file(path, &json)?;
        println!("✓ Knowledge table written to: {:?}", path);
    }

    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let content = generate_env_content(cli, &generated_at);
    write_file(&cli.output, &content)?;
    println!("✓ Configuration written to: {:?}", cli.output);

    println!();
    println!("Next Steps:");
    match cli.mode {
        Mode::Demo => {
            println!("   1. Run 'notebook chat' to try the demo");
            if cli.export_knowledge.is_some() {
                println!("   2. Edit the exported knowledge table to change demo answers");
            }
        }
        Mode::Live => {
            println!("   1. Start the backend at {}", cli.api_url);
            println!("   2. Install Ollama and run 'ollama pull phi3:mini'");
            println!("   3. Run 'notebook health' to check the connection");
        }
    }
    println!("   • Never commit .env to version control");
    println!();
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
