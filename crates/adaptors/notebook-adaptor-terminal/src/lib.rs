//! Terminal adaptor
//!
//! Line-oriented front end over a [`NotebookBackend`]: plain lines are chat
//! messages, slash commands manage documents and the session.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod render;

use notebook_core::{
    CancellationToken, Notice, NotebookBackend, NotebookConfig, Result, Session,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const HELP: &str = "\
Commands:
  /index [folder]   index a folder (defaults to the prefilled folder)
  /docs             list indexed documents
  /health           refresh system status
  /clear            clear the conversation
  /help             show this help
  /quit             leave
Anything else is sent as a question about your documents.";

/// Terminal adaptor configuration
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Folder used by a bare `/index`
    pub default_folder: Option<String>,

    /// Automatic health refresh; `None` disables it
    pub health_interval: Option<Duration>,

    /// Document listing page size
    pub list_limit: usize,

    /// ANSI colors and bold
    pub color: bool,

    /// Listen for Ctrl-C: it cancels a pending request, or quits when idle
    pub cancel_on_interrupt: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            default_folder: None,
            health_interval: None,
            list_limit: notebook_core::default_list_limit(),
            color: false,
            cancel_on_interrupt: false,
        }
    }
}

impl TerminalConfig {
    /// Settings derived from the runtime configuration; health refresh only
    /// runs against a live backend.
    pub fn from_notebook_config(config: &NotebookConfig) -> Self {
        Self {
            default_folder: config.default_folder.clone(),
            health_interval: (!config.demo_mode).then_some(config.health_interval),
            list_limit: config.list_limit,
            color: true,
            cancel_on_interrupt: true,
        }
    }
}

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/index [folder]`
    Index(Option<String>),
    /// `/docs`
    Docs,
    /// `/health`
    Health,
    /// `/clear`
    Clear,
    /// `/help`
    Help,
    /// `/quit` or `/exit`
    Quit,
    /// Unrecognized slash command
    Unknown(String),
    /// A question
    Ask(String),
}

impl Command {
    /// Parse one input line
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Ask(line.to_string());
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim().to_string()).filter(|a| !a.is_empty())),
            None => (rest, None),
        };
        match name.to_lowercase().as_str() {
            "index" => Command::Index(arg),
            "docs" | "documents" => Command::Docs,
            "health" | "status" => Command::Health,
            "clear" => Command::Clear,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Interactive terminal front end
pub struct TerminalAdaptor {
    /// Adaptor configuration
    pub config: TerminalConfig,
    /// Backend answering requests
    pub backend: Arc<dyn NotebookBackend>,
    interrupts: Arc<Notify>,
}

impl TerminalAdaptor {
    /// Create a terminal adaptor
    pub fn new(config: TerminalConfig, backend: Arc<dyn NotebookBackend>) -> Self {
        Self {
            config,
            backend,
            interrupts: Arc::new(Notify::new()),
        }
    }

    /// Interrupt source; `notify_waiters` on it acts like Ctrl-C
    pub fn interrupt_handle(&self) -> Arc<Notify> {
        self.interrupts.clone()
    }

    /// Run on stdin/stdout until `/quit`, end of input or an idle Ctrl-C
    pub async fn start(&self) -> Result<Session> {
        let listener = self.config.cancel_on_interrupt.then(|| {
            let interrupts = self.interrupts.clone();
            tokio::spawn(async move {
                loop {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        warn!("Cannot listen for Ctrl-C: {}", e);
                        break;
                    }
                    interrupts.notify_waiters();
                }
            })
        });

        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        let result = self.run_with_io(stdin, stdout).await;
        if let Some(listener) = listener {
            listener.abort();
        }
        result
    }

    /// Run over arbitrary input and output; returns the final session
    pub async fn run_with_io<R, W>(&self, input: R, mut output: W) -> Result<Session>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut session = Session::new().with_list_limit(self.config.list_limit);
        if let Some(folder) = &self.config.default_folder {
            session = session.with_folder(folder.clone());
        }

        let mode = self.backend.mode();
        write_line(
            &mut output,
            &format!("Local Notebook ({} mode). Type /help for commands.", mode),
        )
        .await?;

        let notices = session.init(self.backend.as_ref(), &CancellationToken::new()).await;
        self.write_notices(&mut output, &notices).await?;
        write_line(&mut output, &render::format_status(&session)).await?;
        if !session.has_documents() {
            write_line(&mut output, "No documents indexed yet. Use /index <folder>.").await?;
        }

        let mut lines = input.lines();
        let mut ticker = self.config.health_interval.map(|period| {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            interval
        });

        loop {
            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = self.interrupts.notified() => {
                    debug!("Interrupted at the prompt");
                    write_line(&mut output, "Interrupted. Bye.").await?;
                    break;
                }
                _ = tick(&mut ticker) => {
                    debug!("Periodic health refresh");
                    let notices = session
                        .check_health(self.backend.as_ref(), &CancellationToken::new())
                        .await;
                    self.write_notices(&mut output, &notices).await?;
                    continue;
                }
            };
            let Some(line) = line else {
                break;
            };

            match Command::parse(&line) {
                Command::Quit => break,
                Command::Help => write_line(&mut output, HELP).await?,
                Command::Unknown(name) => {
                    write_line(&mut output, &format!("Unknown command '/{}'. Try /help.", name))
                        .await?
                }
                Command::Clear => {
                    let notices = session.clear_chat();
                    self.write_notices(&mut output, &notices).await?;
                }
                Command::Docs => {
                    let notices = session
                        .refresh_documents(self.backend.as_ref(), &CancellationToken::new())
                        .await;
                    self.write_notices(&mut output, &notices).await?;
                    for line in render::format_documents(session.documents()) {
                        write_line(&mut output, &line).await?;
                    }
                }
                Command::Health => {
                    let notices = session
                        .check_health(self.backend.as_ref(), &CancellationToken::new())
                        .await;
                    self.write_notices(&mut output, &notices).await?;
                    write_line(&mut output, &render::format_status(&session)).await?;
                }
                Command::Index(folder) => {
                    let folder = folder.unwrap_or_else(|| session.folder_path().to_string());
                    if !folder.trim().is_empty() {
                        write_line(&mut output, "Indexing documents... This may take a while.")
                            .await?;
                    }
                    let cancel = CancellationToken::new();
                    let watcher = self.watch_interrupt(&cancel);
                    let notices = session
                        .index_folder(self.backend.as_ref(), &folder, &cancel)
                        .await;
                    watcher.abort();
                    self.write_notices(&mut output, &notices).await?;
                }
                Command::Ask(question) => {
                    if question.is_empty() {
                        continue;
                    }
                    if !session.can_send(&question) {
                        write_line(&mut output, "Index a folder first with /index <folder>.")
                            .await?;
                        continue;
                    }
                    write_line(&mut output, "AI is thinking...").await?;
                    let cancel = CancellationToken::new();
                    let watcher = self.watch_interrupt(&cancel);
                    let notices = session
                        .send_message(self.backend.as_ref(), &question, &cancel)
                        .await;
                    watcher.abort();
                    if let Some(reply) = session.transcript().last() {
                        if reply.role == notebook_core::Role::Assistant {
                            write_line(
                                &mut output,
                                &render::format_chat_message(reply, self.config.color),
                            )
                            .await?;
                        }
                    }
                    self.write_notices(&mut output, &notices).await?;
                }
            }
        }

        output.flush().await?;
        Ok(session)
    }

    /// Cancel `cancel` on the next interrupt; abort the handle once the
    /// request is done.
    fn watch_interrupt(&self, cancel: &CancellationToken) -> JoinHandle<()> {
        let interrupts = self.interrupts.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            interrupts.notified().await;
            cancel.cancel();
        })
    }

    async fn write_notices<W: AsyncWrite + Unpin>(
        &self,
        output: &mut W,
        notices: &[Notice],
    ) -> Result<()> {
        for notice in notices {
            write_line(output, &render::format_notice(notice, self.config.color)).await?;
        }
        Ok(())
    }
}

async fn tick(ticker: &mut Option<tokio::time::Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> Result<()> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}
