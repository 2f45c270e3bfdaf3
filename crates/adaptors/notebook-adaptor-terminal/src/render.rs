//! Plain-text rendering of chat messages, citations and notices

use notebook_core::{
    ChatMessage, DocumentInfo, Notice, NoticeLevel, Role, Session, SourceCitation,
};
use regex::Regex;
use std::sync::OnceLock;

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

static BOLD_MARKERS: OnceLock<Option<Regex>> = OnceLock::new();

fn bold_markers() -> Option<&'static Regex> {
    BOLD_MARKERS
        .get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").ok())
        .as_ref()
}

/// Render `**bold**` markers as ANSI bold, or strip them when color is off
pub fn format_message(text: &str, color: bool) -> String {
    let Some(re) = bold_markers() else {
        return text.to_string();
    };
    let replacement = if color {
        format!("{}$1{}", BOLD, RESET)
    } else {
        "$1".to_string()
    };
    re.replace_all(text, replacement.as_str()).into_owned()
}

/// `Source 1: Machine_Learning_Basics.pdf (Relevance: 94.0%) • Page 3`
pub fn format_citation(index: usize, source: &SourceCitation) -> String {
    let mut line = format!(
        "Source {}: {} (Relevance: {:.1}%)",
        index + 1,
        source.filename,
        source.relevance_percent()
    );
    if let Some(page) = source.page_number {
        line.push_str(&format!(" \u{2022} Page {}", page));
    }
    line
}

/// A transcript message with its citations
pub fn format_chat_message(message: &ChatMessage, color: bool) -> String {
    match message.role {
        Role::User => format!("You: {}", message.content),
        Role::Assistant => {
            let mut out = format!("Assistant: {}", format_message(&message.content, color));
            if !message.sources.is_empty() {
                out.push_str("\n\nSources Referenced:");
                for (i, source) in message.sources.iter().enumerate() {
                    out.push_str("\n  ");
                    out.push_str(&format_citation(i, source));
                }
            }
            out
        }
    }
}

/// A notice with a severity prefix
pub fn format_notice(notice: &Notice, color: bool) -> String {
    let (label, tint) = match notice.level {
        NoticeLevel::Info => ("info", DIM),
        NoticeLevel::Success => ("ok", GREEN),
        NoticeLevel::Warning => ("warning", YELLOW),
        NoticeLevel::Error => ("error", RED),
    };
    if color {
        format!("{}[{}]{} {}", tint, label, RESET, notice.message)
    } else {
        format!("[{}] {}", label, notice.message)
    }
}

/// The document sidebar as lines
pub fn format_documents(documents: &[DocumentInfo]) -> Vec<String> {
    if documents.is_empty() {
        return vec!["No documents indexed yet".to_string()];
    }
    documents
        .iter()
        .map(|doc| {
            let mut line = format!("{}  {}", doc.filename, doc.summary());
            if let Some(at) = doc.indexed_at {
                line.push_str(&format!("  (indexed {})", at.format("%Y-%m-%d %H:%M")));
            }
            line
        })
        .collect()
}

/// One-line system summary: status, models, document count, RAM
pub fn format_status(session: &Session) -> String {
    let mut line = format!("Status: {}", session.status());
    if let Some(report) = session.health() {
        line.push_str(&format!(
            " | LLM: {} | Embedding: {} | Documents: {} | RAM: {}",
            report.services.models.llm,
            report.services.models.embedding,
            session.document_total().max(report.database.document_count),
            report.system.ram_summary()
        ));
    }
    line
}
