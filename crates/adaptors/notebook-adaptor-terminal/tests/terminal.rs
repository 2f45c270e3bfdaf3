//! Scripted terminal sessions against the demo backend

use notebook_adaptor_terminal::{TerminalAdaptor, TerminalConfig};
use notebook_core::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader};

fn adaptor(config: TerminalConfig) -> TerminalAdaptor {
    let backend = DemoBackend::new().with_latency(LatencyProfile::instant());
    TerminalAdaptor::new(config, Arc::new(backend))
}

async fn run(config: TerminalConfig, script: &str) -> (Session, String) {
    let mut output = Vec::new();
    let session = adaptor(config)
        .run_with_io(script.as_bytes(), &mut output)
        .await
        .unwrap();
    (session, String::from_utf8(output).unwrap())
}

#[tokio::test]
async fn test_question_gets_answer_with_citations() {
    let (session, output) = run(TerminalConfig::default(), "What is machine learning?\n/quit\n").await;

    assert!(output.contains("Local Notebook (demo mode)"));
    assert!(output.contains("Status: Connected | LLM: phi3:mini"));
    assert!(output.contains("AI is thinking..."));
    assert!(output.contains("Assistant: Machine learning is a subset"));
    assert!(output.contains("Source 1: Machine_Learning_Basics.pdf (Relevance: 94.0%) \u{2022} Page 3"));
    assert!(output.contains("Source 2: Neural_Networks_Overview.txt (Relevance: 78.0%)\n"));
    assert_eq!(session.transcript().len(), 2);
}

#[tokio::test]
async fn test_index_uses_default_folder() {
    let config = TerminalConfig {
        default_folder: Some("~/Documents/Research".to_string()),
        ..TerminalConfig::default()
    };
    let (session, output) = run(config, "/index\n").await;
    assert!(output.contains("[ok] Successfully indexed 5 files in 2.85s"));
    assert_eq!(session.folder_path(), "~/Documents/Research");
}

#[tokio::test]
async fn test_index_without_folder_warns() {
    let (_, output) = run(TerminalConfig::default(), "/index\n").await;
    assert!(output.contains("[warning] Please enter a folder path"));
    assert!(!output.contains("Indexing documents..."));
}

#[tokio::test]
async fn test_docs_and_clear() {
    let (session, output) = run(TerminalConfig::default(), "hi\n/docs\n/clear\n").await;
    assert!(output.contains("RAG_Architecture_Guide.pdf  PDF \u{2022} 31 chunks"));
    assert!(output.contains("[ok] Chat cleared"));
    assert!(session.transcript().is_empty());
}

#[tokio::test]
async fn test_unknown_command_and_eof() {
    let (_, output) = run(TerminalConfig::default(), "/frobnicate").await;
    assert!(output.contains("Unknown command '/frobnicate'"));
}

#[tokio::test]
async fn test_color_renders_bold() {
    let config = TerminalConfig {
        color: true,
        ..TerminalConfig::default()
    };
    let (_, output) = run(config, "explain rag\n").await;
    assert!(output.contains("\x1b[1mRetrieval-Augmented Generation (RAG)\x1b[0m"));
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_at_prompt_quits() {
    let adaptor = adaptor(TerminalConfig::default());
    let interrupts = adaptor.interrupt_handle();
    // Input stays open; only the interrupt can end the session
    let (_keyboard, input) = tokio::io::duplex(1024);
    let mut output = Vec::new();

    let (session, _) = tokio::join!(
        adaptor.run_with_io(BufReader::new(input), &mut output),
        async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            interrupts.notify_waiters();
        }
    );

    session.unwrap();
    assert!(String::from_utf8(output).unwrap().contains("Interrupted. Bye."));
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_cancels_pending_question_then_quits() {
    // Realistic latency: the answer takes at least a second
    let adaptor = TerminalAdaptor::new(TerminalConfig::default(), Arc::new(DemoBackend::new()));
    let interrupts = adaptor.interrupt_handle();
    let (mut keyboard, input) = tokio::io::duplex(1024);
    let mut output = Vec::new();

    let (session, _) = tokio::join!(
        adaptor.run_with_io(BufReader::new(input), &mut output),
        async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            keyboard.write_all(b"What is RAG?\n").await.unwrap();
            tokio::time::sleep(Duration::from_millis(500)).await;
            interrupts.notify_waiters();
            tokio::time::sleep(Duration::from_millis(100)).await;
            interrupts.notify_waiters();
        }
    );

    let session = session.unwrap();
    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("AI is thinking..."));
    assert!(output.contains("[info] Request cancelled"));
    assert!(!output.contains("Assistant:"));
    assert!(output.contains("Interrupted. Bye."));
    assert_eq!(session.transcript().len(), 1);
}
