//! Integration tests for demo mode
//!
//! These drive the public API the way a front end does: through the
//! `NotebookBackend` trait object and a `Session`.

use notebook_core::*;
use std::sync::Arc;
use std::time::Duration;

fn instant_backend() -> Arc<dyn NotebookBackend> {
    Arc::new(DemoBackend::new().with_latency(LatencyProfile::instant()))
}

/// A fresh demo session can answer questions right after init
#[tokio::test]
async fn test_demo_session_end_to_end() {
    let backend = instant_backend();
    let cancel = CancellationToken::new();
    let mut session = Session::new().with_folder("~/Documents/Research");

    let notices = session.init(backend.as_ref(), &cancel).await;
    assert!(notices.is_empty(), "unexpected notices: {notices:?}");
    assert_eq!(session.status(), ConnectionStatus::Connected);

    session
        .send_message(backend.as_ref(), "Explain the RAG architecture", &cancel)
        .await;
    let answer = &session.transcript()[1];
    assert!(answer.content.contains("Retrieval-Augmented Generation"));
    assert_eq!(answer.sources[0].filename, "RAG_Architecture_Guide.pdf");
    assert_eq!(answer.sources[0].page_number, Some(1));
}

/// Demo output has exactly the wire shape the real backend uses
#[tokio::test]
async fn test_demo_wire_shapes() {
    let backend = instant_backend();
    let cancel = CancellationToken::new();

    let health = serde_json::to_value(backend.health(cancel.clone()).await.unwrap()).unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["services"]["models"]["llm_available"], true);
    assert_eq!(health["system"]["ram_total_gb"], 16.0);

    let listing = serde_json::to_value(
        backend
            .list_documents(100, cancel.clone())
            .await
            .unwrap(),
    )
    .unwrap();
    assert_eq!(listing["total"], 5);
    assert_eq!(listing["page"], 1);
    assert_eq!(listing["documents"][0]["file_type"], "pdf");

    let answer = serde_json::to_value(
        backend
            .chat(ChatRequest::new("python"), cancel.clone())
            .await
            .unwrap(),
    )
    .unwrap();
    assert_eq!(answer["sources"][0]["page_number"], serde_json::Value::Null);
}

/// Concurrent chats complete independently and each returns its own answer
#[tokio::test(start_paused = true)]
async fn test_concurrent_chats_are_independent() {
    let backend: Arc<dyn NotebookBackend> = Arc::new(DemoBackend::new());
    let questions = ["hi", "neural network", "vector", "nothing relevant"];

    let handles: Vec<_> = questions
        .iter()
        .map(|q| {
            let backend = backend.clone();
            let request = ChatRequest::new(*q);
            tokio::spawn(async move { backend.chat(request, CancellationToken::new()).await })
        })
        .collect();

    let mut answers = Vec::new();
    for handle in handles {
        answers.push(handle.await.unwrap().unwrap());
    }

    let resolver = ResponseResolver::builtin();
    for (question, answer) in questions.iter().zip(&answers) {
        assert_eq!(answer, &resolver.resolve(&ChatQuery::new(*question)));
    }
}

/// Cancelling one pending chat does not disturb another
#[tokio::test(start_paused = true)]
async fn test_cancel_only_affects_its_own_request() {
    let backend: Arc<dyn NotebookBackend> = Arc::new(DemoBackend::new());
    let doomed = CancellationToken::new();

    let cancelled = {
        let backend = backend.clone();
        let doomed = doomed.clone();
        tokio::spawn(async move { backend.chat(ChatRequest::new("hi"), doomed).await })
    };
    let survivor = {
        let backend = backend.clone();
        tokio::spawn(async move {
            backend
                .chat(ChatRequest::new("hi"), CancellationToken::new())
                .await
        })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    doomed.cancel();

    assert!(matches!(
        cancelled.await.unwrap(),
        Err(NotebookError::Cancelled(_))
    ));
    assert!(survivor.await.unwrap().is_ok());
}

/// A knowledge table exported to JSON drives a backend after reload
#[tokio::test]
async fn test_exported_table_round_trips_into_backend() {
    let json = KnowledgeTable::builtin().to_json_pretty().unwrap();
    let table = KnowledgeTable::from_json_str(&json).unwrap();
    let backend = DemoBackend::new()
        .with_latency(LatencyProfile::instant())
        .with_table(Arc::new(table));

    let answer = backend
        .chat(ChatRequest::new("data cleaning"), CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(answer.sources[0].filename, "Data_Preprocessing_Pipeline.py");
}
