//! Chat types

use super::knowledge::SourceCitation;
use serde::{Deserialize, Serialize};

/// Raw user input, not yet normalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatQuery {
    /// Free text as typed by the user
    pub text: String,
}

impl ChatQuery {
    /// Create a query from any string-like input
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl From<&str> for ChatQuery {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Answer returned to the caller, identical in shape for demo and live mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatAnswer {
    /// Answer text; may contain `**bold**` markers and newlines
    pub response: String,

    /// Citations in display order, primary first
    #[serde(default)]
    pub sources: Vec<SourceCitation>,
}

impl ChatAnswer {
    /// Create an answer
    pub fn new(response: impl Into<String>, sources: Vec<SourceCitation>) -> Self {
        Self {
            response: response.into(),
            sources,
        }
    }

    /// Primary citation, if any
    pub fn primary_source(&self) -> Option<&SourceCitation> {
        self.sources.first()
    }
}

/// Body of `POST /chat/message`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Message text
    pub message: String,

    /// Whether to stream the response; this client always asks for a single body
    #[serde(default)]
    pub stream: bool,
}

impl ChatRequest {
    /// Create a non-streaming chat request
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stream: false,
        }
    }

    /// View the request as a resolver query
    pub fn to_query(&self) -> ChatQuery {
        ChatQuery::new(self.message.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_wire_shape() {
        let value = serde_json::to_value(ChatRequest::new("hi")).unwrap();
        assert_eq!(value, json!({ "message": "hi", "stream": false }));

        let parsed: ChatRequest = serde_json::from_value(json!({ "message": "hi" })).unwrap();
        assert!(!parsed.stream);
    }

    #[test]
    fn test_chat_answer_null_page_number() {
        let answer = ChatAnswer::new(
            "text",
            vec![SourceCitation::new("notes.txt", 0.5, None)],
        );
        let value = serde_json::to_value(&answer).unwrap();
        assert_eq!(
            value,
            json!({
                "response": "text",
                "sources": [{ "filename": "notes.txt", "relevance_score": 0.5, "page_number": null }]
            })
        );
    }

    #[test]
    fn test_chat_answer_without_sources_field() {
        let answer: ChatAnswer = serde_json::from_value(json!({ "response": "ok" })).unwrap();
        assert!(answer.sources.is_empty());
        assert!(answer.primary_source().is_none());
    }
}
