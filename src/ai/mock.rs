use super::gemini::Part;
use super::ContentService;
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockContentClient {
    responses: Arc<Mutex<Vec<Value>>>,
    failure: Arc<Mutex<Option<String>>>,
    call_count: Arc<Mutex<usize>>,
    last_parts: Arc<Mutex<Option<Vec<Part>>>>,
}

impl MockContentClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(0)),
            last_parts: Arc::new(Mutex::new(None)),
        }
    }

    /// Queue a raw provider response. Responses cycle once exhausted.
    pub fn with_response(self, response: Value) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    /// Queue a response whose first candidate carries `text`.
    pub fn with_text_response(self, text: &str) -> Self {
        self.with_response(text_response(text))
    }

    /// Make every call fail with an [`Error::AiProvider`] carrying `message`.
    pub fn with_failure(self, message: &str) -> Self {
        *self.failure.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn last_parts(&self) -> Option<Vec<Part>> {
        self.last_parts.lock().unwrap().clone()
    }
}

impl Default for MockContentClient {
    fn default() -> Self {
        Self::new()
    }
}

fn text_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

#[async_trait]
impl ContentService for MockContentClient {
    async fn generate_content(&self, parts: Vec<Part>) -> Result<Value> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        *self.last_parts.lock().unwrap() = Some(parts.clone());

        if let Some(message) = self.failure.lock().unwrap().as_ref() {
            return Err(Error::AiProvider(message.clone()));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Echo the prompt text back
            let echoed: Vec<&str> = parts
                .iter()
                .filter_map(|p| match p {
                    Part::Text { text } => Some(text.as_str()),
                    Part::InlineData { .. } => None,
                })
                .collect();
            Ok(text_response(&echoed.join(" ")))
        } else {
            let index = (*count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}
