//! Gemini implementation of [`ContentService`].

use super::client::GeminiHttpClient;
use super::types::{GenerateContentRequest, Part};
use crate::ai::ContentService;
use crate::Result;
use async_trait::async_trait;
use serde_json::Value;

pub struct GeminiContentClient {
    http: GeminiHttpClient,
}

impl GeminiContentClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, client),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn model(&self) -> &str {
        self.http.model()
    }
}

#[async_trait]
impl ContentService for GeminiContentClient {
    async fn generate_content(&self, parts: Vec<Part>) -> Result<Value> {
        tracing::debug!(
            "Sending {} part(s) to Gemini model {}",
            parts.len(),
            self.http.model()
        );

        let request = GenerateContentRequest::from_parts(parts);
        self.http.generate_content(&request).await
    }
}
