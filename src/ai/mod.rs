//! Generative content provider integration
//!
//! Provides the interface to Gemini's `generateContent` API along with an
//! in-process mock for handler tests.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiContentClient;
pub use mock::MockContentClient;

use crate::Result;
use async_trait::async_trait;
use gemini::Part;
use serde_json::Value;

#[async_trait]
pub trait ContentService: Send + Sync {
    /// Issue one `generateContent` call and return the provider's raw JSON.
    async fn generate_content(&self, parts: Vec<Part>) -> Result<Value>;
}
