//! Gemini `generateContent` payload types.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gemini content container used in requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

/// Untagged union of text and inline media content parts.
///
/// Variant order matters for `#[serde(untagged)]` decoding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn inline(inline_data: InlineData) -> Self {
        Part::InlineData { inline_data }
    }
}

/// Base64 inline payload used for image/vision requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// A single-turn request carrying `parts` in order.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content { role: None, parts }],
        }
    }
}

/// Top-level `generateContent` response envelope.
///
/// Only the fields needed for text extraction are modelled; unknown part
/// kinds (function calls, executable code) decode with `text: None`.
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

/// Concatenate the text parts of the first candidate.
pub fn extract_text(raw: &Value) -> Result<String> {
    let response: GenerateContentResponse = serde_json::from_value(raw.clone())
        .map_err(|e| Error::AiProvider(format!("Unexpected Gemini response shape: {}", e)))?;

    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .ok_or_else(|| Error::AiProvider("No candidates in Gemini response".to_string()))?;

    let texts: Vec<String> = parts.into_iter().filter_map(|p| p.text).collect();
    if texts.is_empty() {
        return Err(Error::AiProvider("No text in Gemini response".to_string()));
    }

    Ok(texts.concat())
}
