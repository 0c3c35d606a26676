//! Data models and structures
//!
//! Defines the relay configuration, the inbound request bodies for each
//! variant, and the JSON envelopes returned to callers.

use crate::ai::gemini::client::DEFAULT_BASE_URL;
use crate::ai::gemini::types::InlineData;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_MULTIMODAL_MODEL: &str = "gemini-pro-vision";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-pro";
/// 4.5 MiB, the request body ceiling of common serverless hosts.
pub const DEFAULT_MAX_BODY_BYTES: usize = 4_718_592;

/// Which request/response contract the relay serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// `{ userPrompt, inlineData }` in, raw provider response out. No CORS.
    Multimodal,
    /// `{ text }` in, `{ success, data: { text } }` out. CORS and preflight.
    Text,
}

impl Variant {
    pub fn route(&self) -> &'static str {
        match self {
            Variant::Multimodal => "/api/analyze",
            Variant::Text => "/api/generate",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Variant::Multimodal => DEFAULT_MULTIMODAL_MODEL,
            Variant::Text => DEFAULT_TEXT_MODEL,
        }
    }

    pub fn cors_enabled(&self) -> bool {
        matches!(self, Variant::Text)
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "multimodal" => Ok(Variant::Multimodal),
            "text" | "text-only" => Ok(Variant::Text),
            other => Err(Error::Config(format!(
                "Unknown relay variant '{}'. Expected 'multimodal' or 'text'",
                other
            ))),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Multimodal => write!(f, "multimodal"),
            Variant::Text => write!(f, "text"),
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent keys are reported on each request, not at start-up.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub variant: Variant,
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

impl Config {
    /// Load from the environment (and `.env`). `overrides` win over the
    /// environment before anything is validated.
    pub fn from_env_with_overrides(overrides: &[(&str, String)]) -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|name| {
            overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.clone())
                .or_else(|| std::env::var(name).ok())
        })
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let variant = match var("RELAY_VARIANT") {
            Some(raw) => raw.parse()?,
            None => Variant::Multimodal,
        };

        let port = match var("RELAY_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| Error::Config(format!("Invalid RELAY_PORT '{}'", raw)))?,
            None => 3000,
        };

        let max_body_bytes = match var("RELAY_MAX_BODY_BYTES") {
            Some(raw) => raw
                .parse()
                .map_err(|_| Error::Config(format!("Invalid RELAY_MAX_BODY_BYTES '{}'", raw)))?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self {
            gemini_api_key: var("GEMINI_API_KEY").filter(|key| !key.trim().is_empty()),
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| variant.default_model().to_string()),
            gemini_base_url: var("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            variant,
            host: var("RELAY_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            max_body_bytes,
        })
    }

    pub fn for_variant(variant: Variant, gemini_api_key: Option<String>) -> Self {
        Self {
            gemini_api_key,
            gemini_model: variant.default_model().to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            variant,
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

fn required_str<'a>(object: &'a Map<String, Value>, field: &str, path: &str) -> Result<&'a str> {
    object
        .get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Error::InvalidRequest(format!("Missing required field: {}", path)))
}

fn as_object(body: &Value) -> Result<&Map<String, Value>> {
    body.as_object()
        .ok_or_else(|| Error::InvalidRequest("Request body must be a JSON object".to_string()))
}

/// Body of a text-only request: `{ "text": "..." }`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    pub text: String,
}

impl TextRequest {
    pub fn from_json(body: &Value) -> Result<Self> {
        let object = as_object(body)?;
        Ok(Self {
            text: required_str(object, "text", "text")?.to_string(),
        })
    }
}

/// Body of a multimodal request: a prompt plus one inline image.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeRequest {
    pub user_prompt: String,
    pub inline_data: InlineData,
}

impl AnalyzeRequest {
    pub fn from_json(body: &Value) -> Result<Self> {
        let object = as_object(body)?;
        let user_prompt = required_str(object, "userPrompt", "userPrompt")?.to_string();

        let inline = object
            .get("inlineData")
            .and_then(Value::as_object)
            .ok_or_else(|| Error::InvalidRequest("Missing required field: inlineData".to_string()))?;
        let mime_type = required_str(inline, "mimeType", "inlineData.mimeType")?.to_string();
        let data = required_str(inline, "data", "inlineData.data")?.to_string();

        use base64::Engine as _;
        base64::engine::general_purpose::STANDARD
            .decode(&data)
            .map_err(|_| {
                Error::InvalidRequest("inlineData.data must be base64-encoded".to_string())
            })?;

        Ok(Self {
            user_prompt,
            inline_data: InlineData { mime_type, data },
        })
    }
}

/// Success envelope for the text-only variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextEnvelope {
    pub success: bool,
    pub data: TextData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextData {
    pub text: String,
}

impl TextEnvelope {
    pub fn new(text: String) -> Self {
        Self {
            success: true,
            data: TextData { text },
        }
    }
}

/// Failure envelope for the text-only variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailureEnvelope {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl FailureEnvelope {
    pub fn new(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details,
        }
    }
}

/// Failure envelope for the multimodal variant: `{ "error": { "message" } }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageEnvelope {
    pub error: ErrorMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorMessage {
    pub message: String,
}

impl MessageEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorMessage {
                message: message.into(),
            },
        }
    }
}

/// Body returned for rejected methods in both variants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodNotAllowed {
    pub error: String,
}

impl Default for MethodNotAllowed {
    fn default() -> Self {
        Self {
            error: "Method Not Allowed".to_string(),
        }
    }
}
