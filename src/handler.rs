//! Request handling for the relay route.
//!
//! One inbound request maps to at most one provider call. The flow is
//! method check, configuration check, body validation, provider call, then
//! envelope mapping for the configured [`Variant`].

use crate::ai::gemini::{extract_text, Part};
use crate::app::RelayState;
use crate::models::{
    AnalyzeRequest, FailureEnvelope, MessageEnvelope, MethodNotAllowed, TextEnvelope,
    TextRequest, Variant,
};
use crate::{Error, Result};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

/// Axum entry point, registered with `any(..)` so every method reaches it.
///
/// Body rejections (over the size limit, aborted upload) are handled here
/// rather than by axum so they keep the variant's envelope.
pub async fn relay(
    State(state): State<RelayState>,
    method: Method,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Error::PayloadTooLarge(format!(
                "Request body exceeds the {} byte limit",
                state.config.max_body_bytes
            ))
        } else {
            Error::InvalidRequest(rejection.body_text())
        }
    });

    match body {
        Ok(bytes) => handle(&state, &method, Ok(&bytes[..])).await,
        Err(error) => handle(&state, &method, Err(error)).await,
    }
}

pub async fn handle(state: &RelayState, method: &Method, body: Result<&[u8]>) -> Response {
    let variant = state.config.variant;

    if variant.cors_enabled() && method == Method::OPTIONS {
        tracing::debug!("Answering CORS preflight");
        return StatusCode::OK.into_response();
    }

    match process(state, method, body).await {
        Ok(response) => response,
        Err(error) => ErrorResponse { variant, error }.into_response(),
    }
}

async fn process(state: &RelayState, method: &Method, body: Result<&[u8]>) -> Result<Response> {
    if method != Method::POST {
        return Err(Error::InvalidMethod);
    }

    let provider = state.provider().ok_or_else(|| {
        Error::Config("GEMINI_API_KEY is not configured for this deployment".to_string())
    })?;

    let body: Value = serde_json::from_slice(body?)
        .map_err(|_| Error::InvalidRequest("Request body must be a JSON object".to_string()))?;

    match state.config.variant {
        Variant::Text => {
            let request = TextRequest::from_json(&body)?;
            let raw = provider.generate_content(vec![Part::text(request.text)]).await?;
            let text = extract_text(&raw)?;
            tracing::info!("Generated {} characters of text", text.chars().count());
            Ok(Json(TextEnvelope::new(text)).into_response())
        }
        Variant::Multimodal => {
            let request = AnalyzeRequest::from_json(&body)?;
            tracing::debug!(
                "Analyzing inline {} payload ({} base64 chars)",
                request.inline_data.mime_type,
                request.inline_data.data.len()
            );
            let raw = provider
                .generate_content(vec![
                    Part::text(request.user_prompt),
                    Part::inline(request.inline_data),
                ])
                .await?;
            Ok(Json(raw).into_response())
        }
    }
}

/// Maps an [`Error`] to the status code and envelope of a variant.
pub struct ErrorResponse {
    pub variant: Variant,
    pub error: Error,
}

impl ErrorResponse {
    fn status(&self) -> StatusCode {
        match self.error {
            Error::InvalidMethod => StatusCode::METHOD_NOT_ALLOWED,
            Error::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = self.status();

        if self.error.is_client_error() {
            tracing::warn!("Rejected request ({}): {}", status, self.error);
        } else {
            tracing::error!("Request failed ({}): {}", status, self.error);
        }

        match (self.variant, self.error) {
            (_, Error::InvalidMethod) => (status, Json(MethodNotAllowed::default())).into_response(),
            (Variant::Text, Error::InvalidRequest(message) | Error::PayloadTooLarge(message)) => {
                (status, Json(FailureEnvelope::new(message, None))).into_response()
            }
            (Variant::Text, error @ Error::Config(_)) => (
                status,
                Json(FailureEnvelope::new(
                    "Server configuration error",
                    Some(error.to_string()),
                )),
            )
                .into_response(),
            (Variant::Text, error) => (
                status,
                Json(FailureEnvelope::new(
                    "Failed to generate content",
                    Some(error.to_string()),
                )),
            )
                .into_response(),
            (
                Variant::Multimodal,
                Error::InvalidRequest(message) | Error::PayloadTooLarge(message),
            ) => (status, Json(MessageEnvelope::new(message))).into_response(),
            (Variant::Multimodal, error @ Error::Config(_)) => (
                status,
                Json(MessageEnvelope::new(format!(
                    "Server configuration error: {}",
                    error
                ))),
            )
                .into_response(),
            (Variant::Multimodal, error) => (
                status,
                Json(MessageEnvelope::new(format!(
                    "Failed to generate content: {}",
                    error
                ))),
            )
                .into_response(),
        }
    }
}
