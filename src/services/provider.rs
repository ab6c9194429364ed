// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Generative-AI provider client.
//!
//! Handles:
//! - Request body construction for the Gemini and OpenAI-compatible shapes
//! - Credential placement (query string vs bearer)
//! - Thumbnail download for inline images
//!
//! Status handling is left to callers: identification and probing read the
//! same status codes very differently.

use super::response;
use crate::config::ProviderKind;
use crate::error::AppError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Thumbnails larger than this are not worth inlining.
const MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;

/// Base64 image attached to a prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

/// A provider-agnostic generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub image: Option<InlineImage>,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Provider-side search grounding (Gemini only)
    pub search: bool,
}

/// Raw provider reply: status plus body text.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ProviderResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// Provider's error message, falling back to the status line.
    pub fn error_message(&self) -> String {
        response::error_message(&self.body).unwrap_or_else(|| self.status.to_string())
    }

    pub fn into_api_error(self) -> AppError {
        AppError::Api {
            status: self.status.as_u16(),
            message: self.error_message(),
        }
    }
}

/// Low-level provider client.
#[derive(Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    kind: ProviderKind,
    base_url: String,
}

impl ProviderClient {
    pub fn new(kind: ProviderKind, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            kind,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Send one generation request. Never retries.
    pub async fn generate(
        &self,
        credential: &str,
        model: &str,
        request: &GenerationRequest,
    ) -> Result<ProviderResponse, reqwest::Error> {
        let body = self.request_body(model, request);
        self.post(credential, model, &body).await
    }

    /// Send the smallest request the provider will accept for `model`.
    pub async fn probe(
        &self,
        credential: &str,
        model: &str,
    ) -> Result<ProviderResponse, reqwest::Error> {
        let body = self.probe_body(model);
        self.post(credential, model, &body).await
    }

    async fn post(
        &self,
        credential: &str,
        model: &str,
        body: &Value,
    ) -> Result<ProviderResponse, reqwest::Error> {
        let builder = match self.kind {
            ProviderKind::Gemini => self
                .http
                .post(format!(
                    "{}/models/{}:generateContent",
                    self.base_url,
                    urlencoding::encode(model)
                ))
                .query(&[("key", credential)]),
            ProviderKind::OpenAiCompatible => self
                .http
                .post(format!("{}/chat/completions", self.base_url))
                .bearer_auth(credential),
        };

        let response = builder.json(body).send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(model, status = status.as_u16(), "Provider responded");
        Ok(ProviderResponse { status, body })
    }

    /// Build the JSON body for a generation request.
    pub fn request_body(&self, model: &str, request: &GenerationRequest) -> Value {
        match self.kind {
            ProviderKind::Gemini => {
                let mut parts = vec![json!({ "text": request.prompt })];
                if let Some(image) = &request.image {
                    parts.push(json!({
                        "inline_data": { "mime_type": image.mime_type, "data": image.data }
                    }));
                }

                let mut body = json!({
                    "contents": [{ "role": "user", "parts": parts }],
                    "generationConfig": {
                        "temperature": request.temperature,
                        "maxOutputTokens": request.max_output_tokens,
                    },
                });
                if let Some(system) = &request.system {
                    body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
                }
                if request.search {
                    body["tools"] = json!([{ "google_search": {} }]);
                }
                body
            }
            ProviderKind::OpenAiCompatible => {
                let user_content = match &request.image {
                    Some(image) => json!([
                        { "type": "text", "text": request.prompt },
                        {
                            "type": "image_url",
                            "image_url": {
                                "url": format!("data:{};base64,{}", image.mime_type, image.data)
                            }
                        }
                    ]),
                    None => json!(request.prompt),
                };

                let mut messages = Vec::new();
                if let Some(system) = &request.system {
                    messages.push(json!({ "role": "system", "content": system }));
                }
                messages.push(json!({ "role": "user", "content": user_content }));

                json!({
                    "model": model,
                    "messages": messages,
                    "temperature": request.temperature,
                    "max_tokens": request.max_output_tokens,
                })
            }
        }
    }

    /// Minimal probe body: one short prompt, one output token.
    pub fn probe_body(&self, model: &str) -> Value {
        match self.kind {
            ProviderKind::Gemini => json!({
                "contents": [{ "parts": [{ "text": "ping" }] }],
                "generationConfig": { "maxOutputTokens": 1 },
            }),
            ProviderKind::OpenAiCompatible => json!({
                "model": model,
                "messages": [{ "role": "user", "content": "ping" }],
                "max_tokens": 1,
            }),
        }
    }

    /// Download a thumbnail and encode it for inlining.
    pub async fn fetch_image(&self, url: &str) -> Result<InlineImage, AppError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Thumbnail fetch failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Api {
                status: status.as_u16(),
                message: format!("Thumbnail fetch failed: {}", status),
            });
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| v.starts_with("image/"))
            .unwrap_or("image/jpeg")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Network(format!("Thumbnail read failed: {}", e)))?;

        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::BadRequest(format!(
                "Thumbnail too large ({} bytes)",
                bytes.len()
            )));
        }

        Ok(InlineImage {
            mime_type,
            data: BASE64.encode(&bytes),
        })
    }
}
