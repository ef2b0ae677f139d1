//! Gemini gateway implementation for Mdchat
//!
//! This module implements the Gateway trait against a Gemini-style
//! `generateContent` endpoint. All three request kinds share one envelope:
//! a `candidates` array whose entries carry `content.parts`, each part
//! holding text or inline base64 image data. Centralizing the part scan
//! here keeps the three operations from growing divergent parsers.

use crate::codec;
use crate::config::GatewayConfig;
use crate::error::{MdchatError, Result};
use crate::gateway::{Gateway, HistoryEntry, ImageReply, TextReply};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Production endpoint base; replaced by `GatewayConfig::api_base` in tests
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Gemini API gateway
///
/// Issues text generation, image generation, and image edit requests and
/// normalizes each heterogeneous response into a uniform reply. Sampling
/// parameters are deployment constants, not user-configurable.
///
/// # Examples
///
/// ```no_run
/// use mdchat::config::GatewayConfig;
/// use mdchat::gateway::{Gateway, GeminiGateway};
///
/// # async fn example() -> mdchat::error::Result<()> {
/// let config = GatewayConfig {
///     api_key: Some("secret".to_string()),
///     ..Default::default()
/// };
/// let gateway = GeminiGateway::new(config)?;
/// let reply = gateway.generate_text("Hello!", &[], &[]).await?;
/// println!("{}", reply.text);
/// # Ok(())
/// # }
/// ```
pub struct GeminiGateway {
    client: Client,
    config: GatewayConfig,
    api_key: String,
}

/// Request body for `generateContent`
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

/// One ordered content entry in a request or response
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

/// A content fragment: text, inline image data, or (rarely) both
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    text: Option<String>,
    #[serde(
        rename = "inlineData",
        skip_serializing_if = "Option::is_none",
        default
    )]
    inline_data: Option<InlineData>,
}

/// Base64 image payload with its MIME type
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

/// Fixed sampling configuration sent with every request
#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "responseModalities", skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

impl GenerationConfig {
    /// Sampling configuration for conversational text requests
    fn text() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 8192,
            response_modalities: None,
            response_mime_type: None,
        }
    }

    /// Sampling configuration for image generation and edit requests
    fn image() -> Self {
        Self {
            temperature: 1.0,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 8192,
            response_modalities: Some(vec!["image".to_string(), "text".to_string()]),
            response_mime_type: Some("text/plain".to_string()),
        }
    }
}

/// Response envelope from `generateContent`
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// One alternative completion
#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

/// Error envelope returned on non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl GeminiGateway {
    /// Create a new Gemini gateway instance
    ///
    /// # Arguments
    ///
    /// * `config` - Gateway configuration with a resolved API key
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing or HTTP client
    /// initialization fails
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| MdchatError::Config("gateway API key is not set".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("mdchat/0.2.0")
            .build()
            .map_err(|e| MdchatError::gateway(format!("failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Gemini gateway: text_model={}, image_model={}",
            config.text_model,
            config.image_model
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        let base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            base, model, self.api_key
        )
    }

    /// Issue one `generateContent` round trip and parse the envelope
    async fn post(&self, model: &str, request: &GenerateRequest) -> Result<GenerateResponse> {
        let url = self.endpoint(model);
        tracing::debug!("POST generateContent: model={}", model);

        let response = self.client.post(&url).json(request).send().await.map_err(|e| {
            tracing::warn!("Gateway transport failure: {}", e);
            MdchatError::gateway(format!("transport failure: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let upstream = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|e| e.error)
                .and_then(|e| e.message);
            let reason = match upstream {
                Some(message) => message,
                None => format!("gateway returned {}", status),
            };
            tracing::error!("Gateway error {}: {}", status, reason);
            return Err(MdchatError::gateway(reason).into());
        }

        let envelope: GenerateResponse = response.json().await.map_err(|e| {
            MdchatError::gateway(format!("failed to parse gateway response: {}", e))
        })?;
        Ok(envelope)
    }

    /// Encode the attached image files for inline transport
    fn encode_images(&self, images: &[PathBuf]) -> Result<Vec<InlineData>> {
        images
            .iter()
            .map(|path| {
                Ok(InlineData {
                    mime_type: codec::mime_for_path(path),
                    data: codec::encode(path)?,
                })
            })
            .collect()
    }
}

/// Assemble the ordered content list for a text-generation request
///
/// Order is fixed: history entries (including any persona preamble the
/// caller placed first) in chronological order, then the current turn with
/// its text part followed by encoded images.
fn assemble_text_contents(
    prompt: &str,
    images: Vec<InlineData>,
    history: &[HistoryEntry],
) -> Vec<Content> {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|entry| Content {
            role: Some(entry.role.clone()),
            parts: vec![Part {
                text: Some(entry.content.clone()),
                inline_data: None,
            }],
        })
        .collect();

    let mut parts = vec![Part {
        text: Some(prompt.to_string()),
        inline_data: None,
    }];
    parts.extend(images.into_iter().map(|inline| Part {
        text: None,
        inline_data: Some(inline),
    }));

    contents.push(Content {
        role: Some("user".to_string()),
        parts,
    });
    contents
}

/// Normalize a response using only the first candidate
///
/// Text parts are newline-joined in order; inline images become data URIs
/// in order. A candidate with neither yields an empty-text reply.
fn normalize_first_candidate(response: GenerateResponse) -> Result<TextReply> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| MdchatError::gateway("empty response"))?;

    let mut text_parts: Vec<String> = Vec::new();
    let mut images: Vec<String> = Vec::new();

    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if let Some(text) = part.text {
            text_parts.push(text);
        }
        if let Some(inline) = part.inline_data {
            images.push(codec::to_data_uri(&inline.mime_type, &inline.data));
        }
    }

    Ok(TextReply {
        text: text_parts.join("\n"),
        images,
    })
}

/// Scan all candidates in order for the first inline image
fn first_inline_image(response: GenerateResponse) -> Option<String> {
    for candidate in response.candidates {
        let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
        for part in parts {
            if let Some(inline) = part.inline_data {
                return Some(codec::to_data_uri(&inline.mime_type, &inline.data));
            }
        }
    }
    None
}

#[async_trait]
impl Gateway for GeminiGateway {
    async fn generate_text(
        &self,
        prompt: &str,
        images: &[PathBuf],
        history: &[HistoryEntry],
    ) -> Result<TextReply> {
        if prompt.trim().is_empty() && images.is_empty() {
            return Err(MdchatError::gateway("empty prompt").into());
        }

        let encoded = self.encode_images(images)?;
        let request = GenerateRequest {
            contents: assemble_text_contents(prompt, encoded, history),
            generation_config: GenerationConfig::text(),
        };

        let response = self.post(&self.config.text_model, &request).await?;
        normalize_first_candidate(response)
    }

    async fn generate_image(&self, prompt: &str) -> Result<ImageReply> {
        if prompt.trim().is_empty() {
            return Err(MdchatError::gateway("empty prompt").into());
        }

        let request = GenerateRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                    inline_data: None,
                }],
            }],
            generation_config: GenerationConfig::image(),
        };

        let response = self.post(&self.config.image_model, &request).await?;
        if response.candidates.is_empty() {
            return Err(MdchatError::gateway("empty response").into());
        }

        first_inline_image(response)
            .map(|image_url| ImageReply { image_url })
            .ok_or_else(|| MdchatError::gateway("no image in response").into())
    }

    async fn edit_image(&self, prompt: &str, image: &Path) -> Result<ImageReply> {
        if prompt.trim().is_empty() {
            return Err(MdchatError::gateway("empty prompt").into());
        }

        let inline = InlineData {
            mime_type: codec::mime_for_path(image),
            data: codec::encode(image)?,
        };
        let request = GenerateRequest {
            contents: vec![Content {
                role: None,
                parts: vec![
                    Part {
                        text: Some(prompt.to_string()),
                        inline_data: None,
                    },
                    Part {
                        text: None,
                        inline_data: Some(inline),
                    },
                ],
            }],
            generation_config: GenerationConfig::image(),
        };

        let response = self.post(&self.config.image_model, &request).await?;
        if response.candidates.is_empty() {
            return Err(MdchatError::gateway("empty response").into());
        }

        first_inline_image(response)
            .map(|image_url| ImageReply { image_url })
            .ok_or_else(|| MdchatError::gateway("no edited image in response").into())
    }
}
