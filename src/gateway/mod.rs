//! Gateway module for Mdchat
//!
//! This module contains the AI gateway abstraction and the Gemini
//! implementation that talks to the generative-content endpoint.

pub mod gemini;

pub use gemini::GeminiGateway;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One prior conversation turn sent to ground the next response
///
/// The role is the wire-level string: "user", "assistant", or "system"
/// for the persona preamble entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Wire role of the turn
    pub role: String,
    /// Text content of the turn
    pub content: String,
}

impl HistoryEntry {
    /// Creates a user history entry
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates an assistant history entry
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Creates a system/preamble history entry
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// Normalized result of a text-generation call
///
/// Either field may be empty; a reply with no text and no images is
/// represented as an empty `text` with no images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextReply {
    /// Text fragments of the first candidate, newline-joined in order
    pub text: String,
    /// Inline images of the first candidate as data URIs, in order
    pub images: Vec<String>,
}

/// Normalized result of an image generation or edit call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReply {
    /// The produced image as a data URI
    pub image_url: String,
}

/// AI gateway abstraction
///
/// Three request kinds against one external generation endpoint. Each
/// operation is a single round trip; there is no retry and no cancellation
/// beyond the transport's own timeout.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Generate a text reply for a prompt, optional attached images, and
    /// prior-turn history
    async fn generate_text(
        &self,
        prompt: &str,
        images: &[PathBuf],
        history: &[HistoryEntry],
    ) -> Result<TextReply>;

    /// Generate an image from a prompt
    async fn generate_image(&self, prompt: &str) -> Result<ImageReply>;

    /// Edit a local image according to a prompt
    async fn edit_image(&self, prompt: &str, image: &Path) -> Result<ImageReply>;
}
