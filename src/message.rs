//! Conversation message data model
//!
//! A message is one immutable conversational turn: markdown text, a sender
//! tag, a creation timestamp, and zero or more attached images. The log
//! that holds them is append-only and lives only for the process lifetime.

use crate::persona::Sender;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Reference to an image attached to a message
///
/// User-uploaded images stay as local file handles for the session;
/// AI-generated or edited images arrive as inline data URIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Local file supplied by the user
    Blob(PathBuf),

    /// Inline `data:{mime};base64,...` reference returned by the gateway
    DataUri(String),
}

impl ImageRef {
    /// Short label for terminal display
    ///
    /// Data URIs are abbreviated; a full payload can be hundreds of
    /// kilobytes of base64.
    pub fn display_label(&self) -> String {
        match self {
            Self::Blob(path) => format!("[image: {}]", path.display()),
            Self::DataUri(uri) => {
                let mime = uri
                    .strip_prefix("data:")
                    .and_then(|rest| rest.split(';').next())
                    .unwrap_or("image");
                format!("[inline {}]", mime)
            }
        }
    }
}

/// A single conversational turn
///
/// Immutable after construction; the conversation store appends messages
/// and never mutates them.
#[derive(Debug, Clone)]
pub struct Message {
    /// Markdown-formatted text; may be empty for image-only turns
    pub content: String,
    /// Author of the turn
    pub sender: Sender,
    /// Creation time, set once at construction
    pub timestamp: DateTime<Utc>,
    /// Attached images in display order
    pub images: Vec<ImageRef>,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use mdchat::message::Message;
    /// use mdchat::persona::Sender;
    ///
    /// let msg = Message::user("Hello!");
    /// assert_eq!(msg.sender, Sender::User);
    /// assert!(msg.images.is_empty());
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, Sender::User, Vec::new())
    }

    /// Creates a new user message with attached images
    pub fn user_with_images(content: impl Into<String>, images: Vec<ImageRef>) -> Self {
        Self::new(content, Sender::User, images)
    }

    /// Creates a new assistant message authored by the given persona
    pub fn assistant(persona: Sender, content: impl Into<String>) -> Self {
        Self::new(content, persona, Vec::new())
    }

    /// Creates a new assistant message carrying images
    pub fn assistant_with_images(
        persona: Sender,
        content: impl Into<String>,
        images: Vec<ImageRef>,
    ) -> Self {
        Self::new(content, persona, images)
    }

    fn new(content: impl Into<String>, sender: Sender, images: Vec<ImageRef>) -> Self {
        Self {
            content: content.into(),
            sender,
            timestamp: Utc::now(),
            images,
        }
    }

    /// Timestamp formatted for terminal display (HH:MM)
    pub fn formatted_time(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}
