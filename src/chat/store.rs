//! Conversation store
//!
//! Owns the append-only message log and the loading flag, derives the
//! bounded context window sent with each text request, and converts every
//! gateway failure into a user notification. No error escapes the store,
//! no call is retried, and a failed call never rolls back the user turn
//! that triggered it.

use crate::chat::notify::Notifier;
use crate::config::ChatConfig;
use crate::error::{MdchatError, Result};
use crate::gateway::{Gateway, HistoryEntry};
use crate::message::{ImageRef, Message};
use crate::persona::Sender;
use std::path::PathBuf;

/// In-memory conversation store
///
/// State per call is `Idle -> Pending -> Idle`; the `is_loading` flag is
/// true exactly while one gateway call is in flight and is cleared on both
/// the success and failure paths. The store assumes at most one call in
/// flight: its operations take `&mut self`, and the driving loop awaits
/// each one before issuing the next.
pub struct ChatStore {
    gateway: Box<dyn Gateway>,
    notifier: Box<dyn Notifier>,
    persona: Sender,
    history_window: usize,
    messages: Vec<Message>,
    is_loading: bool,
}

impl ChatStore {
    /// Create a new store over a gateway and notification sink
    ///
    /// # Arguments
    ///
    /// * `gateway` - AI gateway used for all three operations
    /// * `notifier` - Sink for user-visible error notifications
    /// * `config` - Chat configuration (window size, starting persona)
    ///
    /// # Errors
    ///
    /// Returns error if the configured default persona is invalid
    pub fn new(
        gateway: Box<dyn Gateway>,
        notifier: Box<dyn Notifier>,
        config: &ChatConfig,
    ) -> Result<Self> {
        let persona =
            Sender::parse_persona(&config.default_persona).map_err(MdchatError::Config)?;

        Ok(Self {
            gateway,
            notifier,
            persona,
            history_window: config.history_window,
            messages: Vec::new(),
            is_loading: false,
        })
    }

    /// Read-only view of the conversation log
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// True while a gateway call is in flight
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// The persona currently authoring assistant turns
    pub fn persona(&self) -> Sender {
        self.persona
    }

    /// Switch the active assistant persona
    ///
    /// Affects only subsequent assistant turns; earlier messages keep the
    /// tag they were created with.
    ///
    /// # Returns
    ///
    /// The persona that was replaced
    pub fn set_persona(&mut self, persona: Sender) -> Sender {
        let old = self.persona;
        self.persona = persona;
        old
    }

    /// Drop all messages, starting a fresh conversation
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Derive the bounded context window from the current log
    ///
    /// Returns the last `history_window` messages in chronological order,
    /// mapped to wire roles: the user to "user", every persona to
    /// "assistant". Call this before appending the in-flight user turn so
    /// the window reflects the log as it stood when the send started.
    pub fn context_window(&self) -> Vec<HistoryEntry> {
        let skip = self.messages.len().saturating_sub(self.history_window);
        self.messages[skip..]
            .iter()
            .map(|msg| HistoryEntry {
                role: msg.sender.role().to_string(),
                content: msg.content.clone(),
            })
            .collect()
    }

    /// Send a user message and append the assistant's reply
    ///
    /// The user turn is appended synchronously before the gateway call is
    /// issued, so the log always shows the sent message even when the
    /// reply never arrives. On failure the user is notified and the log
    /// gains no assistant turn.
    ///
    /// # Arguments
    ///
    /// * `content` - Markdown message text
    /// * `images` - Local image files to attach
    pub async fn send_message(&mut self, content: &str, images: Vec<PathBuf>) {
        let mut history = Vec::with_capacity(self.history_window + 1);
        let preamble = self.persona.preamble();
        if !preamble.is_empty() {
            history.push(HistoryEntry::system(preamble));
        }
        history.extend(self.context_window());

        let image_refs: Vec<ImageRef> = images.iter().cloned().map(ImageRef::Blob).collect();
        self.messages
            .push(Message::user_with_images(content, image_refs));

        self.is_loading = true;
        match self.gateway.generate_text(content, &images, &history).await {
            Ok(reply) => {
                let images = reply.images.into_iter().map(ImageRef::DataUri).collect();
                self.messages.push(Message::assistant_with_images(
                    self.persona,
                    reply.text,
                    images,
                ));
            }
            Err(e) => {
                tracing::warn!("Text generation failed: {}", e);
                self.notifier
                    .notify("Failed to generate response", &e.to_string());
            }
        }
        self.is_loading = false;
    }

    /// Request a generated image for a prompt
    pub async fn generate_image(&mut self, prompt: &str) {
        self.messages
            .push(Message::user(format!("Generate image: \"{}\"", prompt)));

        self.is_loading = true;
        match self.gateway.generate_image(prompt).await {
            Ok(reply) => {
                self.messages.push(Message::assistant_with_images(
                    self.persona,
                    format!("Generated image for: \"{}\"", prompt),
                    vec![ImageRef::DataUri(reply.image_url)],
                ));
            }
            Err(e) => {
                tracing::warn!("Image generation failed: {}", e);
                self.notifier
                    .notify("Failed to generate image", &e.to_string());
            }
        }
        self.is_loading = false;
    }

    /// Request an edit of a local image
    pub async fn edit_image(&mut self, prompt: &str, image: PathBuf) {
        self.messages.push(Message::user_with_images(
            format!("Edit request: {}", prompt),
            vec![ImageRef::Blob(image.clone())],
        ));

        self.is_loading = true;
        match self.gateway.edit_image(prompt, &image).await {
            Ok(reply) => {
                self.messages.push(Message::assistant_with_images(
                    self.persona,
                    format!("Image edited based on: \"{}\"", prompt),
                    vec![ImageRef::DataUri(reply.image_url)],
                ));
            }
            Err(e) => {
                tracing::warn!("Image edit failed: {}", e);
                self.notifier.notify("Failed to edit image", &e.to_string());
            }
        }
        self.is_loading = false;
    }
}
