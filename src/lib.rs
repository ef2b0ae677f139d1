//! Mdchat - terminal chat client library
//!
//! This library provides the core functionality for the Mdchat client:
//! a conversation store, an AI gateway abstraction, and the media codec
//! used to move images in and out of JSON request bodies.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `chat`: Conversation store, message log, and notification sink
//! - `gateway`: AI gateway abstraction and the Gemini implementation
//! - `codec`: Image blob <-> base64 data URI conversions
//! - `message`: Conversation message and image reference types
//! - `persona`: Sender tags and the selectable assistant personas
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use mdchat::chat::{ChatStore, TerminalNotifier};
//! use mdchat::config::Config;
//! use mdchat::gateway::GeminiGateway;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let gateway = GeminiGateway::new(config.gateway)?;
//!     let mut store = ChatStore::new(
//!         Box::new(gateway),
//!         Box::new(TerminalNotifier),
//!         &config.chat,
//!     )?;
//!
//!     store.send_message("Hello!", Vec::new()).await;
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod cli;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod message;
pub mod persona;

// Re-export commonly used types
pub use chat::{ChatStore, Notifier, TerminalNotifier};
pub use config::Config;
pub use error::{MdchatError, Result};
pub use gateway::{Gateway, GeminiGateway, HistoryEntry, ImageReply, TextReply};
pub use message::{ImageRef, Message};
pub use persona::Sender;
