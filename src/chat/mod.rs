//! Chat session state for Mdchat
//!
//! This module contains the conversation store that owns the message log
//! and loading flag, and the notification sink used to surface errors.

pub mod notify;
pub mod store;

pub use notify::{Notifier, TerminalNotifier};
pub use store::ChatStore;
