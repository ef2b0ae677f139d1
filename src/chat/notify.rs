//! User-visible notification sink
//!
//! Errors caught at the conversation store boundary are surfaced through
//! this trait and otherwise swallowed. Notifications are fire-and-forget;
//! the terminal implementation prints them in red on stderr.

use colored::Colorize;

/// Sink for toast-style user notifications
pub trait Notifier: Send + Sync {
    /// Surface a user-visible notification
    ///
    /// # Arguments
    ///
    /// * `title` - Short headline for the failure
    /// * `detail` - Underlying error message
    fn notify(&self, title: &str, detail: &str);
}

/// Notifier that writes to stderr with color
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, title: &str, detail: &str) {
        eprintln!("{} {}", title.red().bold(), detail.red());
    }
}

/// Notifier that records notifications for inspection in tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    pub(crate) events: std::sync::Mutex<Vec<(String, String)>>,
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, detail: &str) {
        self.events
            .lock()
            .unwrap()
            .push((title.to_string(), detail.to_string()));
    }
}

// Lets tests hand the store a boxed clone while keeping a handle to the
// recorded events.
#[cfg(test)]
impl Notifier for std::sync::Arc<RecordingNotifier> {
    fn notify(&self, title: &str, detail: &str) {
        self.as_ref().notify(title, detail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_captures_events() {
        let notifier = RecordingNotifier::default();
        notifier.notify("Failed to generate response", "Gateway error: boom");

        let events = notifier.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "Failed to generate response");
        assert!(events[0].1.contains("boom"));
    }

    #[test]
    fn test_terminal_notifier_does_not_panic() {
        TerminalNotifier.notify("title", "detail");
    }
}
