//! Toast requests
//!
//! Banner presentation belongs to the UI layer. Flows only ask for a message
//! to be shown through a [`Notifier`].

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Visual style of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastStyle {
    Info,
    Warning,
}

/// A request to show a transient banner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub style: ToastStyle,
    pub text: String,
}

impl Toast {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            style: ToastStyle::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            style: ToastStyle::Warning,
            text: text.into(),
        }
    }
}

/// Receives toast requests.
pub trait Notifier: Send + Sync {
    fn present(&self, toast: Toast);
}

/// Drops every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn present(&self, _toast: Toast) {}
}

/// Keeps every request in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything presented so far
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .map(|toasts| toasts.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn present(&self, toast: Toast) {
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push(toast);
        }
    }
}
