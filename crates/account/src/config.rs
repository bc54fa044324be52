//! Configuration for the password screens

use crate::password_policy::{PasswordPolicy, MIN_PASSWORD_LENGTH};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// User-facing texts. Defaults are localization keys; the host app may
/// replace them with resolved strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageCatalog {
    pub current_password_error: String,
    pub retype_mismatch: String,
    pub same_as_current: String,
    pub breach_alert_title: String,
    pub breach_alert_message: String,
    pub error_alert_title: String,
    pub server_error_retry: String,
    pub password_updated: String,
    pub email_format_error: String,
    pub reset_email_sent: String,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            current_password_error: "current_password_error_label".to_string(),
            retype_mismatch: "new_password_retype_error".to_string(),
            same_as_current: "current_password_same_has_new_one".to_string(),
            breach_alert_title: "Warning".to_string(),
            breach_alert_message: "password_100_times_hibp".to_string(),
            error_alert_title: "error".to_string(),
            server_error_retry: "server_error_retry".to_string(),
            password_updated: "password_updated_confirmation".to_string(),
            email_format_error: "textfield_format_error".to_string(),
            reset_email_sent: "password_email_sent".to_string(),
        }
    }
}

/// Settings for the password update and reset view models
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdateConfig {
    /// Quiet window before strength and match checks run
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Minimum password length for both fields
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    /// User-facing texts
    #[serde(default)]
    pub messages: MessageCatalog,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_length() -> usize {
    MIN_PASSWORD_LENGTH
}

impl Default for PasswordUpdateConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_length: default_min_length(),
            messages: MessageCatalog::default(),
        }
    }
}

impl PasswordUpdateConfig {
    /// Set the debounce window
    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Set the message catalog
    pub fn with_messages(mut self, messages: MessageCatalog) -> Self {
        self.messages = messages;
        self
    }

    /// Debounce window as a duration
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Policy for the new-password indicators
    pub fn new_password_policy(&self) -> PasswordPolicy {
        PasswordPolicy::new_password().with_min_length(self.min_length)
    }

    /// Format policy for the current password
    pub fn current_password_policy(&self) -> PasswordPolicy {
        PasswordPolicy::current_password().with_min_length(self.min_length)
    }
}
