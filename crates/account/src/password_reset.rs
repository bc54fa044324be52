//! Password reset request
//!
//! A single email field with live format validation. Submitting asks the
//! account service for a reset email. An unknown address looks exactly like
//! a successful request to the user.

use crate::config::PasswordUpdateConfig;
use crate::notify::{Notifier, SilentNotifier, Toast};
use crate::service::PasswordService;
use crate::Result;
use regex_lite::Regex;
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use tokio::sync::watch;

const EMAIL_PATTERN: &str = r"^[A-Z0-9a-z._%+\-']+@[A-Za-z0-9.-]+\.[A-Za-z]{2,64}$";

fn email_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

/// Whether `email` looks like an address the backend will accept
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_some_and(|regex| regex.is_match(email))
}

/// Observable state of the reset screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetState {
    pub email: String,
    pub email_error: Option<String>,
    pub is_loading: bool,
    pub is_continue_button_enabled: bool,
    pub should_dismiss: bool,
}

/// Result of one reset request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Skipped,
    /// Request accepted, or the address is unknown
    EmailSent,
    Failed,
}

/// View model behind the password reset screen.
pub struct PasswordResetViewModel {
    state: PasswordResetState,
    config: PasswordUpdateConfig,
    notifier: Arc<dyn Notifier>,
    publisher: watch::Sender<PasswordResetState>,
}

impl PasswordResetViewModel {
    pub fn new(config: PasswordUpdateConfig) -> Self {
        let state = PasswordResetState::default();
        let (publisher, _) = watch::channel(state.clone());
        Self {
            state,
            config,
            notifier: Arc::new(SilentNotifier),
            publisher,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn state(&self) -> &PasswordResetState {
        &self.state
    }

    pub fn subscribe(&self) -> watch::Receiver<PasswordResetState> {
        self.publisher.subscribe()
    }

    /// Email edit. The format error shows only for non-empty input.
    pub fn update_email(&mut self, text: impl Into<String>) {
        self.state.email = text.into();
        self.state.email_error = if !self.state.email.is_empty() && !is_valid_email(&self.state.email)
        {
            Some(self.config.messages.email_format_error.clone())
        } else {
            None
        };
        self.recompute();
    }

    fn recompute(&mut self) {
        let state = &mut self.state;
        state.is_continue_button_enabled =
            !state.email.is_empty() && is_valid_email(&state.email) && !state.is_loading;
        self.publisher.send_replace(self.state.clone());
    }

    /// Start a request. Returns the address to send to, or `None` when the
    /// button is disabled.
    pub fn begin_submit(&mut self) -> Option<String> {
        if !self.state.is_continue_button_enabled || self.state.is_loading {
            return None;
        }
        self.state.is_loading = true;
        self.recompute();
        tracing::info!("password reset requested");
        Some(self.state.email.clone())
    }

    /// Apply the service answer.
    pub fn finish_submit(&mut self, result: Result<()>) -> ResetOutcome {
        self.state.is_loading = false;

        let outcome = match result {
            Ok(()) => ResetOutcome::EmailSent,
            Err(error) if error.status_code() == Some(404) => {
                tracing::debug!("reset requested for an unknown address");
                ResetOutcome::EmailSent
            }
            Err(error) => {
                tracing::warn!(%error, "password reset request failed");
                ResetOutcome::Failed
            }
        };

        let messages = &self.config.messages;
        match outcome {
            ResetOutcome::EmailSent => {
                self.state.should_dismiss = true;
                self.notifier
                    .present(Toast::info(messages.reset_email_sent.clone()));
            }
            ResetOutcome::Failed => {
                self.notifier
                    .present(Toast::warning(messages.server_error_retry.clone()));
            }
            ResetOutcome::Skipped => {}
        }

        self.recompute();
        outcome
    }

    /// Request the reset email through `service`.
    pub async fn submit<S: PasswordService>(&mut self, service: &S) -> ResetOutcome {
        let Some(email) = self.begin_submit() else {
            return ResetOutcome::Skipped;
        };
        let result = service.request_password_reset(&email).await;
        self.finish_submit(result)
    }

    /// Clear the dismiss flag once the screen closed
    pub fn reset_navigation_state(&mut self) {
        self.state.should_dismiss = false;
        self.recompute();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{RecordingNotifier, ToastStyle};
    use crate::AccountError;

    fn model() -> (PasswordResetViewModel, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let vm = PasswordResetViewModel::new(PasswordUpdateConfig::default())
            .with_notifier(notifier.clone());
        (vm, notifier)
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("jane.o'neil+coach@example.co.uk"));
        assert!(is_valid_email("A_B%c@mail-host.io"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@example.c"));
        assert!(!is_valid_email("x jane@example.com"));
    }

    #[test]
    fn test_error_only_for_non_empty_invalid_input() {
        let (mut vm, _) = model();
        vm.update_email("jane@");
        assert_eq!(vm.state().email_error.as_deref(), Some("textfield_format_error"));
        assert!(!vm.state().is_continue_button_enabled);

        vm.update_email("");
        assert!(vm.state().email_error.is_none());
        assert!(!vm.state().is_continue_button_enabled);

        vm.update_email("jane@example.com");
        assert!(vm.state().email_error.is_none());
        assert!(vm.state().is_continue_button_enabled);
    }

    #[test]
    fn test_unknown_address_looks_like_success() {
        let (mut vm, notifier) = model();
        vm.update_email("jane@example.com");
        assert_eq!(vm.begin_submit().as_deref(), Some("jane@example.com"));
        assert!(!vm.state().is_continue_button_enabled);

        let outcome = vm.finish_submit(Err(AccountError::rejected(404, "not found")));
        assert_eq!(outcome, ResetOutcome::EmailSent);
        assert!(vm.state().should_dismiss);
        assert_eq!(notifier.toasts(), vec![Toast::info("password_email_sent")]);
    }

    #[test]
    fn test_other_failures_show_retry_toast() {
        let (mut vm, notifier) = model();
        vm.update_email("jane@example.com");
        vm.begin_submit();
        let outcome = vm.finish_submit(Err(AccountError::Transport("offline".into())));

        assert_eq!(outcome, ResetOutcome::Failed);
        assert!(!vm.state().should_dismiss);
        assert!(vm.state().is_continue_button_enabled);
        let toasts = notifier.toasts();
        assert_eq!(toasts[0].style, ToastStyle::Warning);
        assert_eq!(toasts[0].text, "server_error_retry");
    }

    #[test]
    fn test_disabled_submit_is_ignored() {
        let (mut vm, _) = model();
        vm.update_email("nope");
        assert!(vm.begin_submit().is_none());
    }
}
