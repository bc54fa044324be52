//! Password update view model
//!
//! Holds the three raw inputs of the update screen, keeps the requirement
//! indicators and inline errors in sync with them, and gates the continue
//! button. Every mutation runs [`PasswordUpdateViewModel::recompute`] and
//! publishes a fresh [`PasswordUpdateState`] snapshot on a watch channel.
//!
//! Strength and match checks are debounced through two [`Debouncer`]s; the
//! owner drives them with [`PasswordUpdateViewModel::run_due_checks`] or
//! awaits [`PasswordUpdateViewModel::settle`].

use crate::config::PasswordUpdateConfig;
use crate::debounce::Debouncer;
use crate::notify::{Notifier, SilentNotifier, Toast};
use crate::password_policy::{NewPasswordFlags, PasswordPolicy};
use crate::service::{
    next_destination, AccountContext, NavigationDestination, OnboardingStatus, PasswordService,
};
use crate::{AccountError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::Instant;

/// A blocking alert the screen must show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertInfo {
    pub title: String,
    pub message: String,
}

/// Observable state of the update screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdateState {
    pub current_password: String,
    pub new_password: String,
    pub retype_password: String,
    pub new_password_flags: NewPasswordFlags,
    pub current_password_error: Option<String>,
    pub retype_password_error: Option<String>,
    pub is_loading: bool,
    pub is_continue_button_enabled: bool,
    pub should_dismiss: bool,
    pub navigation_destination: NavigationDestination,
    pub alert: Option<AlertInfo>,
}

impl PasswordUpdateState {
    pub fn new_password_has_uppercase(&self) -> bool {
        self.new_password_flags.has_uppercase
    }

    pub fn new_password_has_number(&self) -> bool {
        self.new_password_flags.has_number
    }

    pub fn new_password_has_special(&self) -> bool {
        self.new_password_flags.has_special
    }

    pub fn new_password_has_required_length(&self) -> bool {
        self.new_password_flags.has_required_length
    }

    /// Retype matches a non-empty, fully valid new password
    pub fn passwords_match(&self) -> bool {
        !self.new_password.is_empty()
            && self.new_password_flags.all_met()
            && self.new_password == self.retype_password
    }

    /// The continue-button rule
    pub fn continue_enabled(&self, current_policy: &PasswordPolicy) -> bool {
        !self.is_loading
            && current_policy.is_satisfied_by(&self.current_password)
            && self.new_password_flags.all_met()
            && self.passwords_match()
    }
}

/// Why a submit was rejected, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmitFailure {
    /// 403
    WrongCurrentPassword,
    /// 409
    SameAsCurrent,
    /// 411
    Breached,
    /// Anything else
    Server,
}

impl SubmitFailure {
    /// Map a server status code
    pub fn from_code(code: u16) -> Self {
        match code {
            403 => SubmitFailure::WrongCurrentPassword,
            409 => SubmitFailure::SameAsCurrent,
            411 => SubmitFailure::Breached,
            _ => SubmitFailure::Server,
        }
    }

    /// Classify any service error. Transport failures are server errors.
    pub fn from_error(error: &AccountError) -> Self {
        error
            .status_code()
            .map(Self::from_code)
            .unwrap_or(SubmitFailure::Server)
    }
}

/// Result of one submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Guard rejected the attempt; nothing was sent
    Skipped,
    /// Password changed
    Updated,
    /// Password change rejected
    Failed(SubmitFailure),
}

/// The call a submit performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordChangeRequest {
    Plain {
        old_password: String,
        new_password: String,
    },
    Generated {
        access_token: Option<String>,
        old_password: String,
        new_password: String,
    },
}

impl PasswordChangeRequest {
    /// Perform the request against `service`
    pub async fn send<S: PasswordService>(&self, service: &S) -> Result<()> {
        match self {
            PasswordChangeRequest::Plain {
                old_password,
                new_password,
            } => service.update_password(old_password, new_password).await,
            PasswordChangeRequest::Generated {
                access_token,
                old_password,
                new_password,
            } => {
                let token = access_token
                    .as_deref()
                    .ok_or(AccountError::MissingAccessToken)?;
                service
                    .reset_generated_password(token, old_password, new_password)
                    .await
            }
        }
    }

    fn variant(&self) -> &'static str {
        match self {
            PasswordChangeRequest::Plain { .. } => "plain",
            PasswordChangeRequest::Generated { .. } => "generated",
        }
    }
}

/// View model behind the password update screen.
pub struct PasswordUpdateViewModel {
    state: PasswordUpdateState,
    config: PasswordUpdateConfig,
    new_policy: PasswordPolicy,
    current_policy: PasswordPolicy,
    account: AccountContext,
    onboarding: Arc<dyn OnboardingStatus>,
    notifier: Arc<dyn Notifier>,
    strength_check: Debouncer,
    match_check: Debouncer,
    publisher: watch::Sender<PasswordUpdateState>,
}

impl PasswordUpdateViewModel {
    /// Create a view model for a freshly opened screen
    pub fn new(account: AccountContext, config: PasswordUpdateConfig) -> Self {
        let state = PasswordUpdateState::default();
        let (publisher, _) = watch::channel(state.clone());
        let window = config.debounce_window();

        Self {
            state,
            new_policy: config.new_password_policy(),
            current_policy: config.current_password_policy(),
            config,
            account,
            onboarding: Arc::new(None),
            notifier: Arc::new(SilentNotifier),
            strength_check: Debouncer::new(window),
            match_check: Debouncer::new(window),
            publisher,
        }
    }

    /// Use `notifier` for toast requests
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Use `onboarding` to route after a successful update
    pub fn with_onboarding(mut self, onboarding: Arc<dyn OnboardingStatus>) -> Self {
        self.onboarding = onboarding;
        self
    }

    /// Current snapshot
    pub fn state(&self) -> &PasswordUpdateState {
        &self.state
    }

    /// Receive every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<PasswordUpdateState> {
        self.publisher.subscribe()
    }

    /// Account flags captured at construction
    pub fn account(&self) -> &AccountContext {
        &self.account
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Current-password edit. Clears its error right away.
    pub fn update_current_password(&mut self, text: impl Into<String>) {
        self.state.current_password = text.into();
        self.state.current_password_error = None;
        self.recompute();
    }

    /// New-password edit. Schedules both the strength and the match checks.
    pub fn update_new_password(&mut self, text: impl Into<String>) {
        self.state.new_password = text.into();
        let now = Instant::now();
        self.strength_check.arm(now);
        self.match_check.arm(now);
        self.recompute();
    }

    /// Retype edit. Schedules the match check.
    pub fn update_retype_password(&mut self, text: impl Into<String>) {
        self.state.retype_password = text.into();
        self.match_check.arm(Instant::now());
        self.recompute();
    }

    // =========================================================================
    // Debounced checks
    // =========================================================================

    /// Earliest pending check deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.strength_check.deadline(), self.match_check.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Whether any check is waiting for its quiet window
    pub fn has_pending_checks(&self) -> bool {
        self.strength_check.is_pending() || self.match_check.is_pending()
    }

    /// Run every check whose window has elapsed at `now`. Returns whether
    /// anything ran.
    pub fn run_due_checks(&mut self, now: Instant) -> bool {
        let strength = self.strength_check.fire_if_due(now);
        let matching = self.match_check.fire_if_due(now);
        self.apply_checks(strength, matching)
    }

    /// Run every pending check immediately.
    pub fn flush_pending_checks(&mut self) -> bool {
        let strength = self.strength_check.flush();
        let matching = self.match_check.flush();
        self.apply_checks(strength, matching)
    }

    /// Sleep until all pending checks have run.
    pub async fn settle(&mut self) {
        while let Some(deadline) = self.next_deadline() {
            tokio::time::sleep_until(deadline).await;
            self.run_due_checks(Instant::now());
        }
    }

    fn apply_checks(&mut self, strength: bool, matching: bool) -> bool {
        // Strength first: the match check reads the fresh flags.
        if strength {
            self.validate_new_password();
        }
        if matching {
            self.validate_retype_password();
        }
        if strength || matching {
            self.recompute();
        }
        strength || matching
    }

    fn validate_new_password(&mut self) {
        let report = self.new_policy.evaluate(&self.state.new_password);
        self.state.new_password_flags = NewPasswordFlags::from_report(&report);
        tracing::debug!(
            has_uppercase = self.state.new_password_flags.has_uppercase,
            has_number = self.state.new_password_flags.has_number,
            has_special = self.state.new_password_flags.has_special,
            has_required_length = self.state.new_password_flags.has_required_length,
            "new password checked"
        );
    }

    fn validate_retype_password(&mut self) {
        let state = &mut self.state;
        state.retype_password_error = if !state.retype_password.is_empty()
            && state.new_password_flags.all_met()
            && state.new_password != state.retype_password
        {
            Some(self.config.messages.retype_mismatch.clone())
        } else {
            None
        };
    }

    /// Re-derive the continue button and publish the snapshot.
    fn recompute(&mut self) {
        self.state.is_continue_button_enabled = self.state.continue_enabled(&self.current_policy);
        self.publisher.send_replace(self.state.clone());
    }

    // =========================================================================
    // Submit
    // =========================================================================

    /// Start a submit. Returns `None` when the button is disabled or a submit
    /// is already in flight; otherwise marks the screen as loading and
    /// returns the call to make.
    pub fn begin_submit(&mut self) -> Option<PasswordChangeRequest> {
        if !self.state.is_continue_button_enabled || self.state.is_loading {
            return None;
        }

        self.state.is_loading = true;
        self.recompute();

        let old_password = self.state.current_password.clone();
        let new_password = self.state.new_password.clone();
        let request = if self.account.uses_generated_variant() {
            PasswordChangeRequest::Generated {
                access_token: self.account.access_token.clone(),
                old_password,
                new_password,
            }
        } else {
            PasswordChangeRequest::Plain {
                old_password,
                new_password,
            }
        };

        tracing::info!(variant = request.variant(), "password update submitted");
        Some(request)
    }

    /// Apply the result of the call returned by [`Self::begin_submit`].
    pub fn finish_submit(&mut self, result: Result<()>) -> SubmitOutcome {
        self.state.is_loading = false;

        let outcome = match result {
            Ok(()) => {
                self.handle_success();
                SubmitOutcome::Updated
            }
            Err(error) => {
                let failure = SubmitFailure::from_error(&error);
                tracing::info!(?failure, %error, "password update rejected");
                self.handle_failure(failure);
                SubmitOutcome::Failed(failure)
            }
        };

        self.recompute();
        outcome
    }

    /// Submit through `service`, holding the view model for the duration of
    /// the call.
    pub async fn submit<S: PasswordService>(&mut self, service: &S) -> SubmitOutcome {
        let Some(request) = self.begin_submit() else {
            return SubmitOutcome::Skipped;
        };
        let result = request.send(service).await;
        self.finish_submit(result)
    }

    fn handle_success(&mut self) {
        if self.account.coming_from_account {
            self.state.should_dismiss = true;
            self.notifier
                .present(Toast::info(self.config.messages.password_updated.clone()));
        } else {
            self.state.navigation_destination = next_destination(self.onboarding.progress());
        }
        tracing::info!(
            dismiss = self.state.should_dismiss,
            destination = ?self.state.navigation_destination,
            "password updated"
        );
    }

    fn handle_failure(&mut self, failure: SubmitFailure) {
        let messages = &self.config.messages;
        match failure {
            SubmitFailure::WrongCurrentPassword => {
                self.state.current_password_error = Some(messages.current_password_error.clone());
            }
            SubmitFailure::SameAsCurrent => {
                self.state.retype_password_error = Some(messages.same_as_current.clone());
            }
            SubmitFailure::Breached => {
                self.state.alert = Some(AlertInfo {
                    title: messages.breach_alert_title.clone(),
                    message: messages.breach_alert_message.clone(),
                });
            }
            SubmitFailure::Server => {
                self.state.alert = Some(AlertInfo {
                    title: messages.error_alert_title.clone(),
                    message: messages.server_error_retry.clone(),
                });
            }
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Clear navigation flags once the screen acted on them
    pub fn reset_navigation_state(&mut self) {
        self.state.navigation_destination = NavigationDestination::None;
        self.state.should_dismiss = false;
        self.recompute();
    }

    /// Clear the alert once shown
    pub fn dismiss_alert(&mut self) {
        self.state.alert = None;
        self.recompute();
    }
}
