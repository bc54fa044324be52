//! Integration tests for the password update screen
//!
//! Drives the view model the way the screen does: keystrokes arrive on the
//! interactive task, checks settle after the quiet window, and the service
//! call runs on its own task while the user keeps typing.

use account::{
    AccountContext, AccountError, NavigationDestination, PasswordService, PasswordUpdateConfig,
    PasswordUpdateViewModel, RecordingNotifier, Result, SubmitFailure, SubmitOutcome,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;
use tokio::time::Instant;

static LOGGING: Once = Once::new();

fn init_logging() {
    LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Service that answers after a fixed latency with a scripted status.
struct SlowService {
    latency: Duration,
    status: Option<u16>,
    calls: AtomicUsize,
}

impl SlowService {
    fn new(latency_ms: u64, status: Option<u16>) -> Self {
        Self {
            latency: Duration::from_millis(latency_ms),
            status,
            calls: AtomicUsize::new(0),
        }
    }

    async fn answer(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        match self.status {
            Some(code) => Err(AccountError::rejected(code, "rejected")),
            None => Ok(()),
        }
    }
}

impl PasswordService for SlowService {
    async fn update_password(&self, _old: &str, _new: &str) -> Result<()> {
        self.answer().await
    }

    async fn reset_generated_password(&self, _token: &str, _old: &str, _new: &str) -> Result<()> {
        self.answer().await
    }

    async fn request_password_reset(&self, _email: &str) -> Result<()> {
        self.answer().await
    }
}

async fn typed(account: AccountContext) -> PasswordUpdateViewModel {
    let mut vm = PasswordUpdateViewModel::new(account, PasswordUpdateConfig::default());
    vm.update_current_password("Oldpassw0rd!");
    vm.update_new_password("Abcdefgh1!");
    vm.update_retype_password("Abcdefgh1!");
    vm.settle().await;
    vm
}

#[tokio::test(start_paused = true)]
async fn test_matching_passwords_enable_continue() {
    init_logging();
    let mut vm = typed(AccountContext::default()).await;

    assert!(vm.state().retype_password_error.is_none());
    assert!(vm.state().is_continue_button_enabled);

    vm.update_retype_password("Abcdefgh1?");
    vm.settle().await;
    assert_eq!(
        vm.state().retype_password_error.as_deref(),
        Some("new_password_retype_error")
    );
    assert!(!vm.state().is_continue_button_enabled);
}

#[tokio::test(start_paused = true)]
async fn test_match_check_follows_new_password_edits() {
    init_logging();
    let mut vm = typed(AccountContext::default()).await;

    // Editing the new password re-runs the match against the old retype
    vm.update_new_password("Abcdefgh1!x");
    let start = Instant::now();
    vm.settle().await;
    assert_eq!(Instant::now() - start, Duration::from_millis(300));
    assert!(vm.state().retype_password_error.is_some());

    vm.update_retype_password("Abcdefgh1!x");
    vm.settle().await;
    assert!(vm.state().retype_password_error.is_none());
    assert!(vm.state().is_continue_button_enabled);
}

#[tokio::test(start_paused = true)]
async fn test_edits_during_submit_keep_button_disabled() {
    init_logging();
    let service = Arc::new(SlowService::new(1_000, None));
    let mut vm = typed(AccountContext::default()).await;
    let mut snapshots = vm.subscribe();

    let request = vm.begin_submit().expect("button should be enabled");
    let call = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { request.send(service.as_ref()).await })
    };

    vm.update_current_password("Oldpassw0rd?");
    vm.settle().await;
    assert!(vm.state().is_loading);
    assert!(!vm.state().is_continue_button_enabled);
    assert!(vm.begin_submit().is_none());
    assert!(!snapshots.borrow_and_update().is_continue_button_enabled);

    let result = call.await.expect("service task panicked");
    let outcome = vm.finish_submit(result);

    assert_eq!(outcome, SubmitOutcome::Updated);
    assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    assert!(!vm.state().is_loading);
    assert!(vm.state().is_continue_button_enabled);
    assert_eq!(
        vm.state().navigation_destination,
        NavigationDestination::Steps
    );
}

#[tokio::test(start_paused = true)]
async fn test_rejections_are_classified_once() {
    init_logging();
    for (code, expected) in [
        (403, SubmitFailure::WrongCurrentPassword),
        (409, SubmitFailure::SameAsCurrent),
        (411, SubmitFailure::Breached),
        (418, SubmitFailure::Server),
    ] {
        let service = SlowService::new(50, Some(code));
        let mut vm = typed(AccountContext::default()).await;
        let outcome = vm.submit(&service).await;
        assert_eq!(outcome, SubmitOutcome::Failed(expected));

        let state = vm.state();
        assert_eq!(state.current_password_error.is_some(), code == 403);
        assert_eq!(state.retype_password_error.is_some(), code == 409);
        assert_eq!(state.alert.is_some(), code != 403 && code != 409);
        assert!(!state.is_loading);
    }
}

#[tokio::test(start_paused = true)]
async fn test_settings_flow_dismisses() {
    init_logging();
    let notifier = Arc::new(RecordingNotifier::new());
    let service = SlowService::new(10, None);
    let mut vm = typed(AccountContext::from_settings())
        .await
        .with_notifier(notifier.clone());

    assert_eq!(vm.submit(&service).await, SubmitOutcome::Updated);
    assert!(vm.state().should_dismiss);
    assert_eq!(notifier.toasts().len(), 1);
    assert_eq!(notifier.toasts()[0].text, "password_updated_confirmation");
}
