//! Collaborators of the password flows: the account API and the account's
//! onboarding progress.

use crate::Result;
use serde::{Deserialize, Serialize};

/// Account API calls used by the password screens.
#[trait_variant::make(Send)]
pub trait PasswordService: Send + Sync {
    /// Change the password of a signed-in account.
    async fn update_password(&self, old_password: &str, new_password: &str) -> Result<()>;

    /// Replace a system-generated password while the account is still
    /// waiting for its second factor.
    async fn reset_generated_password(
        &self,
        access_token: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<()>;

    /// Ask for a password reset email.
    async fn request_password_reset(&self, email: &str) -> Result<()>;
}

/// Session tokens and flags captured when the update screen opens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountContext {
    /// Access token for the generated-password variant
    #[serde(default)]
    pub access_token: Option<String>,
    /// The current password was generated by the system
    #[serde(default)]
    pub is_password_generated: bool,
    /// Sign-in is waiting for a second factor
    #[serde(default)]
    pub awaiting_two_factor: bool,
    /// The screen was opened from account settings
    #[serde(default)]
    pub coming_from_account: bool,
}

impl AccountContext {
    /// Context for a user changing their password from settings
    pub fn from_settings() -> Self {
        Self {
            coming_from_account: true,
            ..Default::default()
        }
    }

    /// Context for a first sign-in with a generated password
    pub fn generated(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            is_password_generated: true,
            awaiting_two_factor: true,
            coming_from_account: false,
        }
    }

    /// Whether submit should use the generated-password variant
    pub fn uses_generated_variant(&self) -> bool {
        self.is_password_generated && self.awaiting_two_factor
    }
}

/// Where the app goes after a successful update outside account settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavigationDestination {
    #[default]
    None,
    Steps,
    FindCoach,
    TabBar,
}

/// Snapshot of how far the account got through onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProgress {
    pub steps_complete: bool,
    pub has_coach: bool,
}

/// Source of onboarding progress, owned by the wider app.
pub trait OnboardingStatus: Send + Sync {
    fn progress(&self) -> Option<AccountProgress>;
}

impl OnboardingStatus for Option<AccountProgress> {
    fn progress(&self) -> Option<AccountProgress> {
        *self
    }
}

/// Resolve the next screen. Unknown progress sends the user back to the steps.
pub fn next_destination(progress: Option<AccountProgress>) -> NavigationDestination {
    match progress {
        None => NavigationDestination::Steps,
        Some(p) if !p.steps_complete => NavigationDestination::Steps,
        Some(p) if !p.has_coach => NavigationDestination::FindCoach,
        Some(_) => NavigationDestination::TabBar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_variant_needs_both_flags() {
        assert!(AccountContext::generated("tok").uses_generated_variant());

        let mut ctx = AccountContext::generated("tok");
        ctx.awaiting_two_factor = false;
        assert!(!ctx.uses_generated_variant());

        assert!(!AccountContext::from_settings().uses_generated_variant());
    }

    #[test]
    fn test_next_destination() {
        assert_eq!(next_destination(None), NavigationDestination::Steps);
        assert_eq!(
            next_destination(Some(AccountProgress {
                steps_complete: false,
                has_coach: true
            })),
            NavigationDestination::Steps
        );
        assert_eq!(
            next_destination(Some(AccountProgress {
                steps_complete: true,
                has_coach: false
            })),
            NavigationDestination::FindCoach
        );
        assert_eq!(
            next_destination(Some(AccountProgress {
                steps_complete: true,
                has_coach: true
            })),
            NavigationDestination::TabBar
        );
    }
}
