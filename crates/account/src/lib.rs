//! Account - Password update and reset flows
//!
//! This crate holds the state machines behind the password screens: live
//! requirement checks, debounced retype matching, submit with status-code
//! classification, and the reset-email request. Network and presentation are
//! reached through the [`PasswordService`] and [`Notifier`] seams.

mod config;
mod debounce;
mod error;
mod notify;
mod password_policy;
mod password_reset;
mod password_update;
mod service;

pub use config::*;
pub use debounce::*;
pub use error::*;
pub use notify::*;
pub use password_policy::*;
pub use password_reset::*;
pub use password_update::*;
pub use service::*;
