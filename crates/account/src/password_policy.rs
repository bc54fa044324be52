//! Password requirement checks
//!
//! Both password fields on the update screen are judged by the same
//! predicate: a [`PasswordPolicy`] lists the character classes that must be
//! present, a minimum length and, optionally, the alphabet every character
//! must come from. The new-password indicators and the current-password
//! format check are two policies over this one function.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

/// Minimum password length shared by both policies.
pub const MIN_PASSWORD_LENGTH: usize = 10;

/// Special characters an existing (current) password must contain one of.
pub const EXTENDED_SPECIAL_CHARACTERS: &str =
    "!#$%§±¡™£¢∞¶•ªº–\"'æ«…¬˚≤≥µ˜√ç≈Ωåß∂`ƒ©~˙∆πøˆ¨¥†®´^&*()_+{}|?><:,./;]@[=";

/// Special characters an existing password may be built from. Unlike
/// [`EXTENDED_SPECIAL_CHARACTERS`] this has no `/`.
pub const ALLOWED_SPECIAL_CHARACTERS: &str =
    "!#$%§±¡™£¢∞¶•ªº–\"'æ«…¬˚≤≥µ˜√ç≈Ωåß∂`ƒ©~˙∆πøˆ¨¥†®´^&*()_+{}|?><:,.;]@[=";

fn decimal_digit_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^\p{Nd}$").ok()).as_ref()
}

/// Whether `ch` is a decimal digit in any script (general category Nd)
pub fn is_decimal_digit(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_digit();
    }
    let mut buf = [0u8; 4];
    decimal_digit_regex().is_some_and(|regex| regex.is_match(ch.encode_utf8(&mut buf)))
}

/// A character class a password may be required to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CharClass {
    /// Any alphabetic uppercase character
    Uppercase,
    /// ASCII `A-Z`
    AsciiUppercase,
    /// ASCII `a-z`
    AsciiLowercase,
    /// A decimal digit in any script
    Digit,
    /// Anything outside `[A-Za-z0-9]`
    NonAlphanumeric,
    /// A member of [`EXTENDED_SPECIAL_CHARACTERS`]
    ExtendedSpecial,
}

impl CharClass {
    /// Whether `ch` belongs to this class
    pub fn matches(self, ch: char) -> bool {
        match self {
            CharClass::Uppercase => ch.is_alphabetic() && ch.is_uppercase(),
            CharClass::AsciiUppercase => ch.is_ascii_uppercase(),
            CharClass::AsciiLowercase => ch.is_ascii_lowercase(),
            CharClass::Digit => is_decimal_digit(ch),
            CharClass::NonAlphanumeric => !ch.is_ascii_alphanumeric(),
            CharClass::ExtendedSpecial => EXTENDED_SPECIAL_CHARACTERS.contains(ch),
        }
    }
}

/// Characters a password may be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alphabet {
    /// No restriction
    #[default]
    Any,
    /// ASCII letters, decimal digits and [`ALLOWED_SPECIAL_CHARACTERS`]
    AsciiWithExtendedSpecial,
}

impl Alphabet {
    fn allows(self, ch: char) -> bool {
        match self {
            Alphabet::Any => true,
            Alphabet::AsciiWithExtendedSpecial => {
                ch.is_ascii_alphabetic()
                    || is_decimal_digit(ch)
                    || ALLOWED_SPECIAL_CHARACTERS.contains(ch)
            }
        }
    }
}

/// A set of requirements a password must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordPolicy {
    /// Classes that must each appear at least once
    pub required: Vec<CharClass>,
    /// Minimum length in user-perceived characters
    pub min_length: usize,
    /// Allowed alphabet
    #[serde(default)]
    pub alphabet: Alphabet,
}

impl PasswordPolicy {
    /// Policy behind the four live indicators of the new-password field.
    pub fn new_password() -> Self {
        Self {
            required: vec![
                CharClass::Uppercase,
                CharClass::Digit,
                CharClass::NonAlphanumeric,
            ],
            min_length: MIN_PASSWORD_LENGTH,
            alphabet: Alphabet::Any,
        }
    }

    /// Format check for the current password, which was set under the same
    /// rules plus a lowercase letter and a restricted alphabet.
    pub fn current_password() -> Self {
        Self {
            required: vec![
                CharClass::AsciiLowercase,
                CharClass::AsciiUppercase,
                CharClass::Digit,
                CharClass::ExtendedSpecial,
            ],
            min_length: MIN_PASSWORD_LENGTH,
            alphabet: Alphabet::AsciiWithExtendedSpecial,
        }
    }

    /// Override the minimum length
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Evaluate every requirement against `text`. Nothing short-circuits.
    pub fn evaluate(&self, text: &str) -> PolicyReport {
        let mut present = vec![false; self.required.len()];
        let mut within_alphabet = true;

        for ch in text.chars() {
            for (slot, class) in present.iter_mut().zip(&self.required) {
                if !*slot && class.matches(ch) {
                    *slot = true;
                }
            }
            if !self.alphabet.allows(ch) {
                within_alphabet = false;
            }
        }

        PolicyReport {
            classes: self.required.iter().copied().zip(present).collect(),
            has_required_length: password_length(text) >= self.min_length,
            within_alphabet,
        }
    }

    /// Whether `text` satisfies the whole policy
    pub fn is_satisfied_by(&self, text: &str) -> bool {
        self.evaluate(text).is_satisfied()
    }
}

/// Outcome of evaluating a [`PasswordPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyReport {
    classes: Vec<(CharClass, bool)>,
    /// Length requirement met
    pub has_required_length: bool,
    /// Every character belongs to the policy alphabet
    pub within_alphabet: bool,
}

impl PolicyReport {
    /// Whether the class was required and found. Classes the policy does not
    /// require report `false`.
    pub fn has(&self, class: CharClass) -> bool {
        self.classes
            .iter()
            .any(|(required, present)| *required == class && *present)
    }

    /// Required classes that are missing
    pub fn missing(&self) -> impl Iterator<Item = CharClass> + '_ {
        self.classes
            .iter()
            .filter(|(_, present)| !present)
            .map(|(class, _)| *class)
    }

    /// All requirements met
    pub fn is_satisfied(&self) -> bool {
        self.has_required_length
            && self.within_alphabet
            && self.classes.iter().all(|(_, present)| *present)
    }
}

/// The four live indicators shown under the new-password field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPasswordFlags {
    pub has_uppercase: bool,
    pub has_number: bool,
    pub has_special: bool,
    pub has_required_length: bool,
}

impl NewPasswordFlags {
    /// Derive the flags from a new-password policy evaluation
    pub fn from_report(report: &PolicyReport) -> Self {
        Self {
            has_uppercase: report.has(CharClass::Uppercase),
            has_number: report.has(CharClass::Digit),
            has_special: report.has(CharClass::NonAlphanumeric),
            has_required_length: report.has_required_length,
        }
    }

    /// All four indicators are green
    pub fn all_met(&self) -> bool {
        self.has_uppercase && self.has_number && self.has_special && self.has_required_length
    }
}

/// Length as the user sees it (extended grapheme clusters).
pub fn password_length(text: &str) -> usize {
    text.graphemes(true).count()
}
