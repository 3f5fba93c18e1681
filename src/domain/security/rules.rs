//! Password strength rules

use serde::{Deserialize, Serialize};

const DEFAULT_MIN_LENGTH: usize = 8;

/// A single strength rule a password can violate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    MinimumLength(usize),
    MixedCase,
    AlphaNumeric,
    SpecialCharacter,
    ReusedPassword,
}

impl std::fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MinimumLength(n) => write!(f, "password must be at least {} characters", n),
            Self::MixedCase => write!(f, "password must mix upper and lower case letters"),
            Self::AlphaNumeric => write!(f, "password must contain both letters and digits"),
            Self::SpecialCharacter => write!(f, "password must contain a special character"),
            Self::ReusedPassword => write!(f, "password must differ from the previous one"),
        }
    }
}

/// Configurable password strength rules
///
/// Loaded once from the `security` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordRules {
    /// Minimum number of characters
    pub length: usize,
    /// Require at least one upper and one lower case letter
    pub mixed_case: bool,
    /// Require at least one letter and one digit
    pub alpha_num: bool,
    /// Require at least one character that is neither alphanumeric nor whitespace
    pub special_char: bool,
    /// Require a changed password to differ from the current one
    pub check_previous: bool,
}

impl Default for PasswordRules {
    fn default() -> Self {
        Self {
            length: DEFAULT_MIN_LENGTH,
            mixed_case: false,
            alpha_num: false,
            special_char: false,
            check_previous: true,
        }
    }
}

impl PasswordRules {
    /// Check a password against the enabled rules, reporting the first violation
    pub fn evaluate(&self, password: &str) -> Result<(), PasswordRule> {
        if password.chars().count() < self.length {
            return Err(PasswordRule::MinimumLength(self.length));
        }

        if self.mixed_case {
            let has_upper = password.chars().any(char::is_uppercase);
            let has_lower = password.chars().any(char::is_lowercase);

            if !(has_upper && has_lower) {
                return Err(PasswordRule::MixedCase);
            }
        }

        if self.alpha_num {
            let has_alpha = password.chars().any(char::is_alphabetic);
            let has_digit = password.chars().any(|c| c.is_ascii_digit());

            if !(has_alpha && has_digit) {
                return Err(PasswordRule::AlphaNumeric);
            }
        }

        if self.special_char
            && !password
                .chars()
                .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
        {
            return Err(PasswordRule::SpecialCharacter);
        }

        Ok(())
    }
}
