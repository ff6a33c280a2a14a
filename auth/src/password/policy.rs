use serde::Serialize;

/// Passwords rejected regardless of composition, compared case-insensitively.
const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "passw0rd",
    "p@ssw0rd",
    "p@ssword1",
    "admin",
    "admin123",
    "admin@123",
    "administrator",
    "123456",
    "12345678",
    "123456789",
    "1234567890",
    "qwerty",
    "qwerty123",
    "qwerty!23",
    "abc123",
    "letmein",
    "letmein1!",
    "welcome",
    "welcome1",
    "welcome1!",
    "monkey",
    "dragon",
    "iloveyou",
    "sunshine",
    "trustno1",
    "changeme",
    "changeme1!",
];

/// Outcome of checking a candidate password against the policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Password composition policy.
///
/// Every rule is evaluated so a caller can show all violations at once.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    min_length: usize,
}

impl PasswordPolicy {
    pub const DEFAULT_MIN_LENGTH: usize = 8;

    pub fn new() -> Self {
        Self {
            min_length: Self::DEFAULT_MIN_LENGTH,
        }
    }

    /// Check a password against length, character class and denylist rules.
    ///
    /// # Arguments
    /// * `password` - Candidate plaintext password
    ///
    /// # Returns
    /// Report listing every violated rule
    pub fn validate(&self, password: &str) -> PasswordReport {
        let mut errors = Vec::new();

        if password.chars().count() < self.min_length {
            errors.push(format!(
                "Password must be at least {} characters long",
                self.min_length
            ));
        }
        if !password.chars().any(char::is_uppercase) {
            errors.push("Password must contain at least one uppercase letter".to_string());
        }
        if !password.chars().any(char::is_lowercase) {
            errors.push("Password must contain at least one lowercase letter".to_string());
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push("Password must contain at least one number".to_string());
        }
        if !password.chars().any(is_special) {
            errors.push("Password must contain at least one special character".to_string());
        }
        if is_common(password) {
            errors.push("Password is too common, please choose a stronger one".to_string());
        }

        PasswordReport {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new()
    }
}

fn is_special(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace()
}

fn is_common(password: &str) -> bool {
    let lowered = password.to_lowercase();
    COMMON_PASSWORDS.iter().any(|common| *common == lowered)
}
