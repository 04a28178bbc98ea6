//! Password strength heuristic.
//!
//! A password is strong when it is long enough, mixes at least three
//! character classes, is not a well-known password and is not one repeated
//! character.

use serde::Serialize;

/// Passwords rejected regardless of their composition.
const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "passw0rd",
    "p@ssw0rd",
    "123456",
    "12345678",
    "123456789",
    "qwerty",
    "qwerty123",
    "letmein",
    "welcome",
    "welcome1",
    "admin",
    "admin123",
    "iloveyou",
    "monkey",
    "abc123",
    "changeme",
    "insurance",
];

/// Length at which a password earns an extra point.
const LONG_PASSWORD: usize = 12;

/// Result of [`check_strength`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordStrength {
    /// 0 (unusable) to 4 (strong and long).
    pub score: u8,
    pub is_strong: bool,
    /// One message per failed requirement; empty when strong.
    pub feedback: Vec<String>,
}

/// Score `password` against the heuristic.
pub fn check_strength(password: &str, min_length: usize) -> PasswordStrength {
    let mut feedback = Vec::new();

    if password.trim().is_empty() {
        return PasswordStrength {
            score: 0,
            is_strong: false,
            feedback: vec!["Password cannot be empty".to_string()],
        };
    }

    let length = password.chars().count();
    if length < min_length {
        feedback.push(format!(
            "Password must be at least {} characters (got {})",
            min_length, length
        ));
    }

    let classes = character_classes(password);
    if classes < 3 {
        feedback.push(
            "Password must mix at least three of: lowercase, uppercase, digits, symbols"
                .to_string(),
        );
    }

    let lowered = password.to_lowercase();
    let common = COMMON_PASSWORDS.contains(&lowered.as_str());
    if common {
        feedback.push("Password is too common".to_string());
    }

    let mut chars = password.chars();
    let first = chars.next();
    let repeated = chars.all(|c| Some(c) == first);
    if repeated {
        feedback.push("Password cannot be a single repeated character".to_string());
    }

    let score = if common || repeated {
        0
    } else {
        let mut score = 0u8;
        if length >= min_length {
            score += 1;
        }
        if length >= LONG_PASSWORD {
            score += 1;
        }
        if classes >= 3 {
            score += 1;
        }
        if classes == 4 {
            score += 1;
        }
        score
    };

    PasswordStrength {
        score,
        is_strong: feedback.is_empty(),
        feedback,
    }
}

fn character_classes(password: &str) -> usize {
    let lower = password.chars().any(|c| c.is_lowercase());
    let upper = password.chars().any(|c| c.is_uppercase());
    let digit = password.chars().any(|c| c.is_ascii_digit());
    let symbol = password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());
    [lower, upper, digit, symbol].iter().filter(|&&b| b).count()
}
