//! Secret detection and redaction utilities.
//!
//! Keys are split into words (on `_`, `-`, `.`, whitespace and camelCase
//! boundaries) before matching, so `apiKey`, `API_KEY` and `db.password` are
//! all detected while `monkey` or `author` are not.

/// The redacted placeholder string.
pub const REDACTED: &str = "[REDACTED]";

const SECRET_WORDS: &[&str] = &[
    "KEY",
    "APIKEY",
    "TOKEN",
    "SECRET",
    "PASSWORD",
    "PASSWD",
    "PWD",
    "CREDENTIAL",
    "CREDENTIALS",
    "AUTH",
    "AUTHORIZATION",
];

/// Checks if a field or variable name likely refers to a secret.
///
/// # Examples
///
/// ```
/// use cwlog_shared::is_secret_key;
///
/// assert!(is_secret_key("API_KEY"));
/// assert!(is_secret_key("apiKey"));
/// assert!(is_secret_key("db.password"));
/// assert!(!is_secret_key("LOG_LEVEL"));
/// assert!(!is_secret_key("monkey"));
/// ```
pub fn is_secret_key(key: &str) -> bool {
    key_words(key)
        .iter()
        .any(|word| SECRET_WORDS.contains(&word.as_str()))
}

fn key_words(key: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut previous_lower = false;

    for ch in key.chars() {
        if ch == '_' || ch == '-' || ch == '.' || ch.is_whitespace() {
            flush_word(&mut words, &mut current);
            previous_lower = false;
            continue;
        }
        if ch.is_uppercase() && previous_lower {
            flush_word(&mut words, &mut current);
        }
        previous_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.extend(ch.to_uppercase());
    }
    flush_word(&mut words, &mut current);
    words
}

fn flush_word(words: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}
