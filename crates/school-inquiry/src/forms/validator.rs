use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_'^&+\-]+(?:\.[A-Za-z0-9_'^&+\-]+)*@(?:[A-Za-z0-9-]+\.)+[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

pub const PHONE_DIGITS: usize = 10;
pub const MIN_MESSAGE_CHARS: usize = 5;

/// ASCII digits from `raw`, capped at ten.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_DIGITS)
        .collect()
}

/// Display form: up to five digits as typed, then `DDDDD DDDDD`.
pub fn format_phone(raw: &str) -> String {
    let digits = normalize_phone(raw);
    if digits.len() <= 5 {
        return digits;
    }
    let (head, tail) = digits.split_at(5);
    format!("{head} {tail}")
}

pub fn is_valid_phone(raw: &str) -> bool {
    normalize_phone(raw).len() == PHONE_DIGITS
}

pub fn is_valid_email(raw: &str) -> bool {
    EMAIL_RE.is_match(raw)
}

pub fn is_valid_name(raw: &str) -> bool {
    raw.trim().chars().count() > 1
}

pub fn is_valid_message(raw: &str) -> bool {
    raw.trim().chars().count() >= MIN_MESSAGE_CHARS
}
