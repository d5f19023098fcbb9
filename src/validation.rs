//! Contact detail validation for the lead-capture form

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// `local@domain.tld` with no whitespace anywhere
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Optional `+61` or trunk `0`, an area/mobile digit, then eight ASCII digits
///
/// `\d` would also match other scripts' digits, so the class is spelled out.
static AU_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+61|0)?[23478][0-9]{8}$").expect("phone pattern compiles"));

/// What kind of contact detail was supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Email,
    Phone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("enter a valid email or Australian phone number")]
    InvalidContactInput,
}

#[must_use]
pub fn is_email(input: &str) -> bool {
    EMAIL.is_match(input)
}

/// Internal whitespace (`0412 345 678`) is ignored.
#[must_use]
pub fn is_au_phone(input: &str) -> bool {
    let compact: String = input.split_whitespace().collect();
    AU_PHONE.is_match(&compact)
}

/// Classify a trimmed contact value.
///
/// # Errors
///
/// Returns [`ContactError::InvalidContactInput`] when the value is neither an
/// email address nor an Australian phone number.
pub fn validate_contact(input: &str) -> Result<ContactKind, ContactError> {
    if is_email(input) {
        Ok(ContactKind::Email)
    } else if is_au_phone(input) {
        Ok(ContactKind::Phone)
    } else {
        Err(ContactError::InvalidContactInput)
    }
}
