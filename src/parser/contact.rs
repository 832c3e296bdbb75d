use std::sync::LazyLock;

use regex::Regex;

use super::person::ContactInfo;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+\d{1,2}\s?)?\(?\b\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}\b").unwrap()
});

/// First email and first North-American phone number in a section.
/// Returns `None` when neither is present.
pub fn extract_contact(section: &str) -> Option<ContactInfo> {
    ContactInfo {
        email: EMAIL_RE.find(section).map(|m| m.as_str().to_string()),
        phone: PHONE_RE.find(section).map(|m| m.as_str().trim().to_string()),
    }
    .non_empty()
}

pub fn has_contact(text: &str) -> bool {
    EMAIL_RE.is_match(text) || PHONE_RE.is_match(text)
}
