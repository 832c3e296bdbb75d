use serde::{Deserialize, Serialize};

use crate::config::Patterns;
use crate::parser::roles;

/// Email and phone found next to a person. Keys are never removed once set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none()
    }

    /// Key union: fills only the keys this side is missing.
    pub fn union(&mut self, other: &ContactInfo) {
        if self.email.is_none() {
            self.email = other.email.clone();
        }
        if self.phone.is_none() {
            self.phone = other.phone.clone();
        }
    }

    /// `None` when empty, so an empty map is never emitted.
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<ContactInfo>,
}

impl Person {
    pub fn new(name: impl Into<String>, role: impl Into<String>, contact_info: Option<ContactInfo>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            role: role.into().trim().to_string(),
            contact_info: contact_info.and_then(ContactInfo::non_empty),
        }
    }

    /// Rewrite the role to its canonical label. Idempotent.
    pub fn standardize_role(&mut self, patterns: &Patterns) {
        self.role = roles::canonical_role(&self.role, patterns);
    }

    /// Case/whitespace-folded name used as the merge identity.
    pub fn identity(&self) -> String {
        normalize_name(&self.name)
    }

    /// Union this record's contact info with `other`'s.
    pub fn merge_with(&mut self, other: &Person) {
        let Some(theirs) = &other.contact_info else {
            return;
        };
        let mut merged = self.contact_info.take().unwrap_or_default();
        merged.union(theirs);
        self.contact_info = merged.non_empty();
    }

    pub fn email(&self) -> Option<&str> {
        self.contact_info.as_ref().and_then(|c| c.email.as_deref())
    }

    pub fn phone(&self) -> Option<&str> {
        self.contact_info.as_ref().and_then(|c| c.phone.as_deref())
    }
}

/// Lowercase and collapse runs of whitespace.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
