pub mod categorize;
pub mod contact;
pub mod merge;
pub mod names;
pub mod person;
pub mod roles;
pub mod sections;
pub mod validate;

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Patterns;
use crate::error::LocateError;
use names::{CapitalizedNameLocator, NameLocator};
use person::Person;

/// One cleaned page handed to the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    pub url: String,
    pub body_text: String,
    pub title: Option<String>,
    pub source_file: String,
}

/// Categorized roster for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedContent {
    pub url: String,
    pub title: Option<String>,
    pub sections: Vec<String>,
    pub executives: Vec<Person>,
    pub board_members: Vec<Person>,
    pub source_file: String,
}

impl ProcessedContent {
    fn empty(page: &PageContent) -> Self {
        Self {
            url: page.url.clone(),
            title: page.title.clone(),
            source_file: page.source_file.clone(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.executives.is_empty() && self.board_members.is_empty()
    }
}

/// Text → sections → candidates → merged, validated, categorized roster.
///
/// Holds only read-only state, so one extractor can serve many threads.
pub struct RosterExtractor<L = CapitalizedNameLocator> {
    patterns: Patterns,
    locator: L,
}

impl RosterExtractor<CapitalizedNameLocator> {
    pub fn new(patterns: Patterns) -> Self {
        let locator = CapitalizedNameLocator::from_patterns(&patterns);
        Self { patterns, locator }
    }
}

impl Default for RosterExtractor<CapitalizedNameLocator> {
    fn default() -> Self {
        Self::new(Patterns::default_tables().clone())
    }
}

impl<L: NameLocator> RosterExtractor<L> {
    pub fn with_locator(patterns: Patterns, locator: L) -> Self {
        Self { patterns, locator }
    }

    pub fn patterns(&self) -> &Patterns {
        &self.patterns
    }

    pub fn is_excluded(&self, url: &str) -> bool {
        categorize::is_excluded_url(url, &self.patterns)
    }

    pub fn process(&self, page: &PageContent) -> ProcessedContent {
        if self.is_excluded(&page.url) {
            info!(url = %page.url, "excluded url, skipping extraction");
            return ProcessedContent::empty(page);
        }
        if page.body_text.trim().is_empty() {
            debug!(url = %page.url, "empty body");
            return ProcessedContent::empty(page);
        }

        let sections = sections::relevant_sections(&page.body_text, &self.patterns);
        let mut candidates = Vec::new();
        for section in &sections {
            let scanned = catch_unwind(AssertUnwindSafe(|| self.extract_candidates(&section.text)))
                .unwrap_or_else(|payload| Err(LocateError::Panicked(panic_message(&*payload))));
            match scanned {
                Ok(found) => {
                    debug!(kind = ?section.kind, people = found.len(), "section scanned");
                    candidates.extend(found);
                }
                Err(e) => warn!(url = %page.url, error = %e, "skipping section"),
            }
        }

        let merged = merge::merge_similar(merge::deduplicate(candidates, &self.patterns));
        let mut people: Vec<Person> = merged
            .into_iter()
            .filter(|p| validate::is_valid_person(p, &self.patterns))
            .collect();
        people.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.role.cmp(&b.role)));

        let (executives, board_members) = categorize::categorize(&page.url, people, &self.patterns);

        ProcessedContent {
            url: page.url.clone(),
            title: page.title.clone(),
            sections: sections.into_iter().map(|s| s.text).collect(),
            executives,
            board_members,
            source_file: page.source_file.clone(),
        }
    }

    /// Candidate persons for one section: each located name paired with the
    /// nearest role, sharing the section's contact info. Names with no role
    /// in the section are dropped.
    pub fn extract_candidates(&self, section: &str) -> Result<Vec<Person>, LocateError> {
        let spans = self.locator.locate_person_spans(section)?;
        if let Some(bad) = spans.iter().find(|s| section.get(s.start..s.end).is_none()) {
            return Err(LocateError::Misaligned {
                start: bad.start,
                end: bad.end,
                len: section.len(),
            });
        }

        let role_matches = roles::role_matches(section, &self.patterns);
        if role_matches.is_empty() {
            return Ok(Vec::new());
        }
        let contact_info = contact::extract_contact(section);

        let mut people = Vec::new();
        for span in spans {
            let name = span.name.trim();
            if name.is_empty() {
                continue;
            }
            // Distance is measured from the first letter of the name.
            let raw = &section[span.start..span.end];
            let start = span.start + (raw.len() - raw.trim_start().len());
            let Some(role) = roles::nearest_role(section, &role_matches, start) else {
                continue;
            };
            let mut person = Person::new(name, role, contact_info.clone());
            person.standardize_role(&self.patterns);
            people.push(person);
        }
        Ok(people)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ── Tests ──
