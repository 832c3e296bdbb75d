use url::Url;

use crate::config::Patterns;

use super::person::Person;
use super::roles::{role_class, RoleClass, CHIEF_EXECUTIVE_OFFICER};

/// True when the URL carries any excluded keyword (press releases, news,
/// blog posts). Such pages are never mined for people.
pub fn is_excluded_url(url: &str, patterns: &Patterns) -> bool {
    let url = url.to_lowercase();
    patterns
        .excluded_url_keywords
        .iter()
        .any(|k| url.contains(k.as_str()))
}

/// Page theme inferred from the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageContext {
    Executive,
    Board,
    /// Neither or both themes.
    General,
}

pub fn page_context(url: &str, patterns: &Patterns) -> PageContext {
    let haystack = url_locator(url);
    let executive = patterns
        .executive_page_keywords
        .iter()
        .any(|k| haystack.contains(k.as_str()));
    let board = patterns
        .board_page_keywords
        .iter()
        .any(|k| haystack.contains(k.as_str()));
    match (executive, board) {
        (true, false) => PageContext::Executive,
        (false, true) => PageContext::Board,
        _ => PageContext::General,
    }
}

/// Lowercased path and query; the host is ignored so a domain such as
/// `teamgold.com` does not theme every page. Unparseable URLs are used whole.
fn url_locator(url: &str) -> String {
    match Url::parse(url.trim()) {
        Ok(parsed) => {
            let mut s = parsed.path().to_lowercase();
            if let Some(query) = parsed.query() {
                s.push('?');
                s.push_str(&query.to_lowercase());
            }
            s
        }
        Err(_) => url.to_lowercase(),
    }
}

/// Split validated people into `(executives, board_members)`.
pub fn categorize(url: &str, people: Vec<Person>, patterns: &Patterns) -> (Vec<Person>, Vec<Person>) {
    let context = page_context(url, patterns);
    let mut executives: Vec<Person> = Vec::new();
    let mut board_members: Vec<Person> = Vec::new();

    for person in people {
        let is_ceo = person.role == CHIEF_EXECUTIVE_OFFICER;
        let (to_exec, to_board) = match context {
            PageContext::Executive => (true, is_ceo),
            PageContext::Board => (is_ceo, true),
            PageContext::General => match role_class(&person.role, patterns) {
                RoleClass::Executive => (true, is_ceo),
                RoleClass::Board => (false, true),
                RoleClass::Other => (false, false),
            },
        };
        if to_board && !board_members.contains(&person) {
            board_members.push(person.clone());
        }
        if to_exec {
            executives.push(person);
        }
    }

    (executives, board_members)
}
