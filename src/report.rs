use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::parser::person::Person;
use crate::parser::ProcessedContent;

impl fmt::Display for ProcessedContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "URL: {}", self.url)?;
        writeln!(f, "Title: {}", self.title.as_deref().unwrap_or("-"))?;
        writeln!(f, "Source File: {}", self.source_file)?;
        writeln!(f)?;

        writeln!(f, "=== Management Sections ===")?;
        for (i, section) in self.sections.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "[{}]", i + 1)?;
            writeln!(f, "{}", "-".repeat(50))?;
            writeln!(f, "{section}")?;
        }
        writeln!(f)?;

        write_people(f, "Executives", &self.executives)?;
        writeln!(f)?;
        write_people(f, "Board Members", &self.board_members)
    }
}

fn write_people(f: &mut fmt::Formatter<'_>, heading: &str, people: &[Person]) -> fmt::Result {
    writeln!(f, "=== {heading} ===")?;
    if people.is_empty() {
        return writeln!(f, "No people extracted");
    }
    for p in people {
        writeln!(f)?;
        writeln!(f, "Name: {}", p.name)?;
        writeln!(f, "Role: {}", p.role)?;
        if let Some(c) = &p.contact_info {
            writeln!(f, "Contact Info:")?;
            if let Some(email) = &c.email {
                writeln!(f, "  email: {email}")?;
            }
            if let Some(phone) = &c.phone {
                writeln!(f, "  phone: {phone}")?;
            }
        }
    }
    Ok(())
}

/// Unique people across every page of one site.
#[derive(Debug, Default, Serialize)]
pub struct UniqueRoster {
    pub executives: Vec<Person>,
    pub board_members: Vec<Person>,
}

/// Collapse many page rosters into one list per category, keyed by
/// normalized name. The first-seen record is kept; later mentions only add
/// missing contact keys.
pub fn unique_roster(pages: &[ProcessedContent]) -> UniqueRoster {
    UniqueRoster {
        executives: unique_by_name(pages.iter().flat_map(|p| &p.executives)),
        board_members: unique_by_name(pages.iter().flat_map(|p| &p.board_members)),
    }
}

fn unique_by_name<'a>(people: impl Iterator<Item = &'a Person>) -> Vec<Person> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<Person> = Vec::new();
    for person in people {
        match index.get(&person.identity()) {
            Some(&i) => out[i].merge_with(person),
            None => {
                index.insert(person.identity(), out.len());
                out.push(person.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::person::ContactInfo;

    fn content(execs: Vec<Person>, board: Vec<Person>) -> ProcessedContent {
        ProcessedContent {
            url: "https://x.com/team".into(),
            title: Some("Team".into()),
            sections: vec!["Jane Doe is the CEO.".into()],
            executives: execs,
            board_members: board,
            source_file: "team.json".into(),
        }
    }

    fn email(addr: &str) -> Option<ContactInfo> {
        Some(ContactInfo { email: Some(addr.into()), phone: None })
    }

    #[test]
    fn report_lists_everything() {
        let jane = Person::new("Jane Doe", "Chief Executive Officer", email("jane@x.com"));
        let text = content(vec![jane.clone()], vec![jane]).to_string();

        assert!(text.starts_with("URL: https://x.com/team\nTitle: Team\nSource File: team.json\n"));
        assert!(text.contains("=== Management Sections ===\n\n[1]\n"));
        assert!(text.contains("=== Executives ===\n\nName: Jane Doe\nRole: Chief Executive Officer\nContact Info:\n  email: jane@x.com\n"));
        assert!(text.contains("=== Board Members ===\n\nName: Jane Doe"));
    }

    #[test]
    fn report_empty_lists() {
        let text = content(vec![], vec![]).to_string();
        assert!(text.contains("=== Executives ===\nNo people extracted"));
        assert!(text.contains("=== Board Members ===\nNo people extracted"));
    }

    #[test]
    fn unique_roster_merges_across_pages() {
        let a = content(vec![Person::new("Jane Doe", "President", email("jane@x.com"))], vec![]);
        let b = content(
            vec![
                Person::new("JANE DOE", "Chief Executive Officer", Some(ContactInfo {
                    email: Some("other@x.com".into()),
                    phone: Some("555-123-4567".into()),
                })),
                Person::new("Ann Poe", "Chief Financial Officer", None),
            ],
            vec![Person::new("John Roe", "Director", None)],
        );

        let roster = unique_roster(&[a, b]);
        assert_eq!(roster.executives.len(), 2);
        let jane = &roster.executives[0];
        assert_eq!(jane.role, "President");
        assert_eq!(jane.email(), Some("jane@x.com"));
        assert_eq!(jane.phone(), Some("555-123-4567"));
        assert_eq!(roster.board_members.len(), 1);
    }
}
