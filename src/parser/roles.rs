use crate::config::Patterns;

pub const CHIEF_EXECUTIVE_OFFICER: &str = "Chief Executive Officer";

/// Which canonical role set a role belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleClass {
    Executive,
    Board,
    Other,
}

pub fn role_class(role: &str, patterns: &Patterns) -> RoleClass {
    if patterns.executive_roles.contains(role) {
        RoleClass::Executive
    } else if patterns.board_roles.contains(role) {
        RoleClass::Board
    } else {
        RoleClass::Other
    }
}

/// Rewrite a raw role token via the ordered canonicalization table.
/// Unmatched roles keep their original wording.
pub fn canonical_role(raw: &str, patterns: &Patterns) -> String {
    let role = raw.trim();
    patterns
        .canonical_roles
        .iter()
        .find(|(re, _)| re.is_match(role))
        .map(|(_, label)| label.clone())
        .unwrap_or_else(|| role.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMatch<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Every role-pattern match in the section, in pattern-list order then
/// position order. A match lying wholly inside a longer match is dropped,
/// so "Vice President" never also yields "President".
pub fn role_matches<'a>(section: &'a str, patterns: &Patterns) -> Vec<RoleMatch<'a>> {
    let all: Vec<RoleMatch<'a>> = patterns
        .role
        .iter()
        .flat_map(|re| re.find_iter(section))
        .map(|m| RoleMatch {
            text: m.as_str(),
            start: m.start(),
            end: m.end(),
        })
        .collect();

    let mut kept: Vec<RoleMatch<'a>> = Vec::with_capacity(all.len());
    for m in &all {
        let subsumed = all.iter().any(|other| {
            other.start <= m.start && m.end <= other.end && other.end - other.start > m.end - m.start
        });
        let duplicate = kept.iter().any(|k| k.start == m.start && k.end == m.end);
        if !subsumed && !duplicate {
            kept.push(m.clone());
        }
    }
    kept
}

/// The role text closest to `name_start` (byte offset), measured in
/// characters between start offsets. Ties keep the first-enumerated match.
pub fn nearest_role<'a>(section: &str, matches: &[RoleMatch<'a>], name_start: usize) -> Option<&'a str> {
    let name_pos = char_offset(section, name_start);
    let mut best: Option<(usize, &'a str)> = None;
    for m in matches {
        let distance = char_offset(section, m.start).abs_diff(name_pos);
        if best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, m.text));
        }
    }
    best.map(|(_, text)| text.trim())
}

fn char_offset(text: &str, byte_offset: usize) -> usize {
    text.get(..byte_offset)
        .map(|prefix| prefix.chars().count())
        .unwrap_or_else(|| text.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p() -> &'static Patterns {
        Patterns::default_tables()
    }

    #[test]
    fn canonical_short_forms() {
        for (raw, want) in [
            ("CEO", "Chief Executive Officer"),
            ("ceo", "Chief Executive Officer"),
            ("CFO", "Chief Financial Officer"),
            ("COO", "Chief Operating Officer"),
            ("VP", "Vice President"),
            ("IR", "Investor Relations"),
            ("Director", "Director"),
            ("Directors", "Director"),
            ("president", "President"),
            ("Chairman", "Chairman"),
            ("Chairperson", "Chairman"),
            ("Treasurer", "Treasurer"),
            ("secretary", "Secretary"),
        ] {
            assert_eq!(canonical_role(raw, p()), want, "raw: {raw}");
        }
    }

    #[test]
    fn canonical_long_forms() {
        assert_eq!(canonical_role("chief  executive officer", p()), CHIEF_EXECUTIVE_OFFICER);
        assert_eq!(canonical_role("Vice President", p()), "Vice President");
        assert_eq!(canonical_role("CORPORATE SECRETARY", p()), "Corporate Secretary");
    }

    #[test]
    fn canonical_is_anchored() {
        // Substrings of a longer token are left alone.
        assert_eq!(canonical_role("CEO Office", p()), "CEO Office");
        assert_eq!(canonical_role("Corporate Development", p()), "Corporate Development");
    }

    #[test]
    fn canonical_is_idempotent() {
        for raw in ["CEO", "VP", "Chairperson", "Corporate Affairs"] {
            let once = canonical_role(raw, p());
            assert_eq!(canonical_role(&once, p()), once);
        }
    }

    #[test]
    fn role_classes() {
        assert_eq!(role_class(CHIEF_EXECUTIVE_OFFICER, p()), RoleClass::Executive);
        assert_eq!(role_class("Chairman", p()), RoleClass::Board);
        assert_eq!(role_class("Investor Relations", p()), RoleClass::Other);
    }

    #[test]
    fn matches_use_word_boundaries() {
        let m = role_matches("Our cooperation with the directorate", p());
        assert!(m.is_empty(), "{m:?}");
    }

    #[test]
    fn embedded_role_is_subsumed() {
        let section = "Vice President Jane Doe";
        let m = role_matches(section, p());
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].text, "Vice President");
        assert_eq!(nearest_role(section, &m, 15), Some("Vice President"));
    }

    #[test]
    fn nearest_by_start_offset() {
        let section = "CEO: Jane Doe. CFO: John Roe.";
        let m = role_matches(section, p());
        assert_eq!(nearest_role(section, &m, 5), Some("CEO"));
        assert_eq!(nearest_role(section, &m, 20), Some("CFO"));
    }

    #[test]
    fn tie_keeps_first_enumerated() {
        // Both roles sit 5 chars from the name; CEO comes first in the table.
        let section = "CFO  Jane CEO";
        let m = role_matches(section, p());
        assert_eq!(nearest_role(section, &m, 5), Some("CEO"));
    }

    #[test]
    fn no_roles_no_attribution() {
        let section = "Jane Doe joined in 2019.";
        let m = role_matches(section, p());
        assert_eq!(nearest_role(section, &m, 0), None);
    }

    #[test]
    fn distance_counts_characters() {
        // Byte distance would favour the director; character distance does not.
        let section = "Director aaa Éléé Dééé CFO";
        let m = role_matches(section, p());
        assert_eq!(nearest_role(section, &m, 13), Some("CFO"));
    }
}
