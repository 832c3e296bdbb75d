use crate::config::{Patterns, SectionStrategy};

use super::contact;

const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "no", "vs", "etc", "inc", "ltd",
    "corp", "co", "dept", "approx", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep",
    "sept", "oct", "nov", "dec",
];

/// Which pattern family admitted a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Contact,
    Management,
    Role,
    /// Nothing matched; the whole text is one section.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub text: String,
}

/// Cut raw text into candidate sections. Never returns an empty list.
pub fn relevant_sections(text: &str, patterns: &Patterns) -> Vec<Section> {
    let sections = match patterns.strategy {
        SectionStrategy::Sentence => sentence_sections(text, patterns),
        SectionStrategy::Window => window_sections(text, patterns),
    };
    if sections.is_empty() {
        vec![Section {
            kind: SectionKind::Fallback,
            text: text.to_string(),
        }]
    } else {
        sections
    }
}

/// First matching family wins: contact, then management, then role.
fn classify(sentence: &str, patterns: &Patterns) -> Option<SectionKind> {
    if patterns.contact.iter().any(|re| re.is_match(sentence)) {
        Some(SectionKind::Contact)
    } else if patterns.management.iter().any(|re| re.is_match(sentence)) {
        Some(SectionKind::Management)
    } else if patterns.role.iter().any(|re| re.is_match(sentence)) {
        Some(SectionKind::Role)
    } else {
        None
    }
}

fn sentence_sections(text: &str, patterns: &Patterns) -> Vec<Section> {
    let mut kept: Vec<(SectionKind, usize, usize)> = Vec::new();
    // A contact-only sentence right after a kept one belongs to it.
    let mut extendable = false;

    for (start, end) in split_sentences(text) {
        let sentence = &text[start..end];
        if let Some(kind) = classify(sentence, patterns) {
            kept.push((kind, start, end));
            extendable = true;
        } else if extendable && contact::has_contact(sentence) {
            if let Some(last) = kept.last_mut() {
                last.2 = end;
            }
        } else {
            extendable = false;
        }
    }

    kept.into_iter()
        .map(|(kind, start, end)| Section {
            kind,
            text: text[start..end].to_string(),
        })
        .collect()
}

/// A window of `window_radius` bytes around every contact and role match,
/// contact windows first.
fn window_sections(text: &str, patterns: &Patterns) -> Vec<Section> {
    let radius = patterns.window_radius;
    let families = [
        (SectionKind::Contact, &patterns.contact),
        (SectionKind::Role, &patterns.role),
    ];

    let mut sections = Vec::new();
    for (kind, family) in families {
        for re in family {
            for m in re.find_iter(text) {
                let start = floor_boundary(text, m.start().saturating_sub(radius));
                let end = ceil_boundary(text, (m.end() + radius).min(text.len()));
                sections.push(Section {
                    kind,
                    text: text[start..end].to_string(),
                });
            }
        }
    }
    sections
}

fn floor_boundary(text: &str, mut i: usize) -> usize {
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_boundary(text: &str, mut i: usize) -> usize {
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Sentence byte ranges, trimmed. Splits after `.`/`!`/`?` followed by
/// whitespace (unless the period ends an abbreviation or an initial) and at
/// blank lines. Single newlines do not split.
pub fn split_sentences(text: &str) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '.' | '!' | '?' => {
                let mut end = i + c.len_utf8();
                while let Some(&(j, n)) = chars.peek() {
                    if matches!(n, '.' | '!' | '?' | '"' | '\'' | ')' | ']' | '”' | '’') {
                        end = j + n.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let at_break = text[end..].chars().next().map_or(true, char::is_whitespace);
                if at_break && !(c == '.' && ends_with_abbreviation(&text[start..i])) {
                    push_trimmed(text, start, end, &mut out);
                    start = end;
                }
            }
            '\n' => {
                let rest = &text[i + 1..];
                let blank = rest.trim_start_matches([' ', '\t', '\r']).starts_with('\n');
                if blank {
                    push_trimmed(text, start, i, &mut out);
                    start = i + 1;
                }
            }
            _ => {}
        }
    }
    push_trimmed(text, start, text.len(), &mut out);
    out
}

fn ends_with_abbreviation(before_period: &str) -> bool {
    let word = before_period
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(['(', '"', '\'']);
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (None, _) => false,
        (Some(c), None) => c.is_uppercase(),
        // "e.g", "U.S"; but not "x.com"
        _ if word.contains('.') => word.split('.').all(|seg| seg.chars().count() <= 2),
        _ => ABBREVIATIONS.contains(&word.to_lowercase().as_str()),
    }
}

fn push_trimmed(text: &str, start: usize, end: usize, out: &mut Vec<(usize, usize)>) {
    if start >= end {
        return;
    }
    let slice = &text[start..end];
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = slice.len() - slice.trim_start().len();
    out.push((start + lead, start + lead + trimmed.len()));
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(text: &str) -> Vec<&str> {
        split_sentences(text).into_iter().map(|(s, e)| &text[s..e]).collect()
    }

    fn texts(sections: &[Section]) -> Vec<&str> {
        sections.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn splits_on_terminators() {
        assert_eq!(
            sentences("Jane Doe is the CEO. Contact: jane@x.com"),
            vec!["Jane Doe is the CEO.", "Contact: jane@x.com"]
        );
        assert_eq!(sentences("Who? Us! Fine."), vec!["Who?", "Us!", "Fine."]);
    }

    #[test]
    fn abbreviations_and_initials_hold() {
        assert_eq!(
            sentences("Mr. Smith is CFO. He joined Acme Inc. in 2010."),
            vec!["Mr. Smith is CFO.", "He joined Acme Inc. in 2010."]
        );
        assert_eq!(sentences("John A. Smith is CFO."), vec!["John A. Smith is CFO."]);
        assert_eq!(sentences("Raised $1.5 million at x.com today."), vec!["Raised $1.5 million at x.com today."]);
    }

    #[test]
    fn closing_quotes_stay_with_sentence() {
        assert_eq!(sentences("He said \"yes.\" Then left."), vec!["He said \"yes.\"", "Then left."]);
    }

    #[test]
    fn blank_lines_split_single_newlines_do_not() {
        assert_eq!(
            sentences("Jane Doe\nChief Executive Officer\n\nJohn Roe\nDirector"),
            vec!["Jane Doe\nChief Executive Officer", "John Roe\nDirector"]
        );
        assert_eq!(sentences("a\n  \n\nb"), vec!["a", "b"]);
    }

    #[test]
    fn empty_text_has_no_sentences() {
        assert!(sentences("").is_empty());
        assert!(sentences("  \n\n ").is_empty());
    }

    #[test]
    fn contact_tail_attaches() {
        let p = Patterns::default_tables();
        let s = relevant_sections("Jane Doe is the CEO. Contact: jane@x.com", p);
        assert_eq!(texts(&s), vec!["Jane Doe is the CEO. Contact: jane@x.com"]);
        assert_eq!(s[0].kind, SectionKind::Role);
    }

    #[test]
    fn contact_tail_needs_kept_predecessor() {
        let p = Patterns::default_tables();
        let text = "Welcome to our site. Write to info@x.com. John Roe is a Director.";
        let s = relevant_sections(text, p);
        assert_eq!(texts(&s), vec!["John Roe is a Director."]);
    }

    #[test]
    fn unrelated_sentences_dropped() {
        let p = Patterns::default_tables();
        let text = "We explore for gold. Our Board of Directors meets quarterly. Drilling resumed.";
        let s = relevant_sections(text, p);
        assert_eq!(texts(&s), vec!["Our Board of Directors meets quarterly."]);
        assert_eq!(s[0].kind, SectionKind::Management);
    }

    #[test]
    fn first_family_wins() {
        let p = Patterns::default_tables();
        let s = relevant_sections("Contact us to reach the Board of Directors.", p);
        assert_eq!(s[0].kind, SectionKind::Contact);
    }

    #[test]
    fn fallback_to_whole_text() {
        let p = Patterns::default_tables();
        let text = "Drilling results were strong. Assays pending.";
        let s = relevant_sections(text, p);
        assert_eq!(s, vec![Section { kind: SectionKind::Fallback, text: text.to_string() }]);
    }

    #[test]
    fn window_strategy_clamps_and_orders() {
        let mut p = Patterns::default_tables().clone();
        p.strategy = SectionStrategy::Window;
        p.window_radius = 4;
        let text = "ééé CEO Jane. Contact us now";
        let s = relevant_sections(text, &p);
        let kinds: Vec<_> = s.iter().map(|x| x.kind).collect();
        assert_eq!(kinds, vec![SectionKind::Contact, SectionKind::Role]);
        // 4 bytes before "CEO" lands inside an "é"; the window widens to a boundary.
        assert_eq!(s[1].text, "éé CEO Jan");
        assert_eq!(s[0].text, "ne. Contact us now");
    }

    #[test]
    fn window_strategy_falls_back() {
        let mut p = Patterns::default_tables().clone();
        p.strategy = SectionStrategy::Window;
        let s = relevant_sections("nothing to see", &p);
        assert_eq!(s[0].kind, SectionKind::Fallback);
    }

    #[test]
    fn fixture_team_page_sections() {
        let text = std::fs::read_to_string("tests/fixtures/team_page.txt").unwrap();
        let s = relevant_sections(&text, Patterns::default_tables());
        assert!(s.len() >= 4, "got {} sections", s.len());
        assert!(s.iter().all(|x| x.kind != SectionKind::Fallback));
        assert!(s.iter().any(|x| x.text.contains("ir@aurumridge.com")));
    }
}
