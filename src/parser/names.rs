//! Person-name recognition.
//!
//! The pipeline only needs `(name, start, end)` spans aligned with the
//! section text, so any entity recognizer can sit behind [`NameLocator`].

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::Patterns;
use crate::error::LocateError;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Lu}\.|\p{L}[\p{L}'’\-]*").unwrap());

/// A detected person name. Offsets are byte offsets into the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSpan {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

/// Locates person-name spans in a section.
///
/// Implementations must be shareable across threads: one locator serves
/// every document processed in parallel. Failures are reported as
/// `LocateError`; a panic is caught by the extractor and only costs the
/// section being scanned.
pub trait NameLocator: Send + Sync {
    fn locate_person_spans(&self, text: &str) -> Result<Vec<NameSpan>, LocateError>;
}

impl<L: NameLocator + ?Sized> NameLocator for Box<L> {
    fn locate_person_spans(&self, text: &str) -> Result<Vec<NameSpan>, LocateError> {
        (**self).locate_person_spans(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Word,
    Initial,
    Particle,
    Other,
}

#[derive(Debug, Clone, Copy)]
struct Token {
    kind: TokenKind,
    start: usize,
    end: usize,
}

/// Proper-noun run detector: 2 to 4 capitalized words or initials on one
/// line, optionally joined by lowercase particles ("van", "de").
#[derive(Debug, Clone)]
pub struct CapitalizedNameLocator {
    stopwords: HashSet<String>,
    particles: HashSet<String>,
    min_tokens: usize,
    max_tokens: usize,
}

impl CapitalizedNameLocator {
    pub fn from_patterns(patterns: &Patterns) -> Self {
        Self {
            stopwords: patterns.name_stopwords.clone(),
            particles: patterns.name_particles.clone(),
            min_tokens: 2,
            max_tokens: 4,
        }
    }

    pub fn with_token_range(mut self, min_tokens: usize, max_tokens: usize) -> Self {
        self.min_tokens = min_tokens.max(1);
        self.max_tokens = max_tokens.max(self.min_tokens);
        self
    }

    fn classify(&self, token: &str) -> TokenKind {
        if token.ends_with('.') {
            return TokenKind::Initial;
        }
        let lower = token.to_lowercase();
        let starts_upper = token.chars().next().is_some_and(char::is_uppercase);
        if !starts_upper {
            return if self.particles.contains(&lower) {
                TokenKind::Particle
            } else {
                TokenKind::Other
            };
        }
        if token.chars().count() >= 2
            && token.chars().any(char::is_lowercase)
            && !self.stopwords.contains(&lower)
        {
            TokenKind::Word
        } else {
            TokenKind::Other
        }
    }

    fn flush(&self, text: &str, run: &mut Vec<Token>, spans: &mut Vec<NameSpan>) {
        while run.last().is_some_and(|t| t.kind != TokenKind::Word) {
            run.pop();
        }
        let name_tokens = run.iter().filter(|t| t.kind != TokenKind::Particle).count();
        if (self.min_tokens..=self.max_tokens).contains(&name_tokens) {
            if let (Some(first), Some(last)) = (run.first(), run.last()) {
                spans.push(NameSpan {
                    name: text[first.start..last.end].to_string(),
                    start: first.start,
                    end: last.end,
                });
            }
        }
        run.clear();
    }
}

impl Default for CapitalizedNameLocator {
    fn default() -> Self {
        Self::from_patterns(Patterns::default_tables())
    }
}

impl NameLocator for CapitalizedNameLocator {
    fn locate_person_spans(&self, text: &str) -> Result<Vec<NameSpan>, LocateError> {
        let mut spans = Vec::new();
        let mut run: Vec<Token> = Vec::new();
        let mut prev_end = 0;

        for m in TOKEN_RE.find_iter(text) {
            let token = Token {
                kind: self.classify(m.as_str()),
                start: m.start(),
                end: m.end(),
            };
            let joined = !run.is_empty() && is_inline_gap(&text[prev_end..m.start()]);
            match token.kind {
                TokenKind::Other => self.flush(text, &mut run, &mut spans),
                _ if joined => run.push(token),
                TokenKind::Word | TokenKind::Initial => {
                    self.flush(text, &mut run, &mut spans);
                    run.push(token);
                }
                // A particle never starts a name.
                TokenKind::Particle => self.flush(text, &mut run, &mut spans),
            }
            prev_end = m.end();
        }
        self.flush(text, &mut run, &mut spans);

        Ok(spans)
    }
}

fn is_inline_gap(gap: &str) -> bool {
    !gap.is_empty() && gap.chars().all(|c| matches!(c, ' ' | '\t' | '\u{a0}'))
}

/// Matches a fixed list of known names, longest first, on word boundaries.
#[derive(Debug, Clone, Default)]
pub struct GazetteerNameLocator {
    names: Vec<String>,
}

impl GazetteerNameLocator {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .map(|n| n.into().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names.dedup();
        Self { names }
    }
}

impl NameLocator for GazetteerNameLocator {
    fn locate_person_spans(&self, text: &str) -> Result<Vec<NameSpan>, LocateError> {
        let mut spans: Vec<NameSpan> = Vec::new();
        for name in &self.names {
            for (start, found) in text.match_indices(name.as_str()) {
                let end = start + found.len();
                if !on_word_boundary(text, start, end) {
                    continue;
                }
                if spans.iter().any(|s| start < s.end && s.start < end) {
                    continue;
                }
                spans.push(NameSpan {
                    name: found.to_string(),
                    start,
                    end,
                });
            }
        }
        spans.sort_by_key(|s| s.start);
        Ok(spans)
    }
}

fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<String> {
        CapitalizedNameLocator::default()
            .locate_person_spans(text)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect()
    }

    #[test]
    fn simple_name_with_offsets() {
        let spans = CapitalizedNameLocator::default()
            .locate_person_spans("Jane Doe is the CEO.")
            .unwrap();
        assert_eq!(spans, vec![NameSpan { name: "Jane Doe".into(), start: 0, end: 8 }]);
    }

    #[test]
    fn role_words_break_runs() {
        assert_eq!(names("Chief Executive Officer John Smith"), vec!["John Smith"]);
        assert_eq!(names("Board of Directors"), Vec::<String>::new());
        assert!(names("Jane Doe, CEO").contains(&"Jane Doe".to_string()));
    }

    #[test]
    fn honorific_excluded() {
        assert_eq!(names("Mr. John Smith joined"), vec!["John Smith"]);
        assert_eq!(names("Dr. Maria Lopez"), vec!["Maria Lopez"]);
    }

    #[test]
    fn initials_and_particles() {
        assert_eq!(names("led by John A. Smith today"), vec!["John A. Smith"]);
        assert_eq!(names("Ludwig van Beethoven, Director"), vec!["Ludwig van Beethoven"]);
        assert_eq!(names("Jean-Luc O'Brien"), vec!["Jean-Luc O'Brien"]);
    }

    #[test]
    fn single_word_and_acronyms_skipped() {
        assert!(names("Smith is the CFO").is_empty());
        assert!(names("IBM and NASA").is_empty());
    }

    #[test]
    fn names_do_not_span_lines_or_commas() {
        assert_eq!(names("Jane Doe\nJohn Roe"), vec!["Jane Doe", "John Roe"]);
        assert_eq!(names("Jane Doe, John Roe"), vec!["Jane Doe", "John Roe"]);
    }

    #[test]
    fn overlong_runs_rejected() {
        assert!(names("Alpha Bravo Charlie Delta Echo").is_empty());
    }

    #[test]
    fn unicode_names() {
        let text = "Director Hélène Côté, Montréal";
        let spans = CapitalizedNameLocator::default().locate_person_spans(text).unwrap();
        let found: Vec<_> = spans.iter().map(|s| &text[s.start..s.end]).collect();
        assert!(found.contains(&"Hélène Côté"), "{found:?}");
    }

    #[test]
    fn token_range_configurable() {
        let locator = CapitalizedNameLocator::default().with_token_range(1, 4);
        let spans = locator.locate_person_spans("Smith is the CFO").unwrap();
        assert_eq!(spans[0].name, "Smith");
    }

    #[test]
    fn gazetteer_longest_first() {
        let locator = GazetteerNameLocator::new(["Elouafi", "Mustapha Elouafi"]);
        let spans = locator
            .locate_person_spans("Mustapha Elouafi is CEO. Elouafi founded it.")
            .unwrap();
        let got: Vec<_> = spans.iter().map(|s| (s.name.as_str(), s.start)).collect();
        assert_eq!(got, vec![("Mustapha Elouafi", 0), ("Elouafi", 25)]);
    }

    #[test]
    fn gazetteer_respects_word_boundaries() {
        let locator = GazetteerNameLocator::new(["Ann"]);
        assert!(locator.locate_person_spans("Annual report").unwrap().is_empty());
        assert_eq!(locator.locate_person_spans("Ann, CFO").unwrap().len(), 1);
    }

    #[test]
    fn boxed_locator_delegates() {
        let boxed: Box<dyn NameLocator> = Box::new(GazetteerNameLocator::new(["Jane Doe"]));
        assert_eq!(boxed.locate_person_spans("Jane Doe").unwrap().len(), 1);
    }
}
