use crate::config::Patterns;

use super::person::Person;

/// Reject organization names and generic nouns picked up as names.
///
/// A name fails when it is shorter than `min_name_chars` or when, case-folded,
/// it contains any denylisted token anywhere ("Orezone" holds "ore"). Tokens
/// listed in `allowed_name_tokens` are skipped.
pub fn is_valid_person(person: &Person, patterns: &Patterns) -> bool {
    let name = person.name.trim();
    if name.chars().count() < patterns.min_name_chars {
        return false;
    }
    let lower = name.to_lowercase();
    !lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty() && !patterns.allowed_name_tokens.contains(*token))
        .any(|token| {
            patterns
                .non_person_tokens
                .iter()
                .any(|deny| token.contains(deny.as_str()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(name: &str) -> bool {
        is_valid_person(&Person::new(name, "Director", None), Patterns::default_tables())
    }

    #[test]
    fn real_names_pass() {
        assert!(valid("Jane Doe"));
        assert!(valid("Eleanor Vance"));
        assert!(valid("Mustapha Elouafi"));
    }

    #[test]
    fn organization_tokens_rejected() {
        assert!(!valid("Aya Gold Corporation"));
        assert!(!valid("Zgounder Mine"));
        assert!(!valid("Boumadine Deposit"));
        assert!(!valid("Osisko Resources"));
        assert!(!valid("Press Release"));
        assert!(!valid("Independent Consultant"));
    }

    #[test]
    fn denylist_matches_inside_words() {
        assert!(!valid("Minera Andes"));
        assert!(!valid("Orezone Partners"));
        assert!(!valid("Pressman Associates"));
        assert!(!valid("Depositary Trust"));
        assert!(!valid("Theodore Minehart"));
        assert!(!valid("GOLDCORP"));
    }

    #[test]
    fn allowed_tokens_skip_the_denylist() {
        assert!(valid("Lorenzo Moreau"));
        assert!(valid("Theodore Vance"));
        assert!(valid("Sofia Moreau"));
        // Only the allowed token is exempt.
        assert!(!valid("Lorenzo Orebody"));
    }

    #[test]
    fn short_names_rejected() {
        assert!(!valid("Al"));
        assert!(!valid("  J  "));
        assert!(valid("Ali"));
    }
}
