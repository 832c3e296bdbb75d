use std::collections::HashMap;

use tracing::debug;

use crate::config::Patterns;

use super::person::{normalize_name, Person};
use super::roles::{role_class, RoleClass};

/// Collapse candidates sharing a normalized name, keeping first-seen order.
///
/// Same role: contact info is unioned. Executive vs board role: the
/// executive record's name and role win, contact info is still unioned.
/// Any other conflict keeps the first-seen role.
pub fn deduplicate(candidates: Vec<Person>, patterns: &Patterns) -> Vec<Person> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut people: Vec<Person> = Vec::new();

    for candidate in candidates {
        let key = candidate.identity();
        match index.get(&key) {
            Some(&slot) => merge_duplicate(&mut people[slot], candidate, patterns),
            None => {
                index.insert(key, people.len());
                people.push(candidate);
            }
        }
    }
    people
}

fn merge_duplicate(existing: &mut Person, incoming: Person, patterns: &Patterns) {
    existing.merge_with(&incoming);
    if existing.role == incoming.role {
        return;
    }
    let promote = role_class(&existing.role, patterns) == RoleClass::Board
        && role_class(&incoming.role, patterns) == RoleClass::Executive;
    let (kept, dropped) = if promote {
        (&incoming.role, &existing.role)
    } else {
        (&existing.role, &incoming.role)
    };
    debug!(name = %existing.name, %kept, %dropped, "role conflict");
    if promote {
        existing.name = incoming.name;
        existing.role = incoming.role;
    }
}

/// One pairwise pass: among persons with the same role, a name contained in
/// another (case/whitespace folded) is merged into the longer one.
pub fn merge_similar(people: Vec<Person>) -> Vec<Person> {
    let folded: Vec<String> = people.iter().map(|p| normalize_name(&p.name)).collect();
    let mut slots: Vec<Option<Person>> = people.into_iter().map(Some).collect();

    for short in 0..slots.len() {
        for long in 0..slots.len() {
            if short == long || folded[short].chars().count() >= folded[long].chars().count() {
                continue;
            }
            let same_role = match (&slots[short], &slots[long]) {
                (Some(a), Some(b)) => a.role == b.role,
                _ => false,
            };
            if !same_role || !folded[long].contains(folded[short].as_str()) {
                continue;
            }
            if let Some(absorbed) = slots[short].take() {
                if let Some(target) = slots[long].as_mut() {
                    debug!(from = %absorbed.name, into = %target.name, "merged similar name");
                    target.merge_with(&absorbed);
                }
            }
            break;
        }
    }

    slots.into_iter().flatten().collect()
}
