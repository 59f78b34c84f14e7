//! Name matching
//!
//! Compares two WFNs attribute by attribute. The source attribute may be a
//! pattern with `*`/`?` wildcards at its ends; the target must be a
//! concrete value. Each pair yields a [`Relation`], and the whole name
//! relation is read off the eleven per-attribute results.
//!
//! | Source  | Target        | Relation  |
//! |---------|---------------|-----------|
//! | any     | has wildcards | UNDEFINED |
//! | x       | x             | EQUAL     |
//! | ANY     | x             | SUPERSET  |
//! | x       | ANY           | SUBSET    |
//! | NA      | x             | DISJOINT  |
//! | x       | NA            | DISJOINT  |
//! | pattern | string        | SUPERSET or DISJOINT |

use crate::escape;
use crate::logical_value::LogicalValue;
use crate::well_formed_name::{Attribute, Value, WellFormedName};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::Index;

/// Relation between a source and a target attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relation {
    Disjoint,
    Subset,
    Superset,
    Equal,
    Undefined,
}

impl Relation {
    pub fn as_str(self) -> &'static str {
        match self {
            Relation::Disjoint => "DISJOINT",
            Relation::Subset => "SUBSET",
            Relation::Superset => "SUPERSET",
            Relation::Equal => "EQUAL",
            Relation::Undefined => "UNDEFINED",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-attribute relations between two names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Comparison {
    relations: [Relation; Attribute::COUNT],
}

impl Comparison {
    pub fn get(&self, attribute: Attribute) -> Relation {
        self.relations[attribute.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, Relation)> + '_ {
        Attribute::ALL.into_iter().map(move |a| (a, self.get(a)))
    }

    /// Any attribute is disjoint
    pub fn is_disjoint(&self) -> bool {
        self.relations.contains(&Relation::Disjoint)
    }

    /// Every attribute is equal
    pub fn is_equal(&self) -> bool {
        self.relations.iter().all(|&r| r == Relation::Equal)
    }

    /// Every attribute is a subset or equal
    pub fn is_subset(&self) -> bool {
        self.relations
            .iter()
            .all(|&r| matches!(r, Relation::Subset | Relation::Equal))
    }

    /// Every attribute is a superset or equal
    pub fn is_superset(&self) -> bool {
        self.relations
            .iter()
            .all(|&r| matches!(r, Relation::Superset | Relation::Equal))
    }
}

impl Index<Attribute> for Comparison {
    type Output = Relation;

    fn index(&self, attribute: Attribute) -> &Relation {
        &self.relations[attribute.index()]
    }
}

impl Serialize for Comparison {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(Attribute::COUNT))?;
        for (attribute, relation) in self.iter() {
            map.serialize_entry(&attribute, &relation)?;
        }
        map.end()
    }
}

/// Compare every attribute of `source` against `target`
pub fn compare_wfns(source: &WellFormedName, target: &WellFormedName) -> Comparison {
    Comparison {
        relations: Attribute::ALL.map(|a| compare(source.get(a), target.get(a))),
    }
}

/// Names are disjoint if any attribute pair is disjoint
pub fn is_disjoint(source: &WellFormedName, target: &WellFormedName) -> bool {
    compare_wfns(source, target).is_disjoint()
}

pub fn is_equal(source: &WellFormedName, target: &WellFormedName) -> bool {
    compare_wfns(source, target).is_equal()
}

/// Source is a subset of target if every attribute is a subset or equal
pub fn is_subset(source: &WellFormedName, target: &WellFormedName) -> bool {
    compare_wfns(source, target).is_subset()
}

/// Source is a superset of target if every attribute is a superset or equal
pub fn is_superset(source: &WellFormedName, target: &WellFormedName) -> bool {
    compare_wfns(source, target).is_superset()
}

/// Compare a single source attribute value against a target value
///
/// String comparison is case-insensitive.
pub fn compare(source: &Value, target: &Value) -> Relation {
    // A pattern on the target side cannot be compared.
    if let Value::String(t) = target {
        if escape::contains_wildcards(t) {
            return Relation::Undefined;
        }
    }

    match (source, target) {
        (Value::String(s), Value::String(t)) => {
            let s = s.to_lowercase();
            let t = t.to_lowercase();
            if s == t {
                Relation::Equal
            } else {
                compare_strings(&s, &t)
            }
        }
        _ if source == target => Relation::Equal,
        (Value::Logical(LogicalValue::Any), _) => Relation::Superset,
        (_, Value::Logical(LogicalValue::Any)) => Relation::Subset,
        _ => Relation::Disjoint,
    }
}

/// Compare a source pattern against a wildcard-free target string
///
/// Unquoted wildcards may only sit at the ends of the source: a leading or
/// trailing `*` accepts any number of characters on that side, a run of
/// `?` accepts at most that many. Escaped characters in the target count
/// as one character.
pub fn compare_strings(source: &str, target: &str) -> Relation {
    let bytes = source.as_bytes();

    // None means an unlimited number of characters
    let begins: Option<usize>;
    let ends: Option<usize>;
    let mut start = 0;
    let mut end = bytes.len();

    if bytes.first() == Some(&b'*') {
        start = 1;
        begins = None;
    } else {
        while start < bytes.len() && bytes[start] == b'?' {
            start += 1;
        }
        begins = Some(start);
    }

    if end > 0 && bytes[end - 1] == b'*' && escape::is_even_wildcards(source, end - 1) {
        end -= 1;
        ends = None;
    } else {
        let mut count = 0;
        while end > 0 && bytes[end - 1] == b'?' && escape::is_even_wildcards(source, end - 1) {
            end -= 1;
            count += 1;
        }
        ends = Some(count);
    }

    // Only question marks: compare lengths
    if source.trim_matches('?').is_empty() {
        return if source.len() >= escape::length_with_escape_characters(target) {
            Relation::Superset
        } else {
            Relation::Disjoint
        };
    }

    let core = source.get(start..end).unwrap_or("");
    let mut index: Option<usize> = None;
    let mut leftover = target.len() as isize;

    while leftover > 0 {
        let from = index.map_or(0, |i| next_char_boundary(target, i));
        let Some(found) = target
            .get(from..)
            .and_then(|rest| rest.find(core))
            .map(|i| i + from)
        else {
            break;
        };
        index = Some(found);

        let escapes = escape::count_escape_characters(&target[..found]);
        if found > 0 && begins.is_some_and(|b| b < found - escapes) {
            break;
        }

        let after = target.get(next_char_boundary(target, found)..).unwrap_or("");
        let escapes = escape::count_escape_characters(after);
        leftover = target.len() as isize - found as isize - escapes as isize - core.len() as isize;
        if leftover > 0 && ends.is_some_and(|e| leftover > e as isize) {
            continue;
        }
        return Relation::Superset;
    }

    Relation::Disjoint
}

/// Byte offset of the character following the one at `idx`
fn next_char_boundary(s: &str, idx: usize) -> usize {
    idx + s.get(idx..).and_then(|rest| rest.chars().next()).map_or(1, char::len_utf8)
}
