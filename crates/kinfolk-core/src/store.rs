//! The relationship store.
//!
//! [`RelationshipStore`] owns the normalized person collection and answers
//! identity and relationship queries. It has no layout knowledge; the layout
//! engine and renderers only read from it.
//!
//! # Robustness
//!
//! Source data is frequently incomplete. The store never fails on it:
//!
//! - rows without an id, a name or a valid generation are dropped on [`load`](RelationshipStore::load),
//! - references to ids that are not in the store resolve to "nobody",
//! - spousal links are not required to be symmetric.

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use indexmap::IndexMap;
use log::{debug, info, warn};

use crate::{
    identifier::PersonId,
    person::{Person, SpouseLink, SpouseStatus},
    record::PersonRecord,
};

/// Why a record was rejected during [`RelationshipStore::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum DropReason {
    MissingId,
    MissingName,
    MissingGeneration,
    InvalidGeneration(String),
    DuplicateId(String),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingId => write!(f, "missing id"),
            Self::MissingName => write!(f, "missing name"),
            Self::MissingGeneration => write!(f, "missing generation"),
            Self::InvalidGeneration(value) => {
                write!(f, "generation `{value}` is not a positive integer")
            }
            Self::DuplicateId(id) => write!(f, "duplicate id `{id}`"),
        }
    }
}

/// Counts reported by [`RelationshipStore::load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Records that became people.
    pub accepted: usize,
    /// Records that were dropped as malformed or duplicate.
    pub dropped: usize,
}

/// Normalized person collection with relationship queries.
///
/// People keep the order in which their records were loaded ("store order"),
/// and every query that returns several people returns them in that order
/// unless documented otherwise.
#[derive(Debug, Default, Clone)]
pub struct RelationshipStore {
    people: IndexMap<PersonId, Person>,
    /// Child ids per referenced parent id, in store order.
    children_index: HashMap<PersonId, Vec<PersonId>>,
}

impl RelationshipStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store loaded from `records`.
    ///
    /// # Examples
    ///
    /// ```
    /// use kinfolk_core::{record::PersonRecord, store::RelationshipStore};
    ///
    /// let store = RelationshipStore::from_records([
    ///     PersonRecord::new("1", "John Smith", "1").with_spouse("2", "married"),
    ///     PersonRecord::new("2", "Mary Johnson", "1").with_spouse("1", "married"),
    ///     PersonRecord::new("", "No Id", "1"),
    /// ]);
    /// assert_eq!(store.len(), 2);
    /// ```
    pub fn from_records(records: impl IntoIterator<Item = PersonRecord>) -> Self {
        let mut store = Self::new();
        store.load(records);
        store
    }

    /// Replaces the whole collection with people built from `records`.
    ///
    /// Malformed records are dropped and logged; they never make the load fail.
    /// When an id appears more than once, the first record wins.
    pub fn load(&mut self, records: impl IntoIterator<Item = PersonRecord>) -> LoadSummary {
        self.people.clear();
        self.children_index.clear();

        let mut summary = LoadSummary::default();
        for record in records {
            let line = record.line;
            match self.person_from_record(record) {
                Ok(person) => {
                    self.people.insert(person.id(), person);
                    summary.accepted += 1;
                }
                Err(reason) => {
                    debug!(line:? = line, reason:% = reason; "Dropping malformed record");
                    summary.dropped += 1;
                }
            }
        }

        for person in self.people.values() {
            for parent_id in person.parent_ids() {
                let children = self.children_index.entry(parent_id).or_default();
                // Both parent slots may name the same person.
                if children.last() != Some(&person.id()) {
                    children.push(person.id());
                }
            }
        }

        if summary.dropped > 0 {
            info!(
                accepted = summary.accepted,
                dropped = summary.dropped;
                "Loaded a reduced dataset"
            );
        } else {
            info!(accepted = summary.accepted; "Loaded dataset");
        }

        summary
    }

    fn person_from_record(&self, record: PersonRecord) -> Result<Person, DropReason> {
        let id = non_blank(record.id).ok_or(DropReason::MissingId)?;
        let name = non_blank(record.name).ok_or(DropReason::MissingName)?;
        let generation = non_blank(record.generation).ok_or(DropReason::MissingGeneration)?;
        let generation = match generation.parse::<u32>() {
            Ok(generation) if generation > 0 => generation,
            _ => return Err(DropReason::InvalidGeneration(generation)),
        };

        let person_id = PersonId::new(&id);
        if self.people.contains_key(&person_id) {
            warn!(id = id.as_str(); "Duplicate person id, keeping the first record");
            return Err(DropReason::DuplicateId(id));
        }

        let parent = |value: Option<String>| {
            non_blank(value)
                .map(|value| PersonId::new(&value))
                .filter(|parent_id| *parent_id != person_id)
        };
        let parent1 = parent(record.parent1_id);
        let parent2 = parent(record.parent2_id);

        if record.spouse_statuses.len() > record.spouse_ids.len() {
            warn!(
                id = id.as_str(),
                spouses = record.spouse_ids.len(),
                statuses = record.spouse_statuses.len();
                "More spouse statuses than spouses, ignoring the surplus"
            );
        }

        let mut person = Person::new(person_id, name, generation)
            .with_parents(parent1, parent2)
            .with_years(non_blank(record.birth_year), non_blank(record.death_year));

        let mut seen = HashSet::new();
        for (index, spouse_id) in record.spouse_ids.iter().enumerate() {
            let spouse_id = spouse_id.trim();
            if spouse_id.is_empty() {
                continue;
            }
            let spouse_id = PersonId::new(spouse_id);
            if spouse_id == person_id || !seen.insert(spouse_id) {
                continue;
            }
            let status = record
                .spouse_statuses
                .get(index)
                .map(|label| SpouseStatus::parse(label))
                .unwrap_or_default();
            person = person.with_spouse(SpouseLink::new(spouse_id, status));
        }

        Ok(person)
    }

    /// Looks up a person by id.
    pub fn find_by_id(&self, id: PersonId) -> Option<&Person> {
        self.people.get(&id)
    }

    /// Looks up a person by the string form of their id.
    pub fn find(&self, id: &str) -> Option<&Person> {
        self.find_by_id(PersonId::new(id))
    }

    /// Position of `id` in store order.
    pub fn index_of(&self, id: PersonId) -> Option<usize> {
        self.people.get_index_of(&id)
    }

    /// Resolved spouses of `person` in declared order; unresolved ids are skipped.
    pub fn spouses(&self, person: &Person) -> Vec<&Person> {
        person
            .spouse_ids()
            .filter_map(|id| self.find_by_id(id))
            .collect()
    }

    /// Resolved spouses paired with their link status, in declared order.
    pub fn spouse_links<'a>(&'a self, person: &'a Person) -> Vec<(&'a Person, SpouseStatus)> {
        person
            .spouse_links()
            .iter()
            .filter_map(|link| self.find_by_id(link.id()).map(|p| (p, link.status())))
            .collect()
    }

    /// Resolved parents of `person`: parent1 first, then parent2.
    pub fn parents(&self, person: &Person) -> Vec<&Person> {
        person
            .parent_ids()
            .filter_map(|id| self.find_by_id(id))
            .collect()
    }

    /// Everyone whose parent1 or parent2 reference is `id`, in store order.
    pub fn children(&self, id: PersonId) -> Vec<&Person> {
        self.children_index
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|child_id| self.find_by_id(*child_id))
            .collect()
    }

    /// People with no resolved parent, in store order.
    pub fn roots(&self) -> impl Iterator<Item = &Person> {
        self.people
            .values()
            .filter(|person| {
                person.is_root_candidate()
                    || person.parent_ids().all(|id| !self.people.contains_key(&id))
            })
    }

    /// Iterates over all people in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.people.values()
    }

    /// Returns the number of people in the store.
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// Returns `true` if the store holds nobody.
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Deepest 0-based depth in the store, or `None` when empty.
    pub fn max_depth(&self) -> Option<usize> {
        self.people.values().map(Person::depth).max()
    }

    /// Children of `id` grouped by their other parent.
    ///
    /// Groups appear in the order their first child appears. The key is the
    /// resolved co-parent, or `None` when the other parent slot is empty or
    /// points nowhere.
    pub fn children_by_co_parent(&self, id: PersonId) -> Vec<(Option<PersonId>, Vec<&Person>)> {
        let mut groups: Vec<(Option<PersonId>, Vec<&Person>)> = Vec::new();
        for child in self.children(id) {
            let other = if child.parent1() == Some(id) {
                child.parent2()
            } else {
                child.parent1()
            };
            let other = other.filter(|other| *other != id && self.people.contains_key(other));

            match groups.iter_mut().find(|(key, _)| *key == other) {
                Some((_, kids)) => kids.push(child),
                None => groups.push((other, vec![child])),
            }
        }
        groups
    }

    /// Number of distinct descendants of `id`.
    ///
    /// Each person is counted once even when reachable through both parents,
    /// and cyclic parent data terminates.
    pub fn descendant_count(&self, id: PersonId) -> usize {
        let mut visited = HashSet::from([id]);
        let mut stack = vec![id];
        let mut count = 0;

        while let Some(current) = stack.pop() {
            for child in self.children(current) {
                if visited.insert(child.id()) {
                    count += 1;
                    stack.push(child.id());
                }
            }
        }

        count
    }

    /// Number of other people declaring exactly the same two parents.
    ///
    /// People without both parent references have no counted siblings.
    pub fn sibling_count(&self, person: &Person) -> usize {
        let (Some(parent1), Some(parent2)) = (person.parent1(), person.parent2()) else {
            return 0;
        };
        self.people
            .values()
            .filter(|other| {
                other.id() != person.id()
                    && other.parent1() == Some(parent1)
                    && other.parent2() == Some(parent2)
            })
            .count()
    }

    /// People whose name contains `query` (case-insensitive) or whose id equals it.
    pub fn search(&self, query: &str) -> Vec<&Person> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.people
            .values()
            .filter(|person| person.name().to_lowercase().contains(&needle) || person.id() == query)
            .collect()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
