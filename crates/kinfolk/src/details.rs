//! Per-person detail summaries.
//!
//! [`PersonDetails`] gathers everything a detail view shows about one person:
//! their own fields, partners with status, parents, children grouped by
//! co-parent, and a few derived counts.

use kinfolk_core::{
    identifier::PersonId,
    person::{Person, SpouseStatus},
    store::RelationshipStore,
};

/// A relative shown by id and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relative {
    pub id: PersonId,
    pub name: String,
}

impl From<&Person> for Relative {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id(),
            name: person.name().to_string(),
        }
    }
}

/// A partner of the inspected person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub spouse: Relative,
    pub status: SpouseStatus,
}

/// Children the inspected person shares with one co-parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildGroup {
    /// The other parent, or `None` when that slot is empty or unresolved.
    pub co_parent: Option<Relative>,
    pub children: Vec<Relative>,
}

impl ChildGroup {
    /// Display name of the co-parent, `"Unknown"` when there is none.
    pub fn co_parent_label(&self) -> &str {
        self.co_parent
            .as_ref()
            .map_or("Unknown", |relative| relative.name.as_str())
    }
}

/// Everything a detail view shows about one person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonDetails {
    pub id: PersonId,
    pub name: String,
    pub generation: u32,
    pub birth_year: Option<String>,
    pub death_year: Option<String>,
    /// Resolved partners in declared order.
    pub relationships: Vec<Relationship>,
    pub parents: Vec<Relative>,
    pub children: Vec<ChildGroup>,
    /// Years since birth for living people with a numeric birth year.
    pub approximate_age: Option<i32>,
    pub descendants: usize,
    pub siblings: usize,
}

impl PersonDetails {
    /// Collects the details of `id`, or `None` if nobody has that id.
    ///
    /// `current_year` is used for the approximate age.
    ///
    /// # Examples
    ///
    /// ```
    /// use kinfolk::details::PersonDetails;
    /// use kinfolk_core::{identifier::PersonId, record::PersonRecord, store::RelationshipStore};
    ///
    /// let store = RelationshipStore::from_records([
    ///     PersonRecord::new("1", "John", "1").with_birth_year("1950"),
    /// ]);
    /// let details = PersonDetails::collect(&store, PersonId::new("1"), 2025).unwrap();
    /// assert_eq!(details.approximate_age, Some(75));
    /// ```
    pub fn collect(store: &RelationshipStore, id: PersonId, current_year: i32) -> Option<Self> {
        let person = store.find_by_id(id)?;

        let relationships = store
            .spouse_links(person)
            .into_iter()
            .map(|(spouse, status)| Relationship {
                spouse: spouse.into(),
                status,
            })
            .collect();

        let children = store
            .children_by_co_parent(id)
            .into_iter()
            .map(|(co_parent, kids)| ChildGroup {
                co_parent: co_parent
                    .and_then(|co_parent| store.find_by_id(co_parent))
                    .map(Relative::from),
                children: kids.into_iter().map(Relative::from).collect(),
            })
            .collect();

        Some(Self {
            id,
            name: person.name().to_string(),
            generation: person.generation(),
            birth_year: person.birth_year().map(str::to_string),
            death_year: person.death_year().map(str::to_string),
            relationships,
            parents: store.parents(person).into_iter().map(Relative::from).collect(),
            children,
            approximate_age: approximate_age(person, current_year),
            descendants: store.descendant_count(id),
            siblings: store.sibling_count(person),
        })
    }
}

fn approximate_age(person: &Person, current_year: i32) -> Option<i32> {
    if person.death_year().is_some() {
        return None;
    }
    let birth: i32 = person.birth_year()?.trim().parse().ok()?;
    Some(current_year - birth)
}
