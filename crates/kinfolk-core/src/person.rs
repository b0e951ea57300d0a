//! The person model.
//!
//! A [`Person`] is the normalized form of one source row: required fields are
//! present and typed, parent references are optional ids, and partners are an
//! ordered list of [`SpouseLink`]s whose order is significant for placement.

use std::fmt;

use crate::identifier::PersonId;

/// Status of a partnership, used for presentation only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SpouseStatus {
    Married,
    Divorced,
    Widowed,
    Separated,
    Deceased,
    #[default]
    Unknown,
}

impl SpouseStatus {
    /// Parses a status label leniently.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace. Empty or
    /// unrecognized labels map to [`SpouseStatus::Unknown`].
    ///
    /// # Examples
    ///
    /// ```
    /// use kinfolk_core::person::SpouseStatus;
    ///
    /// assert_eq!(SpouseStatus::parse(" Divorced "), SpouseStatus::Divorced);
    /// assert_eq!(SpouseStatus::parse("engaged"), SpouseStatus::Unknown);
    /// ```
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "married" => Self::Married,
            "divorced" => Self::Divorced,
            "widowed" => Self::Widowed,
            "separated" => Self::Separated,
            "deceased" => Self::Deceased,
            _ => Self::Unknown,
        }
    }

    /// Returns the lowercase label of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Married => "married",
            Self::Divorced => "divorced",
            Self::Widowed => "widowed",
            Self::Separated => "separated",
            Self::Deceased => "deceased",
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` for an ongoing partnership.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Married)
    }

    /// Returns `true` when the partnership has ended by separation.
    ///
    /// Renderers draw these links dashed.
    pub fn is_dashed(self) -> bool {
        matches!(self, Self::Divorced | Self::Separated)
    }
}

impl fmt::Display for SpouseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared partnership from one person to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpouseLink {
    id: PersonId,
    status: SpouseStatus,
}

impl SpouseLink {
    pub fn new(id: PersonId, status: SpouseStatus) -> Self {
        Self { id, status }
    }

    /// Id of the partner.
    pub fn id(&self) -> PersonId {
        self.id
    }

    /// Status of the partnership.
    pub fn status(&self) -> SpouseStatus {
        self.status
    }
}

/// A person in the chart.
///
/// Relationship fields hold ids only; resolving them to other people is the
/// job of the [`RelationshipStore`](crate::store::RelationshipStore), which
/// tolerates ids that point nowhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    id: PersonId,
    name: String,
    generation: u32,
    parent1: Option<PersonId>,
    parent2: Option<PersonId>,
    spouses: Vec<SpouseLink>,
    birth_year: Option<String>,
    death_year: Option<String>,
}

impl Person {
    /// Creates a person without parents, spouses or years.
    ///
    /// `generation` is 1-based as in the source data.
    pub fn new(id: PersonId, name: impl Into<String>, generation: u32) -> Self {
        Self {
            id,
            name: name.into(),
            generation,
            parent1: None,
            parent2: None,
            spouses: Vec::new(),
            birth_year: None,
            death_year: None,
        }
    }

    /// Sets both parent references (builder style).
    pub fn with_parents(mut self, parent1: Option<PersonId>, parent2: Option<PersonId>) -> Self {
        self.parent1 = parent1;
        self.parent2 = parent2;
        self
    }

    /// Appends a spouse link, keeping declaration order (builder style).
    pub fn with_spouse(mut self, link: SpouseLink) -> Self {
        self.spouses.push(link);
        self
    }

    /// Sets the display years (builder style).
    pub fn with_years(mut self, birth_year: Option<String>, death_year: Option<String>) -> Self {
        self.birth_year = birth_year;
        self.death_year = death_year;
        self
    }

    pub fn id(&self) -> PersonId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The 1-based generation from the source data.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The 0-based depth used for layout (`generation - 1`).
    pub fn depth(&self) -> usize {
        self.generation.saturating_sub(1) as usize
    }

    pub fn parent1(&self) -> Option<PersonId> {
        self.parent1
    }

    pub fn parent2(&self) -> Option<PersonId> {
        self.parent2
    }

    /// Parent references in declaration order, skipping empty slots.
    pub fn parent_ids(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.parent1.into_iter().chain(self.parent2)
    }

    /// Returns `true` when neither parent slot is filled.
    ///
    /// The store also treats people whose parents do not resolve as roots.
    pub fn is_root_candidate(&self) -> bool {
        self.parent1.is_none() && self.parent2.is_none()
    }

    /// Returns `true` if either parent slot references `id`.
    pub fn has_parent(&self, id: PersonId) -> bool {
        self.parent1 == Some(id) || self.parent2 == Some(id)
    }

    /// Spouse links in declaration order.
    pub fn spouse_links(&self) -> &[SpouseLink] {
        &self.spouses
    }

    /// Spouse ids in declaration order.
    pub fn spouse_ids(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.spouses.iter().map(SpouseLink::id)
    }

    /// Index of `id` in this person's declared spouse order.
    pub fn spouse_index(&self, id: PersonId) -> Option<usize> {
        self.spouses.iter().position(|link| link.id == id)
    }

    pub fn birth_year(&self) -> Option<&str> {
        self.birth_year.as_deref()
    }

    pub fn death_year(&self) -> Option<&str> {
        self.death_year.as_deref()
    }

    /// Short display string for the years of this person, if any are known.
    ///
    /// # Examples
    ///
    /// ```
    /// use kinfolk_core::{identifier::PersonId, person::Person};
    ///
    /// let p = Person::new(PersonId::new("1"), "Ada", 1)
    ///     .with_years(Some("1815".to_string()), Some("1852".to_string()));
    /// assert_eq!(p.lifespan().as_deref(), Some("1815–1852"));
    /// ```
    pub fn lifespan(&self) -> Option<String> {
        match (self.birth_year(), self.death_year()) {
            (Some(birth), Some(death)) => Some(format!("{birth}–{death}")),
            (Some(birth), None) => Some(format!("b. {birth}")),
            (None, Some(death)) => Some(format!("d. {death}")),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: &str) -> Person {
        Person::new(PersonId::new(id), format!("Person {id}"), 2)
    }

    #[test]
    fn test_spouse_status_parse() {
        assert_eq!(SpouseStatus::parse("married"), SpouseStatus::Married);
        assert_eq!(SpouseStatus::parse("WIDOWED"), SpouseStatus::Widowed);
        assert_eq!(SpouseStatus::parse("Separated"), SpouseStatus::Separated);
        assert_eq!(SpouseStatus::parse("deceased"), SpouseStatus::Deceased);
        assert_eq!(SpouseStatus::parse(""), SpouseStatus::Unknown);
        assert_eq!(SpouseStatus::parse("it's complicated"), SpouseStatus::Unknown);
    }

    #[test]
    fn test_spouse_status_flags() {
        assert!(SpouseStatus::Married.is_active());
        assert!(!SpouseStatus::Widowed.is_active());
        assert!(SpouseStatus::Divorced.is_dashed());
        assert!(SpouseStatus::Separated.is_dashed());
        assert!(!SpouseStatus::Unknown.is_dashed());
        assert_eq!(SpouseStatus::Divorced.to_string(), "divorced");
    }

    #[test]
    fn test_depth_is_zero_based() {
        assert_eq!(person("d").depth(), 1);
        assert_eq!(Person::new(PersonId::new("r"), "Root", 1).depth(), 0);
    }

    #[test]
    fn test_spouse_order_is_declaration_order() {
        let p = person("a")
            .with_spouse(SpouseLink::new(PersonId::new("b"), SpouseStatus::Divorced))
            .with_spouse(SpouseLink::new(PersonId::new("c"), SpouseStatus::Married));

        let ids: Vec<_> = p.spouse_ids().collect();
        assert_eq!(ids, vec![PersonId::new("b"), PersonId::new("c")]);
        assert_eq!(p.spouse_index(PersonId::new("c")), Some(1));
        assert_eq!(p.spouse_index(PersonId::new("z")), None);
    }

    #[test]
    fn test_parent_ids_skip_empty_slots() {
        let p = person("child").with_parents(None, Some(PersonId::new("mum")));

        let parents: Vec<_> = p.parent_ids().collect();
        assert_eq!(parents, vec![PersonId::new("mum")]);
        assert!(p.has_parent(PersonId::new("mum")));
        assert!(!p.has_parent(PersonId::new("dad")));
    }

    #[test]
    fn test_root_candidate_requires_empty_parent_slots() {
        assert!(person("founder").is_root_candidate());

        let child = person("child").with_parents(Some(PersonId::new("dad")), None);
        assert!(!child.is_root_candidate());
    }

    #[test]
    fn test_lifespan_variants() {
        let born = person("x").with_years(Some("1950".into()), None);
        let died = person("y").with_years(None, Some("2001".into()));

        assert_eq!(born.lifespan().as_deref(), Some("b. 1950"));
        assert_eq!(died.lifespan().as_deref(), Some("d. 2001"));
        assert_eq!(person("z").lifespan(), None);
    }
}
