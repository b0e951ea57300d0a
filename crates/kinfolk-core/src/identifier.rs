//! Person identifiers backed by string interning.
//!
//! Source data references people by opaque string ids (`"1"`, `"smith-01"`,
//! ...). Relationship queries compare and hash these ids constantly, so they
//! are interned once and carried around as a [`PersonId`] that is `Copy`.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for person identifiers.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock");
    f(&mut interner)
}

/// Interned identifier of a person.
///
/// Two ids compare equal exactly when their source strings are equal.
///
/// # Examples
///
/// ```
/// use kinfolk_core::identifier::PersonId;
///
/// let john = PersonId::new("1");
/// let again = PersonId::new("1");
/// assert_eq!(john, again);
/// assert_eq!(john, "1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PersonId(DefaultSymbol);

impl PersonId {
    /// Creates a `PersonId` from its string form.
    ///
    /// # Arguments
    ///
    /// * `id` - The identifier as it appears in the source data
    pub fn new(id: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(id)))
    }

    /// Returns an owned copy of the identifier string.
    pub fn to_owned_string(self) -> String {
        with_interner(|interner| {
            interner
                .resolve(self.0)
                .expect("Symbol should exist in interner")
                .to_string()
        })
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_owned_string())
    }
}

impl From<&str> for PersonId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl PartialEq<str> for PersonId {
    /// Allows direct comparison with string slices: `id == "7"`
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| {
            interner
                .resolve(self.0)
                .expect("Symbol should exist in interner")
                == other
        })
    }
}

impl PartialEq<&str> for PersonId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_new() {
        let id1 = PersonId::new("42");
        let id2 = PersonId::new("42");
        let id3 = PersonId::new("43");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "42");
    }

    #[test]
    fn test_display_trait() {
        let id = PersonId::new("smith-01");
        assert_eq!(format!("{id}"), "smith-01");
        assert_eq!(id.to_owned_string(), "smith-01");
    }

    #[test]
    fn test_from_trait() {
        let id1: PersonId = "from_trait".into();
        assert_eq!(id1, PersonId::new("from_trait"));
    }

    #[test]
    fn test_hash_and_eq() {
        let mut map = HashMap::new();
        map.insert(PersonId::new("a"), 1);
        map.insert(PersonId::new("b"), 2);

        assert_eq!(map.get(&PersonId::new("a")), Some(&1));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_partial_eq_str() {
        let id = PersonId::new("Mary");
        let other = String::from("Mary");

        assert!(id == "Mary");
        assert!(id != "mary");
        assert!(id == other.as_str());
    }
}
