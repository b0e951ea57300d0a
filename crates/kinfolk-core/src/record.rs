//! Raw person rows as read from a tabular source.
//!
//! A [`PersonRecord`] carries the columns of one row with minimal
//! interpretation: list columns are already split, everything else is the
//! trimmed cell text. Validation happens in
//! [`RelationshipStore::load`](crate::store::RelationshipStore::load).

/// One row of the person table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub generation: Option<String>,
    pub parent1_id: Option<String>,
    pub parent2_id: Option<String>,
    /// Partner ids in declared order.
    pub spouse_ids: Vec<String>,
    /// Partner statuses, positionally matching `spouse_ids`.
    pub spouse_statuses: Vec<String>,
    pub birth_year: Option<String>,
    pub death_year: Option<String>,
    /// 1-based source line, when known.
    pub line: Option<u64>,
}

impl PersonRecord {
    /// Creates a record with the three required columns filled in.
    ///
    /// # Examples
    ///
    /// ```
    /// use kinfolk_core::record::PersonRecord;
    ///
    /// let record = PersonRecord::new("3", "Robert Smith", "2")
    ///     .with_parents("1", "2")
    ///     .with_spouse("4", "married")
    ///     .with_birth_year("1975");
    /// assert_eq!(record.spouse_ids, vec!["4".to_string()]);
    /// ```
    pub fn new(id: &str, name: &str, generation: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            generation: Some(generation.to_string()),
            ..Self::default()
        }
    }

    /// Sets both parent columns; empty strings leave a slot empty.
    pub fn with_parents(mut self, parent1: &str, parent2: &str) -> Self {
        self.parent1_id = non_empty(parent1);
        self.parent2_id = non_empty(parent2);
        self
    }

    /// Appends one partner with its status label.
    pub fn with_spouse(mut self, id: &str, status: &str) -> Self {
        self.spouse_ids.push(id.to_string());
        self.spouse_statuses.push(status.to_string());
        self
    }

    pub fn with_birth_year(mut self, year: &str) -> Self {
        self.birth_year = non_empty(year);
        self
    }

    pub fn with_death_year(mut self, year: &str) -> Self {
        self.death_year = non_empty(year);
        self
    }

    pub fn with_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_parent_slots_stay_none() {
        let record = PersonRecord::new("5", "Jennifer", "2").with_parents("", " 2 ");
        assert_eq!(record.parent1_id, None);
        assert_eq!(record.parent2_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_spouse_lists_stay_parallel() {
        let record = PersonRecord::new("1", "John", "1")
            .with_spouse("2", "divorced")
            .with_spouse("3", "married");
        assert_eq!(record.spouse_ids.len(), record.spouse_statuses.len());
        assert_eq!(record.spouse_statuses[1], "married");
    }
}
