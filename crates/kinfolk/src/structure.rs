//! Advisory checks on the shape of the family graph.
//!
//! The layout engine accepts any store and degrades gracefully, but some data
//! problems make the result look wrong: a child drawn at or above a parent, a
//! loop of parent references, or links to people who are not in the table.
//! [`check`] reports these as [`StructureWarning`]s so callers can log them.

use std::fmt;

use indexmap::IndexMap;
use petgraph::{
    algo::tarjan_scc,
    graph::{DiGraph, NodeIndex},
};

use kinfolk_core::{identifier::PersonId, store::RelationshipStore};

/// A suspicious relationship found by [`check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureWarning {
    /// A child whose generation is not greater than a parent's.
    NonMonotonicGeneration {
        parent: PersonId,
        child: PersonId,
        parent_generation: u32,
        child_generation: u32,
    },
    /// People whose parent references form a loop, in store order.
    ParentCycle { members: Vec<PersonId> },
    /// A parent reference to an id that is not in the store.
    DanglingParent { person: PersonId, parent: PersonId },
    /// A spouse reference to an id that is not in the store.
    DanglingSpouse { person: PersonId, spouse: PersonId },
}

impl fmt::Display for StructureWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonMonotonicGeneration {
                parent,
                child,
                parent_generation,
                child_generation,
            } => write!(
                f,
                "`{child}` (generation {child_generation}) is not below its parent `{parent}` (generation {parent_generation})"
            ),
            Self::ParentCycle { members } => {
                let members: Vec<String> = members.iter().map(|id| format!("`{id}`")).collect();
                write!(f, "parent references form a cycle: {}", members.join(" -> "))
            }
            Self::DanglingParent { person, parent } => {
                write!(f, "`{person}` references unknown parent `{parent}`")
            }
            Self::DanglingSpouse { person, spouse } => {
                write!(f, "`{person}` references unknown spouse `{spouse}`")
            }
        }
    }
}

/// Parent→child graph over the people of one store.
struct Lineage {
    graph: DiGraph<PersonId, ()>,
    nodes: IndexMap<PersonId, NodeIndex>,
}

impl Lineage {
    fn from_store(store: &RelationshipStore) -> Self {
        let mut graph = DiGraph::with_capacity(store.len(), store.len() * 2);
        let nodes: IndexMap<PersonId, NodeIndex> = store
            .iter()
            .map(|person| (person.id(), graph.add_node(person.id())))
            .collect();

        for person in store.iter() {
            let child = nodes[&person.id()];
            for parent_id in person.parent_ids() {
                if let Some(parent) = nodes.get(&parent_id) {
                    graph.update_edge(*parent, child, ());
                }
            }
        }

        Self { graph, nodes }
    }

    /// Strongly connected components with more than one member.
    fn cycles(&self) -> Vec<Vec<PersonId>> {
        let mut cycles: Vec<Vec<PersonId>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut members: Vec<PersonId> =
                    component.into_iter().map(|node| self.graph[node]).collect();
                members.sort_by_key(|id| self.nodes.get_index_of(id));
                members
            })
            .collect();
        cycles.sort_by_key(|members| members.first().and_then(|id| self.nodes.get_index_of(id)));
        cycles
    }
}

/// Reports every structural problem in `store`.
///
/// Warnings come grouped by kind (dangling references, then generation
/// order, then cycles) and in store order within each kind.
///
/// # Examples
///
/// ```
/// use kinfolk::structure::{StructureWarning, check};
/// use kinfolk_core::{record::PersonRecord, store::RelationshipStore};
///
/// let store = RelationshipStore::from_records([
///     PersonRecord::new("1", "Parent", "2"),
///     PersonRecord::new("2", "Child", "2").with_parents("1", ""),
/// ]);
/// let warnings = check(&store);
/// assert!(matches!(warnings[0], StructureWarning::NonMonotonicGeneration { .. }));
/// ```
pub fn check(store: &RelationshipStore) -> Vec<StructureWarning> {
    let mut warnings = Vec::new();

    for person in store.iter() {
        for parent in person.parent_ids() {
            if store.find_by_id(parent).is_none() {
                warnings.push(StructureWarning::DanglingParent {
                    person: person.id(),
                    parent,
                });
            }
        }
        for spouse in person.spouse_ids() {
            if store.find_by_id(spouse).is_none() {
                warnings.push(StructureWarning::DanglingSpouse {
                    person: person.id(),
                    spouse,
                });
            }
        }
    }

    let lineage = Lineage::from_store(store);
    for edge in lineage.graph.raw_edges() {
        let parent = lineage.graph[edge.source()];
        let child = lineage.graph[edge.target()];
        let (Some(parent_person), Some(child_person)) =
            (store.find_by_id(parent), store.find_by_id(child))
        else {
            continue;
        };
        if child_person.generation() <= parent_person.generation() {
            warnings.push(StructureWarning::NonMonotonicGeneration {
                parent,
                child,
                parent_generation: parent_person.generation(),
                child_generation: child_person.generation(),
            });
        }
    }

    warnings.extend(
        lineage
            .cycles()
            .into_iter()
            .map(|members| StructureWarning::ParentCycle { members }),
    );

    warnings
}

#[cfg(test)]
mod tests {
    use kinfolk_core::record::PersonRecord;

    use super::*;

    #[test]
    fn test_clean_family_has_no_warnings() {
        let store = RelationshipStore::from_records([
            PersonRecord::new("1", "John", "1").with_spouse("2", "married"),
            PersonRecord::new("2", "Mary", "1").with_spouse("1", "married"),
            PersonRecord::new("3", "Robert", "2").with_parents("1", "2"),
        ]);
        assert!(check(&store).is_empty());
    }

    #[test]
    fn test_dangling_references() {
        let store = RelationshipStore::from_records([
            PersonRecord::new("1", "John", "2")
                .with_parents("ghost", "")
                .with_spouse("nobody", "married"),
        ]);

        let warnings = check(&store);
        assert_eq!(
            warnings,
            vec![
                StructureWarning::DanglingParent {
                    person: PersonId::new("1"),
                    parent: PersonId::new("ghost"),
                },
                StructureWarning::DanglingSpouse {
                    person: PersonId::new("1"),
                    spouse: PersonId::new("nobody"),
                },
            ]
        );
        assert_eq!(
            warnings[0].to_string(),
            "`1` references unknown parent `ghost`"
        );
    }

    #[test]
    fn test_parent_cycle_reported_in_store_order() {
        let store = RelationshipStore::from_records([
            PersonRecord::new("a", "A", "1").with_parents("c", ""),
            PersonRecord::new("b", "B", "2").with_parents("a", ""),
            PersonRecord::new("c", "C", "3").with_parents("b", ""),
        ]);

        let warnings = check(&store);
        let cycle = warnings
            .iter()
            .find_map(|warning| match warning {
                StructureWarning::ParentCycle { members } => Some(members.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(
            cycle,
            vec![PersonId::new("a"), PersonId::new("b"), PersonId::new("c")]
        );
        // c -> a goes from generation 3 to 1.
        assert!(warnings.iter().any(|warning| matches!(
            warning,
            StructureWarning::NonMonotonicGeneration { child_generation: 1, .. }
        )));
    }

    #[test]
    fn test_same_parent_in_both_slots_is_one_edge() {
        let store = RelationshipStore::from_records([
            PersonRecord::new("1", "Parent", "3"),
            PersonRecord::new("2", "Child", "2").with_parents("1", "1"),
        ]);
        let warnings = check(&store);
        assert_eq!(warnings.len(), 1);
    }
}
