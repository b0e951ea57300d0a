//! The positioned chart produced by the layout engine.

use std::collections::HashSet;

use kinfolk_core::{
    geometry::{Bounds, Point, Size},
    identifier::PersonId,
    person::Person,
    store::RelationshipStore,
};

/// A person together with the top-left corner of their node.
#[derive(Debug, Clone, Copy)]
pub struct PositionedPerson<'a> {
    person: &'a Person,
    position: Point,
    size: Size,
}

impl<'a> PositionedPerson<'a> {
    pub fn person(&self) -> &'a Person {
        self.person
    }

    /// Top-left corner of the node.
    pub fn position(&self) -> Point {
        self.position
    }

    /// 0-based generation depth.
    pub fn depth(&self) -> usize {
        self.person.depth()
    }

    /// Rectangle covered by the node.
    pub fn bounds(&self) -> Bounds {
        self.position.to_bounds(self.size)
    }
}

/// Node positions for one [`RelationshipStore`].
///
/// Positions are kept in store order; people that could not be reached from
/// a root have none. The layout borrows the store it was computed from, so it
/// cannot outlive a reload.
#[derive(Debug, Clone)]
pub struct Layout<'a> {
    store: &'a RelationshipStore,
    node_size: Size,
    positions: Vec<Option<Point>>,
}

impl<'a> Layout<'a> {
    pub(super) fn new(
        store: &'a RelationshipStore,
        node_size: Size,
        positions: Vec<Option<Point>>,
    ) -> Self {
        Self {
            store,
            node_size,
            positions,
        }
    }

    /// The store this layout was computed from.
    pub fn store(&self) -> &'a RelationshipStore {
        self.store
    }

    /// Size shared by every node.
    pub fn node_size(&self) -> Size {
        self.node_size
    }

    /// Position of `id`, or `None` if unknown or unplaced.
    pub fn position(&self, id: PersonId) -> Option<Point> {
        self.store
            .index_of(id)
            .and_then(|index| self.positions[index])
    }

    /// Position of the person whose id string is `id`.
    pub fn position_of(&self, id: &str) -> Option<Point> {
        self.position(PersonId::new(id))
    }

    /// Placed people in store order.
    pub fn people(&self) -> impl Iterator<Item = PositionedPerson<'a>> + '_ {
        let store = self.store;
        let size = self.node_size;
        store
            .iter()
            .zip(&self.positions)
            .filter_map(move |(person, position)| {
                position.map(|position| PositionedPerson {
                    person,
                    position,
                    size,
                })
            })
    }

    /// People the engine could not reach from any root, in store order.
    pub fn unplaced(&self) -> impl Iterator<Item = &'a Person> + '_ {
        let store = self.store;
        store
            .iter()
            .zip(&self.positions)
            .filter(|(_, position)| position.is_none())
            .map(|(person, _)| person)
    }

    /// Number of placed people.
    pub fn len(&self) -> usize {
        self.positions.iter().flatten().count()
    }

    /// Returns `true` if nobody was placed.
    pub fn is_empty(&self) -> bool {
        self.positions.iter().all(Option::is_none)
    }

    /// Rectangle covering every placed node, `None` for an empty layout.
    pub fn bounds(&self) -> Option<Bounds> {
        self.people()
            .map(|placed| placed.bounds())
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    /// Pairs of people at the same depth whose nodes overlap horizontally.
    ///
    /// The engine never produces any; this exists for callers that move
    /// nodes with [`shift_branch`](Self::shift_branch).
    pub fn overlaps(&self) -> Vec<(PersonId, PersonId)> {
        let mut placed: Vec<PositionedPerson<'a>> = self.people().collect();
        placed.sort_by(|a, b| {
            a.depth()
                .cmp(&b.depth())
                .then(a.position.x().total_cmp(&b.position.x()))
        });

        let mut pairs = Vec::new();
        for (i, left) in placed.iter().enumerate() {
            let left_bounds = left.bounds();
            for right in &placed[i + 1..] {
                if right.depth() != left.depth() || right.position.x() >= left_bounds.max_x() {
                    break;
                }
                if left_bounds.overlaps_horizontally(&right.bounds()) {
                    pairs.push((left.person.id(), right.person.id()));
                }
            }
        }
        pairs
    }

    /// Moves a branch horizontally by `dx` and returns how many people moved.
    ///
    /// The branch is `id`, their resolved spouses, and recursively every
    /// child of a branch member reached through a blood line together with
    /// that child's spouses. Each person moves at most once, even when a
    /// child is reachable through both parents. Unplaced people are skipped.
    pub fn shift_branch(&mut self, id: PersonId, dx: f32) -> usize {
        let store = self.store;
        let mut shifted = HashSet::new();
        let mut expanded = HashSet::new();
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            if !expanded.insert(current) {
                continue;
            }
            let Some(person) = store.find_by_id(current) else {
                continue;
            };

            self.shift_one(current, dx, &mut shifted);
            for spouse in store.spouses(person) {
                self.shift_one(spouse.id(), dx, &mut shifted);
            }
            // Reverse so children are expanded in store order.
            for child in store.children(current).into_iter().rev() {
                stack.push(child.id());
            }
        }

        shifted.len()
    }

    fn shift_one(&mut self, id: PersonId, dx: f32, shifted: &mut HashSet<PersonId>) {
        let Some(index) = self.store.index_of(id) else {
            return;
        };
        if let Some(position) = self.positions[index].as_mut() {
            if shifted.insert(id) {
                *position = position.add_x(dx);
            }
        }
    }

    /// Translates the chart so its horizontal extent is centered in
    /// `canvas_width`.
    pub(super) fn center(&mut self, canvas_width: f32) {
        let Some(bounds) = self.bounds() else {
            return;
        };
        let offset = (canvas_width - bounds.width()) / 2.0 - bounds.min_x();
        for position in self.positions.iter_mut().flatten() {
            *position = position.add_x(offset);
        }
    }
}
