//! The placement pass.

use std::collections::{BTreeMap, VecDeque};

use log::{debug, trace};
use serde::Deserialize;

use kinfolk_core::{
    geometry::{Point, Size},
    identifier::PersonId,
    person::Person,
    store::RelationshipStore,
};

use super::{chart::Layout, watermark::Watermark};
use crate::config::LayoutConfig;

/// The order in which depth buckets are visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlacementOrder {
    /// Deepest generation first.
    ///
    /// Children are placed before their parents, so parents are centered over
    /// their children.
    #[default]
    BottomUp,

    /// Oldest generation first.
    ///
    /// Parents are placed before their children, which leaves
    /// children-anchored placement to the rare person whose children were
    /// pulled in early as someone's spouse. Families are laid out side by side
    /// in store order instead.
    TopDown,
}

/// Computes node positions for a [`RelationshipStore`].
///
/// # Examples
///
/// ```
/// use kinfolk::layout::Engine;
/// use kinfolk_core::{geometry::Size, record::PersonRecord, store::RelationshipStore};
///
/// let store = RelationshipStore::from_records([
///     PersonRecord::new("1", "John", "1").with_spouse("2", "married"),
///     PersonRecord::new("2", "Mary", "1").with_spouse("1", "married"),
/// ]);
///
/// let layout = Engine::new(Size::new(150.0, 70.0)).position_nodes(&store, 1340.0);
/// let john = layout.position_of("1").unwrap();
/// let mary = layout.position_of("2").unwrap();
/// assert_eq!(mary.x() - john.x(), 180.0);
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    node_size: Size,
    couple_gap: f32,
    family_gap: f32,
    generation_spacing: f32,
    order: PlacementOrder,
}

impl Engine {
    /// Creates an engine for nodes of `node_size` with the default gaps.
    pub fn new(node_size: Size) -> Self {
        Self {
            node_size,
            couple_gap: 30.0,
            family_gap: 80.0,
            generation_spacing: 200.0,
            order: PlacementOrder::default(),
        }
    }

    /// Creates an engine from the layout section of the configuration.
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(config.node_size())
            .with_couple_gap(config.couple_gap())
            .with_family_gap(config.family_gap())
            .with_generation_spacing(config.generation_spacing())
            .with_order(config.order())
    }

    /// Sets the gap between partners in a spouse chain.
    pub fn with_couple_gap(mut self, gap: f32) -> Self {
        self.couple_gap = gap;
        self
    }

    /// Sets the gap between unrelated groups in one generation.
    pub fn with_family_gap(mut self, gap: f32) -> Self {
        self.family_gap = gap;
        self
    }

    /// Sets the vertical distance between generations.
    pub fn with_generation_spacing(mut self, spacing: f32) -> Self {
        self.generation_spacing = spacing;
        self
    }

    /// Sets the order in which generations are visited.
    pub fn with_order(mut self, order: PlacementOrder) -> Self {
        self.order = order;
        self
    }

    /// Size of every node box.
    pub fn node_size(&self) -> Size {
        self.node_size
    }

    /// Positions everyone reachable from a root and centers the result in
    /// `canvas_width`.
    ///
    /// Never fails: dangling references only remove constraints, and an
    /// empty store yields an empty layout.
    pub fn position_nodes<'a>(&self, store: &'a RelationshipStore, canvas_width: f32) -> Layout<'a> {
        let mut pass = Placement::new(self, store);
        pass.run();

        let mut layout = pass.into_layout();
        layout.center(canvas_width);
        debug!(
            placed = layout.len(),
            unplaced = store.len() - layout.len(),
            order:? = self.order;
            "Positioned people"
        );
        layout
    }
}

/// State of one placement pass. Placed x coordinates are indexed by store
/// position, so nothing leaks between passes.
struct Placement<'e, 'a> {
    engine: &'e Engine,
    store: &'a RelationshipStore,
    people: Vec<&'a Person>,
    reachable: Vec<bool>,
    xs: Vec<Option<f32>>,
    depths: BTreeMap<usize, Watermark>,
}

impl<'e, 'a> Placement<'e, 'a> {
    fn new(engine: &'e Engine, store: &'a RelationshipStore) -> Self {
        let people: Vec<&'a Person> = store.iter().collect();
        let reachable = reachable_from_roots(store, people.len());
        Self {
            engine,
            store,
            xs: vec![None; people.len()],
            people,
            reachable,
            depths: BTreeMap::new(),
        }
    }

    fn run(&mut self) {
        let mut buckets: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (index, person) in self.people.iter().enumerate() {
            buckets.entry(person.depth()).or_default().push(index);
        }

        let buckets: Vec<Vec<usize>> = match self.engine.order {
            PlacementOrder::BottomUp => buckets.into_values().rev().collect(),
            PlacementOrder::TopDown => buckets.into_values().collect(),
        };

        for bucket in buckets {
            for index in bucket {
                if !self.is_pending(index) {
                    continue;
                }
                if let Some(hub) = self.chain_hub(index) {
                    trace!(
                        id:% = self.people[index].id(),
                        hub:% = self.people[hub].id();
                        "Deferring to spouse chain"
                    );
                    self.place(hub);
                }
                if self.is_pending(index) {
                    self.place(index);
                }
            }
        }
    }

    /// A pending spouse at the same depth whose chain should be laid out
    /// first: one that lists this person after their first spouse and has
    /// more resolved spouses than this person.
    fn chain_hub(&self, index: usize) -> Option<usize> {
        let store = self.store;
        let person = self.people[index];
        let own = store.spouses(person).len();
        store
            .spouses(person)
            .into_iter()
            .filter(|spouse| spouse.depth() == person.depth())
            .filter(|spouse| spouse.spouse_index(person.id()).is_some_and(|at| at > 0))
            .filter(|spouse| store.spouses(spouse).len() > own)
            .filter_map(|spouse| store.index_of(spouse.id()))
            .filter(|&hub| self.is_pending(hub))
            .max_by_key(|&hub| store.spouses(self.people[hub]).len())
    }

    fn place(&mut self, index: usize) {
        let person = self.people[index];
        let x = if let Some(x) = self.spouse_anchored(person) {
            trace!(id:% = person.id(), x = x; "Spouse-anchored");
            x
        } else if let Some(x) = self.children_anchored(person) {
            trace!(id:% = person.id(), x = x; "Children-anchored");
            x
        } else {
            let gap = self.engine.family_gap;
            self.watermark(person.depth()).next_slot(gap)
        };
        self.set(index, x);
        self.place_spouse_chain(person, x);
    }

    /// Places `person` next to the first of their spouses that is already
    /// placed.
    fn spouse_anchored(&mut self, person: &'a Person) -> Option<f32> {
        let store = self.store;
        let (anchor, anchor_x) = store
            .spouses(person)
            .into_iter()
            .find_map(|spouse| self.x_of(spouse.id()).map(|x| (spouse, x)))?;
        Some(self.beside(anchor, anchor_x, person))
    }

    /// Position for `person` next to `anchor`, sided by where `anchor`
    /// declares them: the first spouse goes left when that slot is free,
    /// later ones go right past the anchor's earlier placed spouses.
    fn beside(&mut self, anchor: &'a Person, anchor_x: f32, person: &'a Person) -> f32 {
        let width = self.engine.node_size.width();
        let gap = self.engine.couple_gap;
        let depth = person.depth();

        match anchor.spouse_index(person.id()) {
            Some(0) => {
                let desired = anchor_x - width - gap;
                let watermark = self.watermark(depth);
                if watermark.is_free(desired - gap, desired + width) {
                    desired
                } else {
                    watermark.next_slot(gap)
                }
            }
            position => {
                let earlier = position.unwrap_or(anchor.spouse_links().len());
                let rightmost = anchor
                    .spouse_ids()
                    .take(earlier)
                    .filter_map(|id| self.x_of(id))
                    .fold(anchor_x, f32::max);
                self.watermark(depth).clamp(rightmost + width + gap, gap)
            }
        }
    }

    /// Centers `person` and their pending spouses over the placed children.
    fn children_anchored(&mut self, person: &'a Person) -> Option<f32> {
        let store = self.store;
        let child_xs: Vec<f32> = store
            .children(person.id())
            .into_iter()
            .filter_map(|child| self.x_of(child.id()))
            .collect();
        let min = child_xs.iter().copied().reduce(f32::min)?;
        let max = child_xs.iter().copied().reduce(f32::max)?;

        let width = self.engine.node_size.width();
        let couple_gap = self.engine.couple_gap;
        let midpoint = (min + max + width) / 2.0;

        let pending_spouses = store
            .spouses(person)
            .into_iter()
            .filter(|spouse| {
                store
                    .index_of(spouse.id())
                    .is_some_and(|index| self.is_pending(index))
            })
            .count();
        let chain_width = (pending_spouses + 1) as f32 * width + pending_spouses as f32 * couple_gap;

        let gap = self.engine.family_gap;
        Some(self.watermark(person.depth()).clamp(midpoint - chain_width / 2.0, gap))
    }

    /// Appends the still-pending spouses of `person` to the right of `x`,
    /// then pulls in the pending spouses of everyone placed that way.
    fn place_spouse_chain(&mut self, person: &'a Person, x: f32) {
        let store = self.store;
        let step = self.engine.node_size.width() + self.engine.couple_gap;
        let gap = self.engine.couple_gap;

        let mut queue = VecDeque::new();
        let mut previous = x;
        for spouse in store.spouses(person) {
            let Some(index) = store.index_of(spouse.id()) else {
                continue;
            };
            if !self.is_pending(index) {
                continue;
            }
            let x = self.watermark(spouse.depth()).clamp(previous + step, gap);
            self.set(index, x);
            queue.push_back((spouse, x));
            previous = x;
        }

        while let Some((anchor, anchor_x)) = queue.pop_front() {
            for spouse in store.spouses(anchor) {
                let Some(index) = store.index_of(spouse.id()) else {
                    continue;
                };
                if !self.is_pending(index) {
                    continue;
                }
                let x = self.beside(anchor, anchor_x, spouse);
                trace!(id:% = spouse.id(), anchor:% = anchor.id(), x = x; "Chained spouse");
                self.set(index, x);
                queue.push_back((spouse, x));
            }
        }
    }

    fn is_pending(&self, index: usize) -> bool {
        self.reachable[index] && self.xs[index].is_none()
    }

    fn x_of(&self, id: PersonId) -> Option<f32> {
        self.store.index_of(id).and_then(|index| self.xs[index])
    }

    fn watermark(&mut self, depth: usize) -> &mut Watermark {
        self.depths.entry(depth).or_default()
    }

    fn set(&mut self, index: usize, x: f32) {
        let width = self.engine.node_size.width();
        let depth = self.people[index].depth();
        self.watermark(depth).occupy(x, x + width);
        self.xs[index] = Some(x);
    }

    fn into_layout(self) -> Layout<'a> {
        let spacing = self.engine.generation_spacing;
        let positions = self
            .people
            .iter()
            .zip(self.xs)
            .map(|(person, x)| x.map(|x| Point::new(x, person.depth() as f32 * spacing)))
            .collect();
        Layout::new(self.store, self.engine.node_size, positions)
    }
}

/// Marks everyone connected to a root through child, spouse or parent links.
fn reachable_from_roots(store: &RelationshipStore, len: usize) -> Vec<bool> {
    let mut reached = vec![false; len];
    let mut queue = VecDeque::new();
    for root in store.roots() {
        if let Some(index) = store.index_of(root.id()) {
            reached[index] = true;
            queue.push_back(root);
        }
    }

    while let Some(person) = queue.pop_front() {
        let neighbours = store
            .children(person.id())
            .into_iter()
            .chain(store.spouses(person))
            .chain(store.parents(person));
        for neighbour in neighbours {
            let Some(index) = store.index_of(neighbour.id()) else {
                continue;
            };
            if !reached[index] {
                reached[index] = true;
                queue.push_back(neighbour);
            }
        }
    }

    reached
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use kinfolk_core::record::PersonRecord;

    use super::*;

    const WIDTH: f32 = 150.0;

    fn engine() -> Engine {
        Engine::new(Size::new(WIDTH, 70.0))
    }

    fn x(layout: &Layout<'_>, id: &str) -> f32 {
        layout.position_of(id).unwrap().x()
    }

    #[test]
    fn test_single_couple_is_adjacent() {
        let store = RelationshipStore::from_records([
            PersonRecord::new("1", "John", "1").with_spouse("2", "married"),
            PersonRecord::new("2", "Mary", "1").with_spouse("1", "married"),
        ]);
        let layout = engine().position_nodes(&store, 1340.0);

        assert_approx_eq!(f32, x(&layout, "2") - x(&layout, "1"), WIDTH + 30.0);
        assert_approx_eq!(
            f32,
            layout.position_of("1").unwrap().y(),
            layout.position_of("2").unwrap().y()
        );
    }

    #[test]
    fn test_parents_centered_over_children() {
        let store = RelationshipStore::from_records([
            PersonRecord::new("1", "John", "1").with_spouse("2", "married"),
            PersonRecord::new("2", "Mary", "1").with_spouse("1", "married"),
            PersonRecord::new("3", "Robert", "2").with_parents("1", "2"),
            PersonRecord::new("4", "Jennifer", "2").with_parents("1", "2"),
        ]);
        let layout = engine().position_nodes(&store, 1340.0);

        let children_mid = (x(&layout, "3") + x(&layout, "4") + WIDTH) / 2.0;
        let couple_width = 2.0 * WIDTH + 30.0;
        assert_approx_eq!(f32, x(&layout, "1"), children_mid - couple_width / 2.0, epsilon = 0.001);
        assert_approx_eq!(f32, x(&layout, "4") - x(&layout, "3"), WIDTH + 80.0);
    }

    #[test]
    fn test_first_declared_spouse_blocked_on_the_left_goes_right() {
        // 1 is placed as 2's partner and 3 then chains off 1, but the slot
        // left of 1 is held by 2.
        let store = RelationshipStore::from_records([
            PersonRecord::new("2", "Second", "1")
                .with_spouse("1", "married")
                .with_spouse("4", "married"),
            PersonRecord::new("1", "Anchor", "1")
                .with_spouse("3", "divorced")
                .with_spouse("2", "married"),
            PersonRecord::new("3", "First", "1").with_spouse("1", "divorced"),
            PersonRecord::new("4", "Other", "1").with_spouse("2", "married"),
        ]);
        let layout = engine().position_nodes(&store, 1340.0);

        assert_approx_eq!(f32, x(&layout, "1") - x(&layout, "2"), 180.0);
        assert_approx_eq!(f32, x(&layout, "4") - x(&layout, "1"), 180.0);
        assert_approx_eq!(f32, x(&layout, "3") - x(&layout, "4"), 180.0);
        assert!(layout.overlaps().is_empty());
    }

    #[test]
    fn test_chained_spouse_stays_with_its_anchor() {
        // A pulls in P, and P's other spouse must follow before Q is placed.
        let store = RelationshipStore::from_records([
            PersonRecord::new("a", "A", "1").with_spouse("p", "married"),
            PersonRecord::new("q", "Q", "1"),
            PersonRecord::new("p", "P", "1")
                .with_spouse("a", "divorced")
                .with_spouse("b", "married"),
            PersonRecord::new("b", "B", "1").with_spouse("p", "married"),
        ]);
        let layout = engine().position_nodes(&store, 1340.0);

        assert_approx_eq!(f32, x(&layout, "p") - x(&layout, "a"), 180.0);
        assert_approx_eq!(f32, x(&layout, "b") - x(&layout, "p"), 180.0);
        assert_approx_eq!(f32, x(&layout, "q") - x(&layout, "b"), WIDTH + 80.0);
    }

    #[test]
    fn test_later_spouse_met_first_keeps_declared_order() {
        let store = RelationshipStore::from_records([
            PersonRecord::new("3", "Second", "1").with_spouse("1", "married"),
            PersonRecord::new("1", "Hub", "1")
                .with_spouse("2", "divorced")
                .with_spouse("3", "married"),
            PersonRecord::new("2", "First", "1").with_spouse("1", "divorced"),
        ]);
        let layout = engine().position_nodes(&store, 1340.0);

        assert_approx_eq!(f32, x(&layout, "2") - x(&layout, "1"), 180.0);
        assert_approx_eq!(f32, x(&layout, "3") - x(&layout, "2"), 180.0);
    }

    #[test]
    fn test_first_declared_spouse_takes_free_left_slot() {
        // 1 is pulled into generation 1 by 3 from generation 2, leaving the
        // slot on its left free for 2.
        let store = RelationshipStore::from_records([
            PersonRecord::new("1", "Anchor", "1")
                .with_spouse("2", "divorced")
                .with_spouse("3", "married"),
            PersonRecord::new("2", "First", "1").with_spouse("1", "divorced"),
            PersonRecord::new("3", "Younger", "2").with_spouse("1", "married"),
        ]);
        let layout = engine().position_nodes(&store, 1340.0);

        assert_approx_eq!(f32, x(&layout, "1") - x(&layout, "2"), 180.0);
        assert_approx_eq!(f32, x(&layout, "1") - x(&layout, "3"), 180.0);
    }

    #[test]
    fn test_unlisted_partner_appended_after_anchor_chain() {
        let store = RelationshipStore::from_records([
            PersonRecord::new("1", "Anchor", "1").with_spouse("9", "married"),
            PersonRecord::new("9", "Other", "1").with_spouse("1", "married"),
            PersonRecord::new("3", "Third", "1").with_spouse("9", "divorced"),
            PersonRecord::new("4", "Fourth", "1").with_spouse("9", "married"),
        ]);
        let layout = engine().position_nodes(&store, 1340.0);

        // 9 lists neither 3 nor 4, so each goes right of everything 9 has.
        assert_approx_eq!(f32, x(&layout, "9") - x(&layout, "1"), 180.0);
        assert_approx_eq!(f32, x(&layout, "3") - x(&layout, "9"), 180.0);
        assert_approx_eq!(f32, x(&layout, "4") - x(&layout, "3"), 180.0);
    }

    #[test]
    fn test_top_down_order_still_avoids_overlap() {
        let store = RelationshipStore::from_records([
            PersonRecord::new("1", "John", "1").with_spouse("2", "married"),
            PersonRecord::new("2", "Mary", "1").with_spouse("1", "married"),
            PersonRecord::new("3", "Robert", "2").with_parents("1", "2"),
            PersonRecord::new("4", "Jennifer", "2").with_parents("1", "2"),
            PersonRecord::new("5", "Tom", "1"),
        ]);
        let layout = engine()
            .with_order(PlacementOrder::TopDown)
            .position_nodes(&store, 1340.0);

        assert_eq!(layout.len(), 5);
        assert!(layout.overlaps().is_empty());
        assert!(x(&layout, "5") > x(&layout, "2"));
    }

    #[test]
    fn test_parent_cycle_without_root_is_unplaced() {
        let store = RelationshipStore::from_records([
            PersonRecord::new("1", "Root", "1"),
            PersonRecord::new("a", "Loop A", "2").with_parents("b", ""),
            PersonRecord::new("b", "Loop B", "3").with_parents("a", ""),
        ]);
        let layout = engine().position_nodes(&store, 1340.0);

        assert_eq!(layout.len(), 1);
        let unplaced: Vec<_> = layout.unplaced().map(|person| person.id()).collect();
        assert_eq!(unplaced, vec![PersonId::new("a"), PersonId::new("b")]);
    }

    #[test]
    fn test_generation_spacing_sets_y() {
        let store = RelationshipStore::from_records([
            PersonRecord::new("1", "Parent", "1"),
            PersonRecord::new("2", "Child", "2").with_parents("1", ""),
        ]);
        let layout = engine()
            .with_generation_spacing(120.0)
            .position_nodes(&store, 1340.0);

        assert_approx_eq!(f32, layout.position_of("1").unwrap().y(), 0.0);
        assert_approx_eq!(f32, layout.position_of("2").unwrap().y(), 120.0);
        assert_approx_eq!(f32, x(&layout, "1"), x(&layout, "2"));
    }

    #[test]
    fn test_reachability_follows_spouses_and_parents() {
        let store = RelationshipStore::from_records([
            PersonRecord::new("1", "Root", "1").with_spouse("2", "married"),
            PersonRecord::new("2", "Spouse", "1").with_parents("a", ""),
            PersonRecord::new("a", "In-law", "1").with_parents("b", ""),
            PersonRecord::new("b", "In-law", "1").with_parents("a", ""),
            PersonRecord::new("y", "Stray", "1").with_parents("z", ""),
            PersonRecord::new("z", "Stray", "1").with_parents("y", ""),
        ]);
        let reached = reachable_from_roots(&store, store.len());
        assert_eq!(reached, vec![true, true, true, true, false, false]);
    }
}
