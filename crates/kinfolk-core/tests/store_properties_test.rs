//! Store invariants over arbitrary, mostly malformed, record sets.

use proptest::prelude::*;

use kinfolk_core::{record::PersonRecord, store::RelationshipStore};

/// Small id alphabet so references collide with real ids often.
fn id() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just(" ".to_string()),
        "[0-9]{1}".prop_map(|s| s),
    ]
}

fn record() -> impl Strategy<Value = PersonRecord> {
    (
        prop::option::of(id()),
        prop::option::of("[A-Za-z ]{0,6}"),
        prop::option::of(prop_oneof![Just("0".to_string()), "[1-4]", "[a-z]{1,2}"]),
        prop::option::of(id()),
        prop::option::of(id()),
        prop::collection::vec(id(), 0..3),
        prop::collection::vec("married|divorced|separated|other", 0..4),
    )
        .prop_map(
            |(id, name, generation, parent1_id, parent2_id, spouse_ids, spouse_statuses)| {
                PersonRecord {
                    id,
                    name,
                    generation,
                    parent1_id,
                    parent2_id,
                    spouse_ids,
                    spouse_statuses,
                    ..PersonRecord::default()
                }
            },
        )
}

proptest! {
    #[test]
    fn load_accounts_for_every_record(records in prop::collection::vec(record(), 0..16)) {
        let count = records.len();
        let mut store = RelationshipStore::new();
        let summary = store.load(records);

        prop_assert_eq!(summary.accepted + summary.dropped, count);
        prop_assert_eq!(store.len(), summary.accepted);
    }

    #[test]
    fn every_resolved_parent_lists_the_child(records in prop::collection::vec(record(), 0..16)) {
        let store = RelationshipStore::from_records(records);
        for person in store.iter() {
            for parent in store.parents(person) {
                prop_assert!(store.children(parent.id()).iter().any(|c| c.id() == person.id()));
            }
            for child in store.children(person.id()) {
                prop_assert!(child.has_parent(person.id()));
            }
        }
    }

    #[test]
    fn roots_have_no_resolved_parents(records in prop::collection::vec(record(), 0..16)) {
        let store = RelationshipStore::from_records(records);
        for root in store.roots() {
            prop_assert!(store.parents(root).is_empty());
        }
    }

    #[test]
    fn spouse_links_follow_declared_order(records in prop::collection::vec(record(), 0..16)) {
        let store = RelationshipStore::from_records(records);
        for person in store.iter() {
            let resolved: Vec<_> = store.spouses(person).iter().map(|s| s.id()).collect();
            let declared: Vec<_> = person
                .spouse_ids()
                .filter(|id| store.find_by_id(*id).is_some())
                .collect();
            prop_assert_eq!(resolved, declared);
            prop_assert!(person.spouse_ids().all(|id| id != person.id()));
        }
    }
}
