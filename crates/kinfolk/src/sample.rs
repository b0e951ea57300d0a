//! Built-in dataset shown when no usable input is available.

use kinfolk_core::store::RelationshipStore;

/// Three generations across two families, with one remarriage.
pub(crate) const SAMPLE_CSV: &str = "\
ID,Name,generation,SpouseID,SpouseStatus,Parent1ID,Parent2ID,BirthYear,DeathYear
1,John Smith,1,2,married,,,1950,
2,Mary Johnson,1,1,married,,,1952,
3,Robert Smith,2,4,married,1,2,1975,
4,Lisa Brown,2,3,married,,,1977,
5,Jennifer Smith,2,,,1,2,1978,
6,Michael Smith,3,,,3,4,2001,
7,Sarah Smith,3,,,3,4,2003,
8,David Wilson,1,\"11,9\",\"divorced,married\",,,1948,2019
9,Carol Davis,1,8,married,,,1950,
10,Tom Wilson,2,,,8,9,1972,
11,Grace Lee,1,8,divorced,,,1949,
12,Paul Wilson,2,,,8,11,1969,
";

/// Parses [`SAMPLE_CSV`] into a store.
///
/// The dataset is fixed, so a parse failure can only come from editing it;
/// in that case the error is logged and an empty store is returned.
pub(crate) fn sample_store() -> RelationshipStore {
    match kinfolk_parser::parse(SAMPLE_CSV) {
        Ok(records) => RelationshipStore::from_records(records),
        Err(err) => {
            log::error!(err:% = err; "Built-in sample failed to parse");
            RelationshipStore::new()
        }
    }
}
