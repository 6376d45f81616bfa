//! Property tests for report set semantics and export determinism.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use proptest::prelude::*;
use std::collections::BTreeSet;
use teamcity_vcs::BuildRow;
use teamcity_vcs::io::write_build_report;

fn row_strategy() -> impl Strategy<Value = BuildRow> {
    (
        "[A-Za-z0-9_]{1,8}",
        "[A-Za-z0-9 ]{0,12}",
        "[A-Za-z0-9 ]{0,12}",
        "[A-Za-z0-9_]{0,8}",
    )
        .prop_map(|(build_id, build_name, vcs_root_name, vcs_root_id)| BuildRow {
            build_id,
            build_name,
            vcs_root_name,
            vcs_root_id,
        })
}

fn export(rows: &BTreeSet<BuildRow>) -> Vec<u8> {
    let mut output = Vec::new();
    write_build_report(&mut output, rows).unwrap();
    output
}

proptest! {
    /// Insertion order never affects the exported bytes.
    #[test]
    fn export_is_insertion_order_agnostic(rows in prop::collection::vec(row_strategy(), 0..24)) {
        let forward: BTreeSet<BuildRow> = rows.iter().cloned().collect();
        let reverse: BTreeSet<BuildRow> = rows.iter().rev().cloned().collect();
        prop_assert_eq!(export(&forward), export(&reverse));
    }

    /// Duplicated input rows collapse; re-adding them changes nothing.
    #[test]
    fn duplicates_collapse_to_a_set(rows in prop::collection::vec(row_strategy(), 0..16)) {
        let mut set: BTreeSet<BuildRow> = rows.iter().cloned().collect();
        let size = set.len();
        for row in &rows {
            set.insert(row.clone());
        }
        prop_assert_eq!(set.len(), size);
        prop_assert!(set.len() <= rows.len() || rows.is_empty());
    }

    /// Exported data rows appear in ascending field-wise order.
    #[test]
    fn export_rows_are_sorted(rows in prop::collection::vec(row_strategy(), 0..24)) {
        let set: BTreeSet<BuildRow> = rows.into_iter().collect();
        let ordered: Vec<&BuildRow> = set.iter().collect();
        for pair in ordered.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }
}
