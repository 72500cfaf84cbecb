//! Dedup and ordering properties of the import normalizer.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rollcall_ingest::{ImportOptions, normalize_rows};
use rollcall_model::{NameKey, Roster, compare_names};

const GIVEN: &[&str] = &["Ana", "ana", "ÁLVARO", "Luis", "luis ", "Ñuño", "Zoe"];
const FAMILY: &[&str] = &["García", "garcía", "Núñez", "Nunez", "Soto", "  soto", "Abad"];

fn row_strategy() -> impl Strategy<Value = Vec<String>> {
    (
        prop::sample::select(GIVEN),
        prop::sample::select(FAMILY),
        prop::sample::select(&["", "María"][..]),
    )
        .prop_map(|(given, family, second)| {
            vec![
                given.to_string(),
                second.to_string(),
                family.to_string(),
                String::new(),
            ]
        })
}

fn header() -> Vec<String> {
    ["Nombre", "Segundo nombre", "Apellido", "Segundo apellido"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

proptest! {
    #[test]
    fn duplicates_are_counted_and_removed(data in prop::collection::vec(row_strategy(), 0..30)) {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let roster = Roster::new("Grupo", at).unwrap();
        let mut rows = vec![header()];
        rows.extend(data.iter().cloned());

        let batch = normalize_rows(&rows, &roster, ImportOptions::default(), at).unwrap();

        let distinct: HashSet<NameKey> = data
            .iter()
            .map(|r| {
                let given = [r[0].trim(), r[1].trim()].iter().filter(|s| !s.is_empty()).copied().collect::<Vec<_>>().join(" ");
                NameKey::new(&given, r[2].trim())
            })
            .collect();
        prop_assert_eq!(batch.people.len(), distinct.len());
        prop_assert_eq!(batch.duplicates_found, data.len() - distinct.len());
        prop_assert_eq!(batch.incomplete_rows, 0);

        let keys: HashSet<NameKey> = batch.people.iter().map(|p| p.name_key()).collect();
        prop_assert_eq!(keys.len(), batch.people.len());
    }

    #[test]
    fn output_is_sorted(data in prop::collection::vec(row_strategy(), 0..30)) {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let roster = Roster::new("Grupo", at).unwrap();
        let mut rows = vec![header()];
        rows.extend(data);

        let batch = normalize_rows(&rows, &roster, ImportOptions::default(), at).unwrap();

        for pair in batch.people.windows(2) {
            let order = compare_names(pair[0].family_name(), pair[1].family_name())
                .then_with(|| compare_names(pair[0].given_name(), pair[1].given_name()));
            prop_assert_ne!(order, Ordering::Greater);
        }
        prop_assert!(batch.people.iter().all(|p| !p.present() && !p.is_manual()));
    }
}
