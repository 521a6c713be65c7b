//! Property-based tests for fragment merging.

use super::fragment::ConfigFragment;
use super::merger::ConfigMerger;
use proptest::prelude::*;
use serde_json::{Map, Value};

// Leaf values: everything that is neither a mapping nor a sequence
fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z0-9./-]{0,12}".prop_map(Value::String),
    ]
}

// Arbitrary option values, nested a few levels deep
fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-e]", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn fragment_strategy() -> impl Strategy<Value = ConfigFragment> {
    prop::collection::btree_map("[a-h]{1,3}", value_strategy(), 0..6)
        .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Merging with nothing changes nothing, from either side
    #[test]
    fn merge_empty_is_identity(fragment in fragment_strategy()) {
        let empty = ConfigFragment::new();
        prop_assert_eq!(ConfigMerger::merge(&fragment, &empty).into_fragment(), fragment.clone());
        prop_assert_eq!(ConfigMerger::merge(&empty, &fragment).into_fragment(), fragment);
    }

    // Every key from either side survives
    #[test]
    fn merge_keeps_all_keys(base in fragment_strategy(), overlay in fragment_strategy()) {
        let merged = ConfigMerger::merge(&base, &overlay);
        for (key, _) in base.iter().chain(overlay.iter()) {
            prop_assert!(merged.get(key).is_some(), "lost key {}", key);
        }
        prop_assert!(merged.len() <= base.len() + overlay.len());
    }

    // Without shared keys, the order of the two sides does not matter
    #[test]
    fn merge_disjoint_commutes(
        base in prop::collection::btree_map("[a-d]{1,2}", value_strategy(), 0..5),
        overlay in prop::collection::btree_map("[w-z]{1,2}", value_strategy(), 0..5)
    ) {
        let base: ConfigFragment = base.into_iter().collect();
        let overlay: ConfigFragment = overlay.into_iter().collect();
        prop_assert_eq!(
            ConfigMerger::merge(&base, &overlay).into_fragment(),
            ConfigMerger::merge(&overlay, &base).into_fragment()
        );
    }

    // Sequences are concatenated, base entries first
    #[test]
    fn merge_concatenates_lists(
        base in prop::collection::vec(scalar_strategy(), 0..6),
        overlay in prop::collection::vec(scalar_strategy(), 0..6)
    ) {
        let mut b = ConfigFragment::new();
        b.insert("plugins", Value::Array(base.clone()));
        let mut o = ConfigFragment::new();
        o.insert("plugins", Value::Array(overlay.clone()));

        let merged = ConfigMerger::merge(&b, &o);
        let expected = Value::Array(base.into_iter().chain(overlay).collect());
        prop_assert_eq!(merged.get("plugins"), Some(&expected));
    }

    // A non-container overlay value always replaces the base value
    #[test]
    fn merge_scalar_overlay_wins(base in value_strategy(), overlay in scalar_strategy()) {
        let mut b = ConfigFragment::new();
        b.set_path(&["devServer", "port"], base);
        let mut o = ConfigFragment::new();
        o.set_path(&["devServer", "port"], overlay.clone());

        let merged = ConfigMerger::merge(&b, &o);
        prop_assert_eq!(merged.get_path(&["devServer", "port"]), Some(&overlay));
    }

    // Folding is the same as merging step by step
    #[test]
    fn merge_all_matches_pairwise(
        a in fragment_strategy(),
        b in fragment_strategy(),
        c in fragment_strategy()
    ) {
        let stepwise = ConfigMerger::merge(
            ConfigMerger::merge(&a, &b).as_fragment(),
            &c,
        );
        let folded = ConfigMerger::merge_all([&a, &b, &c]);
        prop_assert_eq!(folded.into_fragment(), stepwise.into_fragment());
    }
}
