//! Property tests: classification is a total, deterministic function of
//! (method name, policy) with a fixed precedence order.

use std::collections::BTreeSet;

use proptest::prelude::*;
use surfacegen_ast::{ClassDefinition, MethodDefinition, Statement};
use surfacegen_transform::classify::OVERRIDE_RULES;
use surfacegen_transform::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

/// Method names drawn from a small pool so the policy sets overlap.
fn arb_method_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("__init__".to_string()),
        Just("close".to_string()),
        Just("search".to_string()),
        Just("upsert".to_string()),
        Just("query".to_string()),
        Just("delete_all".to_string()),
        "[a-z_]{3,10}",
    ]
}

fn arb_name_set() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(arb_method_name(), 0..5)
}

fn arb_policy() -> impl Strategy<Value = TransformationPolicy> {
    (arb_name_set(), arb_name_set(), arb_name_set()).prop_map(|(keep, exclude, convert)| {
        TransformationPolicy::new()
            .with_keep_sync(keep)
            .with_exclude_methods(exclude)
            .with_async_methods(convert)
    })
}

fn arb_class() -> impl Strategy<Value = ClassDefinition> {
    prop::collection::btree_set(arb_method_name(), 1..8).prop_map(|names| {
        names.into_iter().fold(ClassDefinition::new("Remote"), |class, name| {
            class.with_method(MethodDefinition::new(name).with_statement(Statement::Pass))
        })
    })
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// The same name under the same policy always classifies the same way.
    #[test]
    fn classification_is_deterministic(name in arb_method_name(), policy in arb_policy()) {
        prop_assert_eq!(classify(&name, &policy), classify(&name, &policy));
        prop_assert_eq!(classify(&name, &policy), classify(&name, &policy.clone()));
    }

    /// An excluded name is excluded regardless of any other set or rule.
    #[test]
    fn exclusion_always_wins(name in arb_method_name(), policy in arb_policy()) {
        let policy = policy.with_exclude_methods([name.clone()]);
        prop_assert_eq!(classify(&name, &policy), MethodClassification::Excluded);
    }

    /// Pinning a non-lifecycle name to keep_sync keeps it blocking even
    /// when it is listed for conversion.
    #[test]
    fn keep_sync_beats_async_methods(name in "[a-z_]{3,10}") {
        prop_assume!(name != "close" && name != "__init__");
        let policy = TransformationPolicy::new()
            .with_keep_sync([name.clone()])
            .with_async_methods([name.clone()]);
        prop_assert_eq!(classify(&name, &policy), MethodClassification::KeptSync);
    }

    /// Lifecycle names resolve to their override unless excluded.
    #[test]
    fn lifecycle_names_hit_overrides(policy in arb_policy()) {
        for (name, rule) in OVERRIDE_RULES {
            let expected = if policy.is_excluded(name) {
                MethodClassification::Excluded
            } else {
                MethodClassification::from(rule)
            };
            prop_assert_eq!(classify(name, &policy), expected);
        }
    }

    /// Excluded names never reach the output and every other method does,
    /// in input order.
    #[test]
    fn output_mirrors_input_minus_exclusions(class in arb_class(), policy in arb_policy()) {
        let out = AsyncSurfaceGenerator::new(policy.clone()).generate(&class).unwrap();

        let expected: Vec<&str> = class
            .methods
            .iter()
            .map(|m| m.name.as_str())
            .filter(|name| !policy.is_excluded(name))
            .collect();
        prop_assert_eq!(out.class.method_names(), expected);
        prop_assert_eq!(out.classifications.len(), class.methods.len());
        for outcome in &out.classifications {
            prop_assert_eq!(outcome.classification, classify(&outcome.name, &policy));
        }
    }
}
