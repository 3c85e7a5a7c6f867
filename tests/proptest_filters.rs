//! Property-based tests for the filter expression translator.
//!
//! Uses proptest to generate arbitrary group sequences and verify the
//! structural invariants of the emitted predicate, plus that hostile
//! attribute/value strings never panic the translator.
//!
//! Run with: `cargo test --test proptest_filters`

use proptest::prelude::*;

use searchd_query::{FilterFlags, FilterGroup, FilterTranslator, FilterValue, QueryState};

// =============================================================================
// Strategies for generating test data
// =============================================================================

/// Any combination of the three filter flags
fn filter_flags_strategy() -> impl Strategy<Value = FilterFlags> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(exclude, implode, joint_or)| {
        let mut flags = FilterFlags::empty();
        if exclude {
            flags |= FilterFlags::EXCLUDE;
        }
        if implode {
            flags |= FilterFlags::IMPLODE_AND;
        }
        if joint_or {
            flags |= FilterFlags::JOINT_OR;
        }
        flags
    })
}

/// Token-shaped values: no parentheses or uppercase, so substring counting
/// in the structural properties below stays unambiguous
fn token_value_strategy() -> impl Strategy<Value = FilterValue> {
    prop_oneof![
        any::<i64>().prop_map(FilterValue::Int),
        "[a-z][a-z0-9]{0,7}".prop_map(FilterValue::Str),
    ]
}

fn filter_group_strategy() -> impl Strategy<Value = FilterGroup> {
    (
        "[a-z][a-z0-9_]{0,8}",
        prop::collection::vec(token_value_strategy(), 0..6),
        filter_flags_strategy(),
    )
        .prop_map(|(attribute, values, flags)| FilterGroup {
            attribute,
            values,
            flags,
        })
}

fn filter_groups_strategy() -> impl Strategy<Value = Vec<FilterGroup>> {
    prop::collection::vec(filter_group_strategy(), 0..6)
}

/// How many `IN (` clauses the emitted expression must contain
fn expected_membership_clauses(groups: &[FilterGroup]) -> usize {
    groups
        .iter()
        .map(|group| {
            if group.flags.contains(FilterFlags::IMPLODE_AND) && !group.values.is_empty() {
                group.values.len()
            } else {
                1
            }
        })
        .sum()
}

// =============================================================================
// Structural Properties
// =============================================================================

proptest! {
    /// Same input, same bytes: the translator is a pure function
    #[test]
    fn prop_translate_is_deterministic(groups in filter_groups_strategy()) {
        prop_assert_eq!(
            FilterTranslator::translate(&groups),
            FilterTranslator::translate(&groups)
        );
    }

    /// Only the empty sequence compiles to the empty string
    #[test]
    fn prop_only_empty_sequence_is_empty(groups in filter_groups_strategy()) {
        let out = FilterTranslator::translate(&groups);
        prop_assert_eq!(out.is_empty(), groups.is_empty());
    }

    /// Every group contributes exactly its membership clauses
    #[test]
    fn prop_membership_clause_count_matches_groups(groups in filter_groups_strategy()) {
        let out = FilterTranslator::translate(&groups);
        prop_assert_eq!(out.matches("IN (").count(), expected_membership_clauses(&groups));
    }

    /// The first group never carries a join prefix
    #[test]
    fn prop_first_group_has_no_join_prefix(groups in filter_groups_strategy()) {
        let out = FilterTranslator::translate(&groups);
        if !groups.is_empty() {
            prop_assert!(out.starts_with('(') || out.starts_with(" NOT ("));
        }
    }

    /// NOT appears once per excluded group
    #[test]
    fn prop_not_count_matches_excluded_groups(groups in filter_groups_strategy()) {
        let out = FilterTranslator::translate(&groups);
        let excluded = groups
            .iter()
            .filter(|group| group.flags.contains(FilterFlags::EXCLUDE))
            .count();
        prop_assert_eq!(out.matches(" NOT (").count(), excluded);
    }

    /// OR joins appear exactly where JOINT_OR is set on a non-first group
    #[test]
    fn prop_or_join_count_matches_flags(groups in filter_groups_strategy()) {
        let out = FilterTranslator::translate(&groups);
        let expected = groups
            .iter()
            .skip(1)
            .filter(|group| group.flags.contains(FilterFlags::JOINT_OR))
            .count();
        prop_assert_eq!(out.matches(" OR ").count(), expected);
    }

    /// AND tokens come from default joins plus imploded value clauses
    #[test]
    fn prop_and_join_count_matches_flags(groups in filter_groups_strategy()) {
        let out = FilterTranslator::translate(&groups);
        let joins = groups
            .iter()
            .skip(1)
            .filter(|group| !group.flags.contains(FilterFlags::JOINT_OR))
            .count();
        let imploded: usize = groups
            .iter()
            .map(|group| {
                if group.flags.contains(FilterFlags::IMPLODE_AND) {
                    group.values.len().saturating_sub(1)
                } else {
                    0
                }
            })
            .sum();
        prop_assert_eq!(out.matches(" AND ").count(), joins + imploded);
    }

    /// Parentheses stay balanced for token-shaped inputs
    #[test]
    fn prop_parens_stay_balanced(groups in filter_groups_strategy()) {
        let out = FilterTranslator::translate(&groups);
        prop_assert_eq!(out.matches('(').count(), out.matches(')').count());
    }

    /// Insertion order survives the builder unchanged
    #[test]
    fn prop_builder_keeps_group_order(groups in filter_groups_strategy()) {
        let mut builder = QueryState::builder();
        for group in &groups {
            builder = builder.add_filter(group.clone());
        }
        let state = builder.build();
        prop_assert_eq!(state.filters, groups);
    }
}

// =============================================================================
// Hostile Input Fuzz Tests
// =============================================================================

proptest! {
    /// Arbitrary attribute and value strings never panic the translator
    #[test]
    fn fuzz_translate_arbitrary_strings(
        attribute in ".*",
        values in prop::collection::vec(".*", 0..5),
        flags in filter_flags_strategy(),
    ) {
        let group = FilterGroup::new(attribute, values, flags);
        let _ = FilterTranslator::translate(&[group]);
    }
}
