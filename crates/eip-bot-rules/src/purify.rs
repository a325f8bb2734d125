//! Applies purifier clearances to a raw report.
//!
//! A violation survives iff it is in the raw report and no purifier clears
//! it. Purifiers that say nothing about a rule leave it alone, and a
//! clearance from one purifier cannot be undone by another.

use eip_bot_core::{Clearance, ErrorReport, TestResults};
use tracing::debug;

use crate::purifiers::Purifier;

/// Remove every violation named by any of `clearances`.
pub fn merge(raw: &ErrorReport, clearances: &[Clearance]) -> ErrorReport {
    let mut cleared = Clearance::none();
    for clearance in clearances {
        cleared.extend(clearance.rules());
    }
    for rule in cleared.rules().filter(|r| raw.is_violated(*r)) {
        debug!(%rule, "violation cleared by purifier");
    }
    raw.without(&cleared)
}

/// Run `purifiers` over the raw results and return the final results.
pub fn purify(raw: TestResults, purifiers: &[Purifier]) -> TestResults {
    let clearances: Vec<Clearance> = purifiers.iter().map(|purifier| purifier(&raw)).collect();
    let errors = merge(&raw.errors, &clearances);
    TestResults { errors, ..raw }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{added, eip_file, modified};
    use crate::purifiers::default_purifiers;
    use eip_bot_core::{RuleId, Violation};
    use proptest::prelude::*;

    fn violation(rule: RuleId) -> Option<Violation> {
        Some(Violation::new(rule.as_str()))
    }

    #[test]
    fn identity_without_purifiers() {
        let raw = ErrorReport::new()
            .record(RuleId::ValidStatus, violation(RuleId::ValidStatus))
            .record(RuleId::HasAuthors, None);
        assert_eq!(merge(&raw, &[]), raw);
    }

    #[test]
    fn later_purifier_cannot_resurrect() {
        let raw = ErrorReport::new().record(RuleId::ValidStatus, violation(RuleId::ValidStatus));
        let merged = merge(
            &raw,
            &[Clearance::none().clear(RuleId::ValidStatus), Clearance::none()],
        );
        assert!(merged.passed(RuleId::ValidStatus));
    }

    #[test]
    fn approved_new_file_is_fully_purified() {
        let raw = TestResults {
            errors: ErrorReport::new()
                .record(RuleId::FilePreexisting, violation(RuleId::FilePreexisting))
                .record(RuleId::IsEditorApproved, None),
            file_diff: added(eip_file(7, "Draft", &[])),
            authors: None,
        };
        let purified = purify(raw, default_purifiers());
        assert!(purified.errors.is_clean());
    }

    #[test]
    fn eip1_error_purified_for_other_numbers_only() {
        let errors = ErrorReport::new()
            .record(RuleId::IsEditorApproved, None)
            .record(
                RuleId::EnoughEditorApprovalsForEip1,
                violation(RuleId::EnoughEditorApprovalsForEip1),
            );
        let other = TestResults {
            errors: errors.clone(),
            file_diff: modified(eip_file(8, "Draft", &[]), eip_file(8, "Draft", &[])),
            authors: None,
        };
        assert!(purify(other, default_purifiers()).errors.is_clean());

        let eip1 = TestResults {
            errors,
            file_diff: modified(eip_file(1, "Living", &[]), eip_file(1, "Living", &[])),
            authors: None,
        };
        let purified = purify(eip1, default_purifiers());
        assert!(purified
            .errors
            .is_violated(RuleId::EnoughEditorApprovalsForEip1));
    }

    #[test]
    fn purify_keeps_diff_and_authors() {
        let raw = TestResults {
            errors: ErrorReport::new(),
            file_diff: added(eip_file(7, "Draft", &["@a"])),
            authors: Some(vec!["@a".into()]),
        };
        let purified = purify(raw.clone(), default_purifiers());
        assert_eq!(purified.file_diff, raw.file_diff);
        assert_eq!(purified.authors, raw.authors);
    }

    /// 0 = not evaluated, 1 = passed, 2 = violated.
    fn build_report(states: &[u8]) -> ErrorReport {
        RuleId::ALL
            .iter()
            .zip(states)
            .fold(ErrorReport::new(), |report, (rule, state)| match state {
                0 => report,
                1 => report.record(*rule, None),
                _ => report.record(*rule, violation(*rule)),
            })
    }

    fn build_clearances(masks: &[Vec<bool>]) -> Vec<Clearance> {
        masks
            .iter()
            .map(|mask| {
                RuleId::ALL
                    .iter()
                    .zip(mask)
                    .filter(|(_, clear)| **clear)
                    .map(|(rule, _)| *rule)
                    .collect()
            })
            .collect()
    }

    mod proptests {
        use super::*;

        proptest! {
            #[test]
            fn merge_only_removes(
                states in proptest::collection::vec(0u8..3, 10),
                masks in proptest::collection::vec(proptest::collection::vec(any::<bool>(), 10), 0..4),
            ) {
                let raw = build_report(&states);
                let merged = merge(&raw, &build_clearances(&masks));
                for rule in RuleId::ALL {
                    if merged.is_violated(rule) {
                        prop_assert!(raw.is_violated(rule));
                    }
                    prop_assert_eq!(merged.is_evaluated(rule), raw.is_evaluated(rule));
                }
            }

            #[test]
            fn survivor_iff_uncleared(
                states in proptest::collection::vec(0u8..3, 10),
                masks in proptest::collection::vec(proptest::collection::vec(any::<bool>(), 10), 0..4),
            ) {
                let raw = build_report(&states);
                let clearances = build_clearances(&masks);
                let merged = merge(&raw, &clearances);
                for rule in RuleId::ALL {
                    let cleared = clearances.iter().any(|c| c.contains(rule));
                    prop_assert_eq!(merged.is_violated(rule), raw.is_violated(rule) && !cleared);
                }
            }

            #[test]
            fn merge_is_order_independent(
                states in proptest::collection::vec(0u8..3, 10),
                masks in proptest::collection::vec(proptest::collection::vec(any::<bool>(), 10), 0..4),
            ) {
                let raw = build_report(&states);
                let clearances = build_clearances(&masks);
                let mut reversed = clearances.clone();
                reversed.reverse();
                prop_assert_eq!(merge(&raw, &clearances), merge(&raw, &reversed));
            }

            #[test]
            fn empty_purifier_set_is_identity(states in proptest::collection::vec(0u8..3, 10)) {
                let raw = build_report(&states);
                prop_assert_eq!(merge(&raw, &[]), raw);
            }
        }
    }
}
