//! Error reports and the records that carry them through the pipeline.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::diff::FileDiff;
use crate::handle::Handle;
use crate::rules::{ErrorCategory, RuleId};

/// Detail attached to a failed rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violation {
    pub message: String,
}

impl Violation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Rule outcomes for one file.
///
/// A rule missing from the report was never evaluated; a rule mapped to
/// `None` was evaluated and passed. The two are treated the same when
/// deciding pass/fail but stay distinguishable for callers that care whether
/// a rule ran at all.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorReport {
    entries: BTreeMap<RuleId, Option<Violation>>,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one assertion outcome into the report.
    #[must_use]
    pub fn record(mut self, rule: RuleId, outcome: Option<Violation>) -> Self {
        let _ = self.entries.insert(rule, outcome);
        self
    }

    pub fn is_evaluated(&self, rule: RuleId) -> bool {
        self.entries.contains_key(&rule)
    }

    pub fn violation(&self, rule: RuleId) -> Option<&Violation> {
        self.entries.get(&rule).and_then(Option::as_ref)
    }

    pub fn is_violated(&self, rule: RuleId) -> bool {
        self.violation(rule).is_some()
    }

    /// Evaluated and not violated.
    pub fn passed(&self, rule: RuleId) -> bool {
        matches!(self.entries.get(&rule), Some(None))
    }

    pub fn evaluated(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.entries.keys().copied()
    }

    /// Violations in reporting order.
    pub fn violations(&self) -> impl Iterator<Item = (RuleId, &Violation)> + '_ {
        self.entries
            .iter()
            .filter_map(|(rule, outcome)| outcome.as_ref().map(|v| (*rule, v)))
    }

    pub fn messages(&self) -> Vec<String> {
        self.violations().map(|(_, v)| v.message.clone()).collect()
    }

    pub fn is_clean(&self) -> bool {
        self.violations().next().is_none()
    }

    /// Copy of the report with every cleared violation reset to "passed".
    ///
    /// Only ever removes violations: rules that were not evaluated stay
    /// absent and rules that passed stay passed.
    #[must_use]
    pub fn without(&self, cleared: &Clearance) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|(rule, outcome)| {
                let outcome = if cleared.contains(*rule) {
                    None
                } else {
                    outcome.clone()
                };
                (*rule, outcome)
            })
            .collect();
        Self { entries }
    }
}

/// Serializes to the nested `{"fileErrors": {"validFilenameError": ...}}`
/// shape; only evaluated rules appear, passed rules as `null`.
impl Serialize for ErrorReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut grouped: BTreeMap<ErrorCategory, BTreeMap<&'static str, Option<&str>>> =
            ErrorCategory::ALL.iter().map(|c| (*c, BTreeMap::new())).collect();
        for (rule, outcome) in &self.entries {
            let _ = grouped
                .entry(rule.category())
                .or_default()
                .insert(rule.as_str(), outcome.as_ref().map(|v| v.message.as_str()));
        }
        let mut map = serializer.serialize_map(Some(grouped.len()))?;
        for (category, rules) in &grouped {
            map.serialize_entry(category.as_str(), rules)?;
        }
        map.end()
    }
}

/// Set of rules a purifier vouches for, i.e. whose violations it clears.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Clearance(BTreeSet<RuleId>);

impl Clearance {
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn clear(mut self, rule: RuleId) -> Self {
        let _ = self.0.insert(rule);
        self
    }

    #[must_use]
    pub fn clear_if(self, condition: bool, rule: RuleId) -> Self {
        if condition {
            self.clear(rule)
        } else {
            self
        }
    }

    pub fn contains(&self, rule: RuleId) -> bool {
        self.0.contains(&rule)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn rules(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<RuleId> for Clearance {
    fn from_iter<I: IntoIterator<Item = RuleId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<RuleId> for Clearance {
    fn extend<I: IntoIterator<Item = RuleId>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

/// Everything known about the changed file after rule evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TestResults {
    pub errors: ErrorReport,
    #[serde(rename = "fileDiff")]
    pub file_diff: FileDiff,
    /// Present only once the file was found to have authors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<Handle>>,
}

/// Final outcome of checking a pull request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed {
        messages: Vec<String>,
        /// Space-separated handles, empty when nobody needs pinging.
        mentions: String,
    },
}

impl Verdict {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}
