// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Filter Translator
//!
//! Translates an ordered sequence of [`FilterGroup`]s into a single
//! boolean-predicate string in the daemon's expression syntax.
//!
//! # Expression Syntax Generated
//!
//! ```text
//! (IN (attr, 1, 2, 3))                      -- membership over all values
//! (IN (attr, 1) AND IN (attr, 2))           -- IMPLODE_AND: one clause per value
//!  NOT (IN (attr, 1, 2))                    -- EXCLUDE (note the leading space)
//! (IN (a, 1)) OR (IN (b, 2))                -- JOINT_OR join to the previous group
//! (IN (a, 1)) AND (IN (b, 2))               -- default join
//! ```
//!
//! Groups are emitted strictly left to right with no parenthesization across
//! groups; when `AND` and `OR` joins are mixed, precedence is whatever the
//! receiving expression evaluator applies. Compatibility targets depend on
//! these exact bytes, including the space after `IN` and the doubled space
//! in `AND  NOT`.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// One scalar value inside a membership clause.
///
/// Values are rendered verbatim; string values are not quoted by the
/// expression syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterValue {
    Int(i64),
    Str(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Int(value) => write!(f, "{}", value),
            FilterValue::Str(value) => f.write_str(value),
        }
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Int(i64::from(value))
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Str(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Str(value)
    }
}

bitflags! {
    /// Behavior switches for a [`FilterGroup`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct FilterFlags: u32 {
        /// Negate this group's predicate.
        const EXCLUDE = 1;
        /// Emit one single-value clause per value, joined with `AND`.
        const IMPLODE_AND = 1 << 1;
        /// Join this group to the preceding expression with `OR`.
        const JOINT_OR = 1 << 2;
    }
}

impl Default for FilterFlags {
    fn default() -> Self {
        FilterFlags::empty()
    }
}

/// One structured attribute filter with its flags.
///
/// Immutable once appended to a query state; the position within the owning
/// sequence decides which join operator applies relative to prior groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    /// Attribute the membership clauses test.
    pub attribute: String,
    /// Values in emission order.
    pub values: Vec<FilterValue>,
    /// Behavior switches.
    #[serde(default)]
    pub flags: FilterFlags,
}

impl FilterGroup {
    pub fn new(
        attribute: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<FilterValue>>,
        flags: FilterFlags,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            values: values.into_iter().map(Into::into).collect(),
            flags,
        }
    }
}

/// Filter expression translator.
pub struct FilterTranslator;

impl FilterTranslator {
    /// Translate an ordered group sequence into one predicate string.
    ///
    /// Pure and deterministic. An empty sequence yields the empty string;
    /// callers skip the whole filter step in that case rather than
    /// submitting an empty predicate.
    #[must_use]
    pub fn translate(groups: &[FilterGroup]) -> String {
        let mut result = String::new();

        for (i, group) in groups.iter().enumerate() {
            let inner = if group.flags.contains(FilterFlags::IMPLODE_AND) {
                Self::imploded_clauses(group)
            } else {
                Self::membership_clause(group)
            };

            let mut expr = format!("({})", inner);

            if group.flags.contains(FilterFlags::EXCLUDE) {
                expr = format!(" NOT {}", expr);
            }

            if i > 0 {
                let join = if group.flags.contains(FilterFlags::JOINT_OR) {
                    " OR "
                } else {
                    " AND "
                };
                expr.insert_str(0, join);
            }

            result.push_str(&expr);
        }

        result
    }

    /// `IN (attr, v0, v1, ...)` over all values at once.
    fn membership_clause(group: &FilterGroup) -> String {
        let values = group
            .values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!("IN ({}, {})", group.attribute, values)
    }

    /// `IN (attr, v0) AND IN (attr, v1) AND ...`, one clause per value.
    fn imploded_clauses(group: &FilterGroup) -> String {
        let joined = group
            .values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(&format!(") AND IN ({}, ", group.attribute));
        format!("IN ({}, {})", group.attribute, joined)
    }
}
