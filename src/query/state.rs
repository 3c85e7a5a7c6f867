// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query State - accumulated request parameters
//!
//! Callers accumulate parameters through [`QueryStateBuilder`] and freeze
//! them into an immutable [`QueryState`] snapshot. Execution never mutates
//! the snapshot, so building and reading are cleanly separated.
//!
//! Two fields are deliberate tri-states: `limit` (unset vs. an explicit
//! value, with zero documented to be skipped at execution time) and
//! `match_mode` (unset vs. an explicit mode, where the all-terms mode has
//! wire value zero and must stay distinguishable from "never set").

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::backend::{MatchMode, SortMode};
use crate::query::filter::FilterGroup;

/// Result ordering: a mode plus the attribute or expression it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub mode: SortMode,
    /// Attribute name for the attribute modes, arithmetic expression for
    /// [`SortMode::Expr`].
    pub clause: String,
}

/// Immutable snapshot of everything a single query needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
    /// Target index; `"*"` queries all indexes.
    pub index: String,
    /// Free-text query, empty for a pure attribute query.
    pub search_text: String,
    /// Fields the text query is scoped to; empty means unscoped.
    pub search_fields: Vec<String>,
    /// Result window size. `None` and `Some(0)` both leave the backend's
    /// default window untouched; only `Some(0)` records that a caller asked
    /// for zero explicitly.
    pub limit: Option<usize>,
    /// Result window start, transmitted only together with a usable limit.
    pub offset: usize,
    /// Result ordering, backend default when unset.
    pub sort: Option<SortSpec>,
    /// Per-field relevance weights.
    pub field_weights: BTreeMap<String, u32>,
    /// Text matching strategy; `None` keeps the backend's default.
    pub match_mode: Option<MatchMode>,
    /// Attribute filters in insertion order. Order is semantic: it decides
    /// the join operator applied relative to prior groups.
    pub filters: Vec<FilterGroup>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            index: "*".to_string(),
            search_text: String::new(),
            search_fields: Vec::new(),
            limit: None,
            offset: 0,
            sort: None,
            field_weights: BTreeMap::new(),
            match_mode: None,
            filters: Vec::new(),
        }
    }
}

impl QueryState {
    /// Start accumulating parameters.
    #[must_use]
    pub fn builder() -> QueryStateBuilder {
        QueryStateBuilder::new()
    }
}

/// Fluent accumulator for [`QueryState`].
///
/// # Example
///
/// ```
/// use searchd_query::{FilterFlags, FilterGroup, QueryState};
///
/// let state = QueryState::builder()
///     .index("products")
///     .search("wireless keyboard")
///     .search_in(["title", "description"])
///     .limit(20)
///     .sort_attr_desc("release_date")
///     .field_weight("title", 10)
///     .add_filter(FilterGroup::new("category_id", [3, 7], FilterFlags::empty()))
///     .build();
///
/// assert_eq!(state.index, "products");
/// assert_eq!(state.limit, Some(20));
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryStateBuilder {
    state: QueryState,
}

impl QueryStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Target index name.
    #[must_use]
    pub fn index(mut self, name: impl Into<String>) -> Self {
        self.state.index = name.into();
        self
    }

    /// Free-text query.
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.state.search_text = text.into();
        self
    }

    /// Scope the text query to the given fields, replacing any prior scope.
    #[must_use]
    pub fn search_in(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.state.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Result window size. An explicit zero is recorded but the execute
    /// path still skips transmitting it, same as an unset limit.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.state.limit = Some(limit);
        self
    }

    /// Result window start, meaningful only together with a limit.
    #[must_use]
    pub fn offset(mut self, offset: usize) -> Self {
        self.state.offset = offset;
        self
    }

    /// Sort by `attribute`, ascending. Replaces any prior ordering.
    #[must_use]
    pub fn sort_attr_asc(mut self, attribute: impl Into<String>) -> Self {
        self.state.sort = Some(SortSpec {
            mode: SortMode::AttrAsc,
            clause: attribute.into(),
        });
        self
    }

    /// Sort by `attribute`, descending. Replaces any prior ordering.
    #[must_use]
    pub fn sort_attr_desc(mut self, attribute: impl Into<String>) -> Self {
        self.state.sort = Some(SortSpec {
            mode: SortMode::AttrDesc,
            clause: attribute.into(),
        });
        self
    }

    /// Sort by an arithmetic expression. Replaces any prior ordering.
    #[must_use]
    pub fn sort_expr(mut self, expr: impl Into<String>) -> Self {
        self.state.sort = Some(SortSpec {
            mode: SortMode::Expr,
            clause: expr.into(),
        });
        self
    }

    /// Weight a field for relevance ranking; later calls overwrite earlier
    /// weights for the same field.
    #[must_use]
    pub fn field_weight(mut self, field: impl Into<String>, weight: u32) -> Self {
        self.state.field_weights.insert(field.into(), weight);
        self
    }

    /// Text matching strategy. [`MatchMode::All`] has wire value zero and
    /// is still transmitted when set here.
    #[must_use]
    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.state.match_mode = Some(mode);
        self
    }

    /// Append an attribute filter group. Insertion order is preserved.
    #[must_use]
    pub fn add_filter(mut self, group: FilterGroup) -> Self {
        self.state.filters.push(group);
        self
    }

    /// Freeze the accumulated parameters.
    #[must_use]
    pub fn build(self) -> QueryState {
        self.state
    }
}
