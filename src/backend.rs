//! Backend collaborator contract.
//!
//! The query layer never speaks the daemon's wire protocol itself. It drives
//! a [`SearchConnection`] handed out by a [`SearchBackend`], issuing
//! configuration calls in a fixed order and then one batched run. Connection
//! management, pooling, retries and result parsing all live behind these
//! traits.
//!
//! The method set mirrors the classic searchd client surface, which is why
//! the numeric mode values below are sparse rather than contiguous.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Status code of a usable result set.
pub const SEARCHD_OK: i32 = 0;

/// Result ordering strategy, with the classic client's wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    /// Sort by an attribute, descending.
    AttrDesc = 1,
    /// Sort by an attribute, ascending.
    AttrAsc = 2,
    /// Sort by an arbitrary arithmetic expression.
    Expr = 5,
}

impl SortMode {
    /// Numeric value transmitted to the daemon.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Text matching strategy, with the classic client's wire values.
///
/// `All` is a valid mode with value zero, which is why the query state keeps
/// match mode as an explicit tri-state rather than a numeric default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    /// Match documents containing all query terms.
    All = 0,
    /// Match documents containing any query term.
    Any = 1,
    /// Match the query as an exact phrase.
    Phrase = 2,
    /// Boolean query syntax.
    Boolean = 3,
    /// Extended query syntax.
    Extended = 4,
    /// Match every document, ignoring the query text.
    FullScan = 5,
    /// Second-generation extended syntax.
    Extended2 = 6,
}

impl MatchMode {
    /// Numeric value transmitted to the daemon.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// One result set from a batched run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Per-set status code; anything but [`SEARCHD_OK`] marks the set bad.
    pub status: i32,
    /// Total matching documents reported by the backend, before limits.
    pub total: u64,
    /// Matches keyed by document id; absent when the set carried none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<BTreeMap<u64, serde_json::Value>>,
}

impl ResultSet {
    /// Whether this set is usable.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == SEARCHD_OK
    }
}

/// Outcome of [`SearchConnection::run_queries`].
///
/// `Failed` is the in-band "call failed" sentinel: the run came back with no
/// batch at all. It is distinct from an `Err` return, which signals a fault
/// in the conversation with the backend itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryResponse {
    /// One result set per enqueued query, in enqueue order.
    Results(Vec<ResultSet>),
    /// The run produced no batch.
    Failed,
}

impl QueryResponse {
    /// Whether this is the failure sentinel.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, QueryResponse::Failed)
    }

    /// First result set of the batch, if any.
    #[must_use]
    pub fn first(&self) -> Option<&ResultSet> {
        match self {
            QueryResponse::Results(sets) => sets.first(),
            QueryResponse::Failed => None,
        }
    }
}

/// Hands out connections to the search daemon.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Acquire a connection ready to accept query configuration.
    ///
    /// An `Err` here is the one failure the execute path converts into a
    /// sticky failed outcome instead of propagating.
    async fn connect(&self) -> Result<Box<dyn SearchConnection>, SearchError>;
}

/// A single conversation with the search daemon.
///
/// Configuration calls apply to every query enqueued afterwards. Callers
/// must issue them before [`enqueue_query`](Self::enqueue_query); the
/// computed filter column in particular has to be present in the select
/// list before the native filter referencing it is installed.
#[async_trait]
pub trait SearchConnection: Send {
    /// Select the result ordering for subsequent queries.
    fn set_sort_mode(&mut self, mode: SortMode, clause: &str) -> Result<(), SearchError>;

    /// Restrict the result window to `limit` matches starting at `offset`.
    fn set_limits(&mut self, offset: usize, limit: usize) -> Result<(), SearchError>;

    /// Set per-field relevance weights.
    fn set_field_weights(&mut self, weights: &BTreeMap<String, u32>) -> Result<(), SearchError>;

    /// Append `expr AS alias` to the select list of subsequent queries.
    fn add_computed_column(&mut self, expr: &str, alias: &str) -> Result<(), SearchError>;

    /// Keep only rows whose `attribute` value is in `values`.
    fn set_filter(&mut self, attribute: &str, values: &[i64]) -> Result<(), SearchError>;

    /// Select the text matching strategy.
    fn set_match_mode(&mut self, mode: MatchMode) -> Result<(), SearchError>;

    /// Escape query-syntax metacharacters in `text`.
    fn escape_string(&self, text: &str) -> String;

    /// Add a query against `index` to the pending batch.
    fn enqueue_query(&mut self, text: &str, index: &str) -> Result<(), SearchError>;

    /// Run the pending batch. This is the single network round trip.
    async fn run_queries(&mut self) -> Result<QueryResponse, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_modes_use_classic_wire_values() {
        assert_eq!(SortMode::AttrDesc.as_i32(), 1);
        assert_eq!(SortMode::AttrAsc.as_i32(), 2);
        assert_eq!(SortMode::Expr.as_i32(), 5);
    }

    #[test]
    fn test_match_mode_all_is_zero() {
        assert_eq!(MatchMode::All.as_i32(), 0);
        assert_eq!(MatchMode::Extended2.as_i32(), 6);
    }

    #[test]
    fn test_failed_response_has_no_first_set() {
        assert!(QueryResponse::Failed.is_failed());
        assert!(QueryResponse::Failed.first().is_none());
    }

    #[test]
    fn test_first_set_comes_from_batch_order() {
        let batch = QueryResponse::Results(vec![
            ResultSet { status: SEARCHD_OK, total: 7, matches: None },
            ResultSet { status: 1, total: 0, matches: None },
        ]);
        let first = batch.first().map(|set| set.total);
        assert_eq!(first, Some(7));
        assert!(!batch.is_failed());
    }

    #[test]
    fn test_result_set_status_gates_is_ok() {
        let ok = ResultSet { status: SEARCHD_OK, total: 0, matches: None };
        let bad = ResultSet { status: 1, total: 0, matches: None };
        assert!(ok.is_ok());
        assert!(!bad.is_ok());
    }
}
