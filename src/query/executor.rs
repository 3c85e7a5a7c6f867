//! Query Executor
//!
//! Maps a frozen [`QueryState`] onto backend calls, runs the batch exactly
//! once and caches the outcome for the lifetime of the query.
//!
//! # Architecture
//!
//! ```text
//! SearchQuery::outcome()
//!       │
//!       ├─→ Cached? Return it (no backend contact)
//!       │
//!       ├─→ connect() failed? Cache a failed outcome (sticky)
//!       │
//!       └─→ sort → limits → weights → filter column → match mode
//!                │
//!                └─→ enqueue_query → run_queries (the round trip)
//! ```
//!
//! Configuration calls happen strictly in the order above; the computed
//! filter column must be in the select list before the native filter that
//! tests it. Failures after the connection is acquired propagate to the
//! caller and leave the cache empty, so a later access may run again.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::backend::{QueryResponse, SearchBackend};
use crate::error::SearchError;
use crate::metrics;
use crate::query::filter::FilterTranslator;
use crate::query::state::QueryState;
use crate::query::Query;

/// Select-list alias of the computed filter column.
///
/// The daemon's native filter primitive only tests stored or computed
/// attributes, so the compiled boolean expression is projected under this
/// alias and the filter restricts rows to where it evaluates to 1.
pub const FILTER_ALIAS: &str = "_filter";

/// What a single execution produced, cached per query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Whether the run came back with a batch at all.
    pub success: bool,
    /// The batch, or [`QueryResponse::Failed`] when it never arrived.
    pub response: QueryResponse,
}

impl ExecutionOutcome {
    /// Error-shaped outcomes: no batch, an empty batch, or a first result
    /// set with a non-OK status.
    #[must_use]
    pub fn is_error(&self) -> bool {
        match self.response.first() {
            Some(set) => !set.is_ok(),
            None => true,
        }
    }
}

/// A full-text query executed at most once against its backend.
///
/// Accessors trigger execution on first use and read the cached outcome
/// afterwards; the backend is contacted at most once for the lifetime of
/// the value, except that a propagated [`SearchError::Backend`] leaves the
/// cache empty and a later access will try again.
///
/// # Example
///
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use searchd_query::{Query, QueryState, SearchBackend, SearchQuery};
/// # async fn example(backend: Arc<dyn SearchBackend>) -> Result<(), searchd_query::SearchError> {
/// let state = QueryState::builder()
///     .index("products")
///     .search("wireless keyboard")
///     .limit(10)
///     .build();
/// let query = SearchQuery::new(state, backend);
///
/// if query.execute().await? {
///     println!("matched {:?} documents", query.count_total().await?);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SearchQuery {
    state: QueryState,
    backend: Arc<dyn SearchBackend>,
    outcome: OnceCell<ExecutionOutcome>,
}

impl SearchQuery {
    #[must_use]
    pub fn new(state: QueryState, backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            state,
            backend,
            outcome: OnceCell::new(),
        }
    }

    /// Parameters this query was built from.
    #[must_use]
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Raw batch response, executing the query on first access.
    pub async fn response(&self) -> Result<&QueryResponse, SearchError> {
        Ok(&self.outcome().await?.response)
    }

    /// Cached outcome, executing the query on first access.
    ///
    /// Concurrent first accesses are serialized; only one of them runs the
    /// query and the rest observe its cached outcome.
    pub async fn outcome(&self) -> Result<&ExecutionOutcome, SearchError> {
        let result = self
            .outcome
            .get_or_try_init(|| execute_once(&self.state, self.backend.as_ref()))
            .await;

        if let Err(error) = &result {
            warn!(index = %self.state.index, error = %error, "query execution failed");
            metrics::record_execution("backend_error");
        }

        result
    }
}

#[async_trait]
impl Query for SearchQuery {
    async fn execute(&self) -> Result<bool, SearchError> {
        Ok(self.outcome().await?.success)
    }

    async fn error_code(&self) -> Result<i32, SearchError> {
        Ok(i32::from(self.outcome().await?.is_error()))
    }

    async fn count_total(&self) -> Result<Option<u64>, SearchError> {
        let outcome = self.outcome().await?;
        if outcome.is_error() {
            return Ok(None);
        }
        Ok(outcome.response.first().map(|set| set.total))
    }

    async fn count(&self) -> Result<Option<usize>, SearchError> {
        let outcome = self.outcome().await?;
        if outcome.is_error() {
            return Ok(None);
        }
        let count = outcome
            .response
            .first()
            .and_then(|set| set.matches.as_ref())
            .map_or(0, |matches| matches.len());
        Ok(Some(count))
    }

    async fn last_id(&self) -> Result<Option<u64>, SearchError> {
        // This query kind never reports one; the accessor does not even
        // trigger execution.
        Ok(None)
    }
}

/// One full assembly-and-run pass.
///
/// A connection failure is caught here and turned into a failed outcome,
/// which the caller caches permanently. Every later failure propagates.
async fn execute_once(
    state: &QueryState,
    backend: &dyn SearchBackend,
) -> Result<ExecutionOutcome, SearchError> {
    let mut conn = match backend.connect().await {
        Ok(conn) => conn,
        Err(error) => {
            warn!(index = %state.index, error = %error, "backend connection failed");
            metrics::record_execution("connect_error");
            return Ok(ExecutionOutcome {
                success: false,
                response: QueryResponse::Failed,
            });
        }
    };

    if let Some(sort) = &state.sort {
        conn.set_sort_mode(sort.mode, &sort.clause)?;
    }

    // An explicit zero limit is documented to behave like an unset one.
    if let Some(limit) = state.limit {
        if limit > 0 {
            conn.set_limits(state.offset, limit)?;
        }
    }

    if !state.field_weights.is_empty() {
        conn.set_field_weights(&state.field_weights)?;
    }

    if !state.filters.is_empty() {
        let expr = FilterTranslator::translate(&state.filters);
        debug!(index = %state.index, expr = %expr, "compiled filter predicate");
        conn.add_computed_column(&expr, FILTER_ALIAS)?;
        conn.set_filter(FILTER_ALIAS, &[1])?;
    }

    if let Some(mode) = state.match_mode {
        conn.set_match_mode(mode)?;
    }

    let escaped = conn.escape_string(&state.search_text);
    let text = query_text(state, &escaped);
    debug!(index = %state.index, query = %text, "enqueue query");
    conn.enqueue_query(&text, &state.index)?;

    let run_start = Instant::now();
    let response = conn.run_queries().await?;
    metrics::record_round_trip(run_start.elapsed());

    let success = !response.is_failed();
    if success {
        let total = response.first().map(|set| set.total);
        debug!(index = %state.index, total = ?total, "query ran");
        metrics::record_execution("success");
    } else {
        warn!(index = %state.index, "query run produced no batch");
        metrics::record_execution("run_failed");
    }

    Ok(ExecutionOutcome { success, response })
}

/// Final query text: the escaped search scoped to the requested fields, or
/// the empty string when there is nothing to search for.
fn query_text(state: &QueryState, escaped: &str) -> String {
    if escaped.is_empty() {
        return String::new();
    }

    let scope = if state.search_fields.is_empty() {
        "@*".to_string()
    } else {
        format!("@({})", state.search_fields.join(","))
    };

    format!("{} {}", scope, escaped)
}
