// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query Construction
//!
//! Accumulate search parameters, compile them into one backend request and
//! read the cached result.
//!
//! # Architecture
//!
//! ```text
//! QueryStateBuilder (fluent setters)
//!     ↓ build()
//! QueryState (immutable snapshot)
//!     ↓ SearchQuery::outcome()  -- at most one round trip
//!     ├─→ FilterTranslator → computed `_filter` column + native filter
//!     └─→ backend calls: sort, limits, weights, match mode, enqueue, run
//! ```
//!
//! # Query Text Syntax
//!
//! ```text
//! @* wireless keyboard         - search all fields
//! @(title,body) wireless       - search the listed fields only
//! (empty string)               - no text query, attribute filters only
//! ```

mod executor;
mod filter;
mod state;

use async_trait::async_trait;

use crate::error::SearchError;

pub use executor::{ExecutionOutcome, SearchQuery, FILTER_ALIAS};
pub use filter::{FilterFlags, FilterGroup, FilterTranslator, FilterValue};
pub use state::{QueryState, QueryStateBuilder, SortSpec};

/// Capability shared by every query kind: run once, then read the outcome.
///
/// Accessors trigger execution on first use (except [`last_id`], which this
/// layer never derives) and report error states as `None`/`0` rather than
/// guessing a value.
///
/// [`last_id`]: Query::last_id
#[async_trait]
pub trait Query: Send + Sync {
    /// Execute if not yet executed; `true` when the run produced a batch.
    async fn execute(&self) -> Result<bool, SearchError>;

    /// `1` for error-shaped outcomes, `0` otherwise.
    async fn error_code(&self) -> Result<i32, SearchError>;

    /// Backend-reported total match count, `None` under error.
    async fn count_total(&self) -> Result<Option<u64>, SearchError>;

    /// Number of matches actually returned, `None` under error.
    async fn count(&self) -> Result<Option<usize>, SearchError>;

    /// Identifier of the last affected document, when the query kind has
    /// one.
    async fn last_id(&self) -> Result<Option<u64>, SearchError>;
}
