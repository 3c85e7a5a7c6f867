//! # searchd-query
//!
//! A query-construction layer in front of a searchd-style full-text search
//! backend.
//!
//! Callers accumulate search parameters through a fluent builder, freeze
//! them into an immutable snapshot and hand that to a query that contacts
//! the backend **at most once**, caching the outcome for its lifetime.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     QueryStateBuilder                       │
//! │  • Fluent setters: index, search, sort, weights, filters    │
//! │  • build() freezes an immutable QueryState snapshot         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SearchQuery                          │
//! │  • FilterTranslator compiles attribute filters to one       │
//! │    boolean predicate, projected as a computed column        │
//! │  • Configures the backend in a fixed order, runs the batch  │
//! │  • Executes at most once; connection failure is sticky      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │              SearchBackend / SearchConnection               │
//! │  • Trait boundary; wire protocol, pooling and retries       │
//! │    live behind it                                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! Building state and compiling filters is pure:
//!
//! ```rust
//! use searchd_query::{FilterFlags, FilterGroup, FilterTranslator, QueryState};
//!
//! let state = QueryState::builder()
//!     .index("products")
//!     .search("wireless keyboard")
//!     .search_in(["title", "description"])
//!     .limit(20)
//!     .add_filter(FilterGroup::new("category_id", [3, 7], FilterFlags::empty()))
//!     .add_filter(FilterGroup::new("in_stock", [1], FilterFlags::JOINT_OR))
//!     .build();
//!
//! let expr = FilterTranslator::translate(&state.filters);
//! assert_eq!(expr, "(IN (category_id, 3, 7)) OR (IN (in_stock, 1))");
//! ```
//!
//! Execution goes through a [`SearchBackend`] implementation:
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! use searchd_query::{Query, QueryState, SearchBackend, SearchQuery};
//!
//! # async fn example(backend: Arc<dyn SearchBackend>) -> Result<(), searchd_query::SearchError> {
//! let state = QueryState::builder()
//!     .index("products")
//!     .search("wireless keyboard")
//!     .build();
//! let query = SearchQuery::new(state, backend);
//!
//! if query.execute().await? {
//!     println!("total matches: {:?}", query.count_total().await?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **At-Most-Once Execution**: one backend round trip per query, every
//!   accessor afterwards is a cache read
//! - **Sticky Failure**: a failed connection acquisition is cached as a
//!   failed outcome and never retried for that query
//! - **Byte-Stable Filter Compilation**: the emitted predicate bytes are
//!   part of the contract with compatibility targets
//! - **Tri-State Scalars**: `limit` and `match_mode` distinguish "unset"
//!   from "set to zero"
//! - **Trait Backend Boundary**: the daemon conversation is injected via
//!   [`SearchBackend`], keeping this layer free of wire concerns
//!
//! ## Modules
//!
//! - [`query`]: builder, state snapshot, filter translator and executor
//! - [`backend`]: the collaborator contract and response model
//! - [`error`]: the two failure channels
//! - [`metrics`]: execution counters and round-trip latency

pub mod backend;
pub mod error;
pub mod metrics;
pub mod query;

pub use backend::{
    MatchMode, QueryResponse, ResultSet, SearchBackend, SearchConnection, SortMode, SEARCHD_OK,
};
pub use error::SearchError;
pub use query::{
    ExecutionOutcome, FilterFlags, FilterGroup, FilterTranslator, FilterValue, Query, QueryState,
    QueryStateBuilder, SearchQuery, SortSpec, FILTER_ALIAS,
};
