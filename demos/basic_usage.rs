// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Basic searchd-query usage example.
//!
//! Demonstrates:
//! 1. Accumulating query parameters with the fluent builder
//! 2. Compiling attribute filters into one predicate string
//! 3. Executing once against a demo backend and reading the accessors
//! 4. Sticky failure when the backend refuses the connection
//!
//! # Run
//!
//! ```bash
//! cargo run --example basic_usage
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use searchd_query::{
    FilterFlags, FilterGroup, FilterTranslator, MatchMode, Query, QueryResponse, QueryState,
    ResultSet, SearchBackend, SearchConnection, SearchError, SearchQuery, SortMode, SEARCHD_OK,
};

/// Demo backend answering every run with a canned batch.
struct DemoBackend {
    response: QueryResponse,
    refuse_connections: bool,
}

#[async_trait]
impl SearchBackend for DemoBackend {
    async fn connect(&self) -> Result<Box<dyn SearchConnection>, SearchError> {
        if self.refuse_connections {
            return Err(SearchError::Connection("demo daemon is down".to_string()));
        }
        Ok(Box::new(DemoConnection {
            response: self.response.clone(),
        }))
    }
}

/// Prints every configuration call it receives, then answers the batch.
struct DemoConnection {
    response: QueryResponse,
}

#[async_trait]
impl SearchConnection for DemoConnection {
    fn set_sort_mode(&mut self, mode: SortMode, clause: &str) -> Result<(), SearchError> {
        println!("   └─ backend ← set_sort_mode({}, {:?})", mode.as_i32(), clause);
        Ok(())
    }

    fn set_limits(&mut self, offset: usize, limit: usize) -> Result<(), SearchError> {
        println!("   └─ backend ← set_limits({}, {})", offset, limit);
        Ok(())
    }

    fn set_field_weights(&mut self, weights: &BTreeMap<String, u32>) -> Result<(), SearchError> {
        println!("   └─ backend ← set_field_weights({:?})", weights);
        Ok(())
    }

    fn add_computed_column(&mut self, expr: &str, alias: &str) -> Result<(), SearchError> {
        println!("   └─ backend ← add_computed_column({:?} AS {})", expr, alias);
        Ok(())
    }

    fn set_filter(&mut self, attribute: &str, values: &[i64]) -> Result<(), SearchError> {
        println!("   └─ backend ← set_filter({}, {:?})", attribute, values);
        Ok(())
    }

    fn set_match_mode(&mut self, mode: MatchMode) -> Result<(), SearchError> {
        println!("   └─ backend ← set_match_mode({})", mode.as_i32());
        Ok(())
    }

    fn escape_string(&self, text: &str) -> String {
        text.replace('-', "\\-")
    }

    fn enqueue_query(&mut self, text: &str, index: &str) -> Result<(), SearchError> {
        println!("   └─ backend ← enqueue_query({:?}, {:?})", text, index);
        Ok(())
    }

    async fn run_queries(&mut self) -> Result<QueryResponse, SearchError> {
        println!("   └─ backend ← run_queries()");
        Ok(self.response.clone())
    }
}

fn demo_response() -> QueryResponse {
    QueryResponse::Results(vec![ResultSet {
        status: SEARCHD_OK,
        total: 42,
        matches: Some(BTreeMap::from([
            (1001, json!({ "weight": 30, "attrs": { "category_id": 3 } })),
            (1002, json!({ "weight": 25, "attrs": { "category_id": 7 } })),
            (1005, json!({ "weight": 12, "attrs": { "category_id": 3 } })),
        ])),
    }])
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Simple logging (no filter for simplicity)
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║          searchd-query: Basic Usage Example                   ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    // ─────────────────────────────────────────────────────────────────────────
    // 1. Accumulate parameters and freeze the snapshot
    // ─────────────────────────────────────────────────────────────────────────
    println!("📦 Building query state...");

    let state = QueryState::builder()
        .index("products")
        .search("wireless blu-ray")
        .search_in(["title", "description"])
        .limit(10)
        .sort_attr_desc("release_date")
        .field_weight("title", 100)
        .field_weight("description", 20)
        .match_mode(MatchMode::Extended)
        .add_filter(FilterGroup::new("category_id", [3, 7], FilterFlags::empty()))
        .add_filter(FilterGroup::new("discontinued", [1], FilterFlags::EXCLUDE))
        .build();

    println!("   └─ index: {}", state.index);
    println!("   └─ search: {:?} in {:?}", state.search_text, state.search_fields);
    println!("   └─ filters: {} group(s)", state.filters.len());

    // ─────────────────────────────────────────────────────────────────────────
    // 2. Compile the attribute filters
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n🔧 Compiled filter predicate:");
    println!("   └─ {}", FilterTranslator::translate(&state.filters));

    // ─────────────────────────────────────────────────────────────────────────
    // 3. Execute once and read the cached outcome
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n🚀 Executing (watch the backend calls arrive in order)...");

    let backend = Arc::new(DemoBackend {
        response: demo_response(),
        refuse_connections: false,
    });
    let query = SearchQuery::new(state, backend);

    let ran = query.execute().await?;
    println!("\n📖 Accessors (pure cache reads from here on):");
    println!("   └─ execute:     {}", ran);
    println!("   └─ error_code:  {}", query.error_code().await?);
    println!("   └─ count_total: {:?}", query.count_total().await?);
    println!("   └─ count:       {:?}", query.count().await?);
    println!("   └─ last_id:     {:?}", query.last_id().await?);

    // A second execute does not contact the backend again
    let ran_again = query.execute().await?;
    println!("   └─ execute (again, no backend call): {}", ran_again);

    // ─────────────────────────────────────────────────────────────────────────
    // 4. Sticky failure on a refused connection
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n🛑 Executing against a daemon that is down...");

    let down = Arc::new(DemoBackend {
        response: QueryResponse::Failed,
        refuse_connections: true,
    });
    let failed = SearchQuery::new(
        QueryState::builder().index("products").search("anything").build(),
        down,
    );

    println!("   └─ execute:     {}", failed.execute().await?);
    println!("   └─ error_code:  {}", failed.error_code().await?);
    println!("   └─ count_total: {:?}", failed.count_total().await?);
    println!("   └─ count:       {:?}", failed.count().await?);

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║                    Example complete!                          ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    Ok(())
}
