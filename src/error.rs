//! Error types for the query layer.
//!
//! There are exactly two failure channels and they are deliberately not
//! unified:
//!
//! * [`SearchError::Connection`]: acquiring the backend connection failed.
//!   The execute path catches this, records a failed outcome and reports it
//!   through the error accessors rather than returning `Err`.
//! * [`SearchError::Backend`]: a configuration or run call failed after the
//!   connection was acquired. This propagates to the caller and the outcome
//!   stays uncached, so a later access may attempt execution again.

use thiserror::Error;

/// Errors surfaced by query execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The backend could not hand out a usable connection.
    #[error("search backend connection failed: {0}")]
    Connection(String),

    /// A call on an established connection was rejected or failed.
    #[error("search backend call failed: {0}")]
    Backend(String),
}
