//! Typed search errors.
//!
//! `SearchError` covers pre-flight failures only. A start and goal that are
//! not connected is a normal outcome reported through
//! [`crate::SearchStatus::NotFound`], not an error.

use std::fmt;

use mazestar_core::{Cell, Range};

/// Failure detected before any search step runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The start or goal cell lies outside the searchable range.
    InvalidEndpoints { start: Cell, goal: Cell, bounds: Range },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEndpoints {
                start,
                goal,
                bounds,
            } => write!(
                f,
                "search endpoints out of bounds: start {start}, goal {goal}, bounds {bounds}"
            ),
        }
    }
}

impl std::error::Error for SearchError {}
