//! Ask Bizzy query entry point.
//!
//! Blank queries are rejected here so the router never has to.

use crate::router::{classify_query, RouteDecision};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryServiceError {
    EmptyQuery,
}

impl Display for QueryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyQuery => write!(f, "query cannot be empty"),
        }
    }
}

impl Error for QueryServiceError {}

/// Validates and routes a user query.
pub fn route(query: &str) -> Result<RouteDecision, QueryServiceError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(QueryServiceError::EmptyQuery);
    }
    let decision = classify_query(trimmed);
    debug!(
        "event=query_route module=service status=ok decision={} query_chars={}",
        decision.as_str(),
        trimmed.chars().count()
    );
    Ok(decision)
}
