//! Full-text search support
//!
//! Query construction for the graph backend and a matcher that evaluates
//! queries against in-process entities.

mod query;

pub use query::{escape_phrase, names_query, tokenize, Clause, Field, FullTextQuery};
