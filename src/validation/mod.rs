//! Argument validation for store operations
//!
//! Every batch is checked in full before the store is touched.

mod types;

pub use types::{
    is_valid_relation_type, validate_additions, validate_deletions, validate_entities,
    validate_names, validate_query, validate_relations,
};
