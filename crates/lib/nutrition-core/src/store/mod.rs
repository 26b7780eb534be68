//! Store interfaces and `SurrealDB` implementation.
//!
//! The store layer persists food rows and answers the exact-match, substring
//! and paging predicates the query engine needs.

pub mod surreal;

pub use surreal::{StoreError, StoreResult, SurrealFoodStore};
