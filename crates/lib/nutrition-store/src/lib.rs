//! Storage models, schema helpers and the record codec for opennutrition-mcp.
//!
//! This crate defines the stored row shape shared by the importer and the
//! `SurrealDB` store, and the decoded `FoodRecord` handed to MCP callers.

pub mod codec;
pub mod models;
pub mod schema;

pub use codec::decode_row;
pub use models::*;
