//! Core query engine and storage for opennutrition-mcp.
//!
//! This crate owns the `SurrealDB` food store, the read-only query engine the
//! MCP tools route to, and the importer that loads the dataset export.

pub mod control;
pub mod import;
pub mod store;
