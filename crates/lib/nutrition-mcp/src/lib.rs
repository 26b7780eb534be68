//! MCP server implementation for opennutrition-mcp.
//!
//! This crate validates tool calls, routes them to the food query engine and
//! exposes the static tool catalog over rmcp.

mod helpers;
pub mod server;
pub mod tools;

use std::future::{Future, ready};
use std::sync::Arc;

use nutrition_core::control::FoodQueries;
use rmcp::model::{
    CallToolRequestParams,
    CallToolResult,
    Content,
    ListToolsResult,
    PaginatedRequestParams,
    ServerCapabilities,
    ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ErrorData, ServerHandler};
use serde_json::{Value, json};

use crate::tools::{ToolDispatcher, catalog};

const SERVER_INSTRUCTIONS: &str = r"opennutrition-mcp answers questions about foods and their nutrition using the OpenNutrition dataset.

Use it for nutritional facts, labels, ingredient analysis and serving sizes, for looking up foods by name, ID or EAN-13 barcode, and for browsing the dataset.

Tools:
- `search-food-by-name` matches every query term against food names and alternate names.
- `get-foods` pages through all foods.
- `get-food-by-id` takes an ID starting with `fd_`.
- `get-food-by-ean13` takes a 13-character barcode.

Paging uses `page` (1-indexed, default 1) and `pageSize` (default 5). Lookups return null when nothing matches.";

/// MCP server wrapper around the tool dispatcher.
pub struct NutritionMcp<Q> {
    dispatcher: Arc<ToolDispatcher<Q>>,
}

impl<Q> Clone for NutritionMcp<Q> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

impl<Q: FoodQueries> NutritionMcp<Q> {
    /// Creates a new server using a shared dispatcher handle.
    #[must_use]
    pub const fn with_dispatcher(dispatcher: Arc<ToolDispatcher<Q>>) -> Self {
        Self { dispatcher }
    }
}

impl<Q: FoodQueries + 'static> ServerHandler for NutritionMcp<Q> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        ready(Ok(ListToolsResult {
            tools: catalog().into_iter().map(helpers::to_mcp_tool).collect(),
            next_cursor: None,
            meta: None,
        }))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        async move {
            let arguments = request.arguments.unwrap_or_default();
            let value = self
                .dispatcher
                .dispatch(&request.name, &arguments)
                .await
                .map_err(|err| helpers::map_tool_err(&err))?;
            let mut result = CallToolResult::success(vec![Content::json(&value)?]);
            result.structured_content = Some(structured(value));
            Ok(result)
        }
    }
}

/// `structuredContent` must be an object, so lists and `null` are wrapped.
fn structured(value: Value) -> Value {
    if value.is_object() {
        value
    } else {
        json!({ "result": value })
    }
}
