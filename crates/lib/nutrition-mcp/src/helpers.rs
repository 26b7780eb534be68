use std::borrow::Cow;

use rmcp::ErrorData;
use rmcp::model::{ErrorCode, Tool};

use crate::tools::{ToolDescriptor, ToolError, ToolErrorKind};

pub(crate) fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

/// Maps a dispatch failure to a JSON-RPC error carrying the `{kind, message}`
/// envelope in `data`.
pub(crate) fn map_tool_err(err: &ToolError) -> ErrorData {
    let code = match err.kind() {
        ToolErrorKind::Validation => ErrorCode::INVALID_PARAMS,
        ToolErrorKind::UnknownOperation => ErrorCode::METHOD_NOT_FOUND,
        ToolErrorKind::Infrastructure => ErrorCode::INTERNAL_ERROR,
    };
    ErrorData {
        data: Some(err.envelope()),
        ..mcp_err(code, err.to_string())
    }
}

pub(crate) fn to_mcp_tool(descriptor: ToolDescriptor) -> Tool {
    Tool::new(
        descriptor.name(),
        descriptor.description,
        descriptor.input_schema,
    )
}
