//! MCP (Model Context Protocol) server exposing the workflow tools
//! over JSON-RPC 2.0 on stdio.

mod server;
mod tools;
mod transport;

pub use server::McpServer;
pub use tools::{
    detect_operation, extract_request_params, get_tool_definitions, handle_tool_call,
    sanitize_path_param, tool_for_operation, Operation, RunStore, ToolDefinition,
};
pub use transport::{ErrorCode, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
