#![forbid(unsafe_code)]

use crate::{JsonRpcRequest, json_rpc_error, json_rpc_response, tool_text_content};
use serde_json::{Value, json};
use survey_storage::SqliteStore;
use tracing::{debug, warn};

pub(crate) struct McpServer {
    initialized: bool,
    pub(crate) store: SqliteStore,
}

impl McpServer {
    pub(crate) fn new(store: SqliteStore) -> Self {
        Self {
            initialized: false,
            store,
        }
    }

    /// Answers one JSON-RPC message. Notifications get no reply.
    pub(crate) fn handle(&mut self, request: JsonRpcRequest) -> Option<Value> {
        let method = request.method.as_str();

        if method == "initialize" {
            return Some(json_rpc_response(
                request.id,
                json!({
                    "protocolVersion": crate::MCP_VERSION,
                    "serverInfo": { "name": crate::SERVER_NAME, "version": crate::SERVER_VERSION },
                    "capabilities": { "tools": {} }
                }),
            ));
        }

        if method == "notifications/initialized" {
            self.initialized = true;
            return None;
        }

        if !self.initialized {
            if request.id.is_none() {
                return None;
            }
            return Some(json_rpc_error(request.id, -32002, "Server not initialized"));
        }

        if method.starts_with("notifications/") {
            debug!(method, "notification ignored");
            return None;
        }

        if method == "ping" {
            return Some(json_rpc_response(request.id, json!({})));
        }

        if method == "tools/list" {
            return Some(json_rpc_response(
                request.id,
                json!({ "tools": crate::tools::tool_definitions() }),
            ));
        }

        if method == "tools/call" {
            let Some(params_obj) = request.params.as_ref().and_then(|v| v.as_object()) else {
                return Some(json_rpc_error(
                    request.id,
                    -32602,
                    "params must be an object",
                ));
            };

            let tool_name = params_obj
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            let args = params_obj
                .get("arguments")
                .cloned()
                .unwrap_or_else(|| json!({}));
            let response_body = self.call_tool(&tool_name, args);

            return Some(json_rpc_response(
                request.id,
                json!({
                    "content": [tool_text_content(&response_body)],
                    "isError": !response_body.get("success").and_then(|v| v.as_bool()).unwrap_or(false)
                }),
            ));
        }

        Some(json_rpc_error(
            request.id,
            -32601,
            &format!("Method not found: {method}"),
        ))
    }

    pub(crate) fn call_tool(&mut self, name: &str, args: Value) -> Value {
        let Some(resp) = crate::tools::dispatch_tool(self, name, args) else {
            warn!(tool = name, "unknown tool");
            return crate::ai_error("UNKNOWN_TOOL", &format!("Unknown tool: {name}"));
        };
        if let Some(code) = resp
            .get("error")
            .and_then(|v| v.get("code"))
            .and_then(|v| v.as_str())
        {
            warn!(tool = name, code, "tool call rejected");
        }
        resp
    }
}
