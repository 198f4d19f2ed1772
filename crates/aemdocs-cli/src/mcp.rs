//! MCP (Model Context Protocol) server implementation

use aemdocs::{DocumentRequest, SearchRequest, Tool};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use tracing::{debug, info, warn};

const READ_TOOL: &str = "read_documentation";
const SEARCH_TOOL: &str = "search_experience_league";
const SERVICES_TOOL: &str = "get_available_services";

/// JSON-RPC 2.0 request
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct JsonRpcRequest {
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Tool result content
fn text_result(text: impl Into<String>, is_error: bool) -> Value {
    let mut result = json!({
        "content": [{
            "type": "text",
            "text": text.into()
        }]
    });
    if is_error {
        result["isError"] = json!(true);
    }
    result
}

/// MCP Server implementation
struct McpServer {
    tool: Tool,
}

impl McpServer {
    fn new(tool: Tool) -> Self {
        Self { tool }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                -32601,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "aemdocs",
                    "version": env!("CARGO_PKG_VERSION")
                },
                "instructions": self.tool.instructions()
            }),
        )
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "tools": [
                    {
                        "name": READ_TOOL,
                        "description": self.tool.description(),
                        "inputSchema": self.tool.read_input_schema()
                    },
                    {
                        "name": SEARCH_TOOL,
                        "description": self.tool.search_description(),
                        "inputSchema": self.tool.search_input_schema()
                    },
                    {
                        "name": SERVICES_TOOL,
                        "description": self.tool.services_description(),
                        "inputSchema": self.tool.services_input_schema()
                    }
                ]
            }),
        )
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        let tool_name = params
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));
        debug!(tool = tool_name, "Tool call");

        let result = match tool_name {
            READ_TOOL => {
                let req: DocumentRequest = match parse_arguments(arguments) {
                    Ok(req) => req,
                    Err(result) => return JsonRpcResponse::success(id, result),
                };
                if let Err(e) = req.validate() {
                    return JsonRpcResponse::success(id, text_result(e.to_string(), true));
                }
                text_result(self.tool.read_documentation(req).await, false)
            }
            SEARCH_TOOL => {
                let req: SearchRequest = match parse_arguments(arguments) {
                    Ok(req) => req,
                    Err(result) => return JsonRpcResponse::success(id, result),
                };
                text_result(self.tool.search_experience_league(req).await, false)
            }
            SERVICES_TOOL => {
                let services = self.tool.available_services();
                let text = serde_json::to_string_pretty(&services).unwrap_or_default();
                let mut result = text_result(text, false);
                result["structuredContent"] = json!({ "result": services });
                result
            }
            _ => {
                return JsonRpcResponse::error(id, -32602, format!("Unknown tool: {}", tool_name));
            }
        };

        JsonRpcResponse::success(id, result)
    }
}

/// Deserialize tool arguments, or an error result describing why not
fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T, Value> {
    serde_json::from_value(arguments)
        .map_err(|e| text_result(format!("Invalid arguments: {}", e), true))
}

/// Run the MCP server over stdio until stdin closes
pub async fn run_server(tool: Tool) {
    info!(
        session = %tool.session(),
        user_agent = %tool.options().user_agent,
        fetcher = tool.fetcher_name(),
        "Starting AEM documentation MCP server"
    );

    let server = McpServer::new(tool);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!(error = %e, "Error reading stdin");
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                let response = JsonRpcResponse::error(None, -32700, format!("Parse error: {}", e));
                let json = serde_json::to_string(&response).unwrap_or_default();
                let _ = writeln!(stdout, "{}", json);
                let _ = stdout.flush();
                continue;
            }
        };

        // Notifications get no response
        if request.id.is_none() {
            debug!(method = %request.method, "Notification");
            continue;
        }

        let response = server.handle_request(request).await;
        let json = serde_json::to_string(&response).unwrap_or_default();
        let _ = writeln!(stdout, "{}", json);
        let _ = stdout.flush();
    }

    info!("stdin closed, shutting down");
    server.tool.shutdown().await;
}
