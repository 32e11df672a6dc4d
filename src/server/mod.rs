//! MCP Server implementation
//!
//! Dispatches JSON-RPC messages to the registered tools. The dispatcher is
//! transport-agnostic: stdio feeds it line by line, HTTP one body at a time.

mod handlers;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::protocol::{
    error_content, JsonRpcError, JsonRpcReply, JsonRpcRequest, JsonRpcResponse, McpTool,
    ServerInfo, Tool,
};
use crate::types::McpResult;

pub use handlers::*;

/// MCP Server holding the tool registry
pub struct McpServer {
    server_info: ServerInfo,
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl McpServer {
    /// Create a new MCP server with default settings
    pub fn new() -> Self {
        Self::with_info(ServerInfo::default())
    }

    /// Create a new MCP server with custom server info
    pub fn with_info(info: ServerInfo) -> Self {
        Self {
            server_info: info,
            tools: HashMap::new(),
        }
    }

    /// Register a tool with the server
    pub fn register_tool(&mut self, tool: Arc<dyn Tool>) -> &mut Self {
        let name = tool.name();
        if self.tools.insert(name.clone(), tool).is_some() {
            warn!(tool = %name, "Replacing already registered tool");
        }
        self
    }

    /// Get the number of registered tools
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    pub fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    /// Tool definitions, sorted by name
    pub fn tools(&self) -> Vec<McpTool> {
        let mut tools: Vec<McpTool> = self.tools.values().map(|t| t.definition()).collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Serve newline-delimited JSON-RPC over stdin/stdout until stdin closes
    pub async fn run_stdio(&self) -> McpResult<()> {
        info!(tools = self.tool_count(), "Serving MCP over stdio");
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.serve_lines(reader, writer).await
    }

    /// Serve newline-delimited JSON-RPC from any reader to any writer
    pub async fn serve_lines<R, W>(&self, reader: R, mut writer: W) -> McpResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(reply) = self.handle_message(trimmed).await {
                let mut json = serde_json::to_string(&reply)?;
                json.push('\n');
                writer.write_all(json.as_bytes()).await?;
                writer.flush().await?;
            }
        }
        debug!("Input closed, stopping stdio loop");
        Ok(())
    }

    /// Handle one raw message. `None` for notifications.
    pub async fn handle_message(&self, message: &str) -> Option<JsonRpcReply> {
        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Received unparsable message");
                return Some(JsonRpcError::parse_error(e.to_string()).into());
            }
        };
        // Valid JSON that is not a request object is an invalid request, not a parse error
        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(req) => req,
            Err(e) => {
                warn!(error = %e, "Received malformed request");
                return Some(JsonRpcError::invalid_request(id, e.to_string()).into());
            }
        };
        self.handle_request(request).await
    }

    /// Handle a single JSON-RPC request
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcReply> {
        if !request.is_valid() {
            return Some(
                JsonRpcError::invalid_request(
                    request.id.unwrap_or(Value::Null),
                    "jsonrpc must be '2.0'",
                )
                .into(),
            );
        }

        debug!(method = %request.method, "Handling request");
        let notification = request.is_notification();
        let id = request.id.clone().unwrap_or(Value::Null);

        let reply: JsonRpcReply = match request.method.as_str() {
            "initialize" => JsonRpcResponse::new(id, initialize_result(&self.server_info)).into(),
            "notifications/initialized" => return None,
            "tools/list" => JsonRpcResponse::new(id, json!({ "tools": self.tools() })).into(),
            "tools/call" => self.handle_tool_call(id, request.params).await,
            "ping" => JsonRpcResponse::new(id, json!({})).into(),
            method => JsonRpcError::method_not_found(id, method).into(),
        };

        if notification {
            None
        } else {
            Some(reply)
        }
    }

    /// Handle tools/call request
    async fn handle_tool_call(&self, id: Value, params: Option<Value>) -> JsonRpcReply {
        let Some(params) = params else {
            return JsonRpcError::invalid_params(id, "Missing parameters").into();
        };
        let Some(tool_name) = extract_tool_name(&params) else {
            return JsonRpcError::invalid_params(id, "Missing tool name").into();
        };
        let Some(tool) = self.tools.get(tool_name) else {
            return JsonRpcError::unknown_tool(id, tool_name).into();
        };

        let arguments = extract_arguments(&params);
        let result = match tool.execute(arguments).await {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = %tool_name, kind = e.kind(), error = %e, "Tool call failed");
                error_content(&e)
            }
        };
        JsonRpcResponse::new(id, result).into()
    }
}

impl Default for McpServer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::knowledge_base::KnowledgeBase;
    use crate::tools::register_all_tools;

    async fn server() -> (McpServer, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        let kb = KnowledgeBase::open(backend.clone()).await.unwrap();
        let mut server = McpServer::new();
        register_all_tools(&mut server, Arc::new(kb));
        (server, backend)
    }

    fn reply_json(reply: Option<JsonRpcReply>) -> Value {
        serde_json::to_value(reply.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_initialize_and_list() {
        let (server, _) = server().await;
        let init = reply_json(
            server
                .handle_message(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
                .await,
        );
        assert_eq!(init["id"], 1);
        assert_eq!(init["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(init["result"]["serverInfo"]["name"], "neo4j-memory");

        let list = reply_json(
            server
                .handle_message(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
                .await,
        );
        assert_eq!(list["result"]["tools"].as_array().unwrap().len(), 9);
    }

    #[tokio::test]
    async fn test_notifications_get_no_reply() {
        let (server, _) = server().await;
        assert!(server
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await
            .is_none());
        assert!(server
            .handle_message(r#"{"jsonrpc":"2.0","method":"ping"}"#)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let (server, _) = server().await;

        let parse = reply_json(server.handle_message("{not json").await);
        assert_eq!(parse["error"]["code"], -32700);
        assert_eq!(parse["id"], Value::Null);

        let version = reply_json(
            server
                .handle_message(r#"{"jsonrpc":"1.0","id":3,"method":"ping"}"#)
                .await,
        );
        assert_eq!(version["error"]["code"], -32600);

        let method = reply_json(
            server
                .handle_message(r#"{"jsonrpc":"2.0","id":4,"method":"resources/list"}"#)
                .await,
        );
        assert_eq!(method["error"]["code"], -32601);

        let tool = reply_json(
            server
                .handle_message(
                    r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"nope"}}"#,
                )
                .await,
        );
        assert_eq!(tool["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_malformed_requests_are_invalid_not_unparsable() {
        let (server, _) = server().await;

        let missing_method = reply_json(
            server.handle_message(r#"{"jsonrpc":"2.0","id":8}"#).await,
        );
        assert_eq!(missing_method["error"]["code"], -32600);
        assert_eq!(missing_method["id"], 8);

        let not_an_object = reply_json(server.handle_message("[1, 2]").await);
        assert_eq!(not_an_object["error"]["code"], -32600);
        assert_eq!(not_an_object["id"], Value::Null);
    }

    #[tokio::test]
    async fn test_null_id_gets_a_reply() {
        let (server, _) = server().await;
        let reply = reply_json(
            server
                .handle_message(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#)
                .await,
        );
        assert_eq!(reply["id"], Value::Null);
        assert_eq!(reply["result"], json!({}));
    }

    #[tokio::test]
    async fn test_tool_failure_is_flagged_result() {
        let (server, backend) = server().await;
        backend.set_online(false);

        let reply = reply_json(
            server
                .handle_message(
                    r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"read_graph"}}"#,
                )
                .await,
        );
        assert!(reply.get("error").is_none());
        assert_eq!(reply["result"]["isError"], true);
        assert_eq!(reply["result"]["errorKind"], "StoreUnavailable");
    }

    #[tokio::test]
    async fn test_serve_lines_answers_each_request() {
        let (server, _) = server().await;
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"create_entities","arguments":{"entities":[{"name":"A","type":"T"}]}}}"#,
            "\n"
        );
        let mut output = Vec::new();
        server.serve_lines(input.as_bytes(), &mut output).await.unwrap();

        let replies: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0]["id"], 1);
        assert_eq!(replies[1]["id"], 2);
        assert!(replies[1]["result"]["isError"].is_null());
    }
}
