pub(crate) mod handlers;
pub(crate) mod helpers;
pub mod protocol;
pub mod session;
pub mod tools;

use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, Tool};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::config::Config;
use crate::ocr::ScreenReader;

/// MCP Server implementation
///
/// Stateless between requests: every call is answered from the request alone
/// plus the static server metadata.
pub struct McpServer<R> {
    reader: R,
    server_name: String,
    protocol_version: String,
    max_chars: usize,
    tools: Vec<Tool>,
}

impl<R: ScreenReader> McpServer<R> {
    pub fn new(reader: R, config: &Config) -> Self {
        Self {
            reader,
            server_name: config.server.name.clone(),
            protocol_version: config.server.protocol_version.clone(),
            max_chars: config.output.max_chars,
            tools: tools::tool_definitions(),
        }
    }

    /// Handle one decoded request.
    ///
    /// Returns `None` whenever nothing must be written back: for every
    /// notification, and for `tools/call` requests whose tool name can't be
    /// determined.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            self.handle_notification(&request);
            return None;
        };

        let result = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize()),
            "notifications/initialized" => {
                info!("Client initialized.");
                return None;
            }
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.tools })),
            "tools/call" => self.handle_tools_call(request.params.as_ref()).await?,
            _ => Err(JsonRpcError::method_not_found(format!(
                "Method not found: {}",
                request.method
            ))),
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(error) => JsonRpcResponse::failure(id, error),
        })
    }

    /// Notifications only ever have side effects
    fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" => info!("Client initialized."),
            method => debug!(method, "ignoring notification"),
        }
    }

    /// Handle initialize request
    fn handle_initialize(&self) -> Value {
        json!({
            "protocolVersion": self.protocol_version,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": self.server_name,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    /// The `read_screen_text` tool output, exactly as a client receives it
    pub async fn read_screen_text(&self) -> String {
        handlers::read_screen::handle(&self.reader, self.max_chars).await
    }

    /// Dispatch a tools/call request to its tool handler.
    ///
    /// `None` means the call is dropped unanswered: `params` is missing, is
    /// not an object, or carries no string `name`.
    async fn handle_tools_call(&self, params: Option<&Value>) -> Option<Result<Value, JsonRpcError>> {
        let Some(name) = params
            .and_then(Value::as_object)
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
        else {
            debug!("tools/call without a tool name, dropping");
            return None;
        };

        let result = match name {
            tools::READ_SCREEN_TEXT => Ok(helpers::text_content(self.read_screen_text().await)),
            _ => {
                debug!(tool = name, "unknown tool");
                Err(JsonRpcError::method_not_found("Method not found"))
            }
        };

        Some(result)
    }
}
