use serde::{Deserialize, Serialize};
use serde_json::Value;

pub(crate) const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC error code for unknown methods and unknown tools
pub(crate) const METHOD_NOT_FOUND: i32 = -32601;

/// JSON-RPC 2.0 Request
///
/// A `null` id deserializes to `None`, so it is treated exactly like an
/// absent one: the message is a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
}

impl JsonRpcRequest {
    /// A request without an id never gets a response
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC 2.0 Response
///
/// Field order matters: it is the order of the serialized line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    #[serde(default)]
    pub id: Value,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn failure(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

/// JSON-RPC 2.0 Error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn method_not_found(message: impl Into<String>) -> Self {
        Self {
            code: METHOD_NOT_FOUND,
            message: message.into(),
            data: None,
        }
    }
}

/// MCP Tool definition
#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Per-line codec failure. Never fatal to the session.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("line is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("line is not a JSON-RPC request: {0}")]
    InvalidRequest(#[source] serde_json::Error),

    #[error("failed to serialize response: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Decode one input line into a request.
///
/// The line is parsed as a plain JSON value first so that syntax errors and
/// shape errors (no `method`, not an object) are reported separately.
pub fn decode_request(line: &str) -> Result<JsonRpcRequest, CodecError> {
    let value: Value = serde_json::from_str(line).map_err(CodecError::InvalidJson)?;
    serde_json::from_value(value).map_err(CodecError::InvalidRequest)
}

/// Encode a response as a single line, without the trailing newline.
pub fn encode_response(response: &JsonRpcResponse) -> Result<String, CodecError> {
    serde_json::to_string(response).map_err(CodecError::Encode)
}

/// Decode a line previously produced by [`encode_response`]
pub fn decode_response(line: &str) -> Result<JsonRpcResponse, CodecError> {
    serde_json::from_str(line).map_err(CodecError::InvalidJson)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_call_with_integer_id() {
        let request = decode_request(r#"{"jsonrpc":"2.0","method":"ping","id":1}"#).unwrap();
        assert_eq!(request.method, "ping");
        assert_eq!(request.id, Some(json!(1)));
        assert!(request.params.is_none());
        assert!(!request.is_notification());
    }

    #[test]
    fn test_decode_string_id_and_params() {
        let request = decode_request(
            r#"{"jsonrpc":"2.0","method":"tools/call","params":{"name":"read_screen_text"},"id":"abc"}"#,
        )
        .unwrap();
        assert_eq!(request.id, Some(json!("abc")));
        assert_eq!(request.params, Some(json!({"name": "read_screen_text"})));
    }

    #[test]
    fn test_null_id_is_notification() {
        let request =
            decode_request(r#"{"jsonrpc":"2.0","method":"notifications/initialized","id":null}"#)
                .unwrap();
        assert!(request.is_notification());

        let request =
            decode_request(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).unwrap();
        assert!(request.is_notification());
    }

    #[test]
    fn test_decode_rejects_bad_lines() {
        assert!(matches!(
            decode_request("{not json"),
            Err(CodecError::InvalidJson(_))
        ));
        assert!(matches!(
            decode_request(r#"{"jsonrpc":"2.0","id":3}"#),
            Err(CodecError::InvalidRequest(_))
        ));
        assert!(matches!(
            decode_request(r#"{"jsonrpc":"2.0","method":42,"id":3}"#),
            Err(CodecError::InvalidRequest(_))
        ));
        assert!(matches!(
            decode_request(r#"[1,2,3]"#),
            Err(CodecError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_encode_success_omits_error() {
        let line = encode_response(&JsonRpcResponse::success(json!(1), json!({}))).unwrap();
        assert_eq!(line, r#"{"jsonrpc":"2.0","result":{},"id":1}"#);
    }

    #[test]
    fn test_encode_failure_omits_result() {
        let response =
            JsonRpcResponse::failure(json!(5), JsonRpcError::method_not_found("Method not found: foo"));
        let line = encode_response(&response).unwrap();
        assert_eq!(
            line,
            r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found: foo"},"id":5}"#
        );
    }

    #[test]
    fn test_encode_escapes_newlines() {
        let response = JsonRpcResponse::success(
            json!(7),
            json!({"content": [{"type": "text", "text": "line one\nline two"}]}),
        );
        let line = encode_response(&response).unwrap();
        assert!(!line.contains('\n'));
        assert!(line.contains(r"line one\nline two"));
    }

    #[test]
    fn test_response_line_survives_decode_and_encode() {
        let line = r#"{"jsonrpc":"2.0","result":{"zeta":1,"alpha":2.5,"nested":[true,null,"日本語"]},"id":"req-9"}"#;
        let response = decode_response(line).unwrap();
        assert_eq!(response.result.as_ref().unwrap()["alpha"], json!(2.5));
        assert_eq!(encode_response(&response).unwrap(), line);
    }
}
