use serde_json::json;

use super::protocol::Tool;

/// Name of the only tool this server exposes
pub const READ_SCREEN_TEXT: &str = "read_screen_text";

/// Return all MCP tool definitions
pub fn tool_definitions() -> Vec<Tool> {
    vec![Tool {
        name: READ_SCREEN_TEXT.to_string(),
        description: "Reads all visible text on the current display using OCR. Use when the user says 'look at my screen', 'read this error', etc. / 現在のディスプレイに表示されている全テキストをOCRで読み取ります。".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_tool_without_required_arguments() {
        let tools = tool_definitions();
        assert_eq!(tools.len(), 1);

        let tool = serde_json::to_value(&tools[0]).unwrap();
        assert_eq!(tool["name"], READ_SCREEN_TEXT);
        assert_eq!(tool["inputSchema"]["type"], "object");
        assert_eq!(tool["inputSchema"]["properties"], json!({}));
        assert!(tool["inputSchema"].get("required").is_none());
    }
}
