//! screen-reader-mcp
//!
//! Exposes "read the text currently visible on screen" as a single MCP tool
//! over line-delimited JSON-RPC on stdin/stdout.

pub mod config;
pub mod logging;
pub mod mcp;
pub mod ocr;

pub use config::Config;
pub use mcp::McpServer;
