//! MCP server over stdio: newline-delimited JSON-RPC in, responses out.
//!
//! Every request runs on its own task. A single writer task owns the output
//! stream so responses never interleave mid-line.

pub mod protocol;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::tools::Dispatcher;
use protocol::*;

pub const SERVER_NAME: &str = "cytoscape-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// How long to wait for in-flight calls once input has ended.
const SHUTDOWN_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

pub struct McpServer {
    dispatcher: Arc<Dispatcher>,
}

impl McpServer {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Handle one raw input line. Returns the serialized response, if any.
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let response = match serde_json::from_str::<Value>(line) {
            Err(e) => Some(JsonRpcResponse::error(
                Value::Null,
                PARSE_ERROR,
                format!("Parse error: {}", e),
            )),
            Ok(value) => {
                let id = value.get("id").cloned().unwrap_or(Value::Null);
                match serde_json::from_value::<JsonRpcRequest>(value) {
                    Ok(request) => self.handle_request(request).await,
                    Err(e) => Some(JsonRpcResponse::error(
                        id,
                        INVALID_REQUEST,
                        format!("Invalid request: {}", e),
                    )),
                }
            }
        };

        response.and_then(|r| match serde_json::to_string(&r) {
            Ok(s) => Some(s),
            Err(e) => {
                error!("Failed to serialize response: {}", e);
                None
            }
        })
    }

    /// Route a parsed request. Notifications never produce a response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc.as_deref().is_some_and(|v| v != JSONRPC_VERSION) {
            warn!("Unexpected jsonrpc version: {:?}", request.jsonrpc);
        }

        if request.is_notification() {
            debug!("Notification: {}", request.method);
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.initialize(&request.params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.dispatcher.tool_definitions() })),
            "tools/call" => self.call_tool(request.params).await,
            other => Err((METHOD_NOT_FOUND, format!("Method not found: {}", other))),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err((code, message)) => JsonRpcResponse::error(id, code, message),
        })
    }

    fn initialize(&self, params: &Value) -> Value {
        let version = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(PROTOCOL_VERSION);
        info!("Client initialized (protocol {})", version);
        json!({
            "protocolVersion": version,
            "capabilities": { "tools": { "listChanged": false } },
            "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
        })
    }

    async fn call_tool(&self, params: Value) -> std::result::Result<Value, (i64, String)> {
        let params: CallToolParams = serde_json::from_value(params)
            .map_err(|e| (INVALID_PARAMS, format!("Invalid tools/call params: {}", e)))?;
        let result = self.dispatcher.call(&params.name, &params.arguments).await;
        serde_json::to_value(CallToolResult::from(&result))
            .map_err(|e| (INVALID_PARAMS, format!("Cannot encode tool result: {}", e)))
    }

    /// Serve until the input ends or `cancel` fires.
    pub async fn serve<R, W>(self: Arc<Self>, reader: R, writer: W, cancel: CancellationToken) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let writer_handle = tokio::spawn(async move {
            let mut writer = writer;
            while let Some(line) = rx.recv().await {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            writer.shutdown().await?;
            Ok::<(), std::io::Error>(())
        });

        let mut lines = BufReader::new(reader).lines();
        loop {
            let line = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Shutdown requested, no longer reading input");
                    break;
                }
                line = lines.next_line() => line.context("Failed to read from input")?,
            };
            let Some(line) = line else {
                info!("Input closed");
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            let server = self.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_line(&line).await {
                    let _ = tx.send(response);
                }
            });
        }

        // The writer ends once every in-flight task has dropped its sender.
        drop(tx);
        match tokio::time::timeout(SHUTDOWN_TIMEOUT, writer_handle).await {
            Ok(joined) => joined
                .context("Writer task panicked")?
                .context("Failed to write response")?,
            Err(_) => warn!("Timed out waiting for in-flight tool calls"),
        }
        Ok(())
    }
}
