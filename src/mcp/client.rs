//! MCP client for tools served by another process.
//!
//! Remote tools are listed once at connect time and invoked synchronously,
//! one request at a time, over the server's stdio.

use super::protocol::{
    ClientRequest, McpTool, RemoteCallResult, ServerMessage, ToolList, PROTOCOL_VERSION,
};
use crate::error::{AlfredError, Result};
use crate::tools::{Tool, ToolOutput, ToolSpec};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

struct Connection {
    reader: Box<dyn BufRead + Send>,
    writer: Box<dyn Write + Send>,
}

impl Connection {
    fn send(&mut self, message: &ClientRequest<'_>) -> Result<()> {
        let line = serde_json::to_string(message)?;
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// A connected MCP server.
pub struct McpClient {
    connection: Mutex<Connection>,
    next_id: AtomicU64,
    child: Option<Child>,
}

impl McpClient {
    /// Start `command` and perform the initialize handshake over its stdio.
    pub fn spawn(command: &str, args: &[String]) -> Result<Self> {
        info!("Starting MCP server: {} {}", command, args.join(" "));

        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                AlfredError::Config(format!("Failed to start MCP server '{}': {}", command, e))
            })?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => return Err(AlfredError::Tool("MCP server stdio unavailable".to_string())),
        };

        let client = Self::new(BufReader::new(stdout), stdin, Some(child));
        client.initialize()?;
        Ok(client)
    }

    /// Handshake with a server on an existing transport.
    pub fn connect<R, W>(reader: R, writer: W) -> Result<Self>
    where
        R: BufRead + Send + 'static,
        W: Write + Send + 'static,
    {
        let client = Self::new(reader, writer, None);
        client.initialize()?;
        Ok(client)
    }

    fn new<R, W>(reader: R, writer: W, child: Option<Child>) -> Self
    where
        R: BufRead + Send + 'static,
        W: Write + Send + 'static,
    {
        Self {
            connection: Mutex::new(Connection {
                reader: Box::new(reader),
                writer: Box::new(writer),
            }),
            next_id: AtomicU64::new(1),
            child,
        }
    }

    fn initialize(&self) -> Result<()> {
        let result = self.request(
            "initialize",
            Some(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": {"name": "alfred", "version": env!("CARGO_PKG_VERSION")},
            })),
        )?;
        debug!("MCP server info: {}", result["serverInfo"]);

        self.lock()?
            .send(&ClientRequest::notification("notifications/initialized"))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| AlfredError::Tool("MCP connection lock poisoned".to_string()))
    }

    /// Send a request and wait for the reply with the same id.
    fn request(&self, method: &str, params: Option<Value>) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut connection = self.lock()?;
        connection.send(&ClientRequest::call(id, method, params))?;

        loop {
            let line = connection.read_line()?.ok_or_else(|| {
                AlfredError::Tool(format!("MCP server closed the connection during {}", method))
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let message: ServerMessage = match serde_json::from_str(&line) {
                Ok(message) => message,
                Err(e) => {
                    warn!("Ignoring unreadable MCP message: {}", e);
                    continue;
                }
            };
            if message.id != Some(json!(id)) {
                debug!("Skipping MCP message: {}", line.trim());
                continue;
            }

            if let Some(fault) = message.error {
                return Err(AlfredError::Tool(format!(
                    "MCP error {} on {}: {}",
                    fault.code, method, fault.message
                )));
            }
            return Ok(message.result.unwrap_or(Value::Null));
        }
    }

    /// Tools advertised by the server.
    pub fn list_tools(&self) -> Result<Vec<McpTool>> {
        let list: ToolList = serde_json::from_value(self.request("tools/list", None)?)?;
        Ok(list.tools)
    }

    /// Call a remote tool. Text content is joined line by line; a result
    /// flagged as an error becomes `AlfredError::Tool`.
    pub fn call_tool(&self, name: &str, args: &Value) -> Result<String> {
        let arguments = if args.is_null() { json!({}) } else { args.clone() };
        let result: RemoteCallResult = serde_json::from_value(self.request(
            "tools/call",
            Some(json!({ "name": name, "arguments": arguments })),
        )?)?;

        let text = result
            .content
            .iter()
            .filter(|item| item.kind == "text")
            .filter_map(|item| item.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n");

        if result.is_error {
            Err(AlfredError::Tool(text))
        } else {
            Ok(text)
        }
    }

    /// Wrap every advertised tool so it can be registered locally.
    pub fn remote_tools(self: &Arc<Self>) -> Result<Vec<Arc<dyn Tool>>> {
        let tools = self
            .list_tools()?
            .into_iter()
            .map(|tool| {
                Arc::new(RemoteTool {
                    spec: ToolSpec::from_input_schema(
                        &tool.name,
                        &tool.description,
                        &tool.input_schema,
                    ),
                    client: Arc::clone(self),
                }) as Arc<dyn Tool>
            })
            .collect();
        Ok(tools)
    }
}

impl Drop for McpClient {
    fn drop(&mut self) {
        if let Some(child) = self.child.as_mut() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// A tool that lives on an MCP server.
struct RemoteTool {
    spec: ToolSpec,
    client: Arc<McpClient>,
}

impl Tool for RemoteTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    fn invoke(&self, args: &Value) -> Result<ToolOutput> {
        self.client.call_tool(&self.spec.name, args).map(ToolOutput::from)
    }
}
