//! Registry of the tools exposed to agents and servers.

use super::{
    CargoTravelTimeTool, CateringServiceTool, ListOccasionsTool, Namespaced, PartyRetrieverTool,
    SuggestMenuTool, SuperheroThemeTool, Tool, ToolOutput, ToolSpec,
};
use crate::config::Settings;
use crate::error::{AlfredError, Result};
use crate::mcp::{McpClient, McpTool};
use crate::retrieval::PartyRetriever;
use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Ordered set of uniquely named tools.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    retriever: Option<Arc<PartyRetriever>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every built-in tool, or only those listed in `agent.tools`.
    pub fn builtin(settings: &Settings) -> Result<Self> {
        let retriever = Arc::new(PartyRetriever::new(&settings.retrieval)?);

        let all: Vec<Arc<dyn Tool>> = vec![
            Arc::new(SuggestMenuTool::new()),
            Arc::new(ListOccasionsTool::new()),
            Arc::new(CateringServiceTool::new()),
            Arc::new(SuperheroThemeTool::new()),
            Arc::new(CargoTravelTimeTool::new(
                settings.travel.default_cruising_speed_kmh,
            )),
            Arc::new(PartyRetrieverTool::new(Arc::clone(&retriever))),
        ];

        let wanted = &settings.agent.tools;
        if let Some(unknown) = wanted
            .iter()
            .find(|name| !all.iter().any(|t| t.name() == name.as_str()))
        {
            return Err(AlfredError::Config(format!(
                "Unknown tool in agent.tools: {}",
                unknown
            )));
        }

        let mut registry = Self {
            tools: Vec::new(),
            retriever: Some(retriever),
        };
        for tool in all {
            if wanted.is_empty() || wanted.iter().any(|name| name == tool.name()) {
                registry.register(tool)?;
            }
        }

        debug!("Registered tools: {}", registry.names().join(", "));
        Ok(registry)
    }

    /// Built-in tools plus every tool of the configured MCP server, if any.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut registry = Self::builtin(settings)?;
        if let Some(command) = &settings.mcp.command {
            let client = Arc::new(McpClient::spawn(command, &settings.mcp.args)?);
            registry.register_mcp(&client, &settings.mcp.prefix)?;
        }
        Ok(registry)
    }

    /// Register the tools of a connected MCP server as `{prefix}_{name}`.
    pub fn register_mcp(&mut self, client: &Arc<McpClient>, prefix: &str) -> Result<usize> {
        let tools = client.remote_tools()?;
        let count = tools.len();
        for tool in tools {
            self.register_namespaced(prefix, tool)?;
        }
        info!("Registered {} MCP tools under '{}_'", count, prefix);
        Ok(count)
    }

    /// The idea retriever shared with `party_planning_retriever`.
    pub fn retriever(&self) -> Option<&PartyRetriever> {
        self.retriever.as_deref()
    }

    /// Add a tool. Names must be unique.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        if self.get(tool.name()).is_some() {
            return Err(AlfredError::DuplicateTool(tool.name().to_string()));
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Add a tool under `{prefix}_{name}`.
    pub fn register_namespaced(&mut self, prefix: &str, tool: Arc<dyn Tool>) -> Result<()> {
        self.register(Arc::new(Namespaced::new(prefix, tool)))
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn specs(&self) -> Vec<&ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate arguments against the tool's schema and run it.
    pub fn invoke(&self, name: &str, args: &Value) -> Result<ToolOutput> {
        let tool = self
            .get(name)
            .ok_or_else(|| AlfredError::UnknownTool(name.to_string()))?;

        info!("Invoking tool: {} with args: {}", name, args);

        tool.spec().validate_args(args)?;
        let output = tool.invoke(args).inspect_err(|e| warn!("Tool {} failed: {}", name, e))?;

        debug!("Tool {} returned: {}", name, output);
        Ok(output)
    }

    /// Parse raw JSON arguments, as sent by a model, and invoke.
    pub fn invoke_json(&self, name: &str, arguments: &str) -> Result<ToolOutput> {
        let args: Value = if arguments.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(arguments)
                .map_err(|e| AlfredError::InvalidInput(format!("Invalid tool arguments: {}", e)))?
        };
        self.invoke(name, &args)
    }

    /// Tool definitions as listed to MCP clients.
    pub fn to_mcp_tools(&self) -> Vec<McpTool> {
        self.specs().into_iter().map(McpTool::from).collect()
    }

    /// OpenAI function/tool definitions.
    pub fn to_chat_tools(&self) -> Vec<ChatCompletionTool> {
        self.tools
            .iter()
            .map(|tool| {
                let spec = tool.spec();
                ChatCompletionTool {
                    r#type: ChatCompletionToolType::Function,
                    function: FunctionObject {
                        name: spec.name.clone(),
                        description: Some(spec.description.clone()),
                        parameters: Some(spec.input_schema()),
                        strict: None,
                    },
                }
            })
            .collect()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
