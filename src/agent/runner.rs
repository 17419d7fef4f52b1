//! Agent runner with tool calling loop.

use super::ModelProfile;
use crate::config::Settings;
use crate::error::{AlfredError, Result};
use crate::openai::create_client;
use crate::tools::ToolRegistry;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
};
use chrono::{DateTime, Utc};
use futures::channel::mpsc::UnboundedSender;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Default system prompt for the agent.
const DEFAULT_SYSTEM_PROMPT: &str = r#"You are Alfred, the butler of Wayne Manor, planning a party.

You have tools to suggest menus, list occasions, find catering services, generate superhero party themes, estimate cargo flight times and search a knowledge base of party ideas.
Think step-by-step about what information you need, then use the appropriate tools.

Guidelines:
- Use 'list_occasions' if you need to know which occasions have a dedicated menu
- Use 'party_planning_retriever' to find decoration, entertainment and catering ideas
- Use 'calculate_cargo_travel_time' with [latitude, longitude] pairs for deliveries by air

When you have gathered enough information, provide your final answer."#;

/// Agent that can use registered tools to complete a task.
pub struct Agent {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    profile: ModelProfile,
    tools: Arc<ToolRegistry>,
    max_steps: usize,
    system_prompt: String,
}

impl Agent {
    /// Create a new agent for the given tools and model.
    pub fn new(tools: Arc<ToolRegistry>, profile: ModelProfile) -> Result<Self> {
        Ok(Self {
            client: create_client(&profile)?,
            profile,
            tools,
            max_steps: 10,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        })
    }

    /// Create an agent using the agent settings (step limit, system prompt).
    pub fn from_settings(
        tools: Arc<ToolRegistry>,
        profile: ModelProfile,
        settings: &Settings,
    ) -> Result<Self> {
        let mut agent = Self::new(tools, profile)?.with_max_steps(settings.agent.max_steps);
        if let Some(prompt) = &settings.agent.system_prompt {
            agent = agent.with_system_prompt(prompt);
        }
        Ok(agent)
    }

    /// Set a custom system prompt.
    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        self.system_prompt = prompt.to_string();
        self
    }

    /// Set the maximum number of model calls for one task.
    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }

    pub fn model_id(&self) -> &str {
        &self.profile.model_id
    }

    /// Run the agent with a user task.
    pub async fn run(&self, task: &str, context: Option<&str>) -> Result<AgentResponse> {
        self.run_observed(task, context, None).await
    }

    /// Run the agent, reporting progress to `events` as it happens.
    #[instrument(skip(self, context, events), fields(model = %self.profile.model_id))]
    pub async fn run_observed(
        &self,
        task: &str,
        context: Option<&str>,
        events: Option<&UnboundedSender<AgentEvent>>,
    ) -> Result<AgentResponse> {
        let result = self.run_loop(task, context, events).await;
        if let (Err(e), Some(tx)) = (&result, events) {
            let _ = tx.unbounded_send(AgentEvent::Failed {
                message: e.to_string(),
            });
        }
        result
    }

    async fn run_loop(
        &self,
        task: &str,
        context: Option<&str>,
        events: Option<&UnboundedSender<AgentEvent>>,
    ) -> Result<AgentResponse> {
        let started_at = Utc::now();
        let emit = |event: AgentEvent| {
            if let Some(tx) = events {
                // The receiver may have gone away; the run still completes.
                let _ = tx.unbounded_send(event);
            }
        };

        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_prompt.clone())
                .build()
                .map_err(|e| AlfredError::Agent(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_message(task, context))
                .build()
                .map_err(|e| AlfredError::Agent(e.to_string()))?
                .into(),
        ];

        let mut steps = 0;
        let mut tool_calls_made = Vec::new();

        loop {
            steps += 1;
            if steps > self.max_steps {
                return Err(AlfredError::Agent(format!(
                    "Agent exceeded maximum steps ({})",
                    self.max_steps
                )));
            }

            debug!("Agent step {}", steps);
            emit(AgentEvent::Step { step: steps });

            let request = self.build_request(&messages)?;
            let response = self
                .client
                .chat()
                .create(request)
                .await
                .map_err(|e| AlfredError::OpenAI(format!("Agent API error: {}", e)))?;

            let choice = response
                .choices
                .first()
                .ok_or_else(|| AlfredError::Agent("No response from model".to_string()))?;

            let tool_calls = match &choice.message.tool_calls {
                Some(calls) if !calls.is_empty() => calls,
                _ => {
                    let content = choice.message.content.clone().unwrap_or_default();
                    emit(AgentEvent::FinalAnswer {
                        content: content.clone(),
                    });
                    return Ok(AgentResponse {
                        content,
                        tool_calls: tool_calls_made,
                        steps,
                        model: self.profile.model_id.clone(),
                        started_at,
                        finished_at: Utc::now(),
                    });
                }
            };

            // Add assistant message with tool calls to history
            let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                .tool_calls(tool_calls.clone())
                .build()
                .map_err(|e| AlfredError::Agent(e.to_string()))?;
            messages.push(assistant_msg.into());

            for tool_call in tool_calls {
                let record = self.execute_tool_call(tool_call);

                let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                    .tool_call_id(&tool_call.id)
                    .content(record.result.clone())
                    .build()
                    .map_err(|e| AlfredError::Agent(e.to_string()))?;
                messages.push(tool_msg.into());

                emit(AgentEvent::ToolCall(record.clone()));
                tool_calls_made.push(record);
            }
        }
    }

    #[allow(deprecated)]
    fn build_request(
        &self,
        messages: &[ChatCompletionRequestMessage],
    ) -> Result<CreateChatCompletionRequest> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.profile.model_id)
            .messages(messages.to_vec())
            .max_tokens(self.profile.max_tokens);
        if !self.tools.is_empty() {
            args.tools(self.tools.to_chat_tools());
        }
        args.build().map_err(|e| AlfredError::Agent(e.to_string()))
    }

    /// Execute a single tool call and return a record of it.
    fn execute_tool_call(&self, tool_call: &ChatCompletionMessageToolCall) -> ToolCallRecord {
        let name = &tool_call.function.name;
        let arguments = &tool_call.function.arguments;

        info!("Agent calling tool: {} with args: {}", name, arguments);

        ToolCallRecord {
            name: name.clone(),
            arguments: arguments.clone(),
            result: run_tool(&self.tools, name, arguments),
        }
    }
}

/// Run a tool for the model. Failures are reported back as text so the model
/// can correct itself.
pub(crate) fn run_tool(tools: &ToolRegistry, name: &str, arguments: &str) -> String {
    match tools.invoke_json(name, arguments) {
        Ok(output) => output.to_string(),
        Err(e) => format!("Tool error: {}", e),
    }
}

fn user_message(task: &str, context: Option<&str>) -> String {
    match context {
        Some(ctx) => format!("Context: {}\n\nTask: {}", ctx, task),
        None => task.to_string(),
    }
}

/// Progress reported while an agent runs.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// A model call is about to be made.
    Step { step: usize },
    /// A tool was executed.
    ToolCall(ToolCallRecord),
    /// The model answered without requesting tools.
    FinalAnswer { content: String },
    /// The run ended with an error.
    Failed { message: String },
}

/// Response from an agent run.
#[derive(Debug, Serialize)]
pub struct AgentResponse {
    /// The final response content from the agent.
    pub content: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of model calls used.
    pub steps: usize,
    /// Model that produced the answer.
    pub model: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl AgentResponse {
    /// Wall-clock duration of the run.
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned by the tool.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}
