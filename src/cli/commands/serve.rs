//! HTTP API server for integration with other systems.
//!
//! Provides REST endpoints for the tools, the idea retriever and the agent.

use crate::agent::{Agent, AgentEvent, ModelProfile, ToolCallRecord};
use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::error::AlfredError;
use crate::retrieval::RetrievedIdea;
use crate::tools::{ToolOutput, ToolRegistry, ToolSpec};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Shared application state.
struct AppState {
    tools: Arc<ToolRegistry>,
    settings: Settings,
}

impl AppState {
    fn new(settings: Settings) -> Result<Self, AlfredError> {
        Ok(Self {
            tools: Arc::new(ToolRegistry::from_settings(&settings)?),
            settings,
        })
    }
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/tools/{name}", post(call_tool))
        .route("/retrieve", post(retrieve))
        .route("/agent", post(run_agent))
        .route("/agent/stream", post(stream_agent))
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let app = router(Arc::new(AppState::new(settings)?));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Alfred API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("List Tools", "GET  /tools");
    Output::kv("Call Tool", "POST /tools/{name}");
    Output::kv("Retrieve", "POST /retrieve");
    Output::kv("Agent", "POST /agent");
    Output::kv("Agent (SSE)", "POST /agent/stream");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Serialize)]
struct ToolsResponse<'a> {
    tools: Vec<&'a ToolSpec>,
}

#[derive(Serialize)]
struct ToolCallResponse {
    output: ToolOutput,
}

#[derive(Deserialize)]
struct RetrieveRequest {
    query: String,
    #[serde(default)]
    k: Option<usize>,
}

#[derive(Serialize)]
struct RetrieveResponse {
    ideas: Vec<RetrievedIdea>,
}

#[derive(Deserialize)]
struct AgentRequest {
    task: String,
    #[serde(default)]
    context: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Serialize)]
struct AgentResult {
    answer: String,
    model: String,
    steps: usize,
    tool_calls: Vec<ToolCallRecord>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(e: AlfredError) -> Response {
    (status_for(&e), Json(ErrorResponse { error: e.to_string() })).into_response()
}

/// HTTP status for a library error.
fn status_for(e: &AlfredError) -> StatusCode {
    match e {
        AlfredError::UnknownTool(_) | AlfredError::UnknownModel(_) => StatusCode::NOT_FOUND,
        AlfredError::InvalidInput(_) | AlfredError::Json(_) => StatusCode::BAD_REQUEST,
        AlfredError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
        AlfredError::OpenAI(_) | AlfredError::Http(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl AppState {
    fn agent(&self, model: Option<&str>) -> Result<Agent, AlfredError> {
        let profile = match model {
            Some(name) => ModelProfile::by_name(name, &self.settings.model)?,
            None => ModelProfile::from_settings(&self.settings.model),
        };
        preflight::check_agent(&profile)?;
        Agent::from_settings(self.tools.clone(), profile, &self.settings)
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_tools(State(state): State<Arc<AppState>>) -> Response {
    Json(ToolsResponse {
        tools: state.tools.specs(),
    })
    .into_response()
}

async fn call_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(args): Json<Value>,
) -> Response {
    match state.tools.invoke(&name, &args) {
        Ok(output) => Json(ToolCallResponse { output }).into_response(),
        Err(e) => error_response(e),
    }
}

async fn retrieve(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RetrieveRequest>,
) -> Response {
    let Some(retriever) = state.tools.retriever() else {
        return error_response(AlfredError::Retrieval("No retriever configured".to_string()));
    };
    let k = req.k.unwrap_or(retriever.top_k());
    Json(RetrieveResponse {
        ideas: retriever.retrieve_k(&req.query, k),
    })
    .into_response()
}

async fn run_agent(State(state): State<Arc<AppState>>, Json(req): Json<AgentRequest>) -> Response {
    let agent = match state.agent(req.model.as_deref()) {
        Ok(agent) => agent,
        Err(e) => return error_response(e),
    };

    match agent.run(&req.task, req.context.as_deref()).await {
        Ok(response) => Json(AgentResult {
            answer: response.content,
            model: response.model,
            steps: response.steps,
            tool_calls: response.tool_calls,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn stream_agent(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AgentRequest>,
) -> Response {
    let agent = match state.agent(req.model.as_deref()) {
        Ok(agent) => agent,
        Err(e) => return error_response(e),
    };

    let (tx, rx) = futures::channel::mpsc::unbounded::<AgentEvent>();

    tokio::spawn(async move {
        match agent
            .run_observed(&req.task, req.context.as_deref(), Some(&tx))
            .await
        {
            Ok(response) => info!("Streamed agent run finished in {} step(s)", response.steps),
            Err(e) => warn!("Streamed agent run failed: {}", e),
        }
    });

    let stream = rx.map(|event| Event::default().json_data(&event));
    Sse::new(stream)
        .keep_alive(KeepAlive::default())
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Serve the API on an ephemeral local port and return its base URL.
    async fn spawn_app() -> String {
        let state = Arc::new(AppState::new(Settings::default()).unwrap());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn post_json(url: String, body: Value) -> (u16, Value) {
        let response = reqwest::Client::new()
            .post(url)
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    #[tokio::test]
    async fn test_health_and_tool_list() {
        let base = spawn_app().await;

        let health: Value = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health, json!({"status": "ok"}));

        let tools: Value = reqwest::get(format!("{}/tools", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let tools = tools["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 6);
        assert_eq!(tools[0]["name"], "suggest_menu");
    }

    #[tokio::test]
    async fn test_call_tool_route() {
        let base = spawn_app().await;

        let (status, body) = post_json(
            format!("{}/tools/suggest_menu", base),
            json!({"occasion": "casual"}),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({"output": "Pizza, snacks, and drinks."}));

        let (status, body) = post_json(
            format!("{}/tools/calculate_cargo_travel_time", base),
            json!({
                "origin_coords": [41.878, -87.629],
                "destination_coords": [-33.868, 151.209]
            }),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({"output": 22.82}));
    }

    #[tokio::test]
    async fn test_call_tool_errors() {
        let base = spawn_app().await;

        let (status, body) = post_json(format!("{}/tools/web_search", base), json!({})).await;
        assert_eq!(status, 404);
        assert_eq!(body["error"], "Unknown tool: web_search");

        let (status, _) = post_json(
            format!("{}/tools/suggest_menu", base),
            json!({"occasion": 5}),
        )
        .await;
        assert_eq!(status, 400);

        let (status, _) = post_json(
            format!("{}/tools/calculate_cargo_travel_time", base),
            json!({
                "origin_coords": [41.878, -87.629],
                "destination_coords": [-33.868, 151.209],
                "cruising_speed_kmh": -1
            }),
        )
        .await;
        assert_eq!(status, 400);
    }

    #[tokio::test]
    async fn test_retrieve_route() {
        let base = spawn_app().await;

        let (status, body) = post_json(
            format!("{}/retrieve", base),
            json!({"query": "superhero decorations", "k": 2}),
        )
        .await;
        assert_eq!(status, 200);
        let ideas = body["ideas"].as_array().unwrap();
        assert_eq!(ideas.len(), 2);
        assert_eq!(ideas[0]["rank"], 1);

        let (_, body) = post_json(format!("{}/retrieve", base), json!({"query": "party"})).await;
        assert_eq!(body["ideas"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_agent_unknown_model() {
        let base = spawn_app().await;

        let (status, body) = post_json(
            format!("{}/agent", base),
            json!({"task": "Plan a gala", "model": "gpt-9"}),
        )
        .await;
        assert_eq!(status, 404);
        assert_eq!(body["error"], "Model gpt-9 not found.");
    }

    #[test]
    fn test_status_for_errors() {
        assert_eq!(
            status_for(&AlfredError::UnknownTool("nope".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&AlfredError::InvalidInput("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&AlfredError::UnknownModel("gpt-9".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&AlfredError::Tool("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_agent_request_defaults() {
        let req: AgentRequest = serde_json::from_str(r#"{"task": "Plan a gala"}"#).unwrap();
        assert_eq!(req.task, "Plan a gala");
        assert!(req.model.is_none());
        assert!(req.context.is_none());
    }
}
