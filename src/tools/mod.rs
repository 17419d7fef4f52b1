//! Tool contract and registry.
//!
//! A tool is a named, synchronous function with a declared input schema and
//! output type. Tools are registered once at startup and invoked with JSON
//! arguments by the agent, the MCP server or the HTTP API.

mod builtin;
mod registry;

pub use builtin::{
    CargoTravelTimeTool, CateringServiceTool, ListOccasionsTool, PartyRetrieverTool,
    SuggestMenuTool, SuperheroThemeTool,
};
pub use registry::ToolRegistry;

use crate::error::{AlfredError, Result};
use crate::travel::GeoCoordinate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// JSON type of a tool input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    /// Untyped, or a type this crate does not model.
    Any,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::String => "string",
            InputKind::Number => "number",
            InputKind::Integer => "integer",
            InputKind::Boolean => "boolean",
            InputKind::Array => "array",
            InputKind::Object => "object",
            InputKind::Any => "any",
        }
    }

    fn from_schema_type(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("string") => InputKind::String,
            Some("number") => InputKind::Number,
            Some("integer") => InputKind::Integer,
            Some("boolean") => InputKind::Boolean,
            Some("array") => InputKind::Array,
            Some("object") => InputKind::Object,
            _ => InputKind::Any,
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            InputKind::String => value.is_string(),
            InputKind::Number => value.is_number(),
            InputKind::Integer => value.is_i64() || value.is_u64(),
            InputKind::Boolean => value.is_boolean(),
            InputKind::Array => value.is_array(),
            InputKind::Object => value.is_object(),
            InputKind::Any => true,
        }
    }
}

/// A declared tool parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInput {
    pub name: String,
    pub kind: InputKind,
    pub description: String,
    pub required: bool,
}

impl ToolInput {
    pub fn required(name: &str, kind: InputKind, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            description: description.to_string(),
            required: true,
        }
    }

    pub fn optional(name: &str, kind: InputKind, description: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind, description)
        }
    }
}

/// Declared result type of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    String,
    Number,
}

/// Name, description and schema of a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub inputs: Vec<ToolInput>,
    pub output_type: OutputType,
}

impl ToolSpec {
    pub fn new(name: &str, description: &str, output_type: OutputType) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            inputs: Vec::new(),
            output_type,
        }
    }

    pub fn with_input(mut self, input: ToolInput) -> Self {
        self.inputs.push(input);
        self
    }

    /// Rebuild a spec from a JSON Schema `object`, as advertised by a remote
    /// tool server. Results are treated as text.
    pub fn from_input_schema(name: &str, description: &str, schema: &Value) -> Self {
        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut spec = Self::new(name, description, OutputType::String);
        if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
            for (input_name, property) in properties {
                let kind = InputKind::from_schema_type(property.get("type"));
                let input_description = property
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                spec = spec.with_input(if required.contains(&input_name.as_str()) {
                    ToolInput::required(input_name, kind, input_description)
                } else {
                    ToolInput::optional(input_name, kind, input_description)
                });
            }
        }
        spec
    }

    /// JSON Schema object describing the inputs.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        for input in &self.inputs {
            let mut property = json!({ "description": input.description });
            match input.kind {
                InputKind::Any => {}
                InputKind::Array => {
                    property["type"] = json!("array");
                    property["items"] = json!({ "type": "number" });
                }
                kind => property["type"] = json!(kind.as_str()),
            }
            properties.insert(input.name.clone(), property);
        }

        let required: Vec<&str> = self
            .inputs
            .iter()
            .filter(|i| i.required)
            .map(|i| i.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Check that required inputs are present and declared kinds match.
    pub fn validate_args(&self, args: &Value) -> Result<()> {
        let empty = Map::new();
        let object = match args {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(AlfredError::InvalidInput(format!(
                    "{} expects an object of arguments, got {}",
                    self.name, other
                )))
            }
        };

        for input in &self.inputs {
            match object.get(&input.name) {
                None | Some(Value::Null) if input.required => {
                    return Err(AlfredError::InvalidInput(format!(
                        "Missing '{}' argument",
                        input.name
                    )))
                }
                None | Some(Value::Null) => {}
                Some(value) if !input.kind.accepts(value) => {
                    return Err(AlfredError::InvalidInput(format!(
                        "'{}' must be of type {}",
                        input.name,
                        input.kind.as_str()
                    )))
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

/// Value returned by a tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Text(String),
    Number(f64),
}

impl ToolOutput {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ToolOutput::Text(text) => Some(text),
            ToolOutput::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ToolOutput::Number(n) => Some(*n),
            ToolOutput::Text(_) => None,
        }
    }
}

impl std::fmt::Display for ToolOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolOutput::Text(text) => f.write_str(text),
            ToolOutput::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for ToolOutput {
    fn from(text: &str) -> Self {
        ToolOutput::Text(text.to_string())
    }
}

impl From<String> for ToolOutput {
    fn from(text: String) -> Self {
        ToolOutput::Text(text)
    }
}

impl From<f64> for ToolOutput {
    fn from(n: f64) -> Self {
        ToolOutput::Number(n)
    }
}

/// Capability contract every tool implements.
pub trait Tool: Send + Sync {
    /// Name, description and schema.
    fn spec(&self) -> &ToolSpec;

    /// Run the tool. Arguments have already been checked against `spec()`.
    fn invoke(&self, args: &Value) -> Result<ToolOutput>;

    fn name(&self) -> &str {
        &self.spec().name
    }
}

/// A tool re-exposed under `{prefix}_{name}`, e.g. `mcp_suggest_menu`.
pub struct Namespaced {
    spec: ToolSpec,
    inner: Arc<dyn Tool>,
}

impl Namespaced {
    pub fn new(prefix: &str, inner: Arc<dyn Tool>) -> Self {
        let mut spec = inner.spec().clone();
        spec.name = format!("{}_{}", prefix, spec.name);
        Self { spec, inner }
    }
}

impl Tool for Namespaced {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    fn invoke(&self, args: &Value) -> Result<ToolOutput> {
        self.inner.invoke(args)
    }
}

fn str_arg<'a>(args: &'a Value, name: &str) -> Result<&'a str> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| AlfredError::InvalidInput(format!("Missing '{}' argument", name)))
}

fn opt_str_arg<'a>(args: &'a Value, name: &str) -> Option<&'a str> {
    args.get(name).and_then(Value::as_str)
}

fn opt_f64_arg(args: &Value, name: &str) -> Option<f64> {
    args.get(name).and_then(Value::as_f64)
}

fn coord_arg(args: &Value, name: &str) -> Result<GeoCoordinate> {
    let value = args
        .get(name)
        .ok_or_else(|| AlfredError::InvalidInput(format!("Missing '{}' argument", name)))?;
    serde_json::from_value(value.clone()).map_err(|e| {
        AlfredError::InvalidInput(format!("'{}' must be [latitude, longitude]: {}", name, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> ToolSpec {
        ToolSpec::new("demo", "A demo tool.", OutputType::String)
            .with_input(ToolInput::required("query", InputKind::String, "Search text"))
            .with_input(ToolInput::optional("limit", InputKind::Integer, "Max results"))
    }

    #[test]
    fn test_input_schema() {
        let schema = spec().input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["query"]["type"], "string");
        assert_eq!(schema["properties"]["limit"]["description"], "Max results");
        assert_eq!(schema["required"], json!(["query"]));
    }

    #[test]
    fn test_validate_args() {
        let spec = spec();
        assert!(spec.validate_args(&json!({"query": "x"})).is_ok());
        assert!(spec.validate_args(&json!({"query": "x", "limit": 3})).is_ok());
        assert!(spec.validate_args(&json!({"query": "x", "limit": null})).is_ok());

        let missing = spec.validate_args(&json!({})).unwrap_err();
        assert_eq!(missing.to_string(), "Invalid input: Missing 'query' argument");

        assert!(spec.validate_args(&json!({"query": 1})).is_err());
        assert!(spec.validate_args(&json!({"query": "x", "limit": 2.5})).is_err());
        assert!(spec.validate_args(&json!(["x"])).is_err());
    }

    #[test]
    fn test_spec_from_remote_schema() {
        let schema = json!({
            "type": "object",
            "properties": {
                "city": {"type": "string", "description": "City name"},
                "days": {"type": "integer"},
                "filter": {"type": ["string", "null"]}
            },
            "required": ["city"]
        });
        let spec = ToolSpec::from_input_schema("forecast", "Weather.", &schema);

        assert_eq!(spec.output_type, OutputType::String);
        assert_eq!(spec.inputs.len(), 3);
        let city = spec.inputs.iter().find(|i| i.name == "city").unwrap();
        assert!(city.required);
        assert_eq!(city.description, "City name");
        let filter = spec.inputs.iter().find(|i| i.name == "filter").unwrap();
        assert_eq!(filter.kind, InputKind::Any);

        assert!(spec.validate_args(&json!({"days": 3})).is_err());
        assert!(spec.validate_args(&json!({"city": "Gotham", "filter": 1})).is_ok());
        assert!(spec.input_schema()["properties"]["filter"].get("type").is_none());
        assert_eq!(spec.input_schema()["required"], json!(["city"]));
    }

    #[test]
    fn test_spec_from_own_schema_keeps_inputs() {
        let original = spec();
        let rebuilt = ToolSpec::from_input_schema("demo", "A demo tool.", &original.input_schema());
        assert_eq!(rebuilt.input_schema(), original.input_schema());
    }

    #[test]
    fn test_null_args_are_empty() {
        let spec = ToolSpec::new("noargs", "No arguments.", OutputType::String);
        assert!(spec.validate_args(&Value::Null).is_ok());
    }

    #[test]
    fn test_output_serializes_plainly() {
        assert_eq!(serde_json::to_value(ToolOutput::from("hi")).unwrap(), json!("hi"));
        assert_eq!(serde_json::to_value(ToolOutput::from(1.5)).unwrap(), json!(1.5));
        assert_eq!(ToolOutput::from(22.82).to_string(), "22.82");
    }

    #[test]
    fn test_namespaced_tool() {
        let inner: Arc<dyn Tool> = Arc::new(SuggestMenuTool::new());
        let tool = Namespaced::new("mcp", inner);
        assert_eq!(tool.name(), "mcp_suggest_menu");
        let out = tool.invoke(&json!({"occasion": "casual"})).unwrap();
        assert_eq!(out.as_text(), Some("Pizza, snacks, and drinks."));
    }
}
