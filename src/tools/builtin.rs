//! Built-in party-planning tools.

use super::{
    coord_arg, opt_f64_arg, opt_str_arg, str_arg, InputKind, OutputType, Tool, ToolInput,
    ToolOutput, ToolSpec,
};
use crate::error::Result;
use crate::party;
use crate::retrieval::{format_ideas, PartyRetriever};
use crate::travel::estimate_travel_hours;
use serde_json::Value;
use std::sync::Arc;

/// Suggests a menu for an occasion.
pub struct SuggestMenuTool {
    spec: ToolSpec,
}

impl SuggestMenuTool {
    pub fn new() -> Self {
        let spec = ToolSpec::new(
            "suggest_menu",
            "Suggests a menu based on the occasion.",
            OutputType::String,
        )
        .with_input(ToolInput::required(
            "occasion",
            InputKind::String,
            "The type of occasion for the party. Allowed values are: \
            \"casual\" (menu for casual party), \"formal\" (menu for formal party), \
            \"superhero\" (menu for superhero party), \"custom\" (custom menu).",
        ));
        Self { spec }
    }
}

impl Default for SuggestMenuTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for SuggestMenuTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    fn invoke(&self, args: &Value) -> Result<ToolOutput> {
        let occasion = str_arg(args, "occasion")?;
        Ok(party::suggest_menu(occasion).into())
    }
}

/// Lists the supported occasions.
pub struct ListOccasionsTool {
    spec: ToolSpec,
}

impl ListOccasionsTool {
    pub fn new() -> Self {
        Self {
            spec: ToolSpec::new(
                "list_occasions",
                "Lists the available occasions.",
                OutputType::String,
            ),
        }
    }
}

impl Default for ListOccasionsTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for ListOccasionsTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    fn invoke(&self, _args: &Value) -> Result<ToolOutput> {
        Ok(party::list_occasions().into())
    }
}

/// Finds the highest-rated catering service in Gotham City.
pub struct CateringServiceTool {
    spec: ToolSpec,
}

impl CateringServiceTool {
    pub fn new() -> Self {
        let spec = ToolSpec::new(
            "catering_service_tool",
            "This tool returns the highest-rated catering service in Gotham City.",
            OutputType::String,
        )
        .with_input(ToolInput::optional(
            "query",
            InputKind::String,
            "A search term for finding catering services.",
        ));
        Self { spec }
    }
}

impl Default for CateringServiceTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for CateringServiceTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    fn invoke(&self, args: &Value) -> Result<ToolOutput> {
        Ok(party::best_catering_service(opt_str_arg(args, "query")).into())
    }
}

/// Suggests a superhero party theme for a category.
pub struct SuperheroThemeTool {
    spec: ToolSpec,
}

impl SuperheroThemeTool {
    pub fn new() -> Self {
        let spec = ToolSpec::new(
            "superhero_party_theme_generator",
            "This tool suggests creative superhero-themed party ideas based on a category. \
            It returns a unique party theme idea.",
            OutputType::String,
        )
        .with_input(ToolInput::required(
            "category",
            InputKind::String,
            "The type of superhero party (e.g., 'classic heroes', 'villain masquerade', 'futuristic Gotham').",
        ));
        Self { spec }
    }
}

impl Default for SuperheroThemeTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for SuperheroThemeTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    fn invoke(&self, args: &Value) -> Result<ToolOutput> {
        let category = str_arg(args, "category")?;
        Ok(party::superhero_theme(category).into())
    }
}

/// Estimates cargo plane travel time between two points.
pub struct CargoTravelTimeTool {
    spec: ToolSpec,
    default_speed_kmh: f64,
}

impl CargoTravelTimeTool {
    pub fn new(default_speed_kmh: f64) -> Self {
        let spec = ToolSpec::new(
            "calculate_cargo_travel_time",
            "Calculate the travel time for a cargo plane between two points on Earth \
            using great-circle distance. Returns the estimated travel time in hours.",
            OutputType::Number,
        )
        .with_input(ToolInput::required(
            "origin_coords",
            InputKind::Array,
            "Tuple of (latitude, longitude) for the starting point",
        ))
        .with_input(ToolInput::required(
            "destination_coords",
            InputKind::Array,
            "Tuple of (latitude, longitude) for the destination",
        ))
        .with_input(ToolInput::optional(
            "cruising_speed_kmh",
            InputKind::Number,
            &format!(
                "Cruising speed in km/h (defaults to {} km/h for typical cargo planes)",
                default_speed_kmh
            ),
        ));
        Self {
            spec,
            default_speed_kmh,
        }
    }
}

impl Tool for CargoTravelTimeTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    fn invoke(&self, args: &Value) -> Result<ToolOutput> {
        let origin = coord_arg(args, "origin_coords")?;
        let destination = coord_arg(args, "destination_coords")?;
        let speed = opt_f64_arg(args, "cruising_speed_kmh").unwrap_or(self.default_speed_kmh);

        Ok(estimate_travel_hours(origin, destination, speed)?.into())
    }
}

/// BM25 search over the party-planning knowledge base.
pub struct PartyRetrieverTool {
    spec: ToolSpec,
    retriever: Arc<PartyRetriever>,
}

impl PartyRetrieverTool {
    pub fn new(retriever: Arc<PartyRetriever>) -> Self {
        let spec = ToolSpec::new(
            "party_planning_retriever",
            "Uses keyword search to retrieve relevant party planning ideas for \
            Alfred's superhero-themed party at Wayne Manor.",
            OutputType::String,
        )
        .with_input(ToolInput::required(
            "query",
            InputKind::String,
            "The query to perform. This should be a query related to party planning or superhero themes.",
        ));
        Self { spec, retriever }
    }
}

impl Tool for PartyRetrieverTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    fn invoke(&self, args: &Value) -> Result<ToolOutput> {
        let query = str_arg(args, "query")?;
        Ok(format_ideas(&self.retriever.retrieve(query)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetrievalSettings;
    use crate::error::AlfredError;
    use serde_json::json;

    #[test]
    fn test_suggest_menu_tool() {
        let tool = SuggestMenuTool::new();
        let out = tool.invoke(&json!({"occasion": "formal"})).unwrap();
        assert_eq!(out.as_text(), Some("3-course dinner with wine and dessert."));
        let out = tool.invoke(&json!({"occasion": "birthday"})).unwrap();
        assert_eq!(out.as_text(), Some("Custom menu for the butler."));
    }

    #[test]
    fn test_list_occasions_tool() {
        let out = ListOccasionsTool::new().invoke(&Value::Null).unwrap();
        assert_eq!(out.as_text(), Some("casual, formal, superhero, custom"));
    }

    #[test]
    fn test_catering_tool() {
        let tool = CateringServiceTool::new();
        assert_eq!(
            tool.invoke(&json!({})).unwrap().as_text(),
            Some("Gotham Catering Co.")
        );
        assert_eq!(
            tool.invoke(&json!({"query": "Wayne"})).unwrap().as_text(),
            Some("Wayne Manor Catering")
        );
    }

    #[test]
    fn test_theme_tool() {
        let out = SuperheroThemeTool::new()
            .invoke(&json!({"category": "Villain Masquerade"}))
            .unwrap();
        assert!(out.as_text().unwrap().contains("Gotham Rogues' Ball"));
    }

    #[test]
    fn test_travel_tool_default_speed() {
        let tool = CargoTravelTimeTool::new(750.0);
        let out = tool
            .invoke(&json!({
                "origin_coords": [41.878, -87.629],
                "destination_coords": [-33.868, 151.209]
            }))
            .unwrap();
        assert_eq!(out.as_number(), Some(22.82));
    }

    #[test]
    fn test_travel_tool_rejects_zero_speed() {
        let tool = CargoTravelTimeTool::new(750.0);
        let err = tool
            .invoke(&json!({
                "origin_coords": [0.0, 0.0],
                "destination_coords": [10.0, 10.0],
                "cruising_speed_kmh": 0
            }))
            .unwrap_err();
        assert!(matches!(err, AlfredError::InvalidInput(_)));
    }

    #[test]
    fn test_travel_tool_rejects_bad_coordinates() {
        let tool = CargoTravelTimeTool::new(750.0);
        assert!(tool
            .invoke(&json!({
                "origin_coords": [91.0, 0.0],
                "destination_coords": [10.0, 10.0]
            }))
            .is_err());
        assert!(tool
            .invoke(&json!({
                "origin_coords": [1.0],
                "destination_coords": [10.0, 10.0]
            }))
            .is_err());
    }

    #[test]
    fn test_retriever_tool() {
        let retriever = PartyRetriever::new(&RetrievalSettings::default()).unwrap();
        let tool = PartyRetrieverTool::new(Arc::new(retriever));
        let out = tool
            .invoke(&json!({"query": "Radio-friendly superhero entertainment ideas"}))
            .unwrap();
        let text = out.as_text().unwrap();
        assert!(text.starts_with("Retrieved ideas:"));
        assert_eq!(text.matches("===== Idea").count(), 5);
    }
}
