//! Farm lookup tools the agent can call.
//!
//! The tool set is closed: every tool is a [`FarmTool`] variant and dispatch is
//! an exhaustive `match`. A model asking for any other name is a schema drift
//! between the declarations we sent and what came back, and is reported as
//! [`ToolError::UnknownTool`].

mod academy;
mod inventory;

pub use academy::get_academy_schedule;
pub use inventory::check_inventory;

use serde_json::{json, Value};
use thiserror::Error;

use crate::llm::ToolSchema;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Missing '{0}' argument")]
    MissingArgument(&'static str),
}

/// Name and description of a registered tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Every tool the agent knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FarmTool {
    CheckInventory,
    AcademySchedule,
}

impl FarmTool {
    pub const ALL: [FarmTool; 2] = [FarmTool::CheckInventory, FarmTool::AcademySchedule];

    pub fn name(self) -> &'static str {
        match self {
            FarmTool::CheckInventory => "check_inventory",
            FarmTool::AcademySchedule => "get_academy_schedule",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FarmTool::CheckInventory => {
                "Checks if a specific honey product is in stock. Use for queries about availability."
            }
            FarmTool::AcademySchedule => {
                "Fetches upcoming dates and prices for Hands-On Training Academy courses."
            }
        }
    }

    /// The single string parameter: (name, description).
    fn parameter(self) -> (&'static str, &'static str) {
        match self {
            FarmTool::CheckInventory => (
                "product_name",
                "Name of the honey product, e.g. \"comb honey\" or \"moringa honey\"",
            ),
            FarmTool::AcademySchedule => (
                "course_type",
                "Kind of course, e.g. \"basic beekeeping\" or \"commercial apiculture\"",
            ),
        }
    }

    pub fn parameters_schema(self) -> Value {
        let (param, description) = self.parameter();
        json!({
            "type": "object",
            "properties": {
                param: {
                    "type": "string",
                    "description": description
                }
            },
            "required": [param]
        })
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Run the tool against a model-supplied arguments object.
    pub fn execute(self, args: &Value) -> Result<String, ToolError> {
        let (param, _) = self.parameter();
        let value = args
            .get(param)
            .and_then(|v| v.as_str())
            .ok_or(ToolError::MissingArgument(param))?;

        Ok(match self {
            FarmTool::CheckInventory => check_inventory(value),
            FarmTool::AcademySchedule => get_academy_schedule(value),
        })
    }
}

/// The set of tools offered to the model.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<FarmTool>,
}

impl ToolRegistry {
    /// Registry with every farm tool enabled.
    pub fn new() -> Self {
        Self::with_tools(FarmTool::ALL.to_vec())
    }

    /// Registry restricted to the given tools.
    pub fn with_tools(tools: Vec<FarmTool>) -> Self {
        Self { tools }
    }

    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|t| ToolInfo {
                name: t.name(),
                description: t.description(),
            })
            .collect()
    }

    pub fn get_tool_schemas(&self) -> Vec<ToolSchema> {
        self.tools
            .iter()
            .map(|t| ToolSchema {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters_schema(),
            })
            .collect()
    }

    /// Map a model-requested name onto a registered tool.
    pub fn resolve(&self, name: &str) -> Result<FarmTool, ToolError> {
        FarmTool::from_name(name)
            .filter(|t| self.tools.contains(t))
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }

    /// Resolve and run a tool by name.
    pub fn execute(&self, name: &str, args: &Value) -> Result<String, ToolError> {
        let tool = self.resolve(name)?;
        tracing::debug!(tool = tool.name(), "Executing tool");
        tool.execute(args)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lists_both_tools() {
        let registry = ToolRegistry::new();
        let names: Vec<_> = registry.list_tools().iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["check_inventory", "get_academy_schedule"]);
    }

    #[test]
    fn schemas_declare_one_required_string_parameter() {
        let schemas = ToolRegistry::new().get_tool_schemas();
        assert_eq!(schemas.len(), 2);

        let inventory = &schemas[0];
        assert_eq!(inventory.parameters["required"], json!(["product_name"]));
        assert_eq!(
            inventory.parameters["properties"]["product_name"]["type"],
            "string"
        );

        let academy = &schemas[1];
        assert_eq!(academy.parameters["required"], json!(["course_type"]));
    }

    #[test]
    fn names_round_trip_through_from_name() {
        for tool in FarmTool::ALL {
            assert_eq!(FarmTool::from_name(tool.name()), Some(tool));
        }
        assert_eq!(FarmTool::from_name("CHECK_INVENTORY"), None);
    }

    #[test]
    fn resolve_rejects_unknown_and_disabled_tools() {
        let registry = ToolRegistry::with_tools(vec![FarmTool::CheckInventory]);
        assert_eq!(registry.resolve("check_inventory"), Ok(FarmTool::CheckInventory));
        assert_eq!(
            registry.resolve("get_academy_schedule"),
            Err(ToolError::UnknownTool("get_academy_schedule".to_string()))
        );
        assert_eq!(
            registry.resolve("delete_hive"),
            Err(ToolError::UnknownTool("delete_hive".to_string()))
        );
    }

    #[test]
    fn execute_dispatches_by_name() {
        let registry = ToolRegistry::new();
        let out = registry
            .execute("check_inventory", &json!({"product_name": "Comb"}))
            .unwrap();
        assert_eq!(out, "We have 10 jars of raw Comb Honey in stock.");

        let out = registry
            .execute("get_academy_schedule", &json!({"course_type": "commercial"}))
            .unwrap();
        assert!(out.contains("April 1st"));
    }

    #[test]
    fn missing_argument_is_reported() {
        let registry = ToolRegistry::new();
        let err = registry
            .execute("check_inventory", &json!({"product": "comb"}))
            .unwrap_err();
        assert_eq!(err, ToolError::MissingArgument("product_name"));
        assert_eq!(err.to_string(), "Missing 'product_name' argument");

        let err = registry
            .execute("get_academy_schedule", &json!({"course_type": 3}))
            .unwrap_err();
        assert_eq!(err, ToolError::MissingArgument("course_type"));
    }
}
