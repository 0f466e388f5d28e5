use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolChoice {
    Auto,
    Any,
    None,
    Tool { name: String },
}

/// A tool definition offered to the model. The input schema is plain JSON
/// Schema; see [`InputSchema`] for a typed way to build one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl Tool {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: serde_json::json!({"type": "object", "properties": {}}),
        }
    }

    pub fn with_schema(mut self, schema: impl Into<serde_json::Value>) -> Self {
        self.input_schema = schema.into();
        self
    }

    /// Derive the input schema from a Rust type.
    pub fn with_schema_of<T: schemars::JsonSchema>(mut self) -> Self {
        self.input_schema =
            serde_json::to_value(schemars::schema_for!(T)).unwrap_or_default();
        self
    }
}

/// Typed builder for the common `{"type": "object", ...}` input schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputSchema {
    pub r#type: String,
    pub properties: BTreeMap<String, Property>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl InputSchema {
    pub fn object() -> Self {
        Self {
            r#type: "object".to_string(),
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }

    pub fn property(mut self, name: impl Into<String>, property: Property) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    pub fn require(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }
}

impl From<InputSchema> for serde_json::Value {
    fn from(schema: InputSchema) -> Self {
        serde_json::to_value(schema).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Property {
    pub r#type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "enum",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub enum_values: Option<Vec<String>>,
}

impl Property {
    pub fn new(r#type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            r#type: r#type.into(),
            description: Some(description.into()),
            enum_values: None,
        }
    }

    pub fn string(description: impl Into<String>) -> Self {
        Self::new("string", description)
    }

    pub fn number(description: impl Into<String>) -> Self {
        Self::new("number", description)
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self::new("integer", description)
    }

    pub fn boolean(description: impl Into<String>) -> Self {
        Self::new("boolean", description)
    }

    /// A string property constrained to a fixed set of values.
    pub fn enumerated<I, S>(description: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            r#type: "string".to_string(),
            description: Some(description.into()),
            enum_values: Some(values.into_iter().map(Into::into).collect()),
        }
    }
}

/// A structured function-call request made by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolUse {
    pub id: String,
    pub name: String,
    pub input: serde_json::Value,
}

impl ToolUse {
    pub fn new(id: String, name: String, input: serde_json::Value) -> Self {
        Self { id, name, input }
    }
}

impl fmt::Display for ToolUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ToolUse(id: {}, name: {})", self.id, self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolResult {
    pub tool_use_id: String,
    pub content: Vec<ToolResultContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolResultContent {
    Text { text: String },
    Image { source: crate::message::ImageSource },
}

impl ToolResult {
    pub fn new(tool_use_id: String, content: Vec<ToolResultContent>) -> Self {
        Self {
            tool_use_id,
            content,
            is_error: None,
        }
    }

    pub fn text(tool_use_id: String, text: String) -> Self {
        Self {
            tool_use_id,
            content: vec![ToolResultContent::Text { text }],
            is_error: None,
        }
    }

    pub fn error(tool_use_id: String, error: String) -> Self {
        Self {
            tool_use_id,
            content: vec![ToolResultContent::Text { text: error }],
            is_error: Some(true),
        }
    }
}

impl fmt::Display for ToolResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ToolResult(id: {})", self.tool_use_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_schema_builder_produces_object_schema() {
        let schema = InputSchema::object()
            .property("city", Property::string("City name"))
            .property(
                "unit",
                Property::enumerated("Temperature unit", ["celsius", "fahrenheit"]),
            )
            .require("city");

        let value: serde_json::Value = schema.into();
        assert_eq!(value["type"], "object");
        assert_eq!(value["properties"]["city"]["type"], "string");
        assert_eq!(
            value["properties"]["unit"]["enum"],
            serde_json::json!(["celsius", "fahrenheit"])
        );
        assert_eq!(value["required"], serde_json::json!(["city"]));
    }

    #[test]
    fn tool_serializes_with_schema() {
        let tool = Tool::new("get_weather", "Get the current weather").with_schema(
            InputSchema::object()
                .property("city", Property::string("City name"))
                .require("city"),
        );

        let json = serde_json::to_value(&tool).unwrap();
        assert_eq!(json["name"], "get_weather");
        assert_eq!(json["input_schema"]["required"][0], "city");
    }

    #[test]
    fn tool_schema_from_rust_type() {
        #[derive(schemars::JsonSchema)]
        #[allow(dead_code)]
        struct AddInput {
            a: i64,
            b: i64,
        }

        let tool = Tool::new("add", "Add two integers").with_schema_of::<AddInput>();
        let properties = &tool.input_schema["properties"];
        assert!(properties.get("a").is_some());
        assert!(properties.get("b").is_some());
    }

    #[test]
    fn tool_choice_serializes_by_type_tag() {
        assert_eq!(
            serde_json::to_string(&ToolChoice::Auto).unwrap(),
            r#"{"type":"auto"}"#
        );
        assert_eq!(
            serde_json::to_string(&ToolChoice::None).unwrap(),
            r#"{"type":"none"}"#
        );
        assert_eq!(
            serde_json::to_string(&ToolChoice::Tool {
                name: "calculator".to_string()
            })
            .unwrap(),
            r#"{"type":"tool","name":"calculator"}"#
        );
    }

    #[test]
    fn tool_result_error_sets_flag() {
        let result = ToolResult::error("toolu_1".to_string(), "boom".to_string());
        assert_eq!(result.is_error, Some(true));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][0]["text"], "boom");
    }
}
