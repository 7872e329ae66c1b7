use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use strum::{Display, EnumString};

/// Declared type of a tool parameter
///
/// Spelled the JSON Schema way; adapters whose vendor uses a different
/// spelling map it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ToolParameterType {
    /// UTF-8 string
    String,
    /// Whole number
    Integer,
    /// Floating point number
    Number,
    /// `true` or `false`
    Boolean,
    /// JSON array
    Array,
    /// JSON object
    Object,
}

/// A single named parameter of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name as the model must spell it
    pub name: String,
    /// Human-readable description shown to the model
    pub description: String,
    /// Declared type
    #[serde(rename = "type")]
    pub param_type: ToolParameterType,
    /// Whether the model must always supply this parameter
    pub required: bool,
    /// Closed set of allowed values
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// Value assumed when the parameter is omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ToolParameter {
    /// Create a required parameter
    pub fn new(name: impl Into<String>, description: impl Into<String>, param_type: ToolParameterType) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            param_type,
            required: true,
            enum_values: None,
            default: None,
        }
    }

    /// Mark the parameter as optional
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Restrict the parameter to a closed set of values
    #[must_use]
    pub fn with_enum<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Give the parameter a default value
    ///
    /// A parameter with a default is never required.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self.required = false;
        self
    }

    /// JSON Schema fragment describing this parameter
    pub fn json_schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".to_owned(), Value::String(self.param_type.to_string()));
        schema.insert("description".to_owned(), Value::String(self.description.clone()));
        if let Some(values) = &self.enum_values {
            schema.insert("enum".to_owned(), Value::Array(values.clone()));
        }
        if let Some(default) = &self.default {
            schema.insert("default".to_owned(), default.clone());
        }
        Value::Object(schema)
    }
}

/// Name, description and parameters of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool name
    pub name: String,
    /// What the tool does, written for the model
    pub description: String,
    /// Ordered parameter list
    #[serde(default)]
    pub parameters: Vec<ToolParameter>,
}

impl ToolSchema {
    /// Create a schema with no parameters
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    /// Append a parameter
    #[must_use]
    pub fn with_parameter(mut self, parameter: ToolParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Names of all required parameters, in declaration order
    pub fn required_names(&self) -> Vec<String> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.clone())
            .collect()
    }

    /// Whether every declared parameter is required
    pub fn all_required(&self) -> bool {
        self.parameters.iter().all(|p| p.required)
    }

    /// JSON Schema `object` describing the parameter list
    ///
    /// Used as-is by vendors that accept JSON Schema for tool input.
    pub fn json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.json_schema()))
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required_names(),
        })
    }
}
