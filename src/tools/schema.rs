//! Tool descriptors and their parameter schemas.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Value shapes a parameter may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    /// JSON object, optionally restricted to a fixed set of string fields.
    Object,
    /// Network title (string) or SUID (integer).
    Network,
    StringList,
    /// Node names or SUIDs.
    IdentifierList,
    /// `[source, target]` or `[source, target, interaction]` string arrays.
    EdgeList,
}

impl ParamType {
    /// Short phrase used in validation messages.
    pub fn describe(self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Integer => "an integer",
            Self::Number => "a number",
            Self::Boolean => "a boolean",
            Self::Object => "an object",
            Self::Network => "a network title or SUID",
            Self::StringList => "an array of strings",
            Self::IdentifierList => "an array of names or SUIDs",
            Self::EdgeList => "an array of edges",
        }
    }

    fn json_schema(self) -> Value {
        match self {
            Self::String => json!({ "type": "string" }),
            Self::Integer => json!({ "type": "integer" }),
            Self::Number => json!({ "type": "number" }),
            Self::Boolean => json!({ "type": "boolean" }),
            Self::Object => json!({ "type": "object" }),
            Self::Network => json!({ "type": ["string", "integer"] }),
            Self::StringList => json!({ "type": "array", "items": { "type": "string" } }),
            Self::IdentifierList => {
                json!({ "type": "array", "items": { "type": ["string", "integer"] } })
            }
            Self::EdgeList => json!({
                "type": "array",
                "items": {
                    "type": "array",
                    "items": { "type": "string" },
                    "minItems": 2,
                    "maxItems": 3
                }
            }),
        }
    }
}

/// One declared parameter of a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamType,
    pub description: &'static str,
    pub required: bool,
    pub default: Option<Value>,
    pub allowed: Option<&'static [&'static str]>,
    pub range: Option<(f64, f64)>,
    /// Accepted keys for an `Object` parameter; every value must be a string.
    pub fields: Option<&'static [&'static str]>,
    /// Strings must not be blank, arrays must not be empty.
    pub non_empty: bool,
}

impl ParamSpec {
    pub fn required(name: &'static str, kind: ParamType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: true,
            default: None,
            allowed: None,
            range: None,
            fields: None,
            non_empty: false,
        }
    }

    pub fn optional(name: &'static str, kind: ParamType, description: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind, description)
        }
    }

    pub fn default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = Some(allowed);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    pub fn fields(mut self, fields: &'static [&'static str]) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    fn json_schema(&self) -> Value {
        let mut schema = self.kind.json_schema();
        let Some(obj) = schema.as_object_mut() else {
            return schema;
        };
        obj.insert("description".into(), json!(self.description));
        if let Some(default) = &self.default {
            obj.insert("default".into(), default.clone());
        }
        if let Some(allowed) = self.allowed {
            obj.insert("enum".into(), json!(allowed));
        }
        if let Some((min, max)) = self.range {
            obj.insert("minimum".into(), json!(min));
            obj.insert("maximum".into(), json!(max));
        }
        if let Some(fields) = self.fields {
            let props: Map<String, Value> = fields
                .iter()
                .map(|f| (f.to_string(), json!({ "type": "string" })))
                .collect();
            obj.insert("properties".into(), Value::Object(props));
            obj.insert("additionalProperties".into(), json!(false));
        }
        if self.non_empty {
            match self.kind {
                ParamType::String => obj.insert("minLength".into(), json!(1)),
                _ => obj.insert("minItems".into(), json!(1)),
            };
        }
        schema
    }
}

/// Name, description and parameters of one tool. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
}

impl ToolDescriptor {
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// JSON Schema object for the tool's arguments.
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.to_string(), p.json_schema()))
            .collect();
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Definition of a tool as listed to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}
