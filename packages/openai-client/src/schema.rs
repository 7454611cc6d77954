//! Type-safe schema generation for OpenAI structured outputs.
//!
//! Uses the `schemars` crate to generate JSON schemas from Rust types and
//! rewrites them into the subset OpenAI accepts in strict mode.
//!
//! # Example
//!
//! ```rust,ignore
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//! use openai_client::StructuredOutput;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Citation {
//!     title: String,
//!     url: Option<String>,
//! }
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Citations {
//!     citations: Vec<Citation>,
//! }
//!
//! let schema = Citations::openai_schema();
//! ```

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Trait for types that can be used as OpenAI structured output.
///
/// Implemented for every `JsonSchema + DeserializeOwned` type.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Generate an OpenAI strict-mode schema for this type.
    ///
    /// Strict mode requires:
    /// 1. `additionalProperties: false` on every object schema
    /// 2. every property listed in `required`, including `Option` fields,
    ///    which stay nullable through their `null` type member
    /// 3. no `$ref`; every definition inlined where it is used
    fn openai_schema() -> Value {
        let mut root = serde_json::to_value(schema_for!(Self)).unwrap_or_default();

        let definitions = match &mut root {
            Value::Object(map) => {
                map.remove("$schema");
                map.remove("definitions")
            }
            _ => None,
        };

        if let Some(Value::Object(definitions)) = definitions {
            inline_refs(&mut root, &definitions);
        }
        make_strict(&mut root);

        root
    }

    /// Schema name sent alongside the schema. OpenAI restricts the name to
    /// `[a-zA-Z0-9_-]`, so generic brackets and separators are replaced.
    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// Replace every `{"$ref": "#/definitions/X"}` with a copy of `X`.
fn inline_refs(value: &mut Value, definitions: &Map<String, Value>) {
    match value {
        Value::Object(map) => {
            let target = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix(DEFINITIONS_PREFIX))
                .and_then(|name| definitions.get(name))
                .cloned();

            if let Some(definition) = target {
                *value = definition;
                inline_refs(value, definitions);
                return;
            }

            map.values_mut().for_each(|v| inline_refs(v, definitions));
        }
        Value::Array(items) => items
            .iter_mut()
            .for_each(|v| inline_refs(v, definitions)),
        _ => {}
    }
}

/// Close every object schema and require all of its properties.
fn make_strict(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if map.get("type").and_then(Value::as_str) == Some("object") {
                let required: Vec<Value> = map
                    .get("properties")
                    .and_then(Value::as_object)
                    .map(|props| props.keys().cloned().map(Value::String).collect())
                    .unwrap_or_default();

                map.insert("additionalProperties".to_string(), Value::Bool(false));
                map.insert("required".to_string(), Value::Array(required));
            }

            map.values_mut().for_each(make_strict);
        }
        Value::Array(items) => items.iter_mut().for_each(make_strict),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    struct Citation {
        title: String,
        url: Option<String>,
    }

    #[derive(Deserialize, JsonSchema)]
    struct Citations {
        citations: Vec<Citation>,
    }

    fn required_of(schema: &Value) -> Vec<&str> {
        schema["required"]
            .as_array()
            .expect("should have required array")
            .iter()
            .filter_map(Value::as_str)
            .collect()
    }

    #[test]
    fn test_root_is_closed_object_without_meta_keys() {
        let schema = Citations::openai_schema();
        let obj = schema.as_object().unwrap();

        assert_eq!(obj.get("type"), Some(&Value::String("object".into())));
        assert_eq!(obj.get("additionalProperties"), Some(&Value::Bool(false)));
        assert!(!obj.contains_key("$schema"));
        assert!(!obj.contains_key("definitions"));
        assert_eq!(required_of(&schema), vec!["citations"]);
    }

    #[test]
    fn test_nested_item_schema_is_inlined_and_strict() {
        let schema = Citations::openai_schema();
        let item = &schema["properties"]["citations"]["items"];

        assert!(item.get("$ref").is_none(), "item should be inlined, got {item}");
        assert_eq!(item["type"], "object");
        assert_eq!(item["additionalProperties"], false);

        let mut required = required_of(item);
        required.sort_unstable();
        assert_eq!(required, vec!["title", "url"]);
    }

    #[test]
    fn test_optional_field_stays_nullable() {
        let schema = Citation::openai_schema();
        let url_type = &schema["properties"]["url"]["type"];

        let members: Vec<&str> = url_type
            .as_array()
            .expect("Option<String> should be a type union")
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(members.contains(&"string"));
        assert!(members.contains(&"null"));
    }

    #[test]
    fn test_type_name_is_sanitized() {
        assert_eq!(Citations::type_name(), "Citations");
        assert_eq!(
            <Vec<Citation> as StructuredOutput>::type_name(),
            "Array_of_Citation"
        );
    }
}
