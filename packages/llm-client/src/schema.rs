//! JSON schemas for OpenAI strict structured output.
//!
//! Strict mode rejects `$ref`, wants `additionalProperties: false` on every
//! object and every property listed in `required` (optional fields stay
//! nullable through their type). [`StructuredOutput::strict_schema`] rewrites
//! a `schemars` schema into that shape.

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Types that can be requested as strict structured output.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Strict-mode schema for this type.
    fn strict_schema() -> Value {
        let root = serde_json::to_value(schema_for!(Self)).unwrap_or_default();
        let definitions = root
            .get("definitions")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let mut schema = resolve(root, &definitions);
        if let Value::Object(map) = &mut schema {
            map.remove("definitions");
            map.remove("$schema");
        }
        schema
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// Inline references and tighten object schemas in a single pass.
fn resolve(value: Value, definitions: &Map<String, Value>) -> Value {
    match value {
        Value::Object(map) => {
            if let Some(target) = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix("#/definitions/"))
                .and_then(|name| definitions.get(name))
            {
                return resolve(target.clone(), definitions);
            }

            let mut out: Map<String, Value> = map
                .into_iter()
                .filter(|(k, _)| k != "definitions")
                .map(|(k, v)| (k, resolve(v, definitions)))
                .collect();

            if out.get("type").and_then(Value::as_str) == Some("object") {
                let required: Vec<Value> = out
                    .get("properties")
                    .and_then(Value::as_object)
                    .map(|props| props.keys().cloned().map(Value::String).collect())
                    .unwrap_or_default();
                out.insert("required".into(), Value::Array(required));
                out.insert("additionalProperties".into(), Value::Bool(false));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| resolve(item, definitions))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct Citation {
        name: String,
        url: Option<String>,
    }

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct Verdict {
        status: String,
        confidence: Option<f64>,
        citations: Vec<Citation>,
    }

    #[test]
    fn test_root_has_no_definitions_or_meta_schema() {
        let schema = Verdict::strict_schema();
        let obj = schema.as_object().unwrap();
        assert!(!obj.contains_key("definitions"));
        assert!(!obj.contains_key("$schema"));
        assert_eq!(obj["additionalProperties"], Value::Bool(false));
    }

    #[test]
    fn test_optional_fields_are_required() {
        let schema = Verdict::strict_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(required.contains(&"status"));
        assert!(required.contains(&"confidence"));
        assert!(required.contains(&"citations"));
    }

    #[test]
    fn test_nested_refs_are_inlined() {
        let schema = Verdict::strict_schema();
        let rendered = serde_json::to_string(&schema).unwrap();
        assert!(!rendered.contains("$ref"));

        let item = &schema["properties"]["citations"]["items"];
        assert_eq!(item["type"], "object");
        assert_eq!(item["additionalProperties"], Value::Bool(false));
        let required: Vec<&str> = item["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(required.len(), 2);
        assert!(required.contains(&"url"));
    }
}
