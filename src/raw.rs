//! Permissive serde shapes of the on-disk schema format.
//!
//! Everything is optional here; [`crate::lower`] decides what is required and
//! what combination of tags makes a valid node. Entity bodies stay as
//! `serde_json::Value` at the namespace level so one broken entity never
//! prevents its siblings from loading.
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Number, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct RawNamespace {
    pub namespace: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub functions: Vec<Value>,
    #[serde(default)]
    pub properties: IndexMap<String, Value>,
    #[serde(default)]
    pub types: Vec<Value>,
    #[serde(default)]
    pub events: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawType {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    #[serde(rename = "$ref")]
    pub ref_: Option<String>,
    pub choices: Option<Vec<RawType>>,
    pub items: Option<Box<RawType>>,
    pub properties: Option<IndexMap<String, RawType>>,
    pub parameters: Option<Vec<RawType>>,
    pub extra_parameters: Option<Vec<RawType>>,
    pub returns: Option<Box<RawType>>,
    #[serde(rename = "enum")]
    pub enum_: Option<Vec<RawEnumValue>>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    #[serde(default)]
    pub optional: bool,
    pub description: Option<String>,
    /// Constant value of a property; stands in for `type` when absent.
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawEnumValue {
    Bare(String),
    Described {
        name: String,
        #[serde(default)]
        description: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_values_accept_both_shapes() {
        let raw: RawType = serde_json::from_value(serde_json::json!({
            "type": "string",
            "enum": ["a", {"name": "b", "description": "the b"}]
        }))
        .unwrap();
        let values = raw.enum_.unwrap();
        assert!(matches!(&values[0], RawEnumValue::Bare(s) if s == "a"));
        assert!(matches!(&values[1], RawEnumValue::Described { name, description: Some(d) } if name == "b" && d == "the b"));
    }

    #[test]
    fn namespace_collections_default_to_empty() {
        let ns: RawNamespace = serde_json::from_value(serde_json::json!({"namespace": "idle"})).unwrap();
        assert!(ns.functions.is_empty() && ns.types.is_empty() && ns.events.is_empty());
        assert!(ns.properties.is_empty());
    }

    #[test]
    fn properties_keep_declaration_order() {
        let raw: RawType = serde_json::from_str(
            r#"{"type": "object", "properties": {"z": {"type": "string"}, "a": {"type": "integer"}}}"#,
        )
        .unwrap();
        let keys: Vec<_> = raw.properties.unwrap().keys().cloned().collect();
        assert_eq!(keys, ["z", "a"]);
    }
}
