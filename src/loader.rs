//! Schema Loader: source text → ordered [`SchemaDocument`].
use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{EntityFailure, Error, Result};
use crate::ir::{EntityKind, Namespace, SchemaDocument};
use crate::lower::Lowerer;
use crate::path_de;
use crate::preprocess::{self, ReferenceRewriter};
use crate::raw::{RawNamespace, RawType};

/// A document plus the entities that could not be lowered.
#[derive(Debug)]
pub struct LoadedDocument {
    pub document: SchemaDocument,
    pub failures: Vec<EntityFailure>,
}

#[derive(Debug, Clone)]
pub struct SchemaLoader {
    rewriter: ReferenceRewriter,
}

impl SchemaLoader {
    pub fn new(rewriter: ReferenceRewriter) -> Self {
        Self { rewriter }
    }

    /// Loads `<dir>/<source_name>.json`.
    pub fn load_file(&self, path: &Path) -> Result<LoadedDocument> {
        let source_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Config(format!("not a file path: {}", path.display())))?;
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        debug!(path = %path.display(), "loading schema document");
        self.load_str(&text, &source_name)
    }

    /// Whole-document problems (bad JSON, duplicate namespaces) are errors;
    /// problems inside one entity are recorded and the entity is skipped.
    pub fn load_str(&self, text: &str, source_name: &str) -> Result<LoadedDocument> {
        let text = preprocess::strip_comments(text);
        let raw: Vec<RawNamespace> = path_de::from_str_with_path(&text)?;

        let mut seen = HashSet::new();
        for ns in &raw {
            if !seen.insert(ns.namespace.as_str()) {
                return Err(Error::DuplicateNamespace { name: ns.namespace.clone() });
            }
        }

        let mut failures = Vec::new();
        let namespaces = raw
            .into_iter()
            .map(|ns| self.lower_namespace(ns, source_name, &mut failures))
            .collect();

        Ok(LoadedDocument {
            document: SchemaDocument { source_name: source_name.to_string(), namespaces },
            failures,
        })
    }

    fn lower_namespace(
        &self,
        raw: RawNamespace,
        source_name: &str,
        failures: &mut Vec<EntityFailure>,
    ) -> Namespace {
        let name = raw.namespace;
        let lowerer = Lowerer::new(&name, &self.rewriter);
        let mut ns = Namespace::new(name.clone(), source_name);
        ns.description = raw.description.map(|d| self.rewriter.rewrite(&d, &name).into_owned());

        let mut record = |kind: EntityKind, entity: String, error: Error| {
            warn!(namespace = %name, %kind, %entity, %error, "skipping entity");
            failures.push(EntityFailure { namespace: name.clone(), kind, entity, error });
        };

        for (i, value) in raw.functions.into_iter().enumerate() {
            let path = format!("{name}.functions[{i}]");
            let entity = entity_name(&value, "name", &path);
            match parse(value, &path).and_then(|r| lowerer.function(r, &path)) {
                Ok(f) => ns.functions.push(f),
                Err(e) => record(EntityKind::Function, entity, e),
            }
        }
        for (key, value) in raw.properties {
            let path = format!("{name}.properties.{key}");
            match parse(value, &path).and_then(|r| lowerer.property(&key, r, &path)) {
                Ok(p) => {
                    ns.properties.insert(key, p);
                }
                Err(e) => record(EntityKind::Property, key, e),
            }
        }
        for (i, value) in raw.types.into_iter().enumerate() {
            let path = format!("{name}.types[{i}]");
            let entity = entity_name(&value, "id", &path);
            match parse(value, &path).and_then(|r| lowerer.type_definition(r, &path)) {
                Ok(t) => ns.types.push(t),
                Err(e) => record(EntityKind::Type, entity, e),
            }
        }
        for (i, value) in raw.events.into_iter().enumerate() {
            let path = format!("{name}.events[{i}]");
            let entity = entity_name(&value, "name", &path);
            match parse(value, &path).and_then(|r| lowerer.event(r, &path)) {
                Ok(ev) => ns.events.push(ev),
                Err(e) => record(EntityKind::Event, entity, e),
            }
        }
        ns
    }
}

fn parse(value: Value, path: &str) -> Result<RawType> {
    path_de::from_value_with_path(value, path)
}

// Best-effort label for failure reports, falling back to the JSON path.
fn entity_name(value: &Value, key: &str, path: &str) -> String {
    value.get(key).and_then(Value::as_str).map_or_else(|| path.to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::TypeKind;

    fn loader() -> SchemaLoader {
        SchemaLoader::new(ReferenceRewriter::new("https://developer.chrome.com/extensions/"))
    }

    const ALARMS: &str = r#"
// Copyright header in the source file.
[
  {
    "namespace": "alarms",
    "description": "Schedule code to run.",
    "types": [
      {"id": "Alarm", "type": "object", "properties": {"name": {"type": "string"}}}
    ],
    "functions": [
      // create() is the main entry point
      {"name": "create", "parameters": [
        {"name": "name", "type": "string", "optional": true},
        {"name": "alarmInfo", "type": "object", "properties": {
          "when": {"type": "number"},
          "periodInMinutes": {"type": "number", "optional": true}
        }}
      ]},
      {"name": "broken", "parameters": [{"name": "x", "description": "no type"}]}
    ],
    "events": [
      {"name": "onAlarm", "parameters": [{"name": "alarm", "$ref": "Alarm"}]}
    ]
  }
]
"#;

    #[test]
    fn loads_in_declaration_order_with_comments() {
        let loaded = loader().load_str(ALARMS, "alarms").unwrap();
        let ns = &loaded.document.namespaces[0];
        assert_eq!(ns.name, "alarms");
        assert_eq!(ns.source_name, "alarms");
        assert_eq!(ns.functions.len(), 1);
        assert_eq!(ns.functions[0].name, "create");
        let names: Vec<_> = ns.functions[0].parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["name", "alarmInfo"]);
        assert!(matches!(ns.events[0].parameters[0].schema.kind, TypeKind::Reference { .. }));
    }

    #[test]
    fn malformed_entity_is_skipped_and_recorded() {
        let loaded = loader().load_str(ALARMS, "alarms").unwrap();
        assert_eq!(loaded.failures.len(), 1);
        let failure = &loaded.failures[0];
        assert_eq!(failure.entity, "broken");
        assert_eq!(failure.kind, EntityKind::Function);
        assert!(matches!(
            failure.error,
            Error::MalformedSchema { ref path, .. } if path == "alarms.functions[1](broken).parameters.x"
        ));
    }

    #[test]
    fn duplicate_namespaces_are_rejected() {
        let err = loader()
            .load_str(r#"[{"namespace": "a"}, {"namespace": "a"}]"#, "a")
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateNamespace { ref name } if name == "a"));
    }

    #[test]
    fn invalid_json_reports_path() {
        let err = loader().load_str(r#"[{"namespace": 3}]"#, "x").unwrap_err();
        assert!(matches!(err, Error::Json { ref path, .. } if path == "[0].namespace"));
    }

    #[test]
    fn load_file_uses_file_stem_as_source_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("web_request.json");
        std::fs::write(&path, r#"[{"namespace": "webRequest"}]"#).unwrap();
        let loaded = loader().load_file(&path).unwrap();
        assert_eq!(loaded.document.source_name, "web_request");
        assert_eq!(loaded.document.namespaces[0].source_name, "web_request");
    }
}
