//! Unresolved reference audit.
//!
//! Rendering never fails on a dangling `$ref`: the placeholder is emitted
//! anyway and the documentation site shows it as a plain link. This pass
//! finds those references afterwards so someone can fix the schemas.
//!
//! Two sources are checked: `$ref` nodes anywhere in the schema tree, and
//! cross-reference placeholders produced from `$(ref:…)` in descriptions.
use std::collections::HashSet;
use std::fmt;

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::ir::{Namespace, Parameter, TypeKind, TypeSchema};
use crate::render::markup;

static XREF: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\{\{WebExtAPIRef\("([^"]+)""#).expect("static regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub namespace: String,
    pub entity: String,
    /// Qualified target (`ns.Name`).
    pub target: String,
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} refers to unknown {}", self.namespace, self.entity, self.target)
    }
}

/// Every documented name of a run, qualified: `ns` and `ns.Entity`.
#[derive(Debug, Default)]
pub struct Catalog {
    names: HashSet<String>,
}

impl Catalog {
    pub fn new<'a>(namespaces: impl IntoIterator<Item = &'a Namespace>) -> Self {
        let mut names = HashSet::new();
        for ns in namespaces {
            let q = |name: &str| format!("{}.{name}", ns.name);
            names.insert(ns.name.clone());
            names.extend(ns.types.iter().map(|t| q(&t.id)));
            names.extend(ns.functions.iter().map(|f| q(&f.name)));
            names.extend(ns.properties.keys().map(|p| q(p)));
            names.extend(ns.events.iter().map(|e| q(&e.name)));
        }
        Self { names }
    }

    /// `ns.create()` resolves like `ns.create`.
    pub fn contains(&self, qualified: &str) -> bool {
        let name = qualified.strip_suffix("()").unwrap_or(qualified);
        self.names.contains(name)
    }
}

/// Unresolved references of one namespace, in entity declaration order.
/// A target is reported once per entity.
pub fn audit_namespace(catalog: &Catalog, ns: &Namespace) -> Vec<UnresolvedReference> {
    let mut found = Vec::new();
    let mut check = |entity: &str, targets: IndexSet<String>| {
        for target in targets {
            if !catalog.contains(&target) {
                warn!(namespace = %ns.name, entity, %target, "unresolved reference");
                found.push(UnresolvedReference {
                    namespace: ns.name.clone(),
                    entity: entity.to_string(),
                    target,
                });
            }
        }
    };

    for f in &ns.functions {
        let mut refs = Refs::new(&ns.name);
        refs.text(f.description.as_deref());
        refs.parameters(&f.parameters);
        if let Some(returns) = &f.returns {
            refs.node(returns);
        }
        check(&f.name, refs.targets);
    }
    for p in ns.properties.values() {
        let mut refs = Refs::new(&ns.name);
        refs.text(p.description.as_deref());
        refs.node(&p.schema);
        check(&p.name, refs.targets);
    }
    for t in &ns.types {
        let mut refs = Refs::new(&ns.name);
        refs.node(&t.schema);
        check(&t.id, refs.targets);
    }
    for e in &ns.events {
        let mut refs = Refs::new(&ns.name);
        refs.text(e.description.as_deref());
        refs.parameters(&e.parameters);
        refs.parameters(&e.extra_parameters);
        if let Some(returns) = &e.returns {
            refs.node(returns);
        }
        check(&e.name, refs.targets);
    }
    found
}

/// Qualified reference targets collected from one entity.
struct Refs<'a> {
    namespace: &'a str,
    targets: IndexSet<String>,
}

impl<'a> Refs<'a> {
    fn new(namespace: &'a str) -> Self {
        Self { namespace, targets: IndexSet::new() }
    }

    fn text(&mut self, text: Option<&str>) {
        let Some(text) = text else { return };
        for cap in XREF.captures_iter(text) {
            self.targets.insert(cap[1].to_string());
        }
    }

    fn parameters(&mut self, parameters: &[Parameter]) {
        for p in parameters {
            self.node(&p.schema);
        }
    }

    fn node(&mut self, node: &TypeSchema) {
        self.text(node.description.as_deref());
        match &node.kind {
            TypeKind::Reference { target } => {
                self.targets.insert(markup::qualify(self.namespace, target));
            }
            TypeKind::Array { items } => self.node(items),
            TypeKind::Object { properties } => {
                for child in properties.values() {
                    self.node(child);
                }
            }
            TypeKind::Union { choices } => {
                for choice in choices {
                    self.node(choice);
                }
            }
            TypeKind::Function { parameters, returns } => {
                self.parameters(parameters);
                if let Some(returns) = returns {
                    self.node(returns);
                }
            }
            TypeKind::Primitive { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{FunctionSchema, TypeDefinition};
    use std::sync::Arc;

    fn tabs() -> Namespace {
        let mut ns = Namespace::new("tabs", "tabs");
        ns.types.push(TypeDefinition {
            id: "Tab".into(),
            schema: Arc::new(TypeSchema::object([
                ("id", TypeSchema::primitive("integer")),
                ("mutedInfo", TypeSchema::reference("MutedInfo")),
            ])),
        });
        ns.functions.push(FunctionSchema {
            name: "get".into(),
            description: Some(r#"See {{WebExtAPIRef("tabs.query")}}."#.into()),
            parameters: vec![
                Parameter::new("tabId", TypeSchema::primitive("integer")),
                Parameter::new(
                    "callback",
                    TypeSchema::function(vec![
                        Parameter::new("tab", TypeSchema::reference("Tab")),
                        Parameter::new("port", TypeSchema::reference("runtime.Port")),
                    ]),
                ),
            ],
            returns: None,
        });
        ns
    }

    #[test]
    fn reports_dangling_refs_only() {
        let ns = tabs();
        let catalog = Catalog::new([&ns]);
        let found = audit_namespace(&catalog, &ns);
        let targets: Vec<_> = found.iter().map(|u| (u.entity.as_str(), u.target.as_str())).collect();
        assert_eq!(targets, [("get", "tabs.query"), ("get", "runtime.Port"), ("Tab", "tabs.MutedInfo")]);
    }

    #[test]
    fn other_namespaces_of_the_run_resolve() {
        let tabs = tabs();
        let mut runtime = Namespace::new("runtime", "runtime");
        runtime.types.push(TypeDefinition { id: "Port".into(), schema: Arc::new(TypeSchema::object(Vec::<(String, TypeSchema)>::new())) });
        let catalog = Catalog::new([&tabs, &runtime]);
        let found = audit_namespace(&catalog, &tabs);
        assert!(found.iter().all(|u| u.target != "runtime.Port"));
    }

    #[test]
    fn function_call_targets_resolve() {
        let mut ns = tabs();
        ns.functions.push(FunctionSchema { name: "query".into(), description: None, parameters: vec![], returns: None });
        let catalog = Catalog::new([&ns]);
        assert!(catalog.contains("tabs.query()"));
        assert!(audit_namespace(&catalog, &ns).iter().all(|u| u.target != "tabs.query"));
    }

    #[test]
    fn display_names_source_and_target() {
        let u = UnresolvedReference { namespace: "tabs".into(), entity: "get".into(), target: "tabs.Nope".into() };
        assert_eq!(u.to_string(), "tabs.get refers to unknown tabs.Nope");
    }
}
