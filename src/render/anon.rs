//! Discovery of inline (unnamed) object schemas.
//!
//! Every object reached through a named field or parameter gets its own
//! "Additional objects" subsection, titled with that name. Discovery is
//! depth-first in declaration order and de-duplicated by node identity, so
//! a node reachable through two paths is documented once.
//!
//! Titles may repeat (union branches share their field's name); anchors
//! never do. The second `target` section is anchored `target_2`, and
//! [`Anchors`] maps each recorded node to its anchor so links stay exact.
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::ir::{Parameter, TypeKind, TypeSchema};

#[derive(Debug, Clone)]
pub struct AnonymousObject {
    pub name: String,
    /// Unique within one page.
    pub anchor: String,
    pub schema: Arc<TypeSchema>,
}

/// Node identity → section anchor, for the objects of one page.
#[derive(Debug, Default, Clone)]
pub struct Anchors {
    by_node: HashMap<usize, String>,
}

impl Anchors {
    pub fn new(records: &[AnonymousObject]) -> Self {
        let by_node = records.iter().map(|r| (node_key(&r.schema), r.anchor.clone())).collect();
        Self { by_node }
    }

    pub fn get(&self, node: &TypeSchema) -> Option<&str> {
        self.by_node.get(&node_key(node)).map(String::as_str)
    }
}

fn node_key(node: &TypeSchema) -> usize {
    node as *const TypeSchema as usize
}

#[derive(Default)]
struct Collector {
    seen: HashSet<usize>,
    uses: HashMap<String, usize>,
    records: Vec<AnonymousObject>,
}

/// Inline objects nested inside the type definition `name`. The root node
/// itself is not recorded (its own page documents it) unless it is a union:
/// object branches of a union are recorded under the type's name.
pub fn collect_type(name: &str, node: &TypeSchema) -> Vec<AnonymousObject> {
    let mut c = Collector::default();
    c.visit_root(name, node);
    c.records
}

/// Inline objects reachable from a signature (function or event): the
/// parameters, then the return value recorded as `returns`. All parameter
/// lists chained into one call share a single de-duplication scope.
pub fn collect_signature<'p>(
    parameters: impl IntoIterator<Item = &'p Parameter>,
    returns: Option<&Arc<TypeSchema>>,
) -> Vec<AnonymousObject> {
    let mut c = Collector::default();
    for p in parameters {
        c.visit_field(&p.name, &p.schema);
    }
    if let Some(returns) = returns {
        c.visit_field("returns", returns);
    }
    c.records
}

impl Collector {
    fn visit_root(&mut self, name: &str, node: &TypeSchema) {
        match &node.kind {
            TypeKind::Object { properties } => self.visit_properties(properties),
            TypeKind::Array { items } => self.visit_root(name, items),
            TypeKind::Union { choices } => {
                for choice in choices {
                    self.visit_field(name, choice);
                }
            }
            TypeKind::Function { parameters, returns } => {
                self.visit_parameters(parameters);
                if let Some(returns) = returns {
                    self.visit_field("returns", returns);
                }
            }
            TypeKind::Primitive { .. } | TypeKind::Reference { .. } => {}
        }
    }

    fn visit_properties(&mut self, properties: &IndexMap<String, Arc<TypeSchema>>) {
        for (name, child) in properties {
            self.visit_field(name, child);
        }
    }

    fn visit_parameters(&mut self, parameters: &[Parameter]) {
        for p in parameters {
            self.visit_field(&p.name, &p.schema);
        }
    }

    fn visit_field(&mut self, name: &str, node: &Arc<TypeSchema>) {
        match &node.kind {
            TypeKind::Object { properties } => {
                if self.record(name, node) {
                    self.visit_properties(properties);
                }
            }
            // choices share the field's name
            TypeKind::Union { choices } => {
                for choice in choices {
                    self.visit_field(name, choice);
                }
            }
            TypeKind::Array { items } => self.visit_field(name, items),
            TypeKind::Function { parameters, .. } => self.visit_parameters(parameters),
            TypeKind::Primitive { .. } | TypeKind::Reference { .. } => {}
        }
    }

    /// False when the node was already recorded in this traversal.
    fn record(&mut self, name: &str, node: &Arc<TypeSchema>) -> bool {
        if !self.seen.insert(node_key(node)) {
            return false;
        }
        let uses = self.uses.entry(name.to_string()).or_insert(0);
        *uses += 1;
        let anchor = if *uses == 1 { name.to_string() } else { format!("{name}_{uses}") };
        self.records.push(AnonymousObject { name: name.to_string(), anchor, schema: Arc::clone(node) });
        true
    }
}
