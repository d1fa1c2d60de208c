use std::fmt::Write as _;

use serde_json::Number;

use crate::error::{Error, Result};
use crate::ir::{EntityKind, Facets, Namespace, TypeDefinition, TypeKind};
use crate::render::{AnonymousObject, collect_type, describe::function_example, markup, table};

use super::method::return_paragraph;
use super::{PageContext, PageStrategy};

pub struct TypePage<'a>(pub &'a TypeDefinition);

impl PageStrategy for TypePage<'_> {
    fn kind(&self) -> EntityKind {
        EntityKind::Type
    }

    fn name(&self) -> &str {
        &self.0.id
    }

    fn title(&self, ns: &Namespace) -> String {
        format!("{}.{}", ns.name, self.0.id)
    }

    fn description(&self) -> Option<&str> {
        self.0.schema.description.as_deref()
    }

    fn body(&self, cx: &PageContext<'_>, out: &mut String) -> Result<()> {
        let schema = &self.0.schema;
        let describer = cx.markup();
        out.push_str("<h2 id=\"Type\">Type</h2>\n");

        match &schema.kind {
            TypeKind::Object { properties } => {
                out.push_str("<p>Values of this type are objects.</p>\n");
                if properties.is_empty() {
                    out.push_str("<p>An object with no fixed set of properties.</p>\n");
                } else {
                    out.push_str(&cx.tables.properties(properties));
                }
            }
            TypeKind::Primitive { name } => {
                let _ = writeln!(out, "<p>Values of this type are {}s.</p>", markup::code(name));
                if let Some(values) = &schema.facets.enum_values {
                    let rendered = table::enum_values(values);
                    if table::is_tabular(values) {
                        out.push_str(&rendered);
                    } else {
                        let _ = writeln!(out, "<p>{rendered}</p>");
                    }
                }
            }
            TypeKind::Array { items } => {
                let item = describer.describe(items, None);
                let _ = writeln!(out, "<p>Values of this type are arrays of {item}.</p>");
                if let Some(k) = fixed_size(&schema.facets, &cx.namespace.name, &self.0.id)? {
                    let _ = writeln!(out, "<p>The array contains {k} elements.</p>");
                }
                if let Some(range) = element_range(&items.facets) {
                    let _ = writeln!(out, "<p>{range}</p>");
                }
                if let TypeKind::Object { properties } = &items.kind {
                    if !properties.is_empty() {
                        out.push_str("<p>Elements of the array look like:</p>\n");
                        out.push_str(&cx.tables.properties(properties));
                    }
                }
            }
            TypeKind::Reference { .. } => {
                let _ = writeln!(out, "<p>Values of this type are {}.</p>", describer.describe(schema, None));
            }
            // object branches are documented under the type's own name
            TypeKind::Union { .. } => {
                let choices = describer.describe(schema, Some(&self.0.id));
                let _ = writeln!(out, "<p>Values of this type are {choices}.</p>");
            }
            TypeKind::Function { parameters, returns } => {
                let example = function_example(parameters.iter().map(|p| p.name.as_str()));
                let _ = writeln!(out, "<p>Values of this type are functions of the form {}.</p>", markup::code(&example));
                if !parameters.is_empty() {
                    out.push_str("<h3 id=\"Parameters\">Parameters</h3>\n");
                    out.push_str(&cx.tables.parameters(parameters));
                }
                if let Some(returns) = returns {
                    out.push_str("<h3 id=\"Return_value\">Return value</h3>\n");
                    return_paragraph(&describer, returns, out);
                }
            }
        }
        Ok(())
    }

    fn anonymous_objects(&self) -> Vec<AnonymousObject> {
        collect_type(&self.0.id, &self.0.schema)
    }
}

/// Once `minItems` is declared the size must be exact. A lone `maxItems` is
/// only an upper bound and says nothing about a fixed size.
fn fixed_size(facets: &Facets, ns: &str, id: &str) -> Result<Option<u64>> {
    match (facets.min_items, facets.max_items) {
        (None, _) => Ok(None),
        (Some(min), Some(max)) if min == max => Ok(Some(min)),
        (min, max) => Err(Error::malformed(
            format!("{ns}.types({id})"),
            format!("array size is not fixed (minItems {}, maxItems {})", show(min), show(max)),
        )),
    }
}

fn show(n: Option<u64>) -> String {
    n.map_or_else(|| "unset".to_string(), |n| n.to_string())
}

fn element_range(items: &Facets) -> Option<String> {
    let bound = |n: &Number| n.to_string();
    match (&items.minimum, &items.maximum) {
        (Some(min), Some(max)) => {
            Some(format!("Array elements should be between {} and {}.", bound(min), bound(max)))
        }
        (Some(min), None) => Some(format!("Array elements should be at least {}.", bound(min))),
        (None, Some(max)) => Some(format!("Array elements should be at most {}.", bound(max))),
        (None, None) => None,
    }
}

