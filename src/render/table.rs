use std::fmt::Write as _;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::ir::{EnumValue, Parameter, TypeKind, TypeSchema};

use super::anon::Anchors;
use super::describe::TypeDescriber;
use super::markup;

/// Property and parameter tables. One row per entry, in declaration order.
#[derive(Debug, Clone, Copy)]
pub struct TableRenderer<'a> {
    describer: TypeDescriber<'a>,
}

impl<'a> TableRenderer<'a> {
    pub fn new(namespace: &'a str) -> Self {
        Self { describer: TypeDescriber::markup(namespace) }
    }

    /// Links inline objects to the anchors recorded for the page.
    pub fn with_anchors(namespace: &'a str, anchors: &'a Anchors) -> Self {
        Self { describer: TypeDescriber::markup(namespace).with_anchors(anchors) }
    }

    pub fn describer(&self) -> TypeDescriber<'a> {
        self.describer
    }

    pub fn properties(&self, properties: &IndexMap<String, Arc<TypeSchema>>) -> String {
        self.table(properties.iter().map(|(name, schema)| (name.as_str(), schema.as_ref())))
    }

    pub fn parameters(&self, parameters: &[Parameter]) -> String {
        self.table(parameters.iter().map(|p| (p.name.as_str(), p.schema.as_ref())))
    }

    fn table<'s>(&self, rows: impl Iterator<Item = (&'s str, &'s TypeSchema)>) -> String {
        let mut out = String::new();
        out.push_str("<table class=\"standard-table\">\n");
        out.push_str(" <thead>\n  <tr>\n   <th>Name</th>\n   <th>Type</th>\n   <th>Description</th>\n  </tr>\n </thead>\n");
        out.push_str(" <tbody>\n");
        for (name, schema) in rows {
            self.row(&mut out, name, schema);
        }
        out.push_str(" </tbody>\n</table>\n");
        out
    }

    fn row(&self, out: &mut String, name: &str, schema: &TypeSchema) {
        let flag = if schema.optional { " <em>Optional</em>" } else { "" };
        let type_ = self.describer.describe(schema, Some(name));
        let mut description = schema.description.clone().unwrap_or_default();
        if let Some(values) = &schema.facets.enum_values {
            append_block(&mut description, &enum_values(values));
        }
        if let TypeKind::Function { parameters, .. } = &schema.kind {
            if !parameters.is_empty() {
                append_block(&mut description, &self.parameters(parameters));
            }
        }
        let _ = write!(
            out,
            "  <tr>\n   <td>{}{flag}</td>\n   <td>{type_}</td>\n   <td>{description}</td>\n  </tr>\n",
            markup::code(name),
        );
    }
}

/// Two renderings that are never mixed: a table as soon as one entry carries
/// a name/description pair, otherwise a flat list of quoted literals.
pub fn enum_values(values: &[EnumValue]) -> String {
    if is_tabular(values) {
        let mut out = String::from("Possible values are:\n<table class=\"standard-table\">\n <tbody>\n");
        for value in values {
            let (name, description) = match value {
                EnumValue::Bare(name) => (name.as_str(), ""),
                EnumValue::Described { name, description } => {
                    (name.as_str(), description.as_deref().unwrap_or(""))
                }
            };
            let _ = write!(
                out,
                "  <tr>\n   <td><code><b>{name}</b></code></td>\n   <td>{description}</td>\n  </tr>\n"
            );
        }
        out.push_str(" </tbody>\n</table>\n");
        out
    } else {
        let list = values
            .iter()
            .map(|v| match v {
                EnumValue::Bare(s) => format!("<code>\"{s}\"</code>"),
                EnumValue::Described { name, .. } => format!("<code>\"{name}\"</code>"),
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("Possible values are: {list}.")
    }
}

pub fn is_tabular(values: &[EnumValue]) -> bool {
    values.iter().any(|v| matches!(v, EnumValue::Described { .. }))
}

fn append_block(text: &mut String, block: &str) {
    if !text.is_empty() {
        text.push('\n');
    }
    text.push_str(block);
}
