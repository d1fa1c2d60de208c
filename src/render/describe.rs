use crate::ir::{TypeKind, TypeSchema};

use super::anon::Anchors;
use super::markup;

/// Output flavour of a type description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// HTML fragments, for tables and prose.
    Markup,
    /// Plain text, for comments inside syntax blocks.
    Plain,
}

/// Turns a type node into a short structural description.
///
/// Optionality is never part of the description; callers add their own
/// marker (`Optional` flag in tables, `optional ` prefix in syntax comments).
#[derive(Debug, Clone, Copy)]
pub struct TypeDescriber<'a> {
    namespace: &'a str,
    style: Style,
    anchors: Option<&'a Anchors>,
}

impl<'a> TypeDescriber<'a> {
    pub fn new(namespace: &'a str, style: Style) -> Self {
        Self { namespace, style, anchors: None }
    }

    /// Links inline objects to the anchors of their own sections instead of
    /// the bare field name.
    pub fn with_anchors(self, anchors: &'a Anchors) -> Self {
        Self { anchors: Some(anchors), ..self }
    }

    pub fn markup(namespace: &'a str) -> Self {
        Self::new(namespace, Style::Markup)
    }

    pub fn plain(namespace: &'a str) -> Self {
        Self::new(namespace, Style::Plain)
    }

    pub fn namespace(&self) -> &'a str {
        self.namespace
    }

    /// `link_name` is the anchor of the section documenting this node when
    /// it is an inline object (the enclosing field or parameter name). An
    /// anchor recorded for the node itself takes precedence.
    pub fn describe(&self, node: &TypeSchema, link_name: Option<&str>) -> String {
        match &node.kind {
            TypeKind::Primitive { name } => match self.style {
                Style::Markup => markup::code(name),
                Style::Plain => name.clone(),
            },
            TypeKind::Array { items } => {
                let link = if items.is_object() { link_name } else { None };
                format!("array of {}", self.describe(items, link))
            }
            TypeKind::Object { .. } => match (self.style, self.anchor_of(node).or(link_name)) {
                (Style::Markup, Some(link)) if node.has_properties() => {
                    format!(r##"<a href="#{link}">object</a>"##)
                }
                _ => "object".to_string(),
            },
            // Choices share the field's anchor; no grouping for nested unions.
            TypeKind::Union { choices } => choices
                .iter()
                .map(|c| self.describe(c, link_name))
                .collect::<Vec<_>>()
                .join(" or "),
            TypeKind::Reference { target } => match self.style {
                Style::Markup => markup::xref(self.namespace, target, None),
                Style::Plain => markup::qualify(self.namespace, target),
            },
            TypeKind::Function { parameters, .. } => {
                let example = function_example(parameters.iter().map(|p| p.name.as_str()));
                match self.style {
                    Style::Markup => markup::code(&example),
                    Style::Plain => example,
                }
            }
        }
    }

    fn anchor_of(&self, node: &TypeSchema) -> Option<&'a str> {
        self.anchors.and_then(|a| a.get(node))
    }

    /// [`Self::describe`] with the `optional ` prefix used in syntax comments.
    pub fn describe_with_optional(&self, node: &TypeSchema, link_name: Option<&str>) -> String {
        let base = self.describe(node, link_name);
        if node.optional { format!("optional {base}") } else { base }
    }
}

/// `function(a, b) {...}`
pub fn function_example<'n>(names: impl IntoIterator<Item = &'n str>) -> String {
    let names: Vec<&str> = names.into_iter().collect();
    format!("function({}) {{...}}", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Parameter;

    fn alarm_info() -> TypeSchema {
        TypeSchema::object([
            ("when", TypeSchema::primitive("number")),
            ("periodInMinutes", TypeSchema::primitive("number").optional()),
        ])
    }

    #[test]
    fn primitives_are_code_spans() {
        let d = TypeDescriber::markup("alarms");
        assert_eq!(d.describe(&TypeSchema::primitive("string"), None), "<code>string</code>");
        assert_eq!(TypeDescriber::plain("alarms").describe(&TypeSchema::primitive("string"), None), "string");
    }

    #[test]
    fn objects_link_only_with_name_and_properties() {
        let d = TypeDescriber::markup("alarms");
        assert_eq!(d.describe(&alarm_info(), Some("alarmInfo")), r##"<a href="#alarmInfo">object</a>"##);
        assert_eq!(d.describe(&alarm_info(), None), "object");
        let empty = TypeSchema::object(Vec::<(String, TypeSchema)>::new());
        assert_eq!(d.describe(&empty, Some("x")), "object");
    }

    #[test]
    fn arrays_forward_link_to_object_items_only() {
        let d = TypeDescriber::markup("alarms");
        let of_objects = TypeSchema::array(alarm_info());
        assert_eq!(d.describe(&of_objects, Some("infos")), r##"array of <a href="#infos">object</a>"##);
        let of_strings = TypeSchema::array(TypeSchema::primitive("string"));
        assert_eq!(d.describe(&of_strings, Some("names")), "array of <code>string</code>");
    }

    #[test]
    fn recorded_anchors_win_over_the_field_name() {
        let root = TypeSchema::object([(
            "target",
            TypeSchema::union([
                TypeSchema::object([("tabId", TypeSchema::primitive("integer"))]),
                TypeSchema::object([("frameId", TypeSchema::primitive("integer"))]),
            ]),
        )]);
        let anchors = Anchors::new(&crate::render::collect_type("T", &root));
        let TypeKind::Object { properties } = &root.kind else { unreachable!() };
        let d = TypeDescriber::markup("tabs").with_anchors(&anchors);
        assert_eq!(
            d.describe(&properties["target"], Some("target")),
            r##"<a href="#target">object</a> or <a href="#target_2">object</a>"##
        );
    }

    #[test]
    fn unions_join_with_or() {
        let d = TypeDescriber::plain("tabs");
        let u = TypeSchema::union([
            TypeSchema::primitive("integer"),
            TypeSchema::array(TypeSchema::primitive("integer")),
        ]);
        assert_eq!(d.describe(&u, None), "integer or array of integer");
    }

    #[test]
    fn nested_unions_are_flattened_into_prose() {
        let d = TypeDescriber::plain("ns");
        let inner = TypeSchema::union([TypeSchema::primitive("string"), TypeSchema::primitive("boolean")]);
        let u = TypeSchema::union([TypeSchema::array(inner), TypeSchema::primitive("integer")]);
        assert_eq!(d.describe(&u, None), "array of string or boolean or integer");
    }

    #[test]
    fn references_resolve_against_current_namespace() {
        let d = TypeDescriber::markup("alarms");
        assert_eq!(d.describe(&TypeSchema::reference("Alarm"), None), r#"{{WebExtAPIRef("alarms.Alarm")}}"#);
        assert_eq!(
            d.describe(&TypeSchema::reference("runtime.Port"), None),
            r#"{{WebExtAPIRef("runtime.Port")}}"#
        );
        assert_eq!(TypeDescriber::plain("alarms").describe(&TypeSchema::reference("Alarm"), None), "alarms.Alarm");
    }

    #[test]
    fn functions_render_parameter_names() {
        let f = TypeSchema::function(vec![
            Parameter::new("tab", TypeSchema::reference("Tab")),
            Parameter::new("info", TypeSchema::primitive("string")),
        ]);
        assert_eq!(TypeDescriber::plain("tabs").describe(&f, None), "function(tab, info) {...}");
        assert_eq!(
            TypeDescriber::markup("tabs").describe(&TypeSchema::function(vec![]), None),
            "<code>function() {...}</code>"
        );
    }

    #[test]
    fn optional_marker_is_caller_side() {
        let d = TypeDescriber::plain("ns");
        let t = TypeSchema::primitive("string").optional();
        assert_eq!(d.describe(&t, None), "string");
        assert_eq!(d.describe_with_optional(&t, None), "optional string");
    }
}
