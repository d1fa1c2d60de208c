use std::fmt::Write as _;

use crate::error::Result;
use crate::ir::{EntityKind, FunctionSchema, Namespace, TypeSchema};
use crate::render::{AnonymousObject, TypeDescriber, collect_signature, markup};

use super::syntax::{self, argument_lines, parameter_arguments};
use super::{PageContext, PageStrategy};

pub struct MethodPage<'a>(pub &'a FunctionSchema);

impl PageStrategy for MethodPage<'_> {
    fn kind(&self) -> EntityKind {
        EntityKind::Function
    }

    fn name(&self) -> &str {
        &self.0.name
    }

    fn title(&self, ns: &Namespace) -> String {
        format!("{}.{}()", ns.name, self.0.name)
    }

    fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    fn summary(&self, ns: &Namespace) -> Option<String> {
        let call = format!("{}.{}({})", ns.name, self.0.name, syntax::names(&self.0.parameters));
        Some(markup::code(&call))
    }

    fn body(&self, cx: &PageContext<'_>, out: &mut String) -> Result<()> {
        let f = self.0;
        let call = format!("{}.{}.{}", cx.config.api_object, cx.namespace.name, f.name);

        out.push_str("<h2 id=\"Syntax\">Syntax</h2>\n<pre class=\"brush: js\">\n");
        if f.parameters.is_empty() {
            let _ = writeln!(out, "{call}()");
        } else {
            let _ = writeln!(out, "{call}(");
            argument_lines(&parameter_arguments(&cx.plain, &f.parameters), out);
            out.push_str(")\n");
        }
        out.push_str("</pre>\n");

        if !f.parameters.is_empty() {
            out.push_str("<h3 id=\"Parameters\">Parameters</h3>\n");
            out.push_str(&cx.tables.parameters(&f.parameters));
        }

        if let Some(returns) = &f.returns {
            out.push_str("<h3 id=\"Return_value\">Return value</h3>\n");
            return_paragraph(&cx.markup(), returns, out);
        }
        Ok(())
    }

    fn anonymous_objects(&self) -> Vec<AnonymousObject> {
        collect_signature(&self.0.parameters, self.0.returns.as_ref())
    }
}

/// `<p>{type}. {description}</p>`; an inline object links to its `returns`
/// section.
pub(super) fn return_paragraph(describer: &TypeDescriber<'_>, returns: &TypeSchema, out: &mut String) {
    let type_ = describer.describe(returns, Some("returns"));
    match &returns.description {
        Some(description) => {
            let _ = writeln!(out, "<p>{type_}. {description}</p>");
        }
        None => {
            let _ = writeln!(out, "<p>{type_}.</p>");
        }
    }
}
