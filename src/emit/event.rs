use std::fmt::Write as _;

use crate::error::Result;
use crate::ir::{EntityKind, EventSchema, Namespace};
use crate::render::{AnonymousObject, collect_signature, describe::function_example};

use super::method::return_paragraph;
use super::syntax::{Argument, argument_lines, parameter_arguments};
use super::{PageContext, PageStrategy};

pub struct EventPage<'a>(pub &'a EventSchema);

// removeListener/hasListener are not described by the schema; their shape is fixed.
const LISTENER_FUNCTIONS: &str = "\
<p>Events have three functions:</p>
<dl>
 <dt><code>addListener(callback)</code></dt>
 <dd>Adds a listener to this event.</dd>
 <dt><code>removeListener(listener)</code></dt>
 <dd>Stop listening to this event. The <code>listener</code> argument is the listener to remove.</dd>
 <dt><code>hasListener(listener)</code></dt>
 <dd>Check whether <code>listener</code> is registered for this event. Returns <code>true</code> if it is listening, <code>false</code> otherwise.</dd>
</dl>
";

impl PageStrategy for EventPage<'_> {
    fn kind(&self) -> EntityKind {
        EntityKind::Event
    }

    fn name(&self) -> &str {
        &self.0.name
    }

    fn title(&self, ns: &Namespace) -> String {
        format!("{}.{}", ns.name, self.0.name)
    }

    fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    fn body(&self, cx: &PageContext<'_>, out: &mut String) -> Result<()> {
        let ev = self.0;
        let target = format!("{}.{}.{}", cx.config.api_object, cx.namespace.name, ev.name);

        out.push_str("<h2 id=\"Syntax\">Syntax</h2>\n<pre class=\"brush: js\">\n");
        if ev.extra_parameters.is_empty() {
            if ev.parameters.is_empty() {
                let _ = writeln!(out, "{target}.addListener(function() {{...}})");
            } else {
                let _ = writeln!(out, "{target}.addListener(function(");
                argument_lines(&parameter_arguments(&cx.plain, &ev.parameters), out);
                out.push_str(") {...})\n");
            }
        } else {
            let callback = function_example(ev.parameters.iter().map(|p| p.name.as_str()));
            let mut args = vec![Argument::bare(callback)];
            args.extend(parameter_arguments(&cx.plain, &ev.extra_parameters));
            let _ = writeln!(out, "{target}.addListener(");
            argument_lines(&args, out);
            out.push_str(")\n");
        }
        let _ = writeln!(out, "{target}.removeListener(listener)");
        let _ = writeln!(out, "{target}.hasListener(listener)");
        out.push_str("</pre>\n");
        out.push_str(LISTENER_FUNCTIONS);

        out.push_str("<h2 id=\"addListener_syntax\">addListener syntax</h2>\n");
        if !ev.extra_parameters.is_empty() {
            out.push_str("<h3 id=\"Parameters\">Parameters</h3>\n");
            out.push_str(&cx.tables.parameters(&ev.extra_parameters));
        }

        out.push_str("<h3 id=\"Listener_parameters\">Listener parameters</h3>\n");
        if ev.parameters.is_empty() {
            out.push_str("<p>The listener is called without arguments.</p>\n");
        } else {
            out.push_str(&cx.tables.parameters(&ev.parameters));
        }

        if let Some(returns) = &ev.returns {
            out.push_str("<h3 id=\"Listener_return_value\">Listener return value</h3>\n");
            return_paragraph(&cx.markup(), returns, out);
        }
        Ok(())
    }

    fn anonymous_objects(&self) -> Vec<AnonymousObject> {
        let parameters = self.0.parameters.iter().chain(&self.0.extra_parameters);
        collect_signature(parameters, self.0.returns.as_ref())
    }
}
