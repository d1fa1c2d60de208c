use std::fmt::Write as _;

use crate::error::Result;
use crate::ir::{EntityKind, Namespace};
use crate::render::markup;

use super::syntax;
use super::{PageContext, PageStrategy};

/// The per-namespace landing page.
pub struct IndexPage<'a>(pub &'a Namespace);

struct Entry {
    target: String,
    label: String,
    description: Option<String>,
}

impl PageStrategy for IndexPage<'_> {
    fn kind(&self) -> EntityKind {
        EntityKind::Index
    }

    fn name(&self) -> &str {
        &self.0.name
    }

    fn title(&self, ns: &Namespace) -> String {
        ns.name.clone()
    }

    fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    fn body(&self, _cx: &PageContext<'_>, out: &mut String) -> Result<()> {
        let ns = self.0;
        let types = ns.types.iter().map(|t| Entry {
            target: t.id.clone(),
            label: t.id.clone(),
            description: t.schema.description.clone(),
        });
        let properties = ns.properties.values().map(|p| Entry {
            target: p.name.clone(),
            label: p.name.clone(),
            description: p.description.clone(),
        });
        let functions = ns.functions.iter().map(|f| Entry {
            target: format!("{}()", f.name),
            label: format!("{}.{}({})", ns.name, f.name, syntax::names(&f.parameters)),
            description: f.description.clone(),
        });
        let events = ns.events.iter().map(|e| Entry {
            target: e.name.clone(),
            label: format!("{}.{}", ns.name, e.name),
            description: e.description.clone(),
        });

        section(out, &ns.name, "Types", types);
        section(out, &ns.name, "Properties", properties);
        section(out, &ns.name, "Functions", functions);
        section(out, &ns.name, "Events", events);
        Ok(())
    }
}

/// A heading and definition list; nothing at all when `entries` is empty.
fn section(out: &mut String, ns: &str, heading: &str, entries: impl Iterator<Item = Entry>) {
    let mut entries = entries.peekable();
    if entries.peek().is_none() {
        return;
    }
    let _ = writeln!(out, "<h2 id=\"{heading}\">{heading}</h2>\n<dl>");
    for entry in entries {
        let _ = writeln!(out, " <dt>{}</dt>", markup::xref(ns, &entry.target, Some(&entry.label)));
        let _ = writeln!(out, " <dd>{}</dd>", short_description(entry.description.as_deref()));
    }
    out.push_str("</dl>\n");
}

/// First sentence of a description.
fn short_description(description: Option<&str>) -> &str {
    let text = description.unwrap_or("").trim();
    match text.find(". ") {
        Some(end) => &text[..=end],
        None => text,
    }
}
