//! Text-level preparation of schema sources.
//!
//! Two passes happen before (or alongside) structural parsing:
//! - `//` line comments are blanked out so the remainder is plain JSON;
//! - inline reference tokens in free text (`$(ref:Name)`, `$(topic:name)`)
//!   are rewritten into cross-reference markup, so nothing downstream ever
//!   sees the raw token syntax.
use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::render::markup;

static REFERENCE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\((ref|topic):([^\s)]+)(?:\s+([^)]*))?\)").expect("static regex")
});

/// Blank every line whose first non-whitespace characters are `//`.
///
/// Lines are kept (emptied rather than dropped) so parser line numbers still
/// point at the original source.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if !line.trim_start().starts_with("//") {
            out.push_str(line);
        }
    }
    out
}

/// Rewrites `$(ref:…)` / `$(topic:…)` tokens found in description text.
#[derive(Debug, Clone)]
pub struct ReferenceRewriter {
    topic_base: String,
}

impl ReferenceRewriter {
    pub fn new(topic_base: impl Into<String>) -> Self {
        Self { topic_base: topic_base.into() }
    }

    /// `namespace` qualifies bare `$(ref:Name)` targets.
    pub fn rewrite<'a>(&self, text: &'a str, namespace: &str) -> Cow<'a, str> {
        REFERENCE_TOKEN.replace_all(text, |caps: &Captures<'_>| {
            let target = &caps[2];
            let label = caps.get(3).map(|m| m.as_str().trim()).filter(|s| !s.is_empty());
            match &caps[1] {
                "ref" => markup::xref(namespace, target, label),
                _ => {
                    let label = label.unwrap_or(target);
                    format!(r#"<a href="{}{}">{}</a>"#, self.topic_base, target, label)
                }
            }
        })
    }
}
