//! Page Emitter.
//!
//! Every page goes through the same stages:
//!
//! `Preamble → Body → AnonymousObjectsSection → CompatibilityFooter →
//! AcknowledgementFooter → Done`
//!
//! Only the body differs per entity kind; it is supplied by a small
//! [`PageStrategy`] implementation (one per module below). A page is built in
//! memory and handed out only once every stage has succeeded, so a failing
//! entity never leaves partial output behind.
mod event;
mod index;
mod method;
mod property;
mod syntax;
mod typedef;

use std::fmt::Write as _;

use tracing::{debug, warn};

use crate::config::{CompatibilityPolicy, EmitterConfig};
use crate::error::{EntityFailure, Error, Result};
use crate::ir::{EntityKind, Namespace, TypeKind};
use crate::output::{self, INDEX_SLUG, Page, PageHeader};
use crate::render::{Anchors, AnonymousObject, TableRenderer, TypeDescriber};

pub use event::EventPage;
pub use index::IndexPage;
pub use method::MethodPage;
pub use property::PropertyPage;
pub use typedef::TypePage;

/// Per-kind part of a page.
pub trait PageStrategy {
    fn kind(&self) -> EntityKind;
    /// Entity name; also the page's file name.
    fn name(&self) -> &str;
    fn title(&self, ns: &Namespace) -> String;
    fn description(&self) -> Option<&str>;
    /// Extra preamble line after the description.
    fn summary(&self, _ns: &Namespace) -> Option<String> {
        None
    }
    fn body(&self, cx: &PageContext<'_>, out: &mut String) -> Result<()>;
    fn anonymous_objects(&self) -> Vec<AnonymousObject> {
        Vec::new()
    }
}

/// What a body renderer can see while rendering one page.
pub struct PageContext<'a> {
    pub config: &'a EmitterConfig,
    pub namespace: &'a Namespace,
    pub tables: TableRenderer<'a>,
    pub plain: TypeDescriber<'a>,
}

impl<'a> PageContext<'a> {
    /// `anchors` are those of the page's "Additional objects" sections.
    pub fn new(config: &'a EmitterConfig, namespace: &'a Namespace, anchors: &'a Anchors) -> Self {
        Self {
            config,
            namespace,
            tables: TableRenderer::with_anchors(&namespace.name, anchors),
            plain: TypeDescriber::plain(&namespace.name),
        }
    }

    pub fn markup(&self) -> TypeDescriber<'a> {
        self.tables.describer()
    }
}

/// Pages of one namespace, plus the entities that failed to render.
#[derive(Debug, Default)]
pub struct NamespacePages {
    pub pages: Vec<Page>,
    pub failures: Vec<EntityFailure>,
}

#[derive(Debug, Clone)]
pub struct PageEmitter {
    config: EmitterConfig,
}

impl PageEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Functions, properties, types, events, then the index; each in
    /// declaration order. One failing entity does not stop the others.
    pub fn emit_namespace(&self, ns: &Namespace) -> NamespacePages {
        let mut strategies: Vec<Box<dyn PageStrategy + '_>> = Vec::new();
        strategies.extend(ns.functions.iter().map(|f| Box::new(MethodPage(f)) as Box<dyn PageStrategy + '_>));
        strategies.extend(ns.properties.values().map(|p| Box::new(PropertyPage(p)) as Box<dyn PageStrategy + '_>));
        strategies.extend(ns.types.iter().map(|t| Box::new(TypePage(t)) as Box<dyn PageStrategy + '_>));
        strategies.extend(ns.events.iter().map(|e| Box::new(EventPage(e)) as Box<dyn PageStrategy + '_>));
        strategies.push(Box::new(IndexPage(ns)));

        let mut result = NamespacePages::default();
        for strategy in &strategies {
            match self.emit(ns, strategy.as_ref()) {
                Ok(page) => result.pages.push(page),
                Err(error) => {
                    warn!(namespace = %ns.name, entity = strategy.name(), %error, "page generation failed");
                    result.failures.push(EntityFailure {
                        namespace: ns.name.clone(),
                        kind: strategy.kind(),
                        entity: strategy.name().to_string(),
                        error,
                    });
                }
            }
        }
        result
    }

    pub fn emit(&self, ns: &Namespace, strategy: &dyn PageStrategy) -> Result<Page> {
        let kind = strategy.kind();
        let slug = if kind == EntityKind::Index { INDEX_SLUG } else { strategy.name() };
        if !output::is_valid_slug(slug) {
            return Err(Error::malformed(
                format!("{}.{kind}", ns.name),
                format!("`{slug}` cannot be used as a page name"),
            ));
        }
        let records = strategy.anonymous_objects();
        let anchors = Anchors::new(&records);
        let cx = PageContext::new(&self.config, ns, &anchors);
        let mut body = String::new();

        // Preamble
        let description = strategy.description().unwrap_or_else(|| strategy.name());
        let _ = writeln!(body, "<p>{description}</p>");
        if let Some(summary) = strategy.summary(ns) {
            let _ = writeln!(body, "<p>{summary}</p>");
        }

        // Body
        strategy.body(&cx, &mut body)?;

        // AnonymousObjectsSection
        self.anonymous_objects(&cx, &records, &mut body);

        // CompatibilityFooter
        self.compatibility(ns, strategy, &mut body);

        // AcknowledgementFooter
        self.acknowledgement(ns, strategy, &mut body);

        debug!(namespace = %ns.name, entity = strategy.name(), %kind, "rendered page");
        Ok(Page {
            namespace: ns.name.clone(),
            slug: slug.to_string(),
            kind,
            header: PageHeader::new(strategy.title(ns), self.tags(ns, strategy)),
            body,
        })
    }

    fn tags(&self, ns: &Namespace, strategy: &dyn PageStrategy) -> Vec<String> {
        let mut tags = self.config.tags.clone();
        tags.push(strategy.kind().tag().to_string());
        tags.push(ns.name.clone());
        if strategy.kind() != EntityKind::Index {
            tags.push(strategy.name().to_string());
        }
        tags
    }

    fn anonymous_objects(&self, cx: &PageContext<'_>, records: &[AnonymousObject], out: &mut String) {
        if records.is_empty() {
            return;
        }
        out.push_str("<h2 id=\"Additional_objects\">Additional objects</h2>\n");
        for record in records {
            let _ = writeln!(out, "<h3 id=\"{}\">{}</h3>", record.anchor, record.name);
            if let Some(description) = &record.schema.description {
                let _ = writeln!(out, "<p>{description}</p>");
            }
            match &record.schema.kind {
                TypeKind::Object { properties } if !properties.is_empty() => {
                    out.push_str(&cx.tables.properties(properties));
                }
                _ => out.push_str("<p>An object with no fixed set of properties.</p>\n"),
            }
        }
    }

    fn compatibility(&self, ns: &Namespace, strategy: &dyn PageStrategy, out: &mut String) {
        out.push_str("<h2 id=\"Browser_compatibility\">Browser compatibility</h2>\n");
        match self.config.compatibility_policy {
            CompatibilityPolicy::StaticPlaceholder => out.push_str("<p>{{WebExtBrowserCompat}}</p>\n"),
            CompatibilityPolicy::PerFeatureFlag => {
                let prefix = &self.config.compat_prefix;
                let key = if strategy.kind() == EntityKind::Index {
                    format!("{prefix}.{}", ns.name)
                } else {
                    format!("{prefix}.{}.{}", ns.name, strategy.name())
                };
                let _ = writeln!(out, "<p>{{{{Compat(\"{key}\")}}}}</p>");
            }
        }
    }

    fn acknowledgement(&self, ns: &Namespace, strategy: &dyn PageStrategy, out: &mut String) {
        let config = &self.config;
        let mut docs = format!("{}{}", config.upstream_docs_base, ns.name);
        if let Some(prefix) = strategy.kind().anchor_prefix() {
            let _ = write!(docs, "#{prefix}-{}", strategy.name());
        }
        let api = format!("{}.{}", config.upstream_api_object, ns.name);
        let file = format!("<code>{}.json</code>", ns.source_name);
        let source = match config.source_links.url_for(&ns.source_name) {
            Some(url) => format!("<a href=\"{url}\">{file}</a>"),
            None => file,
        };

        out.push_str("<div class=\"note\"><strong>Acknowledgements</strong>\n");
        let _ = writeln!(out, "<p>This API is based on Chromium's <a href=\"{docs}\"><code>{api}</code></a> API.");
        let _ = writeln!(out, "This documentation is derived from {source} in the Chromium code.</p>");
        out.push_str("</div>\n");
        if !config.license_banner.trim().is_empty() {
            let _ = writeln!(out, "<div class=\"hidden\"><pre>{}</pre></div>", config.license_banner.trim());
        }
    }
}
