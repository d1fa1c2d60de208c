//! One documentation run: load → render → write → report.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{error, info};

use crate::audit::{self, Catalog, UnresolvedReference};
use crate::config::EmitterConfig;
use crate::emit::PageEmitter;
use crate::error::{DocumentFailure, EntityFailure, Error, Result};
use crate::ir::Namespace;
use crate::loader::SchemaLoader;
use crate::output;
use crate::preprocess::ReferenceRewriter;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Source names (`alarms`, `web_request`); each is read from `<input_dir>/<name>.json`.
    pub sources: Vec<String>,
    /// Every `*.json` file of `input_dir`, in addition to `sources`.
    pub all: bool,
}

/// Outcome of a run. Generation continues past document and entity
/// failures; they are collected here instead.
#[derive(Debug, Default)]
pub struct RunReport {
    pub pages_written: usize,
    pub document_failures: Vec<DocumentFailure>,
    pub failures: Vec<EntityFailure>,
    pub unresolved: Vec<UnresolvedReference>,
}

#[derive(Debug, Clone)]
pub struct Generator {
    loader: SchemaLoader,
    emitter: PageEmitter,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.document_failures.is_empty() && self.failures.is_empty()
    }
}

impl GenerateOptions {
    /// Input files in a stable order: listed sources first, then discovered
    /// ones by file name. A file is never read twice.
    pub fn source_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths: Vec<PathBuf> =
            self.sources.iter().map(|name| self.input_dir.join(format!("{name}.json"))).collect();
        if self.all {
            paths.extend(discover_sources(&self.input_dir)?);
        }
        let mut seen = HashSet::new();
        paths.retain(|p| seen.insert(p.clone()));
        if paths.is_empty() {
            return Err(Error::Config(format!(
                "no schema documents selected in {}",
                self.input_dir.display()
            )));
        }
        Ok(paths)
    }
}

impl Generator {
    pub fn new(config: EmitterConfig) -> Self {
        let rewriter = ReferenceRewriter::new(config.upstream_docs_base.clone());
        Self { loader: SchemaLoader::new(rewriter), emitter: PageEmitter::new(config) }
    }

    pub fn run(&self, options: &GenerateOptions) -> Result<RunReport> {
        let mut report = RunReport::default();

        // 1) load
        let mut namespaces: Vec<Namespace> = Vec::new();
        let mut names = HashSet::new();
        for path in options.source_paths()? {
            let loaded = match self.loader.load_file(&path) {
                Ok(loaded) => loaded,
                Err(error) => {
                    error!(path = %path.display(), %error, "cannot load schema document");
                    report.document_failures.push(DocumentFailure { path, error });
                    continue;
                }
            };
            report.failures.extend(loaded.failures);
            for ns in loaded.document.namespaces {
                if !names.insert(ns.name.clone()) {
                    error!(path = %path.display(), namespace = %ns.name, "namespace already loaded; skipped");
                    let error = Error::DuplicateNamespace { name: ns.name };
                    report.document_failures.push(DocumentFailure { path: path.clone(), error });
                    continue;
                }
                namespaces.push(ns);
            }
        }

        // 2) audit cross-references against everything loaded in this run
        let catalog = Catalog::new(&namespaces);
        for ns in &namespaces {
            report.unresolved.extend(audit::audit_namespace(&catalog, ns));
        }

        // 3) render; namespaces are independent, results keep input order
        let rendered: Vec<_> = namespaces.par_iter().map(|ns| self.emitter.emit_namespace(ns)).collect();

        // 4) write
        for (ns, pages) in namespaces.iter().zip(rendered) {
            let mut written = 0;
            for page in pages.pages {
                match output::write_page(&options.output_dir, &page) {
                    Ok(_) => written += 1,
                    Err(error) => {
                        error!(namespace = %ns.name, entity = %page.slug, %error, "cannot write page");
                        report.failures.push(EntityFailure {
                            namespace: page.namespace,
                            kind: page.kind,
                            entity: page.slug,
                            error,
                        });
                    }
                }
            }
            info!(
                namespace = %ns.name,
                pages = written,
                failed = pages.failures.len(),
                "namespace written"
            );
            report.pages_written += written;
            report.failures.extend(pages.failures);
        }

        info!(
            pages = report.pages_written,
            documents_failed = report.document_failures.len(),
            failures = report.failures.len(),
            unresolved = report.unresolved.len(),
            "run finished"
        );
        Ok(report)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// `<dir>/*.json`, sorted by path.
fn discover_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = dir.join("*.json");
    let pattern = pattern.to_string_lossy();
    let entries = glob::glob(&pattern).map_err(|e| Error::Config(format!("bad input directory {pattern}: {e}")))?;
    let mut out = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => out.push(path),
            Err(e) => {
                let path = e.path().to_path_buf();
                return Err(Error::io(path, e.into()));
            }
        }
    }
    out.sort();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::EntityKind;

    const ALARMS: &str = r#"[{
      "namespace": "alarms",
      "description": "Schedule code to run.",
      "types": [
        {"id": "Alarm", "type": "object", "properties": {"name": {"type": "string"}}},
        {"id": "Pair", "type": "array", "items": {"type": "integer"}, "minItems": 1, "maxItems": 2}
      ],
      "functions": [
        {"name": "create", "parameters": [{"name": "name", "type": "string", "optional": true}]},
        {"name": "get", "parameters": [{"name": "callback", "type": "function",
          "parameters": [{"name": "alarm", "$ref": "Alarm"}, {"name": "x", "$ref": "Missing"}]}]}
      ],
      "events": [{"name": "onAlarm", "parameters": [{"name": "alarm", "$ref": "Alarm"}]}]
    }]"#;

    const IDLE: &str = r#"[{"namespace": "idle", "properties": {"threshold": {"value": 60}}}]"#;

    fn fixture() -> (tempfile::TempDir, GenerateOptions) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("api");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::write(input.join("alarms.json"), ALARMS).unwrap();
        std::fs::write(input.join("idle.json"), IDLE).unwrap();
        let options = GenerateOptions {
            input_dir: input,
            output_dir: dir.path().join("out"),
            sources: vec!["alarms".into()],
            all: false,
        };
        (dir, options)
    }

    #[test]
    fn writes_pages_and_reports_failures() {
        let (_dir, options) = fixture();
        let report = Generator::new(EmitterConfig::default()).run(&options).unwrap();

        // create, get, Alarm, onAlarm, INDEX; Pair fails
        assert_eq!(report.pages_written, 5);
        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].entity, "Pair");
        assert_eq!(report.failures[0].kind, EntityKind::Type);

        let out = options.output_dir.join("alarms");
        assert!(out.join("INDEX").is_file());
        assert!(out.join("create").is_file());
        assert!(!out.join("Pair").exists());

        let text = std::fs::read_to_string(out.join("create")).unwrap();
        assert!(text.starts_with(r#"{"title":"alarms.create()","show_toc":0,"tags":["#));
    }

    #[test]
    fn unresolved_references_are_reported_not_fatal() {
        let (_dir, options) = fixture();
        let report = Generator::new(EmitterConfig::default()).run(&options).unwrap();
        let targets: Vec<_> = report.unresolved.iter().map(|u| u.target.as_str()).collect();
        assert_eq!(targets, ["alarms.Missing"]);
    }

    #[test]
    fn all_discovers_every_document() {
        let (_dir, mut options) = fixture();
        options.sources.clear();
        options.all = true;
        let paths = options.source_paths().unwrap();
        let names: Vec<_> = paths.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect();
        assert_eq!(names, ["alarms.json", "idle.json"]);

        let report = Generator::new(EmitterConfig::default()).run(&options).unwrap();
        assert!(options.output_dir.join("idle").join("threshold").is_file());
        assert!(options.output_dir.join("idle").join("INDEX").is_file());
        assert_eq!(report.pages_written, 7);
    }

    #[test]
    fn listed_and_discovered_sources_are_not_duplicated() {
        let (_dir, mut options) = fixture();
        options.all = true;
        assert_eq!(options.source_paths().unwrap().len(), 2);
    }

    #[test]
    fn nothing_selected_is_a_config_error() {
        let (_dir, mut options) = fixture();
        options.sources.clear();
        assert!(matches!(options.source_paths(), Err(Error::Config(_))));
    }

    #[test]
    fn missing_document_is_reported_and_the_rest_still_rendered() {
        let (_dir, mut options) = fixture();
        options.sources = vec!["nope".into(), "alarms".into()];
        let report = Generator::new(EmitterConfig::default()).run(&options).unwrap();
        assert!(!report.is_success());
        assert_eq!(report.document_failures.len(), 1);
        assert!(report.document_failures[0].path.ends_with("nope.json"));
        assert!(matches!(report.document_failures[0].error, Error::Io { .. }));
        assert!(options.output_dir.join("alarms").join("INDEX").is_file());
    }

    #[test]
    fn unparsable_document_does_not_stop_the_run() {
        let (_dir, mut options) = fixture();
        std::fs::write(options.input_dir.join("idle.json"), "[{ not json").unwrap();
        options.sources = vec!["alarms".into(), "idle".into()];
        let report = Generator::new(EmitterConfig::default()).run(&options).unwrap();

        assert!(!report.is_success());
        assert_eq!(report.document_failures.len(), 1);
        assert!(report.document_failures[0].path.ends_with("idle.json"));
        assert_eq!(report.pages_written, 5);
        assert!(options.output_dir.join("alarms").join("create").is_file());
        assert!(!options.output_dir.join("idle").exists());
    }

    #[test]
    fn namespace_declared_twice_keeps_the_first_document() {
        let (_dir, mut options) = fixture();
        let again = r#"[{"namespace": "alarms", "functions": [{"name": "other"}]},
                        {"namespace": "extra", "properties": {"limit": {"value": 1}}}]"#;
        std::fs::write(options.input_dir.join("alarms_again.json"), again).unwrap();
        options.sources = vec!["alarms".into(), "alarms_again".into()];
        let report = Generator::new(EmitterConfig::default()).run(&options).unwrap();

        assert!(!report.is_success());
        assert_eq!(report.document_failures.len(), 1);
        assert!(matches!(
            report.document_failures[0].error,
            Error::DuplicateNamespace { ref name } if name == "alarms"
        ));
        assert!(!options.output_dir.join("alarms").join("other").exists());
        assert!(options.output_dir.join("extra").join("limit").is_file());
    }

    #[test]
    fn output_matches_sequential_rendering() {
        let (_dir, mut options) = fixture();
        options.all = true;
        Generator::new(EmitterConfig::default()).run(&options).unwrap();
        let first = std::fs::read_to_string(options.output_dir.join("alarms").join("INDEX")).unwrap();
        Generator::new(EmitterConfig::default()).run(&options).unwrap();
        let second = std::fs::read_to_string(options.output_dir.join("alarms").join("INDEX")).unwrap();
        assert_eq!(first, second);
    }
}
