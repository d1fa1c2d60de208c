//! CLI: generate (schemas → page tree) | publish (page tree → site)
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use json_apidoc::config::{CompatibilityPolicy, EmitterConfig};
use json_apidoc::generate::{GenerateOptions, Generator, RunReport};
use json_apidoc::logging::{self, LogFormat};
use json_apidoc::publish::{self, DryRunPublisher, HttpPublisher, PublishConfig, PublishReport, Publisher};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// render extension API schema documents into documentation pages and upload them
#[derive(Parser, Debug)]
#[command(version)]
pub struct CommandLineInterface {
    #[command(flatten)]
    log: LogSettings,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// render schema documents into an output tree
    Generate(GenerateCmd),
    /// upload a generated output tree
    Publish(PublishCmd),
}

#[derive(Args, Debug, Clone)]
struct LogSettings {
    /// more log output (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    log_format: LogFormat,
}

#[derive(clap::Parser, Debug)]
struct GenerateCmd {
    /// directory holding `<name>.json` schema documents
    input_dir: PathBuf,

    /// output directory; receives `<namespace>/<entity>` files
    output_dir: PathBuf,

    /// schema documents to render, by file stem (e.g. `alarms`, `web_request`)
    #[arg(required_unless_present = "all")]
    sources: Vec<String>,

    /// render every `*.json` document of the input directory
    #[arg(long)]
    all: bool,

    /// emitter settings (.toml or .json)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// global object used in syntax examples
    #[arg(long)]
    api_object: Option<String>,

    /// how the browser compatibility section is rendered
    #[arg(long, value_enum)]
    compat_policy: Option<CompatibilityPolicy>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct PublishCmd {
    /// output tree written by `generate`
    output_dir: PathBuf,

    /// namespaces to upload (all when omitted)
    #[arg(long = "namespace", short)]
    namespaces: Vec<String>,

    /// site root
    #[arg(long, default_value = "https://developer.allizom.org")]
    base_url: String,

    #[arg(long, default_value = "en-US")]
    locale: String,

    /// wiki path below the locale
    #[arg(long, default_value = "Add-ons/WebExtensions/API")]
    path_prefix: String,

    #[arg(long, env = "JSON_APIDOC_USER")]
    user: Option<String>,

    #[arg(long, env = "JSON_APIDOC_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// list target URLs without uploading
    #[arg(long)]
    dry_run: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<ExitCode> {
        logging::init(self.log.verbose, self.log.log_format)?;
        match &self.cmd {
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(ExitCode::SUCCESS);
                }
                let config = target.emitter_config()?;
                let options = GenerateOptions {
                    input_dir: target.input_dir.clone(),
                    output_dir: target.output_dir.clone(),
                    sources: target.sources.clone(),
                    all: target.all,
                };
                let report = Generator::new(config)
                    .run(&options)
                    .with_context(|| format!("generation from {} failed", options.input_dir.display()))?;
                print_run_report(&report, &options);
                Ok(exit_code(report.is_success()))
            }
            Command::Publish(target) => {
                let config = target.publish_config();
                let report = if target.dry_run {
                    target.publish_with(&config, &DryRunPublisher)?
                } else {
                    let publisher = HttpPublisher::new(&config).context("cannot build HTTP client")?;
                    target.publish_with(&config, &publisher)?
                };
                print_publish_report(&report, target.dry_run);
                Ok(exit_code(report.is_success()))
            }
        }
    }
}

impl GenerateCmd {
    /// Config file (or defaults), then flag overrides.
    fn emitter_config(&self) -> anyhow::Result<EmitterConfig> {
        let mut config = EmitterConfig::load(self.config.as_deref()).with_context(|| {
            let path = self.config.as_ref().map(|p| p.display().to_string()).unwrap_or_default();
            format!("cannot load emitter config {path}")
        })?;
        if let Some(api_object) = &self.api_object {
            config.api_object = api_object.clone();
        }
        if let Some(policy) = self.compat_policy {
            config.compatibility_policy = policy;
        }
        Ok(config)
    }
}

impl PublishCmd {
    fn publish_config(&self) -> PublishConfig {
        PublishConfig {
            base_url: self.base_url.clone(),
            locale: self.locale.clone(),
            path_prefix: self.path_prefix.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            timeout_secs: self.timeout,
        }
    }

    fn publish_with(&self, config: &PublishConfig, publisher: &dyn Publisher) -> anyhow::Result<PublishReport> {
        publish::publish_tree(&self.output_dir, &self.namespaces, config, publisher)
            .with_context(|| format!("cannot read output tree {}", self.output_dir.display()))
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn exit_code(success: bool) -> ExitCode {
    if success { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn print_run_report(report: &RunReport, options: &GenerateOptions) {
    for reference in &report.unresolved {
        eprintln!("{} {reference}", "?".yellow().bold());
    }
    for failure in &report.document_failures {
        eprintln!("{} {failure} [{}]", "✘".red().bold(), failure.error.kind());
    }
    for failure in &report.failures {
        eprintln!("{} {failure} [{}]", "✘".red().bold(), failure.error.kind());
    }
    let summary = format!("{} pages written to {}", report.pages_written, options.output_dir.display());
    if report.is_success() {
        println!("{} {summary}", "✔".green().bold());
    } else {
        println!(
            "{} {summary}, {} documents and {} entities failed",
            "✘".red().bold(),
            report.document_failures.len(),
            report.failures.len()
        );
    }
}

fn print_publish_report(report: &PublishReport, dry_run: bool) {
    let verb = if dry_run { "would publish" } else { "published" };
    for url in &report.published {
        println!("{} {verb} {url}", "✔".green());
    }
    for failure in &report.failures {
        eprintln!("{} {}: {}", "✘".red().bold(), failure.url, failure.error);
    }
    if !report.is_success() {
        eprintln!("{} of {} pages failed", report.failures.len(), report.failures.len() + report.published.len());
    }
}
