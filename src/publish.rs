//! Uploading a generated output tree to the documentation site.
//!
//! Each page is sent as one `PUT` of a JSON object: the page header fields
//! plus `content` (the body). A namespace's `INDEX` page goes first so the
//! parent document exists before its children.
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::output::{self, INDEX_SLUG, StoredPage};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PublishConfig {
    pub base_url: String,
    pub locale: String,
    /// Wiki path under the locale (`Add-ons/WebExtensions/API`).
    pub path_prefix: String,
    pub user: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub timeout_secs: u64,
}

/// Destination of rendered pages.
pub trait Publisher {
    fn publish(&self, page: &StoredPage, url: &str) -> Result<()>;
}

pub struct HttpPublisher {
    client: reqwest::blocking::Client,
    user: Option<String>,
    password: Option<String>,
}

/// Logs what would be sent and sends nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunPublisher;

#[derive(Debug)]
pub struct PublishFailure {
    pub url: String,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct PublishReport {
    pub published: Vec<String>,
    pub failures: Vec<PublishFailure>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            base_url: "https://developer.allizom.org".to_string(),
            locale: "en-US".to_string(),
            path_prefix: "Add-ons/WebExtensions/API".to_string(),
            user: None,
            password: None,
            timeout_secs: 30,
        }
    }
}

impl PublishConfig {
    /// `{base}/{locale}/{prefix}/{ns}` for the index, `…/{ns}/{slug}` otherwise.
    pub fn page_url(&self, namespace: &str, slug: &str) -> String {
        let mut url = format!(
            "{}/{}/{}/{namespace}",
            self.base_url.trim_end_matches('/'),
            self.locale.trim_matches('/'),
            self.path_prefix.trim_matches('/'),
        );
        if slug != INDEX_SLUG {
            url.push('/');
            url.push_str(slug);
        }
        url
    }
}

impl HttpPublisher {
    pub fn new(config: &PublishConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, user: config.user.clone(), password: config.password.clone() })
    }
}

impl Publisher for HttpPublisher {
    fn publish(&self, page: &StoredPage, url: &str) -> Result<()> {
        let mut request = self.client.put(url).json(&payload(page));
        if let Some(user) = &self.user {
            request = request.basic_auth(user, self.password.as_ref());
        }
        let response = request.send()?;
        let status = response.status();
        debug!(%url, %status, "page uploaded");
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(Error::Publish {
                url: url.to_string(),
                message: format!("HTTP {status}: {}", detail.trim()),
            });
        }
        Ok(())
    }
}

impl Publisher for DryRunPublisher {
    fn publish(&self, page: &StoredPage, url: &str) -> Result<()> {
        info!(%url, bytes = page.body.len(), "dry run, not uploading");
        Ok(())
    }
}

impl PublishReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Header fields + `content`; a revision `comment` is added unless the
/// header already carries one.
pub fn payload(page: &StoredPage) -> Value {
    let mut object = page.header.clone();
    object.insert("content".to_string(), Value::String(page.body.clone()));
    object
        .entry("comment")
        .or_insert_with(|| Value::String(format!("Generated {}", Utc::now().format("%Y-%m-%d %H:%M UTC"))));
    Value::Object(object)
}

/// Uploads the namespaces of `out_dir` (all subdirectories when `namespaces`
/// is empty). A failing page is recorded and the rest continue; only an
/// unreadable tree aborts.
pub fn publish_tree(
    out_dir: &Path,
    namespaces: &[String],
    config: &PublishConfig,
    publisher: &dyn Publisher,
) -> Result<PublishReport> {
    let dirs = if namespaces.is_empty() {
        namespace_dirs(out_dir)?
    } else {
        namespaces.iter().map(|ns| out_dir.join(ns)).collect()
    };

    let mut report = PublishReport::default();
    for dir in dirs {
        for page in output::read_namespace(&dir)? {
            let url = config.page_url(&page.namespace, &page.slug);
            match publisher.publish(&page, &url) {
                Ok(()) => {
                    info!(%url, "published");
                    report.published.push(url);
                }
                Err(error) => {
                    warn!(%url, %error, "publish failed");
                    report.failures.push(PublishFailure { url, error });
                }
            }
        }
    }
    Ok(report)
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn namespace_dirs(out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(out_dir).map_err(|e| Error::io(out_dir, e))? {
        let path = entry.map_err(|e| Error::io(out_dir, e))?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}
