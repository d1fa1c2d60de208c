//! Page Emitter configuration.
//!
//! Loaded from a TOML or JSON file (by extension) and then overridden by
//! command-line flags. Every field has a default, so an empty file (or no
//! file) reproduces the stock WebExtensions documentation layout.
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const CHROME_COMMON: &str =
    "https://chromium.googlesource.com/chromium/src/+/master/chrome/common/extensions/api/{file}.json";
const EXTENSIONS_COMMON: &str =
    "https://chromium.googlesource.com/chromium/src/+/master/extensions/common/api/{file}.json";

const CHROMIUM_LICENSE: &str = "\
// Copyright 2015 The Chromium Authors. All rights reserved.
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are
// met:
//
//    * Redistributions of source code must retain the above copyright
// notice, this list of conditions and the following disclaimer.
//    * Redistributions in binary form must reproduce the above
// copyright notice, this list of conditions and the following disclaimer
// in the documentation and/or other materials provided with the
// distribution.
//    * Neither the name of Google Inc. nor the names of its
// contributors may be used to endorse or promote products derived from
// this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS
// \"AS IS\" AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT
// LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR
// A PARTICULAR PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT
// OWNER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL,
// SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT
// LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE,
// DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY
// THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT
// (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmitterConfig {
    /// Global object used in syntax examples (`browser.alarms.create(...)`).
    pub api_object: String,
    /// Object named in the acknowledgement (`chrome.alarms`).
    pub upstream_api_object: String,
    pub upstream_docs_base: String,
    pub source_links: SourceLinks,
    pub license_banner: String,
    pub compatibility_policy: CompatibilityPolicy,
    pub compat_prefix: String,
    pub tags: Vec<String>,
}

/// Where each schema document lives upstream. Templates contain `{file}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceLinks {
    pub default_template: Option<String>,
    pub templates: IndexMap<String, String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityPolicy {
    /// The same placeholder on every page.
    StaticPlaceholder,
    /// A compatibility macro keyed by `<prefix>.<namespace>.<entity>`.
    PerFeatureFlag,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            api_object: "browser".to_string(),
            upstream_api_object: "chrome".to_string(),
            upstream_docs_base: "https://developer.chrome.com/extensions/".to_string(),
            source_links: SourceLinks::default(),
            license_banner: CHROMIUM_LICENSE.to_string(),
            compatibility_policy: CompatibilityPolicy::PerFeatureFlag,
            compat_prefix: "webextensions.api".to_string(),
            tags: ["API", "Add-ons", "Extensions", "WebExtensions"].map(String::from).to_vec(),
        }
    }
}

impl Default for SourceLinks {
    fn default() -> Self {
        let chrome = [
            "windows", "tabs", "extension", "bookmarks", "cookies", "i18n", "browser_action",
            "context_menus", "web_navigation", "alarms", "notifications",
        ];
        let extensions = ["runtime", "idle", "storage", "web_request"];
        let templates = chrome
            .iter()
            .map(|f| (f.to_string(), CHROME_COMMON.to_string()))
            .chain(extensions.iter().map(|f| (f.to_string(), EXTENSIONS_COMMON.to_string())))
            .collect();
        Self { default_template: Some(CHROME_COMMON.to_string()), templates }
    }
}

impl SourceLinks {
    /// URL of the upstream schema file for `source_name`, if any template applies.
    pub fn url_for(&self, source_name: &str) -> Option<String> {
        self.templates
            .get(source_name)
            .or(self.default_template.as_ref())
            .map(|t| t.replace("{file}", source_name))
    }
}

impl EmitterConfig {
    /// Defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => {
                toml::from_str(&text).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
            }
            Some("json") => crate::path_de::from_str_with_path(&text),
            _ => Err(Error::Config(format!(
                "unsupported config format (expected .toml or .json): {}",
                path.display()
            ))),
        }
    }
}
