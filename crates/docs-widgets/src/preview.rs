//! Preview site configuration (`preview.toml`).
//!
//! The preview server stands in for the documentation host: it renders a
//! fixture page and publishes the prompt templates the same way the real
//! site does, through the `chatgptPromptTemplate` global.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::PromptTemplateSet;

// ── TOML shape ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviewConfig {
    #[serde(default)]
    pub site: SiteSection,
    /// Language → template; published to the page as-is
    #[serde(default)]
    pub templates: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteSection {
    /// Absolute origin used for the server-rendered button href
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            title: default_title(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_title() -> String {
    "Knowledge Core".to_string()
}

impl PreviewConfig {
    /// Load `path`, or fall back to built-in defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            println!("[preview] No config file given, using built-in templates");
            return Ok(Self::default());
        };

        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("Failed to parse config: {}", path.display()))?;

        println!(
            "[preview] Loaded {} ({} custom templates)",
            path.display(),
            config.templates.as_ref().map_or(0, BTreeMap::len)
        );
        Ok(config)
    }

    /// Templates as the widget will see them.
    pub fn template_set(&self) -> PromptTemplateSet {
        self.templates
            .as_ref()
            .map(|templates| PromptTemplateSet::from_map(templates.iter().map(|(k, v)| (k, v.clone()))))
            .unwrap_or_default()
    }

    /// Inline script publishing the templates, or `None` to keep the widget defaults.
    pub fn host_script(&self) -> Result<Option<String>> {
        let Some(templates) = &self.templates else {
            return Ok(None);
        };
        // "</" would close the inline <script> block; "<\/" is the same JSON string
        let json = serde_json::to_string(templates)?.replace("</", r"<\/");
        Ok(Some(format!("window.chatgptPromptTemplate = {};", json)))
    }
}

/// Module script that loads the widget bundle built by cargo-leptos.
pub fn bundle_script(pkg_dir: &str, output_name: &str) -> String {
    format!(
        "import init from '/{pkg}/{name}.js'; init({{ module_or_path: '/{pkg}/{name}.wasm' }});",
        pkg = pkg_dir.trim_matches('/'),
        name = output_name
    )
}
