//! Widget configuration: DOM contract, timing, templates.
//!
//! Everything the widgets need to know about the host site lives here so the
//! rest of the crate never hard-codes selectors or delays.

use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Built-in English template, also the last step of the fallback chain.
pub const DEFAULT_EN_TEMPLATE: &str = "Read <CURRENT_PAGE_URL> and answer questions about the content.";

/// Built-in Russian template.
pub const DEFAULT_RU_TEMPLATE: &str = "Прочитай <CURRENT_PAGE_URL> и отвечай на вопросы о содержимом.";

/// Language that must always be present in a template set.
pub const FALLBACK_LANGUAGE: &str = "en";

// ── Templates ─────────────────────────────────────────────────────────────────

/// Prompt templates keyed by two-letter language code.
///
/// Always holds an `en` entry, so lookups can never come back empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplateSet {
    templates: BTreeMap<String, String>,
}

impl Default for PromptTemplateSet {
    fn default() -> Self {
        let mut templates = BTreeMap::new();
        templates.insert("ru".to_string(), DEFAULT_RU_TEMPLATE.to_string());
        templates.insert(FALLBACK_LANGUAGE.to_string(), DEFAULT_EN_TEMPLATE.to_string());
        Self { templates }
    }
}

impl PromptTemplateSet {
    /// Build a set from a host-supplied mapping.
    ///
    /// Blank templates are dropped and language keys are lowercased. A missing
    /// `en` entry is filled with the built-in English template.
    pub fn from_map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut templates: BTreeMap<String, String> = entries
            .into_iter()
            .map(|(lang, template)| (lang.as_ref().trim().to_lowercase(), template.into()))
            .filter(|(lang, template)| !lang.is_empty() && !template.trim().is_empty())
            .collect();

        templates
            .entry(FALLBACK_LANGUAGE.to_string())
            .or_insert_with(|| DEFAULT_EN_TEMPLATE.to_string());

        Self { templates }
    }

    /// Interpret the host's `chatgptPromptTemplate` global.
    ///
    /// * a non-blank string becomes the English template
    /// * an object maps languages to templates (non-string values ignored)
    /// * anything else yields `None`, meaning "use the defaults"
    pub fn from_host_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(template) if !template.trim().is_empty() => {
                Some(Self::from_map([(FALLBACK_LANGUAGE, template.clone())]))
            }
            Value::Object(map) => Some(Self::from_map(
                map.iter()
                    .filter_map(|(lang, template)| template.as_str().map(|t| (lang.as_str(), t.to_string()))),
            )),
            _ => None,
        }
    }

    /// Template for `language`, falling back to English.
    pub fn template_for(&self, language: &str) -> &str {
        self.templates
            .get(language)
            .or_else(|| self.templates.get(FALLBACK_LANGUAGE))
            .map(String::as_str)
            .unwrap_or(DEFAULT_EN_TEMPLATE)
    }

    #[cfg(test)]
    fn languages(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}

// ── Widget configuration ──────────────────────────────────────────────────────

/// Runtime configuration for the prompt button.
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    /// Element id of the button anchor
    pub button_id: String,
    /// Class of the wrapper placed around a synthesized button
    pub wrapper_class: String,
    /// Insertion points for a synthesized button, tried in order
    pub insertion_points: Vec<String>,
    /// Element id of the single toast node
    pub toast_id: String,
    /// Base URL of the assistant service (the prompt is appended as `?prompt=`)
    pub service_url: String,
    /// Language used when neither the URL nor the document declares one
    pub default_language: String,
    /// Languages recognized as `/xx/` path segments
    pub path_languages: Vec<String>,
    /// Templates used when the host global is unset or unusable
    pub templates: PromptTemplateSet,
    /// The widget only exists while this media query matches
    pub activation_query: String,
    /// Toasts are only shown while this media query matches (`None` disables toasts)
    pub toast_query: Option<String>,
    pub success_delay: Duration,
    pub failure_delay: Duration,
    pub toast_duration: Duration,
    /// Wait this long after copying before opening the share URL
    pub open_delay: Option<Duration>,
    /// Try the copy once more after the share URL is opened if the first attempt failed
    pub retry_after_open: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            button_id: "chatgpt-open-button".to_string(),
            wrapper_class: "chatgpt-action".to_string(),
            insertion_points: vec![".md-content__button".to_string(), ".md-content__inner".to_string()],
            toast_id: "chatgpt-toast".to_string(),
            service_url: "https://chatgpt.com/".to_string(),
            default_language: FALLBACK_LANGUAGE.to_string(),
            path_languages: vec!["ru".to_string(), "en".to_string()],
            templates: PromptTemplateSet::default(),
            activation_query: "(min-width: 76.25em)".to_string(),
            toast_query: Some("(min-width: 76.25em)".to_string()),
            success_delay: Duration::from_millis(1000),
            failure_delay: Duration::from_millis(1200),
            toast_duration: Duration::from_millis(2500),
            open_delay: None,
            retry_after_open: true,
        }
    }
}

impl WidgetConfig {
    /// Templates for one composition: the host override when it parses,
    /// otherwise the configured set.
    pub fn templates_for_host(&self, host: Option<&Value>) -> PromptTemplateSet {
        host.and_then(PromptTemplateSet::from_host_value)
            .unwrap_or_else(|| self.templates.clone())
    }
}
