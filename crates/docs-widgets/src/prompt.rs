//! Prompt composition: page URL + language + templates → prompt and share URL.

use regex::{NoExpand, Regex};
use std::sync::LazyLock;

use crate::config::{PromptTemplateSet, WidgetConfig};
use crate::page::Page;

/// Both placeholder spellings: `<CURRENT_PAGE_URL>` and `{{ url }}`.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<CURRENT_PAGE_URL>|\{\{\s*url\s*\}\}").expect("placeholder regex is valid"));

/// Where the user is right now, and the templates in force. Never cached:
/// the host swaps pages and may change its template override in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub url: String,
    pub language: String,
    pub templates: PromptTemplateSet,
}

impl PageContext {
    pub fn capture<P: Page>(page: &P, config: &WidgetConfig) -> Self {
        Self {
            url: page.href(),
            language: resolve_language(page, config),
            templates: config.templates_for_host(page.host_templates().as_ref()),
        }
    }
}

/// Language of the current page.
///
/// A `/xx/` path segment wins and is written back to `<html lang>` so later
/// lookups agree; then the document's `lang` (primary subtag); then the
/// configured default.
pub fn resolve_language<P: Page>(page: &P, config: &WidgetConfig) -> String {
    if let Some(lang) = language_from_path(&page.pathname(), &config.path_languages) {
        page.set_document_lang(&lang);
        return lang;
    }

    page.document_lang()
        .as_deref()
        .and_then(primary_subtag)
        .unwrap_or_else(|| config.default_language.clone())
}

/// First configured language whose `/xx/` segment appears in `path`.
pub fn language_from_path(path: &str, languages: &[String]) -> Option<String> {
    let path = path.to_lowercase();
    languages
        .iter()
        .find(|lang| path.contains(&format!("/{}/", lang)))
        .cloned()
}

/// `"en-US"` → `"en"`; blank → `None`.
pub fn primary_subtag(lang: &str) -> Option<String> {
    let lang = lang.trim();
    if lang.is_empty() {
        return None;
    }
    lang.split('-').next().map(str::to_lowercase)
}

/// Substitute every placeholder in `template` with `url`, verbatim.
pub fn fill_template(template: &str, url: &str) -> String {
    PLACEHOLDER.replace_all(template, NoExpand(url)).into_owned()
}

/// Prompt for `url` in `language`.
pub fn compose_prompt(templates: &PromptTemplateSet, url: &str, language: &str) -> String {
    fill_template(templates.template_for(language), url)
}

/// Assistant URL carrying `prompt` as its `prompt` query parameter.
pub fn build_share_url(service_url: &str, prompt: &str) -> String {
    format!("{}?prompt={}", service_url, urlencoding::encode(prompt))
}

/// Prompt and share URL for the current page.
pub fn compose_for_page(config: &WidgetConfig, context: &PageContext) -> (String, String) {
    let prompt = compose_prompt(&context.templates, &context.url, &context.language);
    let share_url = build_share_url(&config.service_url, &prompt);
    (prompt, share_url)
}

/// User-visible strings for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    pub label: &'static str,
    pub copied: &'static str,
    pub copy_failed: &'static str,
    pub toast_copied: &'static str,
    pub toast_failed: &'static str,
}

const EN_MESSAGES: Messages = Messages {
    label: "Open in ChatGPT",
    copied: "Copied!",
    copy_failed: "Copy failed",
    toast_copied: "Prompt copied to clipboard",
    toast_failed: "Could not copy the prompt, paste the page link manually",
};

const RU_MESSAGES: Messages = Messages {
    label: "Открыть в ChatGPT",
    copied: "Скопировано!",
    copy_failed: "Ошибка копирования",
    toast_copied: "Промпт скопирован в буфер обмена",
    toast_failed: "Не удалось скопировать промпт, вставьте ссылку на страницу вручную",
};

impl Messages {
    pub fn for_language(language: &str) -> &'static Messages {
        match language {
            "ru" => &RU_MESSAGES,
            _ => &EN_MESSAGES,
        }
    }
}
