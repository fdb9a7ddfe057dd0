//! Language switcher links.
//!
//! The site keeps each translation under a `/xx/` path segment. Menu entries
//! named after a language are rewritten to point at the same page in that
//! language.

/// Languages the site is published in.
pub const SUPPORTED_LANGUAGES: &[&str] = &["ru", "en", "de", "fi", "cn"];

/// Language assumed for paths without a language segment.
pub const SITE_DEFAULT_LANGUAGE: &str = "ru";

/// Menu label → language code.
const LANGUAGE_LABELS: &[(&str, &str)] = &[
    ("English", "en"),
    ("Русский", "ru"),
    ("Deutsch", "de"),
    ("Suomi", "fi"),
    ("中文", "cn"),
];

/// Index (into `path.split('/')`) of the leftmost `/xx/` segment naming a
/// supported language.
fn language_segment(segments: &[&str], supported: &[&str]) -> Option<usize> {
    if segments.len() < 3 {
        return None;
    }
    (1..segments.len() - 1).find(|&i| supported.iter().any(|lang| segments[i].eq_ignore_ascii_case(lang)))
}

/// Language of `path`, or `default` when it has no language segment.
pub fn current_language(path: &str, supported: &[&str], default: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    language_segment(&segments, supported)
        .map(|i| segments[i].to_ascii_lowercase())
        .unwrap_or_else(|| default.to_string())
}

/// Same page in `target` language.
///
/// Replaces the existing language segment, or appends one when the path has
/// none. Unsupported targets leave the URL unchanged.
pub fn localized_url(path: &str, search: &str, hash: &str, target: &str, supported: &[&str]) -> String {
    if !supported.contains(&target) {
        return format!("{}{}{}", path, search, hash);
    }

    let mut segments: Vec<&str> = path.split('/').collect();
    let localized_path = match language_segment(&segments, supported) {
        Some(i) => {
            segments[i] = target;
            segments.join("/")
        }
        None => collapse_slashes(&format!("{}/{}/", path.trim_end_matches('/'), target)),
    };

    format!("{}{}{}", localized_path, search, hash)
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Language named by a menu label, ignoring surrounding and repeated whitespace.
pub fn language_for_label(label: &str) -> Option<&'static str> {
    let normalized = label.split_whitespace().collect::<Vec<_>>().join(" ");
    LANGUAGE_LABELS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, lang)| *lang)
}

/// New `href` for a menu link labelled `label`, or `None` if it should stay.
pub fn switcher_href(label: &str, path: &str, search: &str, hash: &str) -> Option<String> {
    let target = language_for_label(label)?;
    let current = current_language(path, SUPPORTED_LANGUAGES, SITE_DEFAULT_LANGUAGE);
    if target == current {
        return None;
    }
    Some(localized_url(path, search, hash, target, SUPPORTED_LANGUAGES))
}
