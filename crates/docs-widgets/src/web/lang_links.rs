use wasm_bindgen::JsCast;
use web_sys::{Element, Window};

use crate::i18n;

const MENU_LINKS: &str = ".md-tabs__link, .md-nav__link";

/// Point language entries in the tabs and navigation at the current page's translation.
pub fn rewrite_menu_links(window: &Window) {
    let Some(document) = window.document() else {
        return;
    };
    let location = window.location();
    let path = location.pathname().unwrap_or_default();
    let search = location.search().unwrap_or_default();
    let hash = location.hash().unwrap_or_default();

    let Ok(links) = document.query_selector_all(MENU_LINKS) else {
        return;
    };
    for i in 0..links.length() {
        let Some(link) = links.item(i).and_then(|node| node.dyn_into::<Element>().ok()) else {
            continue;
        };
        let label = link.text_content().unwrap_or_default();
        if let Some(href) = i18n::switcher_href(&label, &path, &search, &hash) {
            let _ = link.set_attribute("href", &href);
        }
    }
}
