use leptos::prelude::*;

use crate::config::{PromptTemplateSet, WidgetConfig};
use crate::prompt::{Messages, build_share_url, compose_prompt};

/// Server-rendered prompt button.
/// The href already works without JavaScript; the WASM widget finds the
/// anchor by id and keeps it current across page swaps.
#[component]
pub fn PromptLink(
    /// Absolute URL of the page being rendered
    #[prop(into)]
    page_url: String,
    #[prop(into)] language: String,
    templates: PromptTemplateSet,
) -> impl IntoView {
    let config = WidgetConfig::default();
    let prompt = compose_prompt(&templates, &page_url, &language);
    let href = build_share_url(&config.service_url, &prompt);
    let label = Messages::for_language(&language).label;

    view! {
        <div class=config.wrapper_class>
            <a id=config.button_id class="md-button" href=href target="_blank" rel="noopener">
                {label}
            </a>
        </div>
    }
}
