use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::hooks::{use_location, use_params_map};

use crate::components::PromptLink;
use crate::i18n::SITE_DEFAULT_LANGUAGE;
use crate::preview::PreviewConfig;

struct GuideText {
    heading: &'static str,
    lead: &'static str,
    body: &'static str,
}

const EN_TEXT: GuideText = GuideText {
    heading: "Getting started",
    lead: "This page hosts the documentation widgets so they can be tried without the full site.",
    body: "Hover the button to see its link follow the current page, click it to copy the prompt and open the assistant. \
           Narrow the window below the desktop breakpoint and the button goes away.",
};

const RU_TEXT: GuideText = GuideText {
    heading: "Начало работы",
    lead: "Эта страница нужна, чтобы проверить виджеты документации без полной сборки сайта.",
    body: "Наведите курсор на кнопку: ссылка обновится под текущую страницу. Нажмите, чтобы скопировать промпт и открыть ассистента. \
           На узком экране кнопка скрывается.",
};

/// Fixture page with the anchors the widgets look for.
#[component]
pub fn GuidePage() -> impl IntoView {
    let preview = expect_context::<PreviewConfig>();
    let language = use_params_map()
        .get_untracked()
        .get("lang")
        .unwrap_or_else(|| SITE_DEFAULT_LANGUAGE.to_string());
    let path = use_location().pathname.get_untracked();
    let page_url = format!("{}{}", preview.site.base_url.trim_end_matches('/'), path);
    let text = if language == "en" { &EN_TEXT } else { &RU_TEXT };

    view! {
        <Title text=format!("{} - {}", text.heading, preview.site.title) />
        <input class="md-toggle" data-md-toggle="drawer" type="checkbox" id="__drawer" autocomplete="off" />
        <header class="md-header">
            <nav class="md-header__inner">
                <span class="md-header__title">{preview.site.title.clone()}</span>
                <div class="md-tabs">
                    <a class="md-tabs__link" href="/en/guide">"English"</a>
                    <a class="md-tabs__link" href="/ru/guide">"Русский"</a>
                </div>
            </nav>
        </header>
        <div class="md-container">
            <main class="md-main">
                <div class="md-main__inner">
                    <div class="md-sidebar md-sidebar--primary">
                        <nav class="md-nav">
                            <a class="md-nav__link" href="/">"Index"</a>
                            <a class="md-nav__link" href="/en/guide">"English"</a>
                            <a class="md-nav__link" href="/ru/guide">"Русский"</a>
                        </nav>
                    </div>
                    <label class="md-overlay" for="__drawer"></label>
                    <div class="md-content">
                        <article class="md-content__inner md-typeset">
                            <div class="md-content__button">
                                <PromptLink page_url=page_url language=language.clone() templates=preview.template_set() />
                            </div>
                            <h1>{text.heading}</h1>
                            <p>{text.lead}</p>
                            <p>{text.body}</p>
                        </article>
                    </div>
                </div>
            </main>
        </div>
    }
}
