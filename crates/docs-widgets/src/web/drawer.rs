//! Keep the navigation drawer closed on phones.
//!
//! The theme restores the drawer's previous state after a page swap, which
//! leaves it open over the new page on narrow screens.

use js_sys::Reflect;
use std::cell::Cell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlInputElement, Window};

const MOBILE_QUERY: &str = "(max-width: 76.24em)";
const DRAWER_TOGGLE: &str = "input#__drawer, [data-md-toggle=\"drawer\"]";
const DISMISS_TARGETS: &[&str] = &[".md-overlay", ".md-sidebar--primary a"];

thread_local! {
    static HANDLERS_BOUND: Cell<bool> = const { Cell::new(false) };
}

fn is_mobile(window: &Window) -> bool {
    window
        .match_media(MOBILE_QUERY)
        .ok()
        .flatten()
        .is_some_and(|list| list.matches())
}

fn close_drawer(window: &Window, document: &Document) {
    let Some(toggle) = document
        .query_selector(DRAWER_TOGGLE)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    else {
        return;
    };
    toggle.set_checked(false);

    // Persist the closed state the way the theme does
    if let Ok(md_set) = Reflect::get(window, &JsValue::from_str("__md_set"))
        && let Some(md_set) = md_set.dyn_ref::<js_sys::Function>()
    {
        let _ = md_set.call2(window, &JsValue::from_str("__drawer"), &JsValue::FALSE);
    }
}

fn close_on_mobile(window: &Window) {
    if !is_mobile(window) {
        return;
    }
    if let Some(document) = window.document() {
        close_drawer(window, &document);
    }
}

/// Close the drawer when the overlay or a sidebar link is tapped. Once per page load.
fn bind_handlers(window: &Window) {
    if HANDLERS_BOUND.with(|bound| bound.replace(true)) {
        return;
    }
    let Some(document) = window.document() else {
        return;
    };

    let click_window = window.clone();
    let on_click = Closure::<dyn Fn(web_sys::Event)>::new(move |event: web_sys::Event| {
        if !is_mobile(&click_window) {
            return;
        }
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let dismiss = DISMISS_TARGETS
            .iter()
            .any(|selector| target.closest(selector).ok().flatten().is_some());
        if dismiss && let Some(document) = click_window.document() {
            close_drawer(&click_window, &document);
        }
    });
    let _ = document.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
    on_click.forget();

    if let Ok(Some(list)) = window.match_media(MOBILE_QUERY) {
        let change_window = window.clone();
        let on_change = Closure::<dyn Fn()>::new(move || close_on_mobile(&change_window));
        let _ = list.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref());
        on_change.forget();
    }
}

/// Close the drawer two frames from now, after the theme has restored its state.
pub fn reset_after_theme_ready(window: &Window) {
    let frame_window = window.clone();
    let first_frame = Closure::once_into_js(move || {
        let inner_window = frame_window.clone();
        let second_frame = Closure::once_into_js(move || {
            close_on_mobile(&inner_window);
            bind_handlers(&inner_window);
        });
        if frame_window.request_animation_frame(second_frame.unchecked_ref()).is_err() {
            close_on_mobile(&frame_window);
            bind_handlers(&frame_window);
        }
    });

    if window.request_animation_frame(first_frame.unchecked_ref()).is_err() {
        close_on_mobile(window);
        bind_handlers(window);
    }
}
