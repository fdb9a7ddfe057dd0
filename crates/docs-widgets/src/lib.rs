//! Client-side widgets for the documentation site.
//!
//! The platform-independent core (prompt composition, the button controller,
//! copy orchestration, language links) builds everywhere. The `hydrate`
//! feature adds the web-sys bindings and the WASM entry point; `ssr` adds the
//! preview site used to try the widgets locally.

pub mod config;
pub mod i18n;
pub mod page;
pub mod prompt;
pub mod widget;

#[cfg(feature = "hydrate")]
pub mod web;

#[cfg(feature = "ssr")]
pub mod app;
#[cfg(feature = "ssr")]
pub mod components;
#[cfg(feature = "ssr")]
pub mod pages;
#[cfg(feature = "ssr")]
pub mod preview;

pub use config::{PromptTemplateSet, WidgetConfig};
pub use page::{CopyError, Page, PageError};
pub use widget::{PromptButton, WidgetState};
