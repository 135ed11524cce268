//! Browser shell for the content page: drag-and-drop zones, the section
//! navigation highlighter and the filterable article list. Gesture and
//! filtering logic lives in `pagekit-core`; this crate only binds it to the
//! DOM.

mod app_runtime;
mod article_list;
mod dom;
mod drag_drop;
mod navigation;

use pagekit_core::PageConfig;

/// Installs every feature using the page's configuration block (if any).
/// Later calls reuse the configuration resolved by the first one.
pub fn start() {
    start_with(app_runtime::page_config());
}

/// Installs every feature with an explicit configuration, replacing any
/// previous installation.
pub fn start_with(config: PageConfig) {
    app_runtime::set_page_config(config.clone());
    drag_drop::install(&config.drag);
    navigation::install(&config.nav);
    article_list::mount(&config.articles);
}
