use std::cell::RefCell;

use pagekit_core::PageConfig;

const CONFIG_ELEMENT_ID: &str = "pagekit-config";

thread_local! {
    static PAGE_CONFIG: RefCell<Option<PageConfig>> = RefCell::new(None);
}

pub(crate) fn set_page_config(config: PageConfig) {
    PAGE_CONFIG.with(|slot| {
        *slot.borrow_mut() = Some(config);
    });
}

pub(crate) fn page_config() -> PageConfig {
    PAGE_CONFIG
        .with(|slot| slot.borrow().clone())
        .unwrap_or_else(load_page_config)
}

/// Reads the optional `<script type="application/json" id="pagekit-config">`
/// block; anything unusable falls back to defaults.
pub(crate) fn load_page_config() -> PageConfig {
    let Some(raw) = config_source() else {
        return PageConfig::default();
    };
    match PageConfig::from_json(&raw) {
        Ok(config) => {
            gloo::console::log!("pagekit: config loaded");
            config
        }
        Err(err) => {
            gloo::console::warn!("pagekit: config ignored", err.to_string());
            PageConfig::default()
        }
    }
}

fn config_source() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
    let raw = element.text_content()?;
    if raw.trim().is_empty() {
        return None;
    }
    Some(raw)
}
