use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use js_sys::Array;
use pagekit_core::config::NavConfig;
use pagekit_core::nav::{is_activation_key, observer_root_margin, target_from_href};
use pagekit_core::{NavModel, NavUpdate, SectionGeometry};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent, ScrollBehavior, ScrollToOptions,
};

use crate::dom;

const ACTIVE_CLASS: &str = "active";
const MINIMIZED_CLASS: &str = "minimized";

thread_local! {
    static NAVIGATION_VIEW: RefCell<Option<Rc<NavigationView>>> = RefCell::new(None);
}

pub(crate) fn install(config: &NavConfig) {
    let previous = NAVIGATION_VIEW.with(|slot| slot.borrow_mut().take());
    drop(previous);
    let Some(document) = dom::document() else {
        return;
    };
    let links = dom::query_all(&document, &config.link_selector);
    if links.is_empty() {
        gloo::console::warn!("navigation: no links", config.link_selector.clone());
        return;
    }
    let view = NavigationView::new(&document, links, config);
    view.sync(None);
    view.install_listeners(config);
    view.observe_sections(&document, config);
    gloo::console::log!("navigation: installed", view.links.len() as u32);
    NAVIGATION_VIEW.with(|slot| {
        *slot.borrow_mut() = Some(view);
    });
}

struct NavigationView {
    model: RefCell<NavModel>,
    links: Vec<Element>,
    header: Option<Element>,
    navigation_section: Option<Element>,
    listeners: RefCell<Vec<EventListener>>,
    observer: RefCell<Option<SectionObserver>>,
}

impl NavigationView {
    fn new(document: &Document, links: Vec<Element>, config: &NavConfig) -> Rc<Self> {
        let targets = links
            .iter()
            .map(|link| {
                let href = link.get_attribute("href").unwrap_or_default();
                target_from_href(&href).to_string()
            })
            .collect();
        Rc::new(Self {
            model: RefCell::new(NavModel::with_settings(
                targets,
                &config.navigation_section_id,
                config.scroll_padding,
            )),
            links,
            header: dom::query(document, &config.header_selector),
            navigation_section: document.get_element_by_id(&config.navigation_section_id),
            listeners: RefCell::new(Vec::new()),
            observer: RefCell::new(None),
        })
    }

    fn install_listeners(self: &Rc<Self>, config: &NavConfig) {
        let mut listeners = Vec::new();
        for (index, link) in self.links.iter().enumerate() {
            let _ = link.set_attribute("tabindex", "0");

            let view = Rc::downgrade(self);
            listeners.push(EventListener::new(link, "click", move |event: &Event| {
                event.prevent_default();
                with_view(&view, |view| view.activate(index));
            }));

            let view = Rc::downgrade(self);
            listeners.push(EventListener::new(link, "keydown", move |event: &Event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                if is_activation_key(&event.key()) {
                    event.prevent_default();
                    with_view(&view, |view| view.activate(index));
                }
            }));

            let target = link.clone();
            let outline = config.focus_outline.clone();
            let offset = config.focus_outline_offset.clone();
            listeners.push(EventListener::new(link, "focus", move |_event: &Event| {
                set_outline(&target, &outline, &offset);
            }));

            let target = link.clone();
            listeners.push(EventListener::new(link, "blur", move |_event: &Event| {
                set_outline(&target, "", "");
            }));
        }
        *self.listeners.borrow_mut() = listeners;
    }

    fn activate(&self, index: usize) {
        let Some(document) = dom::document() else {
            return;
        };
        let section = {
            let model = self.model.borrow();
            model
                .target(index)
                .and_then(|target| document.get_element_by_id(target))
        };
        let Some(section) = section else {
            return;
        };
        let geometry = SectionGeometry {
            section_top: section.get_bounding_client_rect().top(),
            scroll_y: web_sys::window()
                .and_then(|window| window.scroll_y().ok())
                .unwrap_or(0.0),
            header_height: self.header_height(),
        };
        let update = self.model.borrow_mut().activate(index, geometry);
        self.sync(update);
    }

    fn section_visible(&self, section_id: &str) {
        let update = self.model.borrow_mut().section_visible(section_id);
        if update.is_some() {
            self.sync(update);
        }
    }

    fn sync(&self, update: Option<NavUpdate>) {
        let (active, minimized) = {
            let model = self.model.borrow();
            (model.active(), model.minimized())
        };
        for (index, link) in self.links.iter().enumerate() {
            dom::toggle_class(link, ACTIVE_CLASS, active == Some(index));
        }
        if let Some(section) = &self.navigation_section {
            dom::toggle_class(section, MINIMIZED_CLASS, minimized);
        }
        let Some(top) = update.and_then(|update| update.scroll_to) else {
            return;
        };
        if let Some(window) = web_sys::window() {
            let options = ScrollToOptions::new();
            options.set_top(top);
            options.set_behavior(ScrollBehavior::Smooth);
            window.scroll_to_with_scroll_to_options(&options);
        }
    }

    fn header_height(&self) -> f64 {
        self.header
            .as_ref()
            .and_then(|header| header.dyn_ref::<HtmlElement>())
            .map(|header| f64::from(header.offset_height()))
            .unwrap_or(0.0)
    }

    fn observe_sections(self: &Rc<Self>, document: &Document, config: &NavConfig) {
        let sections = dom::query_all(document, &config.section_selector);
        if sections.is_empty() {
            return;
        }
        let view = Rc::downgrade(self);
        let observer = SectionObserver::new(
            &observer_root_margin(self.header_height()),
            config.section_threshold,
            move |section_id| with_view(&view, |view| view.section_visible(section_id)),
        );
        let Some(observer) = observer else {
            gloo::console::warn!("navigation: section observer unavailable");
            return;
        };
        for section in &sections {
            observer.observe(section);
        }
        *self.observer.borrow_mut() = Some(observer);
    }
}

/// Disconnects on drop so a reinstall does not leave a live observer behind.
struct SectionObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl SectionObserver {
    fn new<F>(root_margin: &str, threshold: f64, mut on_visible: F) -> Option<Self>
    where
        F: FnMut(&str) + 'static,
    {
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if entry.is_intersecting() {
                        on_visible(&entry.target().id());
                    }
                }
            },
        );
        let options = IntersectionObserverInit::new();
        options.set_root_margin(root_margin);
        options.set_threshold(&JsValue::from_f64(threshold));
        let observer = IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &options,
        )
        .ok()?;
        Some(Self {
            observer,
            _callback: callback,
        })
    }

    fn observe(&self, section: &Element) {
        self.observer.observe(section);
    }
}

impl Drop for SectionObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

fn with_view<F>(view: &Weak<NavigationView>, action: F)
where
    F: FnOnce(&NavigationView),
{
    if let Some(view) = view.upgrade() {
        action(&view);
    }
}

fn set_outline(element: &Element, outline: &str, offset: &str) {
    let Some(element) = element.dyn_ref::<HtmlElement>() else {
        return;
    };
    let style = element.style();
    if outline.is_empty() {
        let _ = style.remove_property("outline");
        let _ = style.remove_property("outline-offset");
    } else {
        let _ = style.set_property("outline", outline);
        let _ = style.set_property("outline-offset", offset);
    }
}
