use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::timers::callback::Timeout;
use pagekit_core::config::DragConfig;
use pagekit_core::{
    Board, ContainerId, ContainerRole, DropTicket, InvariantViolation, ItemId, ItemRegistry,
    Render, ZoneEvent,
};
use wasm_bindgen::JsCast;
use web_sys::{DataTransfer, DragEvent, Element, Event, Node};

use crate::dom;

const DRAG_OVER_CLASS: &str = "drag-over";
const HAS_ITEMS_CLASS: &str = "has-items";
const DRAGGING_CLASS: &str = "dragging";
const DROPPED_CLASS: &str = "dropped";
const LAYOUT_ATTR: &str = "data-layout";

thread_local! {
    static DRAG_DROP_VIEW: RefCell<Option<Rc<DragDropView>>> = RefCell::new(None);
}

/// Scans the page for the origin list, drop zones and items, then wires
/// gesture listeners. Replaces any previously installed view.
pub(crate) fn install(config: &DragConfig) {
    let previous = DRAG_DROP_VIEW.with(|slot| slot.borrow_mut().take());
    drop(previous);
    let Some(document) = dom::document() else {
        return;
    };
    let Some(origin) = document.get_element_by_id(&config.origin_list_id) else {
        gloo::console::warn!("drag-drop: origin list missing", config.origin_list_id.clone());
        return;
    };
    let zones = dom::query_all(&document, &config.zone_selector);
    let items = dom::query_all(&document, &config.item_selector);
    let view = match DragDropView::discover(origin, zones, items, config) {
        Ok(view) => view,
        Err(err) => fail_fast(&err),
    };
    let renders = view.board.borrow().initial_renders();
    view.render(&renders);
    view.install_listeners();
    gloo::console::log!(
        "drag-drop: installed",
        view.containers.len() as u32,
        view.items.len() as u32
    );
    DRAG_DROP_VIEW.with(|slot| {
        *slot.borrow_mut() = Some(view);
    });
}

struct DragDropView {
    board: RefCell<Board>,
    // Indexed by `ContainerId`; the origin list is always first.
    containers: Vec<Element>,
    // Indexed by `ItemId`.
    items: Vec<Element>,
    drop_flash_ms: u32,
    listeners: RefCell<Vec<EventListener>>,
    drop_timers: RefCell<HashMap<ItemId, Timeout>>,
}

impl DragDropView {
    fn discover(
        origin: Element,
        zones: Vec<Element>,
        items: Vec<Element>,
        config: &DragConfig,
    ) -> Result<Rc<Self>, InvariantViolation> {
        let mut containers = vec![origin];
        for zone in zones {
            if !containers.iter().any(|known| same_node(known, &zone)) {
                containers.push(zone);
            }
        }

        let mut builder = ItemRegistry::builder();
        for index in 0..containers.len() {
            let role = if index == 0 {
                ContainerRole::Origin
            } else {
                ContainerRole::Zone
            };
            builder = builder.container(ContainerId(index as u32), role);
        }
        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            let Some(index) = owning_container(&containers, &item) else {
                gloo::console::warn!("drag-drop: item outside any container skipped", item.id());
                continue;
            };
            builder = builder.item(ItemId(kept.len() as u32), ContainerId(index as u32));
            kept.push(item);
        }

        let board = Board::new(builder.build()?, config.layout_rules())?;
        Ok(Rc::new(Self {
            board: RefCell::new(board),
            containers,
            items: kept,
            drop_flash_ms: config.drop_flash_ms,
            listeners: RefCell::new(Vec::new()),
            drop_timers: RefCell::new(HashMap::new()),
        }))
    }

    fn install_listeners(self: &Rc<Self>) {
        let mut listeners = Vec::new();
        let cancelable = EventListenerOptions {
            phase: EventListenerPhase::Bubble,
            passive: false,
        };

        for (index, element) in self.items.iter().enumerate() {
            let id = ItemId(index as u32);
            let view = Rc::downgrade(self);
            let element_id = element.id();
            listeners.push(EventListener::new(element, "dragstart", move |event: &Event| {
                if let Some(transfer) = data_transfer(event) {
                    let _ = transfer.set_data("text/plain", &element_id);
                    transfer.set_effect_allowed("move");
                }
                with_view(&view, |view| view.handle(|board| board.drag_start(id)));
            }));

            let view = Rc::downgrade(self);
            listeners.push(EventListener::new(element, "dragend", move |_event: &Event| {
                with_view(&view, |view| view.handle(Board::drag_end));
            }));
        }

        for (index, element) in self.containers.iter().enumerate() {
            let id = ContainerId(index as u32);

            let view = Rc::downgrade(self);
            listeners.push(EventListener::new_with_options(
                element,
                "dragover",
                cancelable,
                move |event: &Event| {
                    if let Some(transfer) = data_transfer(event) {
                        transfer.set_drop_effect("move");
                    }
                    with_view(&view, |view| view.handle_zone(id, ZoneEvent::DragOver, event));
                },
            ));

            let view = Rc::downgrade(self);
            let container = element.clone();
            listeners.push(EventListener::new(element, "dragleave", move |event: &Event| {
                let pointer_inside = event
                    .dyn_ref::<DragEvent>()
                    .and_then(|event| event.related_target())
                    .and_then(|target| target.dyn_into::<Node>().ok())
                    .map(|node| container.contains(Some(&node)))
                    .unwrap_or(false);
                with_view(&view, |view| {
                    view.handle_zone(id, ZoneEvent::DragLeave { pointer_inside }, event)
                });
            }));

            let view = Rc::downgrade(self);
            listeners.push(EventListener::new_with_options(
                element,
                "drop",
                cancelable,
                move |event: &Event| {
                    with_view(&view, |view| view.handle_zone(id, ZoneEvent::Drop, event));
                },
            ));
        }

        *self.listeners.borrow_mut() = listeners;
    }

    fn handle<F>(self: &Rc<Self>, action: F)
    where
        F: FnOnce(&mut Board) -> Result<Vec<Render>, InvariantViolation>,
    {
        let result = {
            let mut board = self.board.borrow_mut();
            action(&mut board)
        };
        match result {
            Ok(renders) => self.render(&renders),
            Err(err) => fail_fast(&err),
        }
    }

    fn handle_zone(self: &Rc<Self>, id: ContainerId, event: ZoneEvent, dom_event: &Event) {
        let result = self.board.borrow_mut().zone_event(id, event);
        match result {
            Ok(outcome) => {
                if outcome.prevent_default {
                    dom_event.prevent_default();
                }
                self.render(&outcome.renders);
            }
            Err(err) => fail_fast(&err),
        }
    }

    fn render(self: &Rc<Self>, renders: &[Render]) {
        for render in renders {
            let applied = match *render {
                Render::Container(id) => self.render_container(id),
                Render::Item(id) => self.render_item(id),
                Render::Move { item, to } => self.move_item(item, to),
                Render::Rearm(id) => self.rearm(id),
                Render::ScheduleDropClear(ticket) => {
                    self.schedule_drop_clear(ticket);
                    Ok(())
                }
            };
            if let Err(err) = applied {
                fail_fast(&err);
            }
        }
    }

    fn render_container(&self, id: ContainerId) -> Result<(), InvariantViolation> {
        let board = self.board.borrow();
        let view = board.container_view(id)?;
        let presentation = board.presentation(id)?;
        let element = self.container_element(id)?;
        dom::toggle_class(element, DRAG_OVER_CLASS, view.highlighted);
        if view.role == ContainerRole::Zone {
            dom::toggle_class(element, HAS_ITEMS_CLASS, view.has_items);
        }
        let _ = element.set_attribute(LAYOUT_ATTR, presentation.mode.as_str());
        dom::apply_styles(element, &presentation.container);
        for item in board.registry().items_in(id)? {
            dom::apply_styles(self.item_element(*item)?, &presentation.item);
        }
        Ok(())
    }

    fn render_item(&self, id: ItemId) -> Result<(), InvariantViolation> {
        let view = self.board.borrow().item_view(id)?;
        let element = self.item_element(id)?;
        dom::toggle_class(element, DRAGGING_CLASS, view.dragging);
        dom::toggle_class(element, DROPPED_CLASS, view.just_dropped);
        Ok(())
    }

    fn move_item(&self, item: ItemId, to: ContainerId) -> Result<(), InvariantViolation> {
        let container = self.container_element(to)?;
        let element = self.item_element(item)?;
        if let Err(err) = container.append_child(element) {
            gloo::console::warn!("drag-drop: append failed", err);
        }
        Ok(())
    }

    fn rearm(&self, id: ItemId) -> Result<(), InvariantViolation> {
        let _ = self.item_element(id)?.set_attribute("draggable", "true");
        Ok(())
    }

    // A newer drop of the same item replaces (and cancels) the pending timer.
    fn schedule_drop_clear(self: &Rc<Self>, ticket: DropTicket) {
        let view = Rc::downgrade(self);
        let timeout = Timeout::new(self.drop_flash_ms, move || {
            with_view(&view, |view| view.handle(|board| board.clear_dropped(ticket)));
        });
        self.drop_timers.borrow_mut().insert(ticket.item(), timeout);
    }

    fn container_element(&self, id: ContainerId) -> Result<&Element, InvariantViolation> {
        self.containers
            .get(id.0 as usize)
            .ok_or(InvariantViolation::UnknownContainer(id))
    }

    fn item_element(&self, id: ItemId) -> Result<&Element, InvariantViolation> {
        self.items
            .get(id.0 as usize)
            .ok_or(InvariantViolation::UnknownItem(id))
    }
}

fn with_view<F>(view: &Weak<DragDropView>, action: F)
where
    F: FnOnce(&Rc<DragDropView>),
{
    if let Some(view) = view.upgrade() {
        action(&view);
    }
}

fn data_transfer(event: &Event) -> Option<DataTransfer> {
    event.dyn_ref::<DragEvent>()?.data_transfer()
}

fn same_node(a: &Element, b: &Element) -> bool {
    let b: &Node = b.as_ref();
    a.is_same_node(Some(b))
}

fn owning_container(containers: &[Element], item: &Element) -> Option<usize> {
    let mut current = item.parent_element();
    while let Some(parent) = current {
        if let Some(index) = containers
            .iter()
            .position(|container| same_node(container, &parent))
        {
            return Some(index);
        }
        current = parent.parent_element();
    }
    None
}

/// Invariant violations mean the listeners are wired wrong; stop instead of
/// letting membership drift from the page.
fn fail_fast(err: &InvariantViolation) -> ! {
    let message = format!("drag-drop: {err}");
    gloo::console::error!(message.clone());
    wasm_bindgen::throw_str(&message)
}
