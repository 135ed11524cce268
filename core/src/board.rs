//! Drag-and-drop state for one page.
//!
//! The board owns membership, the drag session and every visual flag. Each
//! gesture method mutates state to completion and returns the [`Render`]
//! work the page shell must perform to mirror it.

use std::collections::HashMap;

use crate::error::InvariantViolation;
use crate::layout::{LayoutMode, LayoutPresentation, LayoutRules};
use crate::registry::{ContainerId, ContainerRole, ItemId, ItemRegistry};
use crate::session::DragSession;
use crate::zone::{self, ZoneEffect, ZoneEvent, ZoneTarget};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct ContainerFlags {
    highlighted: bool,
    has_items: bool,
    layout: LayoutMode,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct ItemFlags {
    dragging: bool,
    just_dropped: bool,
    drop_generation: u64,
}

/// Pairs a deferred `just_dropped` clear with the drop that scheduled it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropTicket {
    item: ItemId,
    generation: u64,
}

impl DropTicket {
    pub fn item(&self) -> ItemId {
        self.item
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Render {
    /// Re-sync the container's markers and its items' layout styles.
    Container(ContainerId),
    /// Re-sync the item's `dragging` / `dropped` markers.
    Item(ItemId),
    /// Append the item's element to the container's element.
    Move { item: ItemId, to: ContainerId },
    /// Make sure the item still accepts drag gestures after relocation.
    Rearm(ItemId),
    ScheduleDropClear(DropTicket),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub prevent_default: bool,
    pub renders: Vec<Render>,
}

impl Outcome {
    fn push(&mut self, render: Render) {
        push_render(&mut self.renders, render);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContainerView {
    pub role: ContainerRole,
    pub highlighted: bool,
    pub has_items: bool,
    pub layout: LayoutMode,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemView {
    pub dragging: bool,
    pub just_dropped: bool,
}

pub struct Board {
    registry: ItemRegistry,
    session: DragSession,
    rules: LayoutRules,
    containers: HashMap<ContainerId, ContainerFlags>,
    items: HashMap<ItemId, ItemFlags>,
}

impl Board {
    /// Establishes initial presentation: layout for every container and
    /// `has_items` for drop zones.
    pub fn new(registry: ItemRegistry, rules: LayoutRules) -> Result<Self, InvariantViolation> {
        let mut containers = HashMap::new();
        for id in registry.containers() {
            let count = registry.item_count(id)?;
            let role = registry.role(id)?;
            containers.insert(
                id,
                ContainerFlags {
                    highlighted: false,
                    has_items: role == ContainerRole::Zone && count > 0,
                    layout: rules.mode_for(count),
                },
            );
        }
        let items = registry
            .items()
            .iter()
            .map(|id| (*id, ItemFlags::default()))
            .collect();
        Ok(Self {
            registry,
            session: DragSession::Closed,
            rules,
            containers,
            items,
        })
    }

    pub fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    pub fn rules(&self) -> &LayoutRules {
        &self.rules
    }

    /// Everything the shell has to draw once after discovery.
    pub fn initial_renders(&self) -> Vec<Render> {
        let mut renders: Vec<Render> = self.registry.containers().map(Render::Container).collect();
        renders.extend(self.registry.items().iter().map(|id| Render::Rearm(*id)));
        renders
    }

    pub fn container_view(&self, id: ContainerId) -> Result<ContainerView, InvariantViolation> {
        let flags = self.container_flags(id)?;
        Ok(ContainerView {
            role: self.registry.role(id)?,
            highlighted: flags.highlighted,
            has_items: flags.has_items,
            layout: flags.layout,
        })
    }

    pub fn item_view(&self, id: ItemId) -> Result<ItemView, InvariantViolation> {
        let flags = self.item_flags(id)?;
        Ok(ItemView {
            dragging: flags.dragging,
            just_dropped: flags.just_dropped,
        })
    }

    pub fn presentation(&self, id: ContainerId) -> Result<LayoutPresentation, InvariantViolation> {
        Ok(self.rules.presentation(self.container_flags(id)?.layout))
    }

    pub fn drag_start(&mut self, item: ItemId) -> Result<Vec<Render>, InvariantViolation> {
        let source = self.registry.locate(item)?;
        self.session.open(item, source)?;
        self.item_flags_mut(item)?.dragging = true;
        Ok(vec![Render::Item(item)])
    }

    /// Closes the session whether or not a drop happened.
    ///
    /// Clears every highlight, since leave events are not guaranteed for
    /// each container the pointer crossed.
    pub fn drag_end(&mut self) -> Result<Vec<Render>, InvariantViolation> {
        let Some((item, _source)) = self.session.close() else {
            return Ok(Vec::new());
        };
        let mut renders = Vec::new();
        self.item_flags_mut(item)?.dragging = false;
        push_render(&mut renders, Render::Item(item));
        for (id, flags) in self.containers.iter_mut() {
            if flags.highlighted {
                flags.highlighted = false;
                push_render(&mut renders, Render::Container(*id));
            }
        }
        let current = self.registry.locate(item)?;
        self.recompute_layout(current)?;
        push_render(&mut renders, Render::Container(current));
        Ok(renders)
    }

    pub fn zone_event(
        &mut self,
        target: ContainerId,
        event: ZoneEvent,
    ) -> Result<Outcome, InvariantViolation> {
        let target = ZoneTarget {
            id: target,
            role: self.registry.role(target)?,
        };
        let effects = zone::plan(event, target, &self.session, self.registry.origin());
        self.check_plan(&effects)?;
        let mut outcome = Outcome::default();
        for effect in effects {
            self.apply(effect, &mut outcome)?;
        }
        Ok(outcome)
    }

    /// Clears `just_dropped` unless the item was dropped again since the
    /// ticket was issued.
    pub fn clear_dropped(&mut self, ticket: DropTicket) -> Result<Vec<Render>, InvariantViolation> {
        let flags = self.item_flags_mut(ticket.item)?;
        if flags.drop_generation != ticket.generation || !flags.just_dropped {
            return Ok(Vec::new());
        }
        flags.just_dropped = false;
        Ok(vec![Render::Item(ticket.item)])
    }

    // Transfers are the only effects that can fail once ids are known, so
    // they are checked up front and a rejected plan leaves no trace.
    fn check_plan(&self, effects: &[ZoneEffect]) -> Result<(), InvariantViolation> {
        for effect in effects {
            match *effect {
                ZoneEffect::Transfer { item, from, to } => {
                    self.registry.item_count(to)?;
                    if self.registry.locate(item)? != from {
                        return Err(InvariantViolation::NotHeld {
                            item,
                            container: from,
                        });
                    }
                }
                ZoneEffect::MarkDropped(item) | ZoneEffect::Rearm(item) => {
                    self.item_flags(item)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn apply(&mut self, effect: ZoneEffect, outcome: &mut Outcome) -> Result<(), InvariantViolation> {
        match effect {
            ZoneEffect::PreventDefault => outcome.prevent_default = true,
            ZoneEffect::SetHighlight { container, on } => {
                self.container_flags_mut(container)?.highlighted = on;
                outcome.push(Render::Container(container));
            }
            ZoneEffect::RefreshHasItems(container) => {
                let count = self.registry.item_count(container)?;
                self.container_flags_mut(container)?.has_items = count > 0;
                outcome.push(Render::Container(container));
            }
            ZoneEffect::Transfer { item, from, to } => {
                self.registry.transfer(item, from, to)?;
                outcome.push(Render::Move { item, to });
            }
            ZoneEffect::MarkDropped(item) => {
                let flags = self.item_flags_mut(item)?;
                flags.just_dropped = true;
                flags.drop_generation = flags.drop_generation.wrapping_add(1);
                let ticket = DropTicket {
                    item,
                    generation: flags.drop_generation,
                };
                outcome.push(Render::Item(item));
                outcome.push(Render::ScheduleDropClear(ticket));
            }
            ZoneEffect::Rearm(item) => outcome.push(Render::Rearm(item)),
            ZoneEffect::RecomputeLayout(container) => {
                self.recompute_layout(container)?;
                outcome.push(Render::Container(container));
            }
        }
        Ok(())
    }

    fn recompute_layout(&mut self, container: ContainerId) -> Result<(), InvariantViolation> {
        let mode = self.rules.mode_for(self.registry.item_count(container)?);
        self.container_flags_mut(container)?.layout = mode;
        Ok(())
    }

    fn container_flags(&self, id: ContainerId) -> Result<&ContainerFlags, InvariantViolation> {
        self.containers
            .get(&id)
            .ok_or(InvariantViolation::UnknownContainer(id))
    }

    fn container_flags_mut(
        &mut self,
        id: ContainerId,
    ) -> Result<&mut ContainerFlags, InvariantViolation> {
        self.containers
            .get_mut(&id)
            .ok_or(InvariantViolation::UnknownContainer(id))
    }

    fn item_flags(&self, id: ItemId) -> Result<&ItemFlags, InvariantViolation> {
        self.items.get(&id).ok_or(InvariantViolation::UnknownItem(id))
    }

    fn item_flags_mut(&mut self, id: ItemId) -> Result<&mut ItemFlags, InvariantViolation> {
        self.items
            .get_mut(&id)
            .ok_or(InvariantViolation::UnknownItem(id))
    }
}

// Later duplicates win so container styling runs after any move into it.
fn push_render(renders: &mut Vec<Render>, render: Render) {
    renders.retain(|existing| *existing != render);
    renders.push(render);
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: ContainerId = ContainerId(0);
    const ZONE: ContainerId = ContainerId(1);

    fn board() -> Board {
        let registry = ItemRegistry::builder()
            .container(ORIGIN, ContainerRole::Origin)
            .container(ZONE, ContainerRole::Zone)
            .item(ItemId(0), ORIGIN)
            .item(ItemId(1), ORIGIN)
            .build()
            .unwrap();
        Board::new(registry, LayoutRules::default()).unwrap()
    }

    #[test]
    fn initial_state_derives_layout() {
        let board = board();
        let origin = board.container_view(ORIGIN).unwrap();
        assert_eq!(origin.layout, LayoutMode::Row);
        assert!(!origin.has_items);
        let zone = board.container_view(ZONE).unwrap();
        assert_eq!(zone.layout, LayoutMode::Single);
        assert!(!zone.has_items);
    }

    #[test]
    fn drag_start_marks_item() {
        let mut board = board();
        let renders = board.drag_start(ItemId(1)).unwrap();
        assert_eq!(renders, vec![Render::Item(ItemId(1))]);
        assert!(board.item_view(ItemId(1)).unwrap().dragging);
        assert_eq!(board.session().source(), Some(ORIGIN));
    }

    #[test]
    fn drag_start_twice_fails_fast() {
        let mut board = board();
        board.drag_start(ItemId(0)).unwrap();
        assert_eq!(
            board.drag_start(ItemId(1)),
            Err(InvariantViolation::SessionAlreadyOpen(ItemId(0)))
        );
        assert!(!board.item_view(ItemId(1)).unwrap().dragging);
    }

    #[test]
    fn drop_renders_move_before_container_sync() {
        let mut board = board();
        board.drag_start(ItemId(0)).unwrap();
        let outcome = board.zone_event(ZONE, ZoneEvent::Drop).unwrap();
        assert!(outcome.prevent_default);
        let move_at = outcome
            .renders
            .iter()
            .position(|render| *render == Render::Move { item: ItemId(0), to: ZONE })
            .expect("move rendered");
        let zone_at = outcome
            .renders
            .iter()
            .position(|render| *render == Render::Container(ZONE))
            .expect("zone rendered");
        assert!(move_at < zone_at);
        assert_eq!(
            outcome
                .renders
                .iter()
                .filter(|render| **render == Render::Container(ZONE))
                .count(),
            1
        );
    }

    #[test]
    fn drag_end_without_session_is_noop() {
        let mut board = board();
        assert_eq!(board.drag_end().unwrap(), Vec::new());
    }

    #[test]
    fn stale_ticket_does_not_clear_newer_drop() {
        let mut board = board();
        board.drag_start(ItemId(0)).unwrap();
        let first = board.zone_event(ZONE, ZoneEvent::Drop).unwrap();
        board.drag_end().unwrap();
        board.drag_start(ItemId(0)).unwrap();
        board.zone_event(ORIGIN, ZoneEvent::Drop).unwrap();
        let stale = first
            .renders
            .iter()
            .find_map(|render| match render {
                Render::ScheduleDropClear(ticket) => Some(*ticket),
                _ => None,
            })
            .unwrap();
        assert_eq!(board.clear_dropped(stale).unwrap(), Vec::new());
        let view = board.item_view(ItemId(0)).unwrap();
        assert!(view.just_dropped);
        assert!(view.dragging);
    }
}
