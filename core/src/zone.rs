//! Container × event → effect table for drop targets.
//!
//! [`plan`] only decides; the board applies the effects in order.

use crate::registry::{ContainerId, ContainerRole, ItemId};
use crate::session::DragSession;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneEvent {
    DragOver,
    /// `pointer_inside` is true when the pointer moved onto a descendant of
    /// the same container.
    DragLeave { pointer_inside: bool },
    Drop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoneTarget {
    pub id: ContainerId,
    pub role: ContainerRole,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneEffect {
    /// The platform default rejects drops; handlers must suppress it.
    PreventDefault,
    SetHighlight { container: ContainerId, on: bool },
    RefreshHasItems(ContainerId),
    Transfer {
        item: ItemId,
        from: ContainerId,
        to: ContainerId,
    },
    MarkDropped(ItemId),
    Rearm(ItemId),
    RecomputeLayout(ContainerId),
}

pub fn plan(
    event: ZoneEvent,
    target: ZoneTarget,
    session: &DragSession,
    origin: ContainerId,
) -> Vec<ZoneEffect> {
    match event {
        ZoneEvent::DragOver => {
            let mut effects = vec![
                ZoneEffect::PreventDefault,
                ZoneEffect::SetHighlight {
                    container: target.id,
                    on: true,
                },
            ];
            if target.role == ContainerRole::Zone {
                effects.push(ZoneEffect::RefreshHasItems(target.id));
            }
            effects
        }
        ZoneEvent::DragLeave {
            pointer_inside: true,
        } => Vec::new(),
        ZoneEvent::DragLeave {
            pointer_inside: false,
        } => vec![ZoneEffect::SetHighlight {
            container: target.id,
            on: false,
        }],
        ZoneEvent::Drop => plan_drop(target, session, origin),
    }
}

fn plan_drop(target: ZoneTarget, session: &DragSession, origin: ContainerId) -> Vec<ZoneEffect> {
    let mut effects = vec![
        ZoneEffect::PreventDefault,
        ZoneEffect::SetHighlight {
            container: target.id,
            on: false,
        },
    ];
    let DragSession::Open { item, source } = *session else {
        return effects;
    };
    if source == target.id {
        return effects;
    }
    effects.push(ZoneEffect::Transfer {
        item,
        from: source,
        to: target.id,
    });
    effects.push(ZoneEffect::MarkDropped(item));
    if target.role == ContainerRole::Zone {
        effects.push(ZoneEffect::RefreshHasItems(target.id));
    }
    if source != origin {
        effects.push(ZoneEffect::RefreshHasItems(source));
    }
    effects.push(ZoneEffect::Rearm(item));
    effects.push(ZoneEffect::RecomputeLayout(source));
    effects.push(ZoneEffect::RecomputeLayout(target.id));
    effects
}
