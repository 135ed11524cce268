use crate::error::InvariantViolation;
use crate::registry::{ContainerId, ItemId};

/// The single in-progress drag gesture, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragSession {
    #[default]
    Closed,
    Open { item: ItemId, source: ContainerId },
}

impl DragSession {
    pub fn is_open(&self) -> bool {
        matches!(self, DragSession::Open { .. })
    }

    pub fn item(&self) -> Option<ItemId> {
        match self {
            DragSession::Open { item, .. } => Some(*item),
            DragSession::Closed => None,
        }
    }

    pub fn source(&self) -> Option<ContainerId> {
        match self {
            DragSession::Open { source, .. } => Some(*source),
            DragSession::Closed => None,
        }
    }

    pub fn open(&mut self, item: ItemId, source: ContainerId) -> Result<(), InvariantViolation> {
        if let DragSession::Open { item: current, .. } = self {
            return Err(InvariantViolation::SessionAlreadyOpen(*current));
        }
        *self = DragSession::Open { item, source };
        Ok(())
    }

    /// Closes the session unconditionally, returning what it held.
    pub fn close(&mut self) -> Option<(ItemId, ContainerId)> {
        match std::mem::take(self) {
            DragSession::Open { item, source } => Some((item, source)),
            DragSession::Closed => None,
        }
    }
}
