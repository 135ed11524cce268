use std::collections::HashMap;
use std::fmt;

use crate::error::InvariantViolation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub u32);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerRole {
    /// The permanent list items start in.
    Origin,
    Zone,
}

#[derive(Clone, Debug)]
struct ContainerEntry {
    id: ContainerId,
    role: ContainerRole,
    items: Vec<ItemId>,
}

/// Which container holds each item.
///
/// Identities are fixed once built; only membership changes afterwards.
#[derive(Clone, Debug)]
pub struct ItemRegistry {
    containers: Vec<ContainerEntry>,
    slots: HashMap<ContainerId, usize>,
    owners: HashMap<ItemId, ContainerId>,
    all_items: Vec<ItemId>,
    origin: ContainerId,
}

#[derive(Default)]
pub struct RegistryBuilder {
    containers: Vec<(ContainerId, ContainerRole)>,
    items: Vec<(ItemId, ContainerId)>,
}

impl RegistryBuilder {
    pub fn container(mut self, id: ContainerId, role: ContainerRole) -> Self {
        self.containers.push((id, role));
        self
    }

    pub fn item(mut self, id: ItemId, container: ContainerId) -> Self {
        self.items.push((id, container));
        self
    }

    pub fn build(self) -> Result<ItemRegistry, InvariantViolation> {
        let mut containers = Vec::with_capacity(self.containers.len());
        let mut slots = HashMap::new();
        let mut origin = None;
        for (id, role) in self.containers {
            if slots.insert(id, containers.len()).is_some() {
                return Err(InvariantViolation::DuplicateContainer(id));
            }
            if role == ContainerRole::Origin {
                if let Some(first) = origin {
                    return Err(InvariantViolation::DuplicateOrigin { first, second: id });
                }
                origin = Some(id);
            }
            containers.push(ContainerEntry {
                id,
                role,
                items: Vec::new(),
            });
        }
        let origin = origin.ok_or(InvariantViolation::MissingOrigin)?;

        let mut owners = HashMap::new();
        let mut all_items = Vec::with_capacity(self.items.len());
        for (item, container) in self.items {
            let Some(&slot) = slots.get(&container) else {
                return Err(InvariantViolation::UnknownContainer(container));
            };
            if owners.insert(item, container).is_some() {
                return Err(InvariantViolation::DuplicateItem(item));
            }
            containers[slot].items.push(item);
            all_items.push(item);
        }

        Ok(ItemRegistry {
            containers,
            slots,
            owners,
            all_items,
            origin,
        })
    }
}

impl ItemRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn origin(&self) -> ContainerId {
        self.origin
    }

    /// Containers in registration order.
    pub fn containers(&self) -> impl Iterator<Item = ContainerId> + '_ {
        self.containers.iter().map(|entry| entry.id)
    }

    /// Every item known at construction, in registration order.
    pub fn items(&self) -> &[ItemId] {
        &self.all_items
    }

    pub fn role(&self, container: ContainerId) -> Result<ContainerRole, InvariantViolation> {
        Ok(self.entry(container)?.role)
    }

    pub fn locate(&self, item: ItemId) -> Result<ContainerId, InvariantViolation> {
        self.owners
            .get(&item)
            .copied()
            .ok_or(InvariantViolation::UnknownItem(item))
    }

    pub fn items_in(&self, container: ContainerId) -> Result<&[ItemId], InvariantViolation> {
        Ok(&self.entry(container)?.items)
    }

    pub fn item_count(&self, container: ContainerId) -> Result<usize, InvariantViolation> {
        Ok(self.entry(container)?.items.len())
    }

    /// Moves `item` from `from` to the end of `to`.
    ///
    /// `from` must hold `item`. A transfer onto the same container leaves
    /// membership untouched.
    pub fn transfer(
        &mut self,
        item: ItemId,
        from: ContainerId,
        to: ContainerId,
    ) -> Result<(), InvariantViolation> {
        let from_slot = self.slot(from)?;
        let to_slot = self.slot(to)?;
        let owner = self.locate(item)?;
        if owner != from {
            return Err(InvariantViolation::NotHeld {
                item,
                container: from,
            });
        }
        if from == to {
            return Ok(());
        }
        let source = &mut self.containers[from_slot].items;
        let Some(index) = source.iter().position(|id| *id == item) else {
            return Err(InvariantViolation::NotHeld {
                item,
                container: from,
            });
        };
        source.remove(index);
        self.containers[to_slot].items.push(item);
        self.owners.insert(item, to);
        Ok(())
    }

    /// Verifies every item sits in exactly one container and nothing else does.
    pub fn check_partition(&self) -> Result<(), InvariantViolation> {
        let mut holders: HashMap<ItemId, usize> = HashMap::new();
        for entry in &self.containers {
            for item in &entry.items {
                if !self.owners.contains_key(item) {
                    return Err(InvariantViolation::UnknownItem(*item));
                }
                *holders.entry(*item).or_default() += 1;
            }
        }
        for item in &self.all_items {
            let count = holders.get(item).copied().unwrap_or(0);
            if count != 1 {
                return Err(InvariantViolation::BrokenPartition {
                    item: *item,
                    holders: count,
                });
            }
            let owner = self.locate(*item)?;
            if !self.entry(owner)?.items.contains(item) {
                return Err(InvariantViolation::NotHeld {
                    item: *item,
                    container: owner,
                });
            }
        }
        Ok(())
    }

    fn slot(&self, container: ContainerId) -> Result<usize, InvariantViolation> {
        self.slots
            .get(&container)
            .copied()
            .ok_or(InvariantViolation::UnknownContainer(container))
    }

    fn entry(&self, container: ContainerId) -> Result<&ContainerEntry, InvariantViolation> {
        let slot = self.slot(container)?;
        Ok(&self.containers[slot])
    }
}
