use thiserror::Error;

use crate::registry::{ContainerId, ItemId};

/// A membership or session assumption that does not hold.
///
/// These come from wiring defects in the page shell and are never expected
/// during normal gestures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("unknown item {0}")]
    UnknownItem(ItemId),
    #[error("unknown container {0}")]
    UnknownContainer(ContainerId),
    #[error("item {item} is not held by container {container}")]
    NotHeld { item: ItemId, container: ContainerId },
    #[error("item {0} registered twice")]
    DuplicateItem(ItemId),
    #[error("container {0} registered twice")]
    DuplicateContainer(ContainerId),
    #[error("no origin container registered")]
    MissingOrigin,
    #[error("origin registered twice ({first} and {second})")]
    DuplicateOrigin {
        first: ContainerId,
        second: ContainerId,
    },
    #[error("drag session already open for item {0}")]
    SessionAlreadyOpen(ItemId),
    #[error("item {item} held by {holders} containers")]
    BrokenPartition { item: ItemId, holders: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("row range {min}..={max} is empty")]
    InvalidRowRange { min: usize, max: usize },
    #[error("section threshold {0} outside 0..=1")]
    InvalidThreshold(f64),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("article catalog is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("article id {0} appears twice")]
    DuplicateId(u32),
}
