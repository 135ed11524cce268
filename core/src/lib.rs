pub mod articles;
pub mod board;
pub mod config;
pub mod error;
pub mod layout;
pub mod nav;
pub mod registry;
pub mod session;
pub mod zone;

pub use articles::{builtin_articles, filter_and_sort, Article, ArticleQuery, SortKey};
pub use board::{Board, ContainerView, DropTicket, ItemView, Outcome, Render};
pub use config::PageConfig;
pub use error::{CatalogError, ConfigError, InvariantViolation};
pub use layout::{LayoutMode, LayoutPresentation, LayoutRules, StyleDecl};
pub use nav::{NavModel, NavUpdate, SectionGeometry};
pub use registry::{ContainerId, ContainerRole, ItemId, ItemRegistry};
pub use session::DragSession;
pub use zone::{ZoneEffect, ZoneEvent};
