use serde::Deserialize;

use crate::error::ConfigError;
use crate::layout::{LayoutRules, DEFAULT_ROW_GAP, ROW_MAX_ITEMS, ROW_MIN_ITEMS};
use crate::nav::{NAVIGATION_SECTION_ID, SCROLL_PADDING};

pub const DROP_FLASH_MS: u32 = 400;
pub const SECTION_THRESHOLD: f64 = 0.3;

/// Selectors and tuning for every page feature.
///
/// Any field may be omitted from the JSON form; omitted fields keep their
/// defaults.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub drag: DragConfig,
    pub nav: NavConfig,
    pub articles: ArticlesConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    pub origin_list_id: String,
    pub zone_selector: String,
    pub item_selector: String,
    pub drop_flash_ms: u32,
    pub row_min: usize,
    pub row_max: usize,
    pub row_gap: String,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            origin_list_id: "draggable-list".to_string(),
            zone_selector: ".drop-zone".to_string(),
            item_selector: ".draggable-item".to_string(),
            drop_flash_ms: DROP_FLASH_MS,
            row_min: ROW_MIN_ITEMS,
            row_max: ROW_MAX_ITEMS,
            row_gap: DEFAULT_ROW_GAP.to_string(),
        }
    }
}

impl DragConfig {
    pub fn layout_rules(&self) -> LayoutRules {
        LayoutRules {
            row_min: self.row_min,
            row_max: self.row_max,
            row_gap: self.row_gap.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub link_selector: String,
    pub header_selector: String,
    pub section_selector: String,
    pub navigation_section_id: String,
    pub scroll_padding: f64,
    pub section_threshold: f64,
    pub focus_outline: String,
    pub focus_outline_offset: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            link_selector: ".nav-link".to_string(),
            header_selector: ".nav".to_string(),
            section_selector: "section".to_string(),
            navigation_section_id: NAVIGATION_SECTION_ID.to_string(),
            scroll_padding: SCROLL_PADDING,
            section_threshold: SECTION_THRESHOLD,
            focus_outline: "2px solid var(--secondary-color)".to_string(),
            focus_outline_offset: "2px".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArticlesConfig {
    pub container_selector: String,
    pub sort_control: String,
    pub category_control: String,
    pub search_control: String,
}

impl Default for ArticlesConfig {
    fn default() -> Self {
        Self {
            container_selector: ".blog-list-content".to_string(),
            sort_control: "#filter1".to_string(),
            category_control: "#filter2".to_string(),
            search_control: "#search".to_string(),
        }
    }
}

impl PageConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PageConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let drag = &self.drag;
        if drag.row_min > drag.row_max {
            return Err(ConfigError::InvalidRowRange {
                min: drag.row_min,
                max: drag.row_max,
            });
        }
        let threshold = self.nav.section_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        Ok(())
    }
}
