pub const NAVIGATION_SECTION_ID: &str = "navigation";
pub const SCROLL_PADDING: f64 = 40.0;

/// Where a section sits at the moment its link is activated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionGeometry {
    /// Section top relative to the viewport.
    pub section_top: f64,
    pub scroll_y: f64,
    pub header_height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavUpdate {
    pub active: usize,
    pub minimized: bool,
    pub scroll_to: Option<f64>,
}

/// Active-link and minimized-section state for the page navigation.
#[derive(Clone, Debug)]
pub struct NavModel {
    targets: Vec<String>,
    active: Option<usize>,
    minimized: bool,
    navigation_id: String,
    scroll_padding: f64,
}

impl NavModel {
    pub fn new(targets: Vec<String>) -> Self {
        Self::with_settings(targets, NAVIGATION_SECTION_ID, SCROLL_PADDING)
    }

    pub fn with_settings(targets: Vec<String>, navigation_id: &str, scroll_padding: f64) -> Self {
        let active = if targets.is_empty() { None } else { Some(0) };
        Self {
            targets,
            active,
            minimized: false,
            navigation_id: navigation_id.to_string(),
            scroll_padding,
        }
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_target(&self) -> Option<&str> {
        self.active
            .and_then(|index| self.targets.get(index))
            .map(String::as_str)
    }

    pub fn minimized(&self) -> bool {
        self.minimized
    }

    pub fn target(&self, index: usize) -> Option<&str> {
        self.targets.get(index).map(String::as_str)
    }

    /// A link was clicked (or keyboard-activated) and its section exists.
    pub fn activate(&mut self, index: usize, geometry: SectionGeometry) -> Option<NavUpdate> {
        let target = self.targets.get(index)?.clone();
        let scroll_to = geometry.section_top + geometry.scroll_y
            - geometry.header_height
            - self.scroll_padding;
        Some(self.select(index, &target, Some(scroll_to)))
    }

    /// A section crossed the visibility threshold.
    pub fn section_visible(&mut self, section_id: &str) -> Option<NavUpdate> {
        let index = self.targets.iter().position(|target| target == section_id)?;
        Some(self.select(index, section_id, None))
    }

    fn select(&mut self, index: usize, target: &str, scroll_to: Option<f64>) -> NavUpdate {
        self.active = Some(index);
        self.minimized = target != self.navigation_id;
        NavUpdate {
            active: index,
            minimized: self.minimized,
            scroll_to,
        }
    }
}

pub fn target_from_href(href: &str) -> &str {
    href.strip_prefix('#').unwrap_or(href)
}

pub fn is_activation_key(key: &str) -> bool {
    key == "Enter" || key == " "
}

pub fn observer_root_margin(header_height: f64) -> String {
    format!("-{header_height}px 0px 0px 0px")
}
