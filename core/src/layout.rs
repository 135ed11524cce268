pub const ROW_MIN_ITEMS: usize = 2;
pub const ROW_MAX_ITEMS: usize = 3;
pub const DEFAULT_ROW_GAP: &str = "10px";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
    #[default]
    Single,
    Row,
}

impl LayoutMode {
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutMode::Single => "single",
            LayoutMode::Row => "row",
        }
    }
}

/// One inline style property. An empty value means the property is removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleDecl {
    pub property: &'static str,
    pub value: String,
}

impl StyleDecl {
    fn set(property: &'static str, value: &str) -> Self {
        Self {
            property,
            value: value.to_string(),
        }
    }

    fn clear(property: &'static str) -> Self {
        Self {
            property,
            value: String::new(),
        }
    }

    pub fn is_removal(&self) -> bool {
        self.value.is_empty()
    }
}

/// Inline styles a container and each of its items take for a layout mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutPresentation {
    pub mode: LayoutMode,
    pub container: Vec<StyleDecl>,
    pub item: Vec<StyleDecl>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutRules {
    pub row_min: usize,
    pub row_max: usize,
    pub row_gap: String,
}

impl Default for LayoutRules {
    fn default() -> Self {
        Self {
            row_min: ROW_MIN_ITEMS,
            row_max: ROW_MAX_ITEMS,
            row_gap: DEFAULT_ROW_GAP.to_string(),
        }
    }
}

impl LayoutRules {
    pub fn mode_for(&self, count: usize) -> LayoutMode {
        if (self.row_min..=self.row_max).contains(&count) {
            LayoutMode::Row
        } else {
            LayoutMode::Single
        }
    }

    pub fn presentation(&self, mode: LayoutMode) -> LayoutPresentation {
        match mode {
            LayoutMode::Row => LayoutPresentation {
                mode,
                container: vec![
                    StyleDecl::set("display", "flex"),
                    StyleDecl::set("flex-direction", "row"),
                    StyleDecl::set("gap", &self.row_gap),
                ],
                item: vec![StyleDecl::set("flex", "1"), StyleDecl::set("min-width", "0")],
            },
            LayoutMode::Single => LayoutPresentation {
                mode,
                container: vec![
                    StyleDecl::clear("display"),
                    StyleDecl::clear("flex-direction"),
                    StyleDecl::clear("gap"),
                ],
                item: vec![StyleDecl::clear("flex"), StyleDecl::clear("min-width")],
            },
        }
    }

    pub fn presentation_for_count(&self, count: usize) -> LayoutPresentation {
        self.presentation(self.mode_for(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_only_for_two_or_three_items() {
        let rules = LayoutRules::default();
        let modes: Vec<_> = (0..6).map(|count| rules.mode_for(count)).collect();
        assert_eq!(
            modes,
            vec![
                LayoutMode::Single,
                LayoutMode::Single,
                LayoutMode::Row,
                LayoutMode::Row,
                LayoutMode::Single,
                LayoutMode::Single,
            ]
        );
        assert_eq!(rules.mode_for(40), LayoutMode::Single);
    }

    #[test]
    fn row_presentation_sizes_items_evenly() {
        let rules = LayoutRules::default();
        let presentation = rules.presentation_for_count(2);
        assert_eq!(presentation.mode, LayoutMode::Row);
        assert!(presentation
            .container
            .contains(&StyleDecl::set("gap", DEFAULT_ROW_GAP)));
        assert!(presentation.item.contains(&StyleDecl::set("flex", "1")));
        assert!(presentation.item.contains(&StyleDecl::set("min-width", "0")));
    }

    #[test]
    fn single_presentation_clears_every_property() {
        let rules = LayoutRules::default();
        let row = rules.presentation(LayoutMode::Row);
        let single = rules.presentation(LayoutMode::Single);
        assert!(single.container.iter().all(StyleDecl::is_removal));
        assert!(single.item.iter().all(StyleDecl::is_removal));
        let row_props: Vec<_> = row.container.iter().map(|decl| decl.property).collect();
        let single_props: Vec<_> = single.container.iter().map(|decl| decl.property).collect();
        assert_eq!(row_props, single_props);
    }

    #[test]
    fn presentation_is_idempotent() {
        let rules = LayoutRules::default();
        for count in 0..6 {
            assert_eq!(
                rules.presentation_for_count(count),
                rules.presentation_for_count(count)
            );
        }
    }

    #[test]
    fn custom_gap_is_used() {
        let rules = LayoutRules {
            row_gap: "1rem".to_string(),
            ..LayoutRules::default()
        };
        let row = rules.presentation(LayoutMode::Row);
        assert!(row.container.contains(&StyleDecl::set("gap", "1rem")));
    }
}
