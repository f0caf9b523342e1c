//! Builder for [`MenuSpec`].

use super::section::{SectionBuilder, build_sections};
use super::spec::MenuSpec;
use crate::error::ValidationError;
use crate::gravity::Gravity;
use crate::style::StyleId;

/// Accumulates sections and presentation settings for a popup menu.
///
/// # Example
///
/// ```
/// use horizon_popup::{Gravity, LabelItem, MenuBuilder};
///
/// let spec = MenuBuilder::new()
///     .with_dropdown_gravity(Gravity::END | Gravity::BOTTOM)
///     .with_vertical_offset(0)
///     .section(Some("Edit"), |s| {
///         s.add_label_item(LabelItem::new("Cut"));
///         s.add_label_item(LabelItem::new("Copy").with_dismiss_on_select(false));
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(spec.sections().len(), 1);
/// assert_eq!(spec.item_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MenuBuilder {
    style: StyleId,
    dropdown_gravity: Gravity,
    sections: Vec<SectionBuilder>,
    fixed_content_width: Option<i32>,
    vertical_offset: Option<i32>,
    horizontal_offset: Option<i32>,
    draw_anchor_indicator: bool,
    ignore_max_height: bool,
}

impl MenuBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Builder Pattern Methods
    // =========================================================================

    /// Set the popup style using builder pattern.
    pub fn with_style(mut self, style: StyleId) -> Self {
        self.style = style;
        self
    }

    /// Set the dropdown gravity using builder pattern.
    pub fn with_dropdown_gravity(mut self, gravity: Gravity) -> Self {
        self.dropdown_gravity = gravity;
        self
    }

    /// Fix the surface width in pixels. Non-positive widths clear it.
    pub fn with_fixed_content_width(mut self, width: i32) -> Self {
        self.fixed_content_width = (width > 0).then_some(width);
        self
    }

    /// Set the vertical offset in pixels using builder pattern.
    pub fn with_vertical_offset(mut self, offset: i32) -> Self {
        self.vertical_offset = Some(offset);
        self
    }

    /// Set the horizontal offset in pixels using builder pattern.
    pub fn with_horizontal_offset(mut self, offset: i32) -> Self {
        self.horizontal_offset = Some(offset);
        self
    }

    /// Ask the renderer to draw a pointer towards the anchor.
    pub fn with_anchor_indicator(mut self, draw: bool) -> Self {
        self.draw_anchor_indicator = draw;
        self
    }

    /// Let the surface grow taller than the usable screen height.
    pub fn with_ignore_max_height(mut self, ignore: bool) -> Self {
        self.ignore_max_height = ignore;
        self
    }

    /// Add a section and fill it in a closure.
    pub fn section(mut self, title: Option<&str>, fill: impl FnOnce(&mut SectionBuilder)) -> Self {
        fill(self.add_section(title));
        self
    }

    // =========================================================================
    // In-place configuration
    // =========================================================================

    /// The style set so far.
    pub fn style(&self) -> StyleId {
        self.style
    }

    pub fn set_style(&mut self, style: StyleId) {
        self.style = style;
    }

    pub fn dropdown_gravity(&self) -> Gravity {
        self.dropdown_gravity
    }

    pub fn set_dropdown_gravity(&mut self, gravity: Gravity) {
        self.dropdown_gravity = gravity;
    }

    /// Start a new section and return it for filling.
    pub fn add_section(&mut self, title: Option<&str>) -> &mut SectionBuilder {
        self.sections.push(SectionBuilder::new(title));
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    /// Append a section prepared elsewhere.
    pub fn push_section(&mut self, section: SectionBuilder) -> &mut Self {
        self.sections.push(section);
        self
    }

    /// Number of sections added so far.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Validate and produce the menu.
    ///
    /// Fails with [`ValidationError::EmptyMenu`] if no section was added and
    /// with [`ValidationError::EmptySection`] for the first section without
    /// items.
    pub fn build(self) -> Result<MenuSpec, ValidationError> {
        let sections = build_sections(self.sections)?;
        Ok(MenuSpec {
            style: self.style,
            dropdown_gravity: self.dropdown_gravity,
            sections,
            fixed_content_width: self.fixed_content_width,
            vertical_offset: self.vertical_offset,
            horizontal_offset: self.horizontal_offset,
            draw_anchor_indicator: self.draw_anchor_indicator,
            ignore_max_height: self.ignore_max_height,
        })
    }
}
