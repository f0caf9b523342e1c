//! The immutable description of a popup menu.

use super::section::Section;
use crate::gravity::Gravity;
use crate::style::StyleId;

/// Everything needed to show a popup menu.
///
/// Produced by [`MenuBuilder::build`](super::MenuBuilder::build), which
/// guarantees at least one section and no empty sections. Once handed to a
/// [`PopupController`](crate::PopupController), only the sections can change,
/// through [`update_sections`](crate::PopupController::update_sections).
#[derive(Debug, Clone)]
pub struct MenuSpec {
    pub(super) style: StyleId,
    pub(super) dropdown_gravity: Gravity,
    pub(super) sections: Vec<Section>,
    pub(super) fixed_content_width: Option<i32>,
    pub(super) vertical_offset: Option<i32>,
    pub(super) horizontal_offset: Option<i32>,
    pub(super) draw_anchor_indicator: bool,
    pub(super) ignore_max_height: bool,
}

impl MenuSpec {
    /// The menu's own style; [`StyleId::UNSET`] defers to the fallback chain.
    pub fn style(&self) -> StyleId {
        self.style
    }

    pub fn dropdown_gravity(&self) -> Gravity {
        self.dropdown_gravity
    }

    /// Sections in display order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Exact surface width in pixels, if fixed.
    pub fn fixed_content_width(&self) -> Option<i32> {
        self.fixed_content_width
    }

    pub fn vertical_offset(&self) -> Option<i32> {
        self.vertical_offset
    }

    pub fn horizontal_offset(&self) -> Option<i32> {
        self.horizontal_offset
    }

    /// Whether the renderer should draw a pointer towards the anchor.
    pub fn draw_anchor_indicator(&self) -> bool {
        self.draw_anchor_indicator
    }

    /// Whether the surface may grow taller than the usable screen height.
    pub fn ignore_max_height(&self) -> bool {
        self.ignore_max_height
    }

    /// Total number of items across all sections.
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }

    pub(crate) fn replace_sections(&mut self, sections: Vec<Section>) {
        self.sections = sections;
    }
}
