//! Menu sections and their builder.

use super::item::{CustomItem, Item, LabelItem};
use crate::error::ValidationError;

/// A titled group of items, displayed in order.
///
/// Sections are only produced by [`SectionBuilder`] through a validating
/// build, so a `Section` always has at least one item.
#[derive(Debug, Clone)]
pub struct Section {
    title: Option<String>,
    items: Vec<Item>,
}

impl Section {
    /// The section header, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The items in display order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false` for a built section; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Accumulates the items of one section.
///
/// Used through [`MenuBuilder::add_section`](super::MenuBuilder::add_section),
/// or on its own to prepare replacement content for
/// [`PopupController::update_sections`](crate::PopupController::update_sections).
///
/// # Example
///
/// ```
/// use horizon_popup::{CustomItem, LayoutRef, SectionBuilder};
///
/// let mut loaded = SectionBuilder::new(None);
/// for name in ["Name 0", "Name 1"] {
///     let name = name.to_owned();
///     loaded.add_custom_item(
///         CustomItem::new(LayoutRef(1)).with_callback(move || println!("Click {name}")),
///     );
/// }
/// assert_eq!(loaded.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SectionBuilder {
    title: Option<String>,
    items: Vec<Item>,
}

impl SectionBuilder {
    /// Start a section with an optional title.
    pub fn new(title: Option<&str>) -> Self {
        Self {
            title: title.map(str::to_owned),
            items: Vec::new(),
        }
    }

    /// Set or clear the title.
    pub fn set_title(&mut self, title: Option<&str>) -> &mut Self {
        self.title = title.map(str::to_owned);
        self
    }

    /// Append a label item.
    pub fn add_label_item(&mut self, item: LabelItem) -> &mut Self {
        self.items.push(Item::Label(item));
        self
    }

    /// Append a custom item.
    pub fn add_custom_item(&mut self, item: CustomItem) -> &mut Self {
        self.items.push(Item::Custom(item));
        self
    }

    /// Append any item.
    pub fn add_item(&mut self, item: impl Into<Item>) -> &mut Self {
        self.items.push(item.into());
        self
    }

    /// Number of items added so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items were added yet.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn build(self, index: usize) -> Result<Section, ValidationError> {
        if self.items.is_empty() {
            return Err(ValidationError::EmptySection {
                index,
                title: self.title,
            });
        }
        Ok(Section {
            title: self.title,
            items: self.items,
        })
    }
}

/// Validate and build a list of sections, preserving order.
///
/// Fails if the list is empty or any section has no items.
pub fn build_sections(
    builders: impl IntoIterator<Item = SectionBuilder>,
) -> Result<Vec<Section>, ValidationError> {
    let sections = builders
        .into_iter()
        .enumerate()
        .map(|(index, builder)| builder.build(index))
        .collect::<Result<Vec<_>, _>>()?;
    if sections.is_empty() {
        return Err(ValidationError::EmptyMenu);
    }
    Ok(sections)
}
