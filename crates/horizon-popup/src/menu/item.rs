//! Menu items.
//!
//! An [`Item`] is either a [`LabelItem`] (text plus optional icon, drawn by the
//! renderer's standard row) or a [`CustomItem`] (a host-defined layout). Both
//! carry the same [`ItemActions`]: a selection callback, the dismiss-on-select
//! flag, and a callback run once the item's view exists.
//!
//! The core never runs these callbacks itself. Renderers call
//! [`Item::bind_view`] after creating an item's view and [`Item::select`] when
//! the user picks it.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::style::Color;
use crate::surface::{DismissHandle, DismissReason};

/// Action run when an item is selected.
pub type ItemCallback = Rc<dyn Fn()>;

/// Callback run with an item's rendered view once it exists.
///
/// The view type belongs to the renderer; callbacks downcast it.
pub type ViewBoundCallback = Rc<dyn Fn(&mut dyn Any)>;

/// Reference to a host icon resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconRef(pub u32);

/// Reference to a host layout resource used by custom items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutRef(pub u32);

/// The text of a label item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// Literal text.
    Text(String),
    /// A host string resource.
    Resource(u32),
}

impl From<&str> for Label {
    fn from(text: &str) -> Self {
        Label::Text(text.to_owned())
    }
}

impl From<String> for Label {
    fn from(text: String) -> Self {
        Label::Text(text)
    }
}

/// Behavior shared by every item variant.
#[derive(Clone)]
pub struct ItemActions {
    callback: Option<ItemCallback>,
    dismiss_on_select: bool,
    view_bound_callback: Option<ViewBoundCallback>,
}

impl Default for ItemActions {
    fn default() -> Self {
        Self {
            callback: None,
            dismiss_on_select: true,
            view_bound_callback: None,
        }
    }
}

impl ItemActions {
    /// Whether selecting the item dismisses the popup.
    pub fn dismiss_on_select(&self) -> bool {
        self.dismiss_on_select
    }

    /// Whether a selection callback is set.
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Whether a view-bound callback is set.
    pub fn has_view_bound_callback(&self) -> bool {
        self.view_bound_callback.is_some()
    }
}

impl fmt::Debug for ItemActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemActions")
            .field("callback", &self.callback.is_some())
            .field("dismiss_on_select", &self.dismiss_on_select)
            .field("view_bound_callback", &self.view_bound_callback.is_some())
            .finish()
    }
}

macro_rules! impl_action_setters {
    ($ty:ty) => {
        impl $ty {
            /// Set the action run when the item is selected.
            pub fn with_callback(mut self, callback: impl Fn() + 'static) -> Self {
                self.actions.callback = Some(Rc::new(callback));
                self
            }

            /// Set whether selecting the item dismisses the popup (default `true`).
            pub fn with_dismiss_on_select(mut self, dismiss: bool) -> Self {
                self.actions.dismiss_on_select = dismiss;
                self
            }

            /// Set the callback run with the item's view once it is rendered.
            pub fn with_view_bound_callback(
                mut self,
                callback: impl Fn(&mut dyn Any) + 'static,
            ) -> Self {
                self.actions.view_bound_callback = Some(Rc::new(callback));
                self
            }

            /// The item's shared behavior.
            pub fn actions(&self) -> &ItemActions {
                &self.actions
            }
        }
    };
}

/// A standard text row with an optional icon.
#[derive(Debug, Clone)]
pub struct LabelItem {
    label: Label,
    label_color: Option<Color>,
    icon: Option<IconRef>,
    icon_color: Option<Color>,
    has_nested_items: bool,
    actions: ItemActions,
}

impl LabelItem {
    /// Create a label item.
    pub fn new(label: impl Into<Label>) -> Self {
        Self {
            label: label.into(),
            label_color: None,
            icon: None,
            icon_color: None,
            has_nested_items: false,
            actions: ItemActions::default(),
        }
    }

    /// Set the label color. Unset means the style's text color.
    pub fn with_label_color(mut self, color: Color) -> Self {
        self.label_color = Some(color);
        self
    }

    /// Set the leading icon.
    pub fn with_icon(mut self, icon: IconRef) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Set the icon tint. Unset means the style's icon color.
    pub fn with_icon_color(mut self, color: Color) -> Self {
        self.icon_color = Some(color);
        self
    }

    /// Show a trailing chevron hinting at nested items.
    pub fn with_nested_items(mut self, nested: bool) -> Self {
        self.has_nested_items = nested;
        self
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn label_color(&self) -> Option<Color> {
        self.label_color
    }

    pub fn icon(&self) -> Option<IconRef> {
        self.icon
    }

    pub fn icon_color(&self) -> Option<Color> {
        self.icon_color
    }

    pub fn has_nested_items(&self) -> bool {
        self.has_nested_items
    }
}

impl_action_setters!(LabelItem);

/// An item rendered from a host layout.
#[derive(Debug, Clone)]
pub struct CustomItem {
    layout: LayoutRef,
    actions: ItemActions,
}

impl CustomItem {
    /// Create a custom item using the given layout.
    pub fn new(layout: LayoutRef) -> Self {
        Self {
            layout,
            actions: ItemActions::default(),
        }
    }

    pub fn layout(&self) -> LayoutRef {
        self.layout
    }
}

impl_action_setters!(CustomItem);

/// A menu entry.
#[derive(Debug, Clone)]
pub enum Item {
    Label(LabelItem),
    Custom(CustomItem),
}

impl Item {
    /// The item's shared behavior.
    pub fn actions(&self) -> &ItemActions {
        match self {
            Item::Label(item) => &item.actions,
            Item::Custom(item) => &item.actions,
        }
    }

    /// Whether selecting the item dismisses the popup.
    pub fn dismiss_on_select(&self) -> bool {
        self.actions().dismiss_on_select
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Item::Label(_))
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Item::Custom(_))
    }

    /// Run the view-bound callback with the item's freshly rendered view.
    ///
    /// Returns `false` if the item has no such callback.
    pub fn bind_view(&self, view: &mut dyn Any) -> bool {
        match &self.actions().view_bound_callback {
            Some(callback) => {
                callback(view);
                true
            }
            None => false,
        }
    }

    /// Handle the user picking this item.
    ///
    /// Runs the selection callback, then dismisses the popup through `dismiss`
    /// when the item is dismiss-on-select. Returns whether a dismissal was
    /// requested and accepted.
    pub fn select(&self, dismiss: &DismissHandle) -> bool {
        let actions = self.actions();
        if let Some(callback) = &actions.callback {
            callback();
        }
        if actions.dismiss_on_select {
            dismiss.dismiss(DismissReason::ItemSelected)
        } else {
            false
        }
    }
}

impl From<LabelItem> for Item {
    fn from(item: LabelItem) -> Self {
        Item::Label(item)
    }
}

impl From<CustomItem> for Item {
    fn from(item: CustomItem) -> Self {
        Item::Custom(item)
    }
}
