//! The boundary between the popup core and the host's rendering system.
//!
//! The core never draws anything. On `show` it asks a [`PopupHost`] for the
//! screen bounds, a theme style and the content size, computes a placement,
//! and hands a [`SurfaceRequest`] to [`PopupHost::create_surface`]. The
//! returned [`PopupSurface`] is owned by the controller for the rest of the
//! episode and receives section updates, element visibility toggles and a
//! final [`close`](PopupSurface::close).
//!
//! Surfaces talk back through the [`DismissHandle`] in the request: outside
//! touches, back presses and dismiss-on-select items all end up in the
//! controller's single dismissal path.

use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use crate::controller::WeakPopupController;
use crate::geometry::{Rect, Size};
use crate::menu::Section;
use crate::positioning::Placement;
use crate::style::{ResolvedStyle, StyleAttribute, StyleId};

/// Why a popup was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DismissReason {
    /// [`PopupController::dismiss`](crate::PopupController::dismiss) was called.
    Explicit,
    /// The user touched outside the surface.
    TouchOutside,
    /// The user pressed back.
    BackPressed,
    /// A dismiss-on-select item was picked.
    ItemSelected,
}

/// Independently toggleable parts of a visible popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopupElement {
    /// The anchor indicator.
    Anchor,
    /// The menu content.
    Menu,
    /// The additional view band.
    AdditionalView,
}

/// Caller-owned content shown beneath the menu.
///
/// The controller only reserves space for it; the view's lifecycle stays
/// with the caller.
#[derive(Clone)]
pub struct AdditionalViewModel {
    pub view: Rc<dyn Any>,
    pub max_height: i32,
}

impl AdditionalViewModel {
    pub fn new(view: Rc<dyn Any>, max_height: i32) -> Self {
        Self { view, max_height }
    }
}

impl fmt::Debug for AdditionalViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdditionalViewModel")
            .field("max_height", &self.max_height)
            .finish_non_exhaustive()
    }
}

/// Environment services the controller needs to show a popup.
pub trait PopupHost {
    /// Bounds of the display area available to popups.
    fn screen_bounds(&self) -> Rect;

    /// Look up a theme attribute. `None` when the theme does not define it.
    fn resolve_style(&self, attribute: StyleAttribute) -> Option<StyleId>;

    /// Intrinsic size of the given sections rendered in `style`.
    fn measure_content(&mut self, sections: &[Section], style: StyleId) -> Size;

    /// Create and show a surface.
    fn create_surface(&mut self, request: SurfaceRequest) -> Box<dyn PopupSurface>;
}

/// A live popup surface.
pub trait PopupSurface {
    /// Replace the rendered sections in place. The surface keeps its
    /// position and size.
    fn set_sections(&mut self, sections: &[Section]);

    /// Show or hide one element.
    fn set_element_visible(&mut self, element: PopupElement, visible: bool);

    /// Tear the surface down. Called exactly once, when the episode ends.
    fn close(&mut self);
}

/// Everything a host needs to build a surface.
#[derive(Debug)]
pub struct SurfaceRequest {
    pub anchor: Rect,
    pub placement: Placement,
    pub style: ResolvedStyle,
    pub sections: Vec<Section>,
    pub additional_view: Option<AdditionalViewModel>,
    pub haptic_feedback_enabled: bool,
    /// Where the surface reports dismissal.
    pub dismiss: DismissHandle,
}

/// A surface's way to end the episode it was created for.
///
/// The handle holds only a weak controller reference and remembers its
/// episode: once that episode is over, every call is a no-op, even if the
/// controller has been shown again since.
#[derive(Clone)]
pub struct DismissHandle {
    controller: Option<WeakPopupController>,
    episode: u64,
}

impl DismissHandle {
    pub(crate) fn new(controller: WeakPopupController, episode: u64) -> Self {
        Self {
            controller: Some(controller),
            episode,
        }
    }

    /// A handle connected to nothing. Useful for previews and tests.
    pub fn detached() -> Self {
        Self {
            controller: None,
            episode: 0,
        }
    }

    /// Whether the episode this handle belongs to is still running.
    pub fn is_live(&self) -> bool {
        self.controller
            .as_ref()
            .and_then(WeakPopupController::upgrade)
            .is_some_and(|controller| controller.is_current_episode(self.episode))
    }

    /// Dismiss the popup. Returns `true` if this call ended the episode.
    pub fn dismiss(&self, reason: DismissReason) -> bool {
        match self.controller.as_ref().and_then(WeakPopupController::upgrade) {
            Some(controller) => controller.dismiss_episode(self.episode, reason),
            None => false,
        }
    }

    /// Report a dismissal the user triggered on the surface (outside touch,
    /// back press).
    pub fn on_external_dismiss(&self, reason: DismissReason) {
        self.dismiss(reason);
    }
}

impl fmt::Debug for DismissHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DismissHandle")
            .field("attached", &self.controller.is_some())
            .field("episode", &self.episode)
            .finish()
    }
}

/// Tracks which items have had their view-bound callback run.
///
/// Renderers recycle views; a callback must still run only once per item for
/// a given set of sections. Call [`reset`](Self::reset) whenever the surface
/// receives new sections.
#[derive(Debug, Default)]
pub struct BindTracker {
    generation: u64,
    bound: HashSet<(usize, usize)>,
}

impl BindTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new content generation. Every item may bind again.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.bound.clear();
    }

    /// Number of resets so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_bound(&self, section: usize, item: usize) -> bool {
        self.bound.contains(&(section, item))
    }

    /// Run the item's view-bound callback unless it already ran this
    /// generation. Returns whether the callback ran.
    ///
    /// Out-of-range indices are ignored.
    pub fn bind(
        &mut self,
        sections: &[Section],
        section: usize,
        item: usize,
        view: &mut dyn Any,
    ) -> bool {
        let Some(target) = sections.get(section).and_then(|s| s.items().get(item)) else {
            return false;
        };
        if !self.bound.insert((section, item)) {
            return false;
        }
        target.bind_view(view)
    }
}
