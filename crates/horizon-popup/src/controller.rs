//! The popup lifecycle.
//!
//! A [`PopupController`] owns one [`MenuSpec`] and shows it as at most one
//! surface at a time. Each show starts an *episode* that ends with exactly one
//! dismissal, whichever way it is triggered: [`PopupController::dismiss`], an
//! outside touch or back press reported by the surface, or a dismiss-on-select
//! item. All of them go through the same path, which closes the surface and
//! then runs the dismiss listener once.
//!
//! # Re-entrancy
//!
//! The controller never holds its internal borrow while calling out to the
//! host, the surface or a listener. A dismiss listener may show the popup
//! again; a surface may dismiss from inside `set_sections`. Surface calls
//! made while the surface is busy with another call are queued and replayed
//! in order once it returns.
//!
//! # Example
//!
//! ```ignore
//! let controller = PopupController::new(spec);
//! controller.set_on_dismiss_listener(|| println!("dismissed"));
//!
//! let placement = controller.show(&mut host, anchor, None, None)?;
//! controller.update_sections([loaded_section])?;
//! controller.dismiss();
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use horizon_popup_core::logging::{PerfSpan, span_names, targets};
use horizon_popup_core::{ThreadAffinity, popup_warn};

use crate::config::PopupConfig;
use crate::error::{PopupError, Result};
use crate::geometry::Rect;
use crate::menu::{MenuSpec, Section, SectionBuilder, build_sections};
use crate::positioning::{Placement, PlacementRequest, compute_placement};
use crate::style::{ResolvedStyle, StyleId, resolve_style};
use crate::surface::{
    AdditionalViewModel, DismissHandle, DismissReason, PopupElement, PopupHost, PopupSurface,
    SurfaceRequest,
};

/// Listener run when an episode ends.
pub type DismissListener = Rc<dyn Fn()>;

/// Whether a popup is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopupState {
    Hidden,
    Visible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ElementVisibility {
    anchor: bool,
    menu: bool,
    additional_view: bool,
}

impl ElementVisibility {
    fn get(&self, element: PopupElement) -> bool {
        match element {
            PopupElement::Anchor => self.anchor,
            PopupElement::Menu => self.menu,
            PopupElement::AdditionalView => self.additional_view,
        }
    }

    fn set(&mut self, element: PopupElement, visible: bool) {
        match element {
            PopupElement::Anchor => self.anchor = visible,
            PopupElement::Menu => self.menu = visible,
            PopupElement::AdditionalView => self.additional_view = visible,
        }
    }
}

/// A call to forward to the surface.
enum SurfaceOp {
    SetSections(Vec<Section>),
    SetVisible(PopupElement, bool),
}

impl SurfaceOp {
    fn apply(self, surface: &mut dyn PopupSurface) {
        match self {
            SurfaceOp::SetSections(sections) => surface.set_sections(&sections),
            SurfaceOp::SetVisible(element, visible) => {
                surface.set_element_visible(element, visible)
            }
        }
    }
}

/// State of a visible popup.
struct Episode {
    id: u64,
    /// `None` while the surface is being created or is lent out to a call.
    surface: Option<Box<dyn PopupSurface>>,
    /// Calls made while `surface` was `None`.
    deferred: Vec<SurfaceOp>,
    placement: Placement,
    style: ResolvedStyle,
    visibility: ElementVisibility,
}

struct ControllerState {
    spec: MenuSpec,
    config: PopupConfig,
    episode: Option<Episode>,
    episodes_started: u64,
    on_dismiss: Option<DismissListener>,
    on_touch_outside: Option<DismissListener>,
    last_dismiss_reason: Option<DismissReason>,
}

struct Shared {
    affinity: ThreadAffinity,
    state: RefCell<ControllerState>,
}

/// Shows a menu and governs its show/update/dismiss lifecycle.
///
/// Cloning yields another handle to the same controller. Controllers are
/// single-threaded and must be used from the thread that created them.
/// Dropping the last handle while visible closes the surface without running
/// the dismiss listener.
#[derive(Clone)]
pub struct PopupController {
    shared: Rc<Shared>,
}

/// A non-owning reference to a [`PopupController`].
#[derive(Clone)]
pub struct WeakPopupController {
    shared: Weak<Shared>,
}

impl WeakPopupController {
    /// The controller, if it is still alive.
    pub fn upgrade(&self) -> Option<PopupController> {
        self.shared.upgrade().map(|shared| PopupController { shared })
    }
}

impl fmt::Debug for WeakPopupController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakPopupController")
            .field("alive", &(self.shared.strong_count() > 0))
            .finish()
    }
}

impl PopupController {
    /// Create a hidden controller with the default configuration.
    pub fn new(spec: MenuSpec) -> Self {
        Self::with_config(spec, PopupConfig::default())
    }

    /// Create a hidden controller.
    pub fn with_config(spec: MenuSpec, config: PopupConfig) -> Self {
        Self {
            shared: Rc::new(Shared {
                affinity: ThreadAffinity::current(),
                state: RefCell::new(ControllerState {
                    spec,
                    config,
                    episode: None,
                    episodes_started: 0,
                    on_dismiss: None,
                    on_touch_outside: None,
                    last_dismiss_reason: None,
                }),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakPopupController {
        WeakPopupController {
            shared: Rc::downgrade(&self.shared),
        }
    }

    fn check_thread(&self, operation: &str) {
        self.shared.affinity.debug_check(operation);
    }

    // =========================================================================
    // Show
    // =========================================================================

    /// Show the menu next to `anchor`.
    ///
    /// `style_override` is used when the menu has no style of its own.
    /// Fails with [`PopupError::AlreadyVisible`] while an episode is running.
    pub fn show(
        &self,
        host: &mut dyn PopupHost,
        anchor: Rect,
        style_override: Option<StyleId>,
        additional_view: Option<AdditionalViewModel>,
    ) -> Result<Placement> {
        self.check_thread("show");
        let _perf = PerfSpan::new(span_names::SHOW);

        let (spec, config) = {
            let state = self.shared.state.borrow();
            if state.episode.is_some() {
                return Err(PopupError::AlreadyVisible);
            }
            (state.spec.clone(), state.config.clone())
        };

        let style = resolve_style(
            spec.style(),
            style_override,
            |attribute| host.resolve_style(attribute),
            config.default_style,
        );
        let content_size = host.measure_content(spec.sections(), style.id);
        let request = PlacementRequest::new(anchor, host.screen_bounds(), content_size)
            .with_gravity(spec.dropdown_gravity())
            .with_insets(config.screen_insets)
            .with_fixed_width(spec.fixed_content_width())
            .with_offsets(spec.horizontal_offset(), spec.vertical_offset())
            .with_ignore_max_height(spec.ignore_max_height())
            .with_anchor_indicator(spec.draw_anchor_indicator())
            .with_additional_view_height(additional_view.as_ref().map(|view| view.max_height))
            .with_horizontal_clamp(config.clamp_horizontally);
        let placement = compute_placement(&request);

        // The host may have re-entered while measuring.
        let episode = {
            let mut state = self.shared.state.borrow_mut();
            if state.episode.is_some() {
                return Err(PopupError::AlreadyVisible);
            }
            state.episodes_started += 1;
            let id = state.episodes_started;
            state.episode = Some(Episode {
                id,
                surface: None,
                deferred: Vec::new(),
                placement,
                style,
                visibility: ElementVisibility {
                    anchor: spec.draw_anchor_indicator(),
                    menu: true,
                    additional_view: additional_view.is_some(),
                },
            });
            id
        };

        tracing::debug!(
            target: targets::CONTROLLER,
            episode,
            ?anchor,
            style = ?style.id,
            style_origin = ?style.origin,
            x = placement.x,
            y = placement.y,
            width = placement.width,
            height = placement.height,
            "showing popup"
        );

        let surface = host.create_surface(SurfaceRequest {
            anchor,
            placement,
            style,
            sections: spec.sections().to_vec(),
            additional_view,
            haptic_feedback_enabled: config.haptic_feedback_enabled,
            dismiss: DismissHandle::new(self.downgrade(), episode),
        });

        if !self.install_surface(episode, surface) {
            popup_warn!(episode, "popup dismissed while its surface was being created");
        }
        Ok(placement)
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Replace the sections of the visible menu in place.
    ///
    /// The surface is kept, as are its position and size. While hidden the
    /// update is discarded and `Ok(false)` is returned. Invalid sections fail
    /// before anything changes.
    pub fn update_sections(
        &self,
        sections: impl IntoIterator<Item = SectionBuilder>,
    ) -> Result<bool> {
        let sections = build_sections(sections)?;
        Ok(self.replace_sections(sections))
    }

    /// Like [`update_sections`](Self::update_sections) for already-built
    /// sections.
    pub fn replace_sections(&self, sections: Vec<Section>) -> bool {
        self.check_thread("replace_sections");
        let episode = {
            let mut state = self.shared.state.borrow_mut();
            let Some(episode) = state.episode.as_ref().map(|episode| episode.id) else {
                tracing::trace!(
                    target: targets::CONTROLLER,
                    "popup hidden, section update discarded"
                );
                return false;
            };
            state.spec.replace_sections(sections.clone());
            episode
        };

        tracing::debug!(
            target: targets::CONTROLLER,
            episode,
            sections = sections.len(),
            "sections replaced"
        );
        self.forward(episode, SurfaceOp::SetSections(sections));
        true
    }

    // =========================================================================
    // Dismiss
    // =========================================================================

    /// End the current episode. Returns `false` if the popup was hidden.
    pub fn dismiss(&self) -> bool {
        self.check_thread("dismiss");
        self.end_episode(None, DismissReason::Explicit)
    }

    pub(crate) fn dismiss_episode(&self, episode: u64, reason: DismissReason) -> bool {
        self.check_thread("dismiss_episode");
        self.end_episode(Some(episode), reason)
    }

    pub(crate) fn is_current_episode(&self, episode: u64) -> bool {
        self.current_episode() == Some(episode)
    }

    fn current_episode(&self) -> Option<u64> {
        self.shared
            .state
            .borrow()
            .episode
            .as_ref()
            .map(|episode| episode.id)
    }

    /// The single dismissal path.
    fn end_episode(&self, expected: Option<u64>, reason: DismissReason) -> bool {
        let Some(current) = self.current_episode() else {
            tracing::trace!(target: targets::CONTROLLER, ?reason, "popup already hidden");
            return false;
        };
        if expected.is_some_and(|id| id != current) {
            tracing::trace!(
                target: targets::CONTROLLER,
                ?reason,
                "dismissal from a finished episode ignored"
            );
            return false;
        }

        if reason == DismissReason::TouchOutside {
            let listener = self.shared.state.borrow().on_touch_outside.clone();
            if let Some(listener) = listener {
                listener();
            }
        }

        let (surface, listener) = {
            let mut state = self.shared.state.borrow_mut();
            // The touch-outside listener may have ended the episode already.
            if state.episode.as_ref().map(|episode| episode.id) != Some(current) {
                return false;
            }
            let Some(episode) = state.episode.take() else {
                return false;
            };
            state.last_dismiss_reason = Some(reason);
            (episode.surface, state.on_dismiss.clone())
        };

        if let Some(mut surface) = surface {
            surface.close();
        }
        tracing::debug!(target: targets::CONTROLLER, episode = current, ?reason, "popup dismissed");

        if let Some(listener) = listener {
            listener();
        }
        true
    }

    /// Set the listener run after every dismissal, replacing any previous one.
    ///
    /// Takes effect for a running episode as well.
    pub fn set_on_dismiss_listener(&self, listener: impl Fn() + 'static) {
        self.shared.state.borrow_mut().on_dismiss = Some(Rc::new(listener));
    }

    pub fn clear_on_dismiss_listener(&self) {
        self.shared.state.borrow_mut().on_dismiss = None;
    }

    /// Set the listener run when the user touches outside the surface, before
    /// the popup is dismissed.
    pub fn set_touch_outside_listener(&self, listener: impl Fn() + 'static) {
        self.shared.state.borrow_mut().on_touch_outside = Some(Rc::new(listener));
    }

    pub fn clear_touch_outside_listener(&self) {
        self.shared.state.borrow_mut().on_touch_outside = None;
    }

    /// How the most recent episode ended.
    pub fn dismiss_reason_of_last_episode(&self) -> Option<DismissReason> {
        self.shared.state.borrow().last_dismiss_reason
    }

    // =========================================================================
    // Element visibility
    // =========================================================================

    /// Show or hide part of the visible popup. The popup stays visible.
    ///
    /// Returns `false` (and does nothing) while hidden.
    pub fn set_visible(&self, element: PopupElement, visible: bool) -> bool {
        self.check_thread("set_visible");
        let episode = {
            let mut state = self.shared.state.borrow_mut();
            let Some(episode) = state.episode.as_mut() else {
                tracing::trace!(
                    target: targets::CONTROLLER,
                    ?element,
                    "popup hidden, visibility change ignored"
                );
                return false;
            };
            episode.visibility.set(element, visible);
            episode.id
        };
        self.forward(episode, SurfaceOp::SetVisible(element, visible));
        true
    }

    pub fn set_visible_anchor(&self, visible: bool) -> bool {
        self.set_visible(PopupElement::Anchor, visible)
    }

    pub fn set_visible_menu(&self, visible: bool) -> bool {
        self.set_visible(PopupElement::Menu, visible)
    }

    pub fn set_visible_additional_view(&self, visible: bool) -> bool {
        self.set_visible(PopupElement::AdditionalView, visible)
    }

    /// Current visibility of an element, or `None` while hidden.
    pub fn element_visible(&self, element: PopupElement) -> Option<bool> {
        self.shared
            .state
            .borrow()
            .episode
            .as_ref()
            .map(|episode| episode.visibility.get(element))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn state(&self) -> PopupState {
        if self.shared.state.borrow().episode.is_some() {
            PopupState::Visible
        } else {
            PopupState::Hidden
        }
    }

    pub fn is_visible(&self) -> bool {
        self.state() == PopupState::Visible
    }

    /// Placement of the visible popup.
    pub fn placement(&self) -> Option<Placement> {
        self.shared
            .state
            .borrow()
            .episode
            .as_ref()
            .map(|episode| episode.placement)
    }

    /// Style of the visible popup.
    pub fn style(&self) -> Option<ResolvedStyle> {
        self.shared
            .state
            .borrow()
            .episode
            .as_ref()
            .map(|episode| episode.style)
    }

    /// A copy of the menu, including any sections replaced since creation.
    pub fn spec(&self) -> MenuSpec {
        self.shared.state.borrow().spec.clone()
    }

    pub fn config(&self) -> PopupConfig {
        self.shared.state.borrow().config.clone()
    }

    // =========================================================================
    // Surface access
    // =========================================================================

    /// Return a surface to its episode, first replaying any calls deferred
    /// while it was away. Closes it instead if the episode has ended.
    fn install_surface(&self, episode: u64, mut surface: Box<dyn PopupSurface>) -> bool {
        loop {
            let deferred = {
                let mut state = self.shared.state.borrow_mut();
                match state.episode.as_mut() {
                    Some(current) if current.id == episode && current.surface.is_none() => {
                        if current.deferred.is_empty() {
                            current.surface = Some(surface);
                            return true;
                        }
                        Some(std::mem::take(&mut current.deferred))
                    }
                    _ => None,
                }
            };
            let Some(deferred) = deferred else {
                surface.close();
                return false;
            };
            tracing::trace!(
                target: targets::CONTROLLER,
                episode,
                calls = deferred.len(),
                "replaying deferred surface calls"
            );
            for op in deferred {
                op.apply(surface.as_mut());
            }
        }
    }

    /// Send `op` to the surface with no borrow held, or queue it if the
    /// surface is lent out.
    fn forward(&self, episode: u64, op: SurfaceOp) {
        let mut surface = {
            let mut state = self.shared.state.borrow_mut();
            let Some(current) = state.episode.as_mut().filter(|current| current.id == episode)
            else {
                return;
            };
            match current.surface.take() {
                Some(surface) => surface,
                None => {
                    tracing::trace!(
                        target: targets::CONTROLLER,
                        episode,
                        "surface busy, call deferred"
                    );
                    current.deferred.push(op);
                    return;
                }
            }
        };
        op.apply(surface.as_mut());
        self.install_surface(episode, surface);
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let episode = self.state.get_mut().episode.take();
        if let Some(Episode {
            id,
            surface: Some(mut surface),
            ..
        }) = episode
        {
            tracing::debug!(
                target: targets::CONTROLLER,
                episode = id,
                "controller dropped while visible, surface closed"
            );
            surface.close();
        }
    }
}

impl fmt::Debug for PopupController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        let popup_state = if state.episode.is_some() {
            PopupState::Visible
        } else {
            PopupState::Hidden
        };
        f.debug_struct("PopupController")
            .field("state", &popup_state)
            .field("episodes_started", &state.episodes_started)
            .field("sections", &state.spec.sections().len())
            .finish()
    }
}
