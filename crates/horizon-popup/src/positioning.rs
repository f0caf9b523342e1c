//! Placement of the popup surface relative to its anchor.
//!
//! [`compute_placement`] is a pure function of the anchor rectangle, the
//! screen, the menu's measured content and the menu's gravity, offset, width
//! and height settings. It never fails: degenerate input (an anchor off
//! screen, an empty screen) yields the nearest rectangle that fits. All
//! arithmetic saturates, so extreme coordinates or offsets clamp instead of
//! overflowing.
//!
//! The steps, in order:
//!
//! 1. Width: the fixed width if set, otherwise the content width clamped to
//!    the screen width.
//! 2. Height: the content height, clamped to the usable screen height (screen
//!    minus insets, minus any additional view band) unless the menu ignores
//!    the max height. Clamping marks the content as clipped.
//! 3. Horizontal edge: start edges aligned, or end edges aligned for
//!    [`Gravity::END`]; then the horizontal offset; then a shift back inside
//!    the usable area.
//! 4. Vertical side: below the anchor, or above for [`Gravity::TOP`], plus the
//!    vertical offset. If that side overflows the usable area the other side
//!    is tried once. If both overflow, the preferred side is kept and the
//!    surface is clamped to the usable area.

use horizon_popup_core::logging::targets;

use crate::geometry::{Insets, Point, Rect, Size};
use crate::gravity::Gravity;

/// Which side of the anchor the surface ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalSide {
    Below,
    Above,
}

impl VerticalSide {
    fn opposite(self) -> Self {
        match self {
            VerticalSide::Below => VerticalSide::Above,
            VerticalSide::Above => VerticalSide::Below,
        }
    }
}

/// How the vertical position was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalFit {
    /// The preferred side fit.
    Preferred,
    /// The preferred side overflowed and the opposite side fit.
    Flipped,
    /// Neither side fit; the surface was clamped to the usable area.
    Clamped,
}

/// Input to [`compute_placement`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRequest {
    /// Anchor bounds in screen coordinates.
    pub anchor: Rect,
    /// Display bounds.
    pub screen: Rect,
    /// Areas of the screen the surface must keep clear of.
    pub insets: Insets,
    /// Intrinsic size of the menu content.
    pub content_size: Size,
    pub gravity: Gravity,
    pub fixed_width: Option<i32>,
    pub vertical_offset: Option<i32>,
    pub horizontal_offset: Option<i32>,
    pub ignore_max_height: bool,
    pub draw_anchor_indicator: bool,
    /// Height reserved for an additional view beneath the menu content.
    pub additional_view_height: Option<i32>,
    /// Shift the surface horizontally to stay inside the usable area.
    pub clamp_horizontally: bool,
}

impl PlacementRequest {
    /// Create a request with default settings: start-aligned, below the
    /// anchor, no offsets, height capped, horizontal clamping on.
    pub fn new(anchor: Rect, screen: Rect, content_size: Size) -> Self {
        Self {
            anchor,
            screen,
            insets: Insets::ZERO,
            content_size,
            gravity: Gravity::NONE,
            fixed_width: None,
            vertical_offset: None,
            horizontal_offset: None,
            ignore_max_height: false,
            draw_anchor_indicator: false,
            additional_view_height: None,
            clamp_horizontally: true,
        }
    }

    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }

    pub fn with_fixed_width(mut self, width: Option<i32>) -> Self {
        self.fixed_width = width;
        self
    }

    pub fn with_offsets(mut self, horizontal: Option<i32>, vertical: Option<i32>) -> Self {
        self.horizontal_offset = horizontal;
        self.vertical_offset = vertical;
        self
    }

    pub fn with_ignore_max_height(mut self, ignore: bool) -> Self {
        self.ignore_max_height = ignore;
        self
    }

    pub fn with_anchor_indicator(mut self, draw: bool) -> Self {
        self.draw_anchor_indicator = draw;
        self
    }

    pub fn with_additional_view_height(mut self, height: Option<i32>) -> Self {
        self.additional_view_height = height;
        self
    }

    pub fn with_horizontal_clamp(mut self, clamp: bool) -> Self {
        self.clamp_horizontally = clamp;
        self
    }
}

/// Where and how large the surface is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    /// Total surface height, including any additional view band.
    pub height: i32,
    /// Height available to the menu content.
    pub content_height: i32,
    /// The content was taller than the allowed height; the renderer should
    /// scroll it.
    pub content_clipped: bool,
    pub side: VerticalSide,
    pub fit: VerticalFit,
    /// Anchor midpoint, when an anchor indicator was requested.
    pub anchor_indicator: Option<Point>,
    /// Band beneath the menu content reserved for the additional view.
    pub additional_view: Option<Rect>,
}

impl Placement {
    /// The surface bounds.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// The menu content bounds (the surface minus the additional view band).
    pub fn content_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.content_height)
    }
}

/// Position `len` at `pos`, shifted to lie within `[min, max_end]`.
///
/// Spans longer than the range start at `min`.
fn clamp_span(pos: i32, len: i32, min: i32, max_end: i32) -> i32 {
    let room = max_end.saturating_sub(min);
    if len >= room {
        min
    } else {
        pos.clamp(min, max_end.saturating_sub(len))
    }
}

/// Compute the surface placement. See the module docs for the algorithm.
pub fn compute_placement(request: &PlacementRequest) -> Placement {
    let screen = Rect {
        origin: request.screen.origin,
        size: Size::new(request.screen.width().max(0), request.screen.height().max(0)),
    };
    let usable = screen.inset(request.insets);
    let anchor = request.anchor;
    let content = Size::new(
        request.content_size.width.max(0),
        request.content_size.height.max(0),
    );

    // Width
    let width = match request.fixed_width {
        Some(fixed) => fixed.max(0),
        None => content.width.min(screen.width()),
    };

    // Height
    let band = request.additional_view_height.unwrap_or(0).max(0);
    let max_content_height = usable.height().saturating_sub(band).max(0);
    let (content_height, content_clipped) =
        if !request.ignore_max_height && content.height > max_content_height {
            (max_content_height, true)
        } else {
            (content.height, false)
        };
    let height = content_height.saturating_add(band);

    // Horizontal edge
    let aligned_x = if request.gravity.is_end_aligned() {
        anchor.right().saturating_sub(width)
    } else {
        anchor.left()
    };
    let mut x = aligned_x.saturating_add(request.horizontal_offset.unwrap_or(0));
    if request.clamp_horizontally {
        x = clamp_span(x, width, usable.left(), usable.right());
    }

    // Vertical side
    let v_offset = request.vertical_offset.unwrap_or(0);
    let y_for = |side: VerticalSide| match side {
        VerticalSide::Below => anchor.bottom().saturating_add(v_offset),
        VerticalSide::Above => anchor.top().saturating_sub(height).saturating_add(v_offset),
    };
    let fits = |side: VerticalSide| {
        let y = y_for(side);
        y >= usable.top() && y.saturating_add(height) <= usable.bottom()
    };
    let preferred = if request.gravity.opens_upwards() {
        VerticalSide::Above
    } else {
        VerticalSide::Below
    };

    let (side, fit, y) = if fits(preferred) {
        (preferred, VerticalFit::Preferred, y_for(preferred))
    } else if fits(preferred.opposite()) {
        let side = preferred.opposite();
        tracing::trace!(
            target: targets::POSITIONING,
            from = ?preferred,
            to = ?side,
            "surface overflowed, flipped to the opposite side"
        );
        (side, VerticalFit::Flipped, y_for(side))
    } else {
        let y = clamp_span(y_for(preferred), height, usable.top(), usable.bottom());
        tracing::trace!(
            target: targets::POSITIONING,
            side = ?preferred,
            y,
            "surface overflowed on both sides, clamped to the screen"
        );
        (preferred, VerticalFit::Clamped, y)
    };

    let placement = Placement {
        x,
        y,
        width,
        height,
        content_height,
        content_clipped,
        side,
        fit,
        anchor_indicator: request.draw_anchor_indicator.then(|| anchor.center()),
        additional_view: (band > 0)
            .then(|| Rect::new(x, y.saturating_add(content_height), width, band)),
    };

    tracing::trace!(
        target: targets::POSITIONING,
        ?anchor,
        gravity = ?request.gravity,
        x = placement.x,
        y = placement.y,
        width = placement.width,
        height = placement.height,
        clipped = placement.content_clipped,
        "placement computed"
    );

    placement
}
