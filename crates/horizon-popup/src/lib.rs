//! Horizon Popup - anchor-relative popup menus.
//!
//! A popup menu is described once with a [`MenuBuilder`], which validates the
//! content and produces an immutable [`MenuSpec`]. A [`PopupController`]
//! shows the menu next to an anchor rectangle, places it with
//! [`compute_placement`], and governs the show/update/dismiss lifecycle.
//! A [`DynamicSectionUpdater`] swaps in new sections after a delay without
//! recreating the surface.
//!
//! Drawing is left to the host: implement [`PopupHost`] and [`PopupSurface`]
//! to connect a renderer.
//!
//! # Example
//!
//! ```
//! use horizon_popup::{Gravity, LabelItem, MenuBuilder, PlacementRequest, Rect, Size,
//!     compute_placement};
//!
//! let spec = MenuBuilder::new()
//!     .with_dropdown_gravity(Gravity::END | Gravity::BOTTOM)
//!     .section(None, |s| {
//!         s.add_label_item(LabelItem::new("Copy"));
//!         s.add_label_item(LabelItem::new("Paste"));
//!     })
//!     .build()
//!     .unwrap();
//!
//! let anchor = Rect::new(100, 200, 50, 20);
//! let request = PlacementRequest::new(anchor, Rect::new(0, 0, 400, 800), Size::new(120, 96))
//!     .with_gravity(spec.dropdown_gravity());
//! let placement = compute_placement(&request);
//!
//! assert_eq!(placement.x + placement.width, anchor.right());
//! assert_eq!(placement.y, anchor.bottom());
//! ```

pub use horizon_popup_core::{
    Clock, ManualClock, PerfSpan, ScheduledTaskId, SchedulerHandle, SystemClock, ThreadAffinity,
};

pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod gravity;
pub mod menu;
pub mod positioning;
pub mod style;
pub mod surface;
pub mod updater;

pub use config::PopupConfig;
pub use controller::{DismissListener, PopupController, PopupState, WeakPopupController};
pub use error::{ConfigError, PopupError, Result, ValidationError};
pub use geometry::{Insets, Point, Rect, Size};
pub use gravity::Gravity;
pub use menu::{
    CustomItem, IconRef, Item, ItemActions, ItemCallback, Label, LabelItem, LayoutRef, MenuBuilder,
    MenuSpec, Section, SectionBuilder, ViewBoundCallback, build_sections,
};
pub use positioning::{Placement, PlacementRequest, VerticalFit, VerticalSide, compute_placement};
pub use style::{Color, ResolvedStyle, StyleAttribute, StyleId, StyleOrigin, resolve_style};
pub use surface::{
    AdditionalViewModel, BindTracker, DismissHandle, DismissReason, PopupElement, PopupHost,
    PopupSurface, SurfaceRequest,
};
pub use updater::DynamicSectionUpdater;
