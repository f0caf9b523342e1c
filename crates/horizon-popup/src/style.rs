//! Popup style identifiers and the style fallback chain.
//!
//! A style is an opaque id understood by the host's theme system. The core
//! only decides *which* id a popup uses; what the id looks like is up to the
//! renderer.

use std::fmt;

/// An opaque style identifier. Zero means "unset".
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct StyleId(pub u32);

impl StyleId {
    /// No style chosen.
    pub const UNSET: StyleId = StyleId(0);

    /// Built-in light menu style used when nothing else resolves.
    pub const DEFAULT_MENU: StyleId = StyleId(1);

    /// Built-in dark menu style.
    pub const DARK_MENU: StyleId = StyleId(2);

    /// Built-in dark menu style with a colored background.
    pub const DARK_COLORED_MENU: StyleId = StyleId(3);

    /// Whether this id names a style.
    pub fn is_set(&self) -> bool {
        self.0 != 0
    }

    /// `Some(self)` if set.
    pub fn non_zero(self) -> Option<StyleId> {
        self.is_set().then_some(self)
    }
}

impl fmt::Debug for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::UNSET => f.write_str("StyleId(UNSET)"),
            Self::DEFAULT_MENU => f.write_str("StyleId(DEFAULT_MENU)"),
            Self::DARK_MENU => f.write_str("StyleId(DARK_MENU)"),
            Self::DARK_COLORED_MENU => f.write_str("StyleId(DARK_COLORED_MENU)"),
            StyleId(id) => write!(f, "StyleId({id})"),
        }
    }
}

/// Theme attributes the core may look up through the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleAttribute {
    /// The theme's preferred popup menu style.
    PopupMenuStyle,
}

/// Where a resolved style came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleOrigin {
    /// The menu's own style.
    Menu,
    /// The style override passed to `show`.
    ShowOverride,
    /// The host theme's popup menu attribute.
    Theme,
    /// The configured last-resort default.
    Default,
}

/// A style id together with where it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedStyle {
    pub id: StyleId,
    pub origin: StyleOrigin,
}

/// Pick the style for a popup.
///
/// The menu's own style wins, then the show-time override, then whatever the
/// theme maps [`StyleAttribute::PopupMenuStyle`] to, then `fallback`. Unset
/// ids at any level fall through. The theme is only queried when needed.
pub fn resolve_style(
    menu_style: StyleId,
    show_override: Option<StyleId>,
    theme_lookup: impl FnOnce(StyleAttribute) -> Option<StyleId>,
    fallback: StyleId,
) -> ResolvedStyle {
    if let Some(id) = menu_style.non_zero() {
        return ResolvedStyle {
            id,
            origin: StyleOrigin::Menu,
        };
    }
    if let Some(id) = show_override.and_then(StyleId::non_zero) {
        return ResolvedStyle {
            id,
            origin: StyleOrigin::ShowOverride,
        };
    }
    if let Some(id) = theme_lookup(StyleAttribute::PopupMenuStyle).and_then(StyleId::non_zero) {
        return ResolvedStyle {
            id,
            origin: StyleOrigin::Theme,
        };
    }
    ResolvedStyle {
        id: fallback.non_zero().unwrap_or(StyleId::DEFAULT_MENU),
        origin: StyleOrigin::Default,
    }
}

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::from_rgb8(0, 0, 0);
    pub const WHITE: Color = Color::from_rgb8(255, 255, 255);

    /// Opaque color from RGB components.
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from RGBA components.
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Color from a packed `0xAARRGGBB` value.
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }
}
