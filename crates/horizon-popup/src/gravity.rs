//! Dropdown gravity flags.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Which edges of the anchor the dropdown aligns to.
///
/// Flags combine with `|`. Horizontally, [`Gravity::START`] aligns the
/// surface's start edge with the anchor's start edge and [`Gravity::END`]
/// aligns the end edges; with neither set the surface is start-aligned.
/// Vertically, [`Gravity::BOTTOM`] opens below the anchor and
/// [`Gravity::TOP`] above it; with neither set the dropdown opens below.
///
/// # Example
///
/// ```
/// use horizon_popup::Gravity;
///
/// let gravity = Gravity::END | Gravity::BOTTOM;
/// assert!(gravity.is_end_aligned());
/// assert!(!gravity.opens_upwards());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Gravity(u8);

impl Gravity {
    /// No flags: start-aligned, below the anchor.
    pub const NONE: Gravity = Gravity(0);

    /// Align start edges.
    pub const START: Gravity = Gravity(1 << 0);

    /// Align end edges.
    pub const END: Gravity = Gravity(1 << 1);

    /// Open above the anchor.
    pub const TOP: Gravity = Gravity(1 << 2);

    /// Open below the anchor.
    pub const BOTTOM: Gravity = Gravity(1 << 3);

    /// Raw bit representation.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits, dropping unknown bits.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Gravity(bits & 0b1111)
    }

    /// Check if a flag is set.
    pub fn has(&self, flag: Gravity) -> bool {
        (self.0 & flag.0) == flag.0
    }

    /// Check if no flag is set.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Whether the surface's end edge follows the anchor's end edge.
    ///
    /// `START` wins when both horizontal flags are set.
    pub fn is_end_aligned(&self) -> bool {
        self.has(Self::END) && !self.has(Self::START)
    }

    /// Whether the dropdown initially opens above the anchor.
    ///
    /// `BOTTOM` wins when both vertical flags are set.
    pub fn opens_upwards(&self) -> bool {
        self.has(Self::TOP) && !self.has(Self::BOTTOM)
    }
}

impl BitOr for Gravity {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Gravity(self.0 | rhs.0)
    }
}

impl BitOrAssign for Gravity {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Gravity {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Gravity(self.0 & rhs.0)
    }
}

impl fmt::Debug for Gravity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Gravity(NONE)");
        }
        let names = [
            (Self::START, "START"),
            (Self::END, "END"),
            (Self::TOP, "TOP"),
            (Self::BOTTOM, "BOTTOM"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.has(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "Gravity({})", set.join(" | "))
    }
}
