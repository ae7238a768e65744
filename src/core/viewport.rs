//! Viewport policy: how many cards fit side by side at a given width.
//!
//! Widths are expressed in pixels so the breakpoints read the same as the
//! web layout they were tuned for.  Terminal callers convert columns with
//! [`ViewportPolicy::columns_to_width`].

/// Width thresholds separating the single-card, two-card and full layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoints {
    /// Below this width only one card is shown.
    pub compact: u32,
    /// At or above this width the caller's default count is used.
    pub wide: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            compact: 768,
            wide: 1280,
        }
    }
}

/// Maps a viewport width to a visible-card count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportPolicy {
    pub breakpoints: Breakpoints,
    /// Count used on wide viewports (3 in the stock layout).
    pub default_visible: usize,
}

impl ViewportPolicy {
    pub fn new(default_visible: usize) -> Self {
        Self {
            breakpoints: Breakpoints::default(),
            default_visible,
        }
    }

    /// Cards visible at `width`.  Pure; no error conditions.
    pub fn visible_for(&self, width: u32) -> usize {
        if width < self.breakpoints.compact {
            1
        } else if width < self.breakpoints.wide {
            2
        } else {
            self.default_visible
        }
    }

    /// Convert a terminal width in columns to pixels.
    pub fn columns_to_width(columns: u16, cell_width_px: u32) -> u32 {
        u32::from(columns).saturating_mul(cell_width_px)
    }
}
