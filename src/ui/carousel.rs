//! Carousel strip widget.
//!
//! Lays the frame's display list out as equal-width slots side by side,
//! shifts the strip by the animated offset, and clips whatever falls
//! outside the viewport.  Partially visible slots are rendered into a
//! scratch buffer first so the card renderer never has to know it is
//! being clipped.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    text::Span,
    widgets::Widget,
};

use crate::core::engine::{CarouselFrame, CarouselItem};

use super::card::CardRenderer;
use super::theme::Theme;

/// Blank columns between neighbouring cards.
const GUTTER: u16 = 1;

/// Absorbs float noise so whole-slot offsets land on exact columns.
const EPSILON: f64 = 1e-6;

/// Renders the visible part of the carousel strip.
pub struct CarouselStrip<'a, T: CarouselItem, R> {
    frame: &'a CarouselFrame<'a, T>,
    /// Animated strip offset (percent of strip width, ≤ 0).
    offset_percent: f64,
    renderer: &'a R,
}

impl<'a, T: CarouselItem, R: CardRenderer<T>> CarouselStrip<'a, T, R> {
    pub fn new(frame: &'a CarouselFrame<'a, T>, offset_percent: f64, renderer: &'a R) -> Self {
        Self {
            frame,
            offset_percent,
            renderer,
        }
    }
}

impl<T: CarouselItem, R: CardRenderer<T>> Widget for CarouselStrip<'_, T, R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let slots = self.frame.slots.len();
        let visible = self.frame.effective_visible;
        if slots == 0 || visible == 0 || area.width == 0 || area.height == 0 {
            return;
        }

        let slot_width = f64::from(area.width) / visible as f64;
        let shift = -self.offset_percent / 100.0 * slots as f64 * slot_width;
        let viewport = f64::from(area.width);

        for (i, slot) in self.frame.slots.iter().enumerate() {
            let left = i as f64 * slot_width - shift;
            let right = left + slot_width;
            if right <= 0.0 || left >= viewport {
                continue;
            }

            let x0 = (left + EPSILON).floor() as i32;
            let width = ((right + EPSILON).floor() as i32 - x0).max(0) as u16;
            if width <= GUTTER * 2 {
                continue;
            }

            let scratch_area = Rect::new(0, 0, width, area.height);
            let mut scratch = Buffer::empty(scratch_area);
            let card_area = Rect::new(GUTTER, 0, width - GUTTER * 2, area.height);
            self.renderer.render_card(slot.item, card_area, &mut scratch);
            blit(&scratch, x0, area, buf);
        }
    }
}

/// Copy `src` into `dst` with its left edge at column `x0` of `area`,
/// dropping every column outside `area`.
fn blit(src: &Buffer, x0: i32, area: Rect, dst: &mut Buffer) {
    for sx in 0..src.area.width {
        let dx = x0 + i32::from(sx);
        if dx < 0 || dx >= i32::from(area.width) {
            continue;
        }
        let dx = area.x + dx as u16;
        for sy in 0..src.area.height.min(area.height) {
            let Some(cell) = src.cell(Position::new(sx, sy)) else {
                continue;
            };
            if let Some(target) = dst.cell_mut(Position::new(dx, area.y + sy)) {
                *target = cell.clone();
            }
        }
    }
}

/// Which way an arrow points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowDirection {
    Previous,
    Next,
}

/// Navigation arrow, drawn vertically centered.  Hidden when navigation is
/// unavailable.
pub struct Arrow {
    pub direction: ArrowDirection,
    pub enabled: bool,
}

impl Widget for Arrow {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.enabled || area.width == 0 || area.height == 0 {
            return;
        }
        let glyph = match self.direction {
            ArrowDirection::Previous => "‹",
            ArrowDirection::Next => "›",
        };
        let x = area.x + area.width / 2;
        let y = area.y + area.height / 2;
        buf.set_span(x, y, &Span::styled(glyph, Theme::arrow_style()), 1);
    }
}
