//! Pagination dots: one per page, the active page filled.

use ratatui::{buffer::Buffer, layout::Rect, text::Span, widgets::Widget};

use super::theme::Theme;

/// Columns each dot occupies (the glyph plus one space).
const DOT_STRIDE: u16 = 2;

/// Row of pagination dots, centered in its area.
pub struct Pagination {
    pub num_slides: usize,
    pub active: usize,
}

/// First column of the dot row, or `None` when it does not fit.
fn dots_origin(area: Rect, num_slides: usize) -> Option<u16> {
    let count = u16::try_from(num_slides).ok()?;
    let width = count.saturating_mul(DOT_STRIDE).saturating_sub(1);
    if num_slides < 2 || width > area.width || area.height == 0 {
        return None;
    }
    Some(area.x + (area.width - width) / 2)
}

/// Which dot (if any) sits under column `col`.
pub fn dot_at(area: Rect, num_slides: usize, col: u16, row: u16) -> Option<usize> {
    let origin = dots_origin(area, num_slides)?;
    if row != area.y || col < origin {
        return None;
    }
    let offset = col - origin;
    if offset % DOT_STRIDE != 0 {
        return None;
    }
    let idx = usize::from(offset / DOT_STRIDE);
    (idx < num_slides).then_some(idx)
}

impl Widget for Pagination {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(origin) = dots_origin(area, self.num_slides) else {
            return;
        };
        let mut x = origin;
        for i in 0..self.num_slides {
            let (glyph, style) = if i == self.active {
                ("●", Theme::dot_active_style())
            } else {
                ("○", Theme::dot_style())
            };
            buf.set_span(x, area.y, &Span::styled(glyph, style), 1);
            x += DOT_STRIDE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dots_render_centered_with_active_filled() {
        let area = Rect::new(0, 0, 9, 1);
        let mut buf = Buffer::empty(area);
        Pagination {
            num_slides: 3,
            active: 1,
        }
        .render(area, &mut buf);

        let row: String = (0..9).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert_eq!(row, "  ○ ● ○  ");
    }

    #[test]
    fn single_page_draws_nothing() {
        let area = Rect::new(0, 0, 9, 1);
        let mut buf = Buffer::empty(area);
        Pagination {
            num_slides: 1,
            active: 0,
        }
        .render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }

    #[test]
    fn hit_testing_matches_rendered_columns() {
        let area = Rect::new(10, 4, 9, 1);
        assert_eq!(dot_at(area, 3, 12, 4), Some(0));
        assert_eq!(dot_at(area, 3, 14, 4), Some(1));
        assert_eq!(dot_at(area, 3, 16, 4), Some(2));
        assert_eq!(dot_at(area, 3, 13, 4), None);
        assert_eq!(dot_at(area, 3, 14, 5), None);
        assert_eq!(dot_at(area, 1, 14, 4), None);
    }
}
