//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the autoplay badge drawn on the top border.
pub const BADGE_WIDTH: u16 = 12;

/// Columns reserved on each side of the strip for the arrows.
const ARROW_WIDTH: u16 = 3;

/// Primary screen layout: a bordered carousel pane with arrows either side
/// of the strip and a dot row underneath, plus a bottom status bar.
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    /// The bordered pane (including its border).
    pub carousel_area: Rect,
    pub prev_area: Rect,
    pub strip_area: Rect,
    pub next_area: Rect,
    pub dots_area: Rect,
    /// Clickable autoplay badge on the pane's top border.
    pub badge_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // carousel pane
                Constraint::Length(1), // status bar
            ])
            .split(area);
        let carousel_area = chunks[0];

        let inner = Rect::new(
            carousel_area.x.saturating_add(1),
            carousel_area.y.saturating_add(1),
            carousel_area.width.saturating_sub(2),
            carousel_area.height.saturating_sub(2),
        );
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // arrows + strip
                Constraint::Length(1), // pagination dots
            ])
            .split(inner);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(ARROW_WIDTH),
                Constraint::Min(1),
                Constraint::Length(ARROW_WIDTH),
            ])
            .split(rows[0]);

        let badge_width = BADGE_WIDTH.min(carousel_area.width.saturating_sub(4));
        let badge_area = Rect::new(
            carousel_area.right().saturating_sub(badge_width + 2),
            carousel_area.y,
            badge_width,
            1,
        );

        Self {
            carousel_area,
            prev_area: columns[0],
            strip_area: columns[1],
            next_area: columns[2],
            dots_area: rows[1],
            badge_area,
            status_area: chunks[1],
        }
    }
}

/// Whether the terminal cell (`col`, `row`) falls inside `area`.
pub fn contains(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x
        && col < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}
