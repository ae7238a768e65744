//! Popup overlay widgets for the settings menu and controls submenu.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use super::theme::Theme;
use crate::app::settings::SETTINGS_ITEMS;
use crate::app::state::AppState;
use crate::config::{Action, AppConfig};

// ───────────────────────────────────────── settings popup ────

/// Settings menu popup overlay.
pub struct SettingsPopup<'a> {
    pub state: &'a AppState,
}

impl Widget for SettingsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = (SETTINGS_ITEMS.len() as u16) + 6;
        let popup = centered_fixed(44, height, area);
        let inner = popup_frame(" Settings ", popup, buf);

        let mut lines = vec![Line::raw("")];
        for (i, item) in SETTINGS_ITEMS.iter().enumerate() {
            let selected = i == self.state.settings_selected;
            let prefix = if selected { " ▸ " } else { "   " };
            lines.push(two_column_row(
                format!("{prefix}{}", item.label()),
                item.value_text(self.state),
                inner.width,
                selected,
            ));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Enter/Space: change  Esc: close",
            Theme::hint_style(),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── controls popup ────

/// Interactive controls / keybinding popup overlay.
pub struct ControlsPopup<'a> {
    pub config: &'a AppConfig,
    pub selected: usize,
    pub awaiting_rebind: bool,
}

impl Widget for ControlsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // actions + 2 blanks + reset + hint + 2 border + top pad
        let height = (Action::ALL.len() as u16) + 7;
        let popup = centered_fixed(52, height, area);
        let inner = popup_frame(" Controls ", popup, buf);

        let mut lines = vec![Line::raw("")];

        for (i, &action) in Action::ALL.iter().enumerate() {
            let selected = i == self.selected;
            let prefix = if selected { " ▸ " } else { "   " };
            let keys = if selected && self.awaiting_rebind {
                "Press a key…".to_string()
            } else {
                self.config.display_bindings(action)
            };
            lines.push(two_column_row(
                format!("{prefix}{:<22}", action.label()),
                keys,
                inner.width,
                selected,
            ));
        }

        let reset_selected = self.selected == Action::ALL.len();
        let reset_prefix = if reset_selected { " ▸ " } else { "   " };
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            format!("{reset_prefix}⟳ Reset to defaults"),
            Theme::menu_item_style(reset_selected),
        )));

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Enter: add key  Del: clear  Esc: back",
            Theme::hint_style(),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── helpers ───────────

/// Clear `popup`, draw its border and title, and return the inner area.
fn popup_frame(title: &str, popup: Rect, buf: &mut Buffer) -> Rect {
    Clear.render(popup, buf);
    let block = Block::default()
        .title(title)
        .title_style(Theme::popup_title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::popup_border_style());
    let inner = block.inner(popup);
    block.render(popup, buf);
    inner
}

/// Label left-aligned, value right-aligned across `width` columns.
fn two_column_row(label: String, value: String, width: u16, selected: bool) -> Line<'static> {
    let label_width = label.chars().count();
    let value_width = (width as usize).saturating_sub(label_width).max(1);
    Line::from(vec![
        Span::styled(label, Theme::menu_item_style(selected)),
        Span::styled(format!("{value:>value_width$}"), Theme::menu_value_style(selected)),
    ])
}

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
