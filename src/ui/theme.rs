//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── cards ──────────────────────────────────────────────────
    pub fn card_title_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn card_border_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn card_footer_style() -> Style {
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn rating_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn quote_style() -> Style {
        Style::default().fg(Color::White)
    }

    // ── navigation ─────────────────────────────────────────────
    pub fn arrow_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dot_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn dot_active_style() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn badge_style(autoplay: bool) -> Style {
        if autoplay {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    // ── popups ─────────────────────────────────────────────────
    pub fn popup_title_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn popup_border_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn menu_item_style(selected: bool) -> Style {
        if selected {
            Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        }
    }

    pub fn menu_value_style(selected: bool) -> Style {
        let style = Style::default().fg(Color::Yellow);
        if selected {
            style.bg(Color::DarkGray)
        } else {
            style
        }
    }

    pub fn hint_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }
}
