//! Input handling: maps key/mouse events to state mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::config::{Action, KeyBind};
use crate::ui::layout::contains;
use crate::ui::pagination::dot_at;

use super::settings::SETTINGS_ITEMS;
use super::state::{ActiveView, AppState};

/// Total selectable rows in the controls submenu (actions + "Reset").
pub fn controls_item_count() -> usize {
    Action::ALL.len() + 1
}

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Carousel => handle_carousel_key(state, key),
        ActiveView::SettingsMenu => handle_settings_key(state, key),
        ActiveView::ControlsSubmenu => {
            if state.awaiting_rebind {
                handle_rebind_key(state, key);
            } else {
                handle_controls_key(state, key);
            }
        }
    }
}

// ── Carousel (configurable bindings) ────────────────────────────

fn handle_carousel_key(state: &mut AppState, key: KeyEvent) {
    // Page jumps are fixed: Home/End and the digits 1-9.
    match key.code {
        KeyCode::Home => {
            state.engine.go_to_slide(0);
            return;
        }
        KeyCode::End => {
            let last = state.engine.num_slides().saturating_sub(1);
            state.engine.go_to_slide(last);
            return;
        }
        KeyCode::Char(c @ '1'..='9') if !has_command_modifier(key) => {
            let page = c as usize - '1' as usize;
            state.engine.go_to_slide(page);
            return;
        }
        _ => {}
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    run_action(state, action);
}

/// Apply a bound action to the carousel.
fn run_action(state: &mut AppState, action: Action) {
    match action {
        Action::Next => {
            state.engine.next();
        }
        Action::Previous => {
            state.engine.previous();
        }
        Action::ToggleAutoplay => toggle_autoplay(state),
        Action::Reload => {
            state.needs_reload = true;
            state.status_message = Some(format!("Reloading from {}…", state.source.label()));
        }
        Action::OpenSettings => {
            state.active_view = ActiveView::SettingsMenu;
            state.settings_selected = 0;
        }
        Action::Quit => {
            state.should_quit = true;
        }
    }
}

fn toggle_autoplay(state: &mut AppState) {
    let on = state.engine.toggle_autoplay();
    state.status_message = Some(if on { "Autoplay on" } else { "Autoplay paused" }.into());
}

fn has_command_modifier(key: KeyEvent) -> bool {
    key.modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
}

// ── Settings menu (hardcoded keys) ──────────────────────────────

fn handle_settings_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            state.active_view = ActiveView::Carousel;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.settings_selected = state.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.settings_selected + 1 < SETTINGS_ITEMS.len() {
                state.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            if let Some(item) = SETTINGS_ITEMS.get(state.settings_selected) {
                item.activate(state);
            }
        }
        _ => {}
    }
}

// ── Controls submenu (hardcoded navigation, interactive rebinding) ──

fn handle_controls_key(state: &mut AppState, key: KeyEvent) {
    let item_count = controls_item_count();

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            state.active_view = ActiveView::Carousel;
        }
        KeyCode::Left | KeyCode::Char('h') => {
            state.active_view = ActiveView::SettingsMenu;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.controls_selected = state.controls_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.controls_selected + 1 < item_count {
                state.controls_selected += 1;
            }
        }
        KeyCode::Enter => {
            if state.controls_selected < Action::ALL.len() {
                state.awaiting_rebind = true;
            } else {
                // "Reset to defaults" item.
                state.config.reset_defaults();
                state.save_config();
                state.status_message = Some("Controls reset to defaults".into());
            }
        }
        KeyCode::Delete | KeyCode::Backspace => {
            if let Some(&action) = Action::ALL.get(state.controls_selected) {
                state.config.bindings.insert(action, Vec::new());
                state.save_config();
            }
        }
        _ => {}
    }
}

/// Capture the next key press as a new binding.
fn handle_rebind_key(state: &mut AppState, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        state.awaiting_rebind = false;
        return;
    }

    let Some(&action) = Action::ALL.get(state.controls_selected) else {
        state.awaiting_rebind = false;
        return;
    };
    let bind = KeyBind::from_key_event(key);
    state.status_message = Some(format!("{} bound to {}", action.label(), bind.display()));
    state.config.add_binding(action, bind);
    state.save_config();
    state.awaiting_rebind = false;
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.  Only left clicks on the carousel view do
/// anything: arrows step, dots jump, the badge toggles autoplay.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Carousel {
        return;
    }
    let MouseEventKind::Down(MouseButton::Left) = mouse.kind else {
        return;
    };

    let layout = state.layout();
    let (col, row) = (mouse.column, mouse.row);

    if contains(layout.badge_area, col, row) {
        toggle_autoplay(state);
    } else if contains(layout.prev_area, col, row) {
        state.engine.previous();
    } else if contains(layout.next_area, col, row) {
        state.engine.next();
    } else if let Some(page) = dot_at(layout.dots_area, state.engine.num_slides(), col, row) {
        state.engine.go_to_slide(page);
    }
}
