//! Settings menu model (data only).
//!
//! Keeping these definitions outside the input handler lets both the handler
//! and UI renderers consume the same source of truth without cross-importing.

use super::state::{ActiveView, AppState};

/// A single item in the settings menu.
pub enum SettingsItem {
    /// Opens a submenu.
    Submenu {
        label: &'static str,
        view: ActiveView,
    },
    /// Boolean toggle; reads/writes via accessors on `AppState`.
    Toggle {
        label: &'static str,
        get: fn(&AppState) -> bool,
        set: fn(&mut AppState, bool),
    },
    /// Cycles through a finite set of values.
    Cycle {
        label: &'static str,
        value: fn(&AppState) -> String,
        cycle: fn(&mut AppState),
    },
}

impl SettingsItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Submenu { label, .. }
            | Self::Toggle { label, .. }
            | Self::Cycle { label, .. } => label,
        }
    }

    /// Right-hand column shown in the popup.
    pub fn value_text(&self, state: &AppState) -> String {
        match self {
            Self::Submenu { .. } => "▸".into(),
            Self::Toggle { get, .. } => {
                let text = if get(state) { "[ON]" } else { "[OFF]" };
                text.into()
            }
            Self::Cycle { value, .. } => value(state),
        }
    }

    /// Activate the item (Enter / Space / click).
    pub fn activate(&self, state: &mut AppState) {
        match self {
            Self::Submenu { view, .. } => {
                state.active_view = *view;
                state.controls_selected = 0;
            }
            Self::Toggle { get, set, .. } => {
                let current = get(state);
                set(state, !current);
            }
            Self::Cycle { cycle, .. } => cycle(state),
        }
    }
}

const INTERVALS_MS: &[u64] = &[3000, 5000, 8000, 12000];
const TRANSITIONS_MS: &[u64] = &[250, 500, 800];
const MAX_CARDS_PER_PAGE: usize = 5;

/// Next entry after `current` in `values`, wrapping.  Unknown values
/// restart from the first entry.
fn next_in<T: Copy + PartialEq>(values: &[T], current: T) -> T {
    match values.iter().position(|v| *v == current) {
        Some(idx) => values[(idx + 1) % values.len()],
        None => values[0],
    }
}

/// All items shown in the settings popup, in display order.
pub static SETTINGS_ITEMS: &[SettingsItem] = &[
    SettingsItem::Submenu {
        label: "Controls",
        view: ActiveView::ControlsSubmenu,
    },
    SettingsItem::Toggle {
        label: "Autoplay",
        get: |s| s.engine.is_autoplaying(),
        set: |s, v| {
            s.engine.set_autoplay(v);
            s.config.autoplay = v;
            s.save_config();
        },
    },
    SettingsItem::Cycle {
        label: "Autoplay Interval",
        value: |s| format!("{:.1}s", s.config.autoplay_interval_ms as f64 / 1000.0),
        cycle: |s| {
            s.config.autoplay_interval_ms = next_in(INTERVALS_MS, s.config.autoplay_interval_ms);
            s.apply_timing();
            s.save_config();
            s.status_message = Some(format!("Autoplay interval: {}ms", s.config.autoplay_interval_ms));
        },
    },
    SettingsItem::Cycle {
        label: "Transition",
        value: |s| format!("{}ms", s.config.transition_ms),
        cycle: |s| {
            s.config.transition_ms = next_in(TRANSITIONS_MS, s.config.transition_ms);
            s.apply_timing();
            s.save_config();
        },
    },
    SettingsItem::Toggle {
        label: "Reduced Motion",
        get: |s| s.config.reduced_motion,
        set: |s, v| {
            s.config.reduced_motion = v;
            s.apply_timing();
            s.save_config();
        },
    },
    SettingsItem::Cycle {
        label: "Cards Per Page",
        value: |s| s.config.default_visible.to_string(),
        cycle: |s| {
            let next = s.config.default_visible % MAX_CARDS_PER_PAGE + 1;
            s.config.default_visible = next;
            s.engine.set_default_visible(next);
            s.save_config();
            s.status_message = Some(format!(
                "Cards per page: {next} (showing {})",
                s.engine.visible()
            ));
        },
    },
];

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::*;
    use crate::config::AppConfig;
    use crate::core::testimonial::ItemSource;

    fn state() -> AppState {
        let mut s = AppState::new(ItemSource::Demo, AppConfig::default(), Rect::new(0, 0, 200, 40));
        s.persist_config = false;
        s
    }

    fn item(label: &str) -> &'static SettingsItem {
        SETTINGS_ITEMS
            .iter()
            .find(|i| i.label() == label)
            .expect("settings item")
    }

    #[test]
    fn cycles_wrap_around() {
        assert_eq!(next_in(INTERVALS_MS, 12000), 3000);
        assert_eq!(next_in(INTERVALS_MS, 4242), 3000);
        assert_eq!(next_in(TRANSITIONS_MS, 250), 500);
    }

    #[test]
    fn reduced_motion_makes_steps_instant() {
        let mut s = state();
        let toggle = item("Reduced Motion");
        assert_eq!(toggle.value_text(&s), "[OFF]");

        toggle.activate(&mut s);
        assert!(s.config.reduced_motion);
        assert!(s.engine.timing().step().is_instant());
        assert_eq!(toggle.value_text(&s), "[ON]");
    }

    #[test]
    fn cards_per_page_reaches_the_engine() {
        let mut s = state();
        let cycle = item("Cards Per Page");

        cycle.activate(&mut s);
        assert_eq!(s.config.default_visible, 4);
        assert_eq!(s.engine.visible(), 4);

        cycle.activate(&mut s);
        cycle.activate(&mut s);
        assert_eq!(s.config.default_visible, 1);
        assert_eq!(s.engine.visible(), 1);
    }

    #[test]
    fn interval_change_updates_engine_timing() {
        let mut s = state();
        item("Autoplay Interval").activate(&mut s);
        assert_eq!(s.config.autoplay_interval_ms, 8000);
        assert_eq!(
            s.engine.timing().autoplay_interval,
            std::time::Duration::from_millis(8000)
        );
    }

    #[test]
    fn controls_entry_opens_submenu() {
        let mut s = state();
        item("Controls").activate(&mut s);
        assert_eq!(s.active_view, ActiveView::ControlsSubmenu);
    }
}
