//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::{
    engine::CarouselEngine,
    scheduler::TimerQueue,
    testimonial::{ItemSource, Testimonial},
    viewport::ViewportPolicy,
};
use crate::ui::{layout::AppLayout, slide_animator::SlideAnimator};

use super::loader::LoadUpdate;

/// The engine as the app runs it: testimonials over the app's timer queue.
pub type Engine = CarouselEngine<Testimonial, TimerQueue>;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Carousel,
    SettingsMenu,
    ControlsSubmenu,
}

/// Top-level application state.
pub struct AppState {
    /// Navigation engine (owns the items and the timer queue).
    pub engine: Engine,
    /// Host-side strip animation.
    pub animator: SlideAnimator,
    /// Engine revision the animator last caught up with.
    pub seen_revision: u64,
    /// Where testimonials are fetched from.
    pub source: ItemSource,
    /// `true` while a fetch is in flight.
    pub loading: bool,
    /// Monotonic id used to ignore stale fetch results.
    pub load_generation: u64,
    /// Set by event handlers to trigger a background fetch.
    pub needs_reload: bool,
    /// User settings and keybindings.
    pub config: AppConfig,
    /// Write settings changes back to the config file.
    pub persist_config: bool,
    pub active_view: ActiveView,
    /// Currently highlighted item in the settings menu.
    pub settings_selected: usize,
    /// Currently highlighted item in the controls submenu.
    pub controls_selected: usize,
    /// When `true`, the controls submenu is waiting for the user to press
    /// a key to rebind the action at `controls_selected`.
    pub awaiting_rebind: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// Full terminal area, for mouse hit-testing.
    pub terminal_area: Rect,
    /// Frame counter (drives the loading spinner).
    pub tick: u64,
}

impl AppState {
    pub fn new(source: ItemSource, config: AppConfig, terminal_area: Rect) -> Self {
        let policy = ViewportPolicy::new(config.default_visible);
        let width = ViewportPolicy::columns_to_width(terminal_area.width, config.cell_width_px);
        let engine = CarouselEngine::new(Vec::new(), policy, width, config.timing(), TimerQueue::new())
            .with_autoplay(config.autoplay);

        Self {
            seen_revision: engine.revision(),
            engine,
            animator: SlideAnimator::new(),
            source,
            loading: false,
            load_generation: 0,
            needs_reload: true,
            config,
            persist_config: true,
            active_view: ActiveView::default(),
            settings_selected: 0,
            controls_selected: 0,
            awaiting_rebind: false,
            status_message: None,
            should_quit: false,
            terminal_area,
            tick: 0,
        }
    }

    pub fn layout(&self) -> AppLayout {
        AppLayout::from_area(self.terminal_area)
    }

    /// Terminal resized to `cols` × `rows`.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.terminal_area = Rect::new(0, 0, cols, rows);
        let width = ViewportPolicy::columns_to_width(cols, self.config.cell_width_px);
        self.engine.on_resize(width);
    }

    pub fn save_config(&self) {
        if self.persist_config {
            self.config.save_or_warn();
        }
    }

    /// Push the configured timing into the engine.
    pub fn apply_timing(&mut self) {
        self.engine.set_timing(self.config.timing());
    }

    /// Start a new fetch generation; returns its id.
    pub fn begin_load(&mut self) -> u64 {
        self.needs_reload = false;
        self.loading = true;
        self.load_generation = self.load_generation.wrapping_add(1);
        self.load_generation
    }

    /// Apply a finished fetch.  Results from superseded generations are
    /// dropped; a failed fetch keeps the current items.
    pub fn apply_load(&mut self, update: LoadUpdate) {
        if update.generation != self.load_generation {
            tracing::debug!(generation = update.generation, "ignoring stale fetch result");
            return;
        }
        self.loading = false;

        match update.result {
            Ok(items) => {
                tracing::debug!(count = items.len(), "testimonials loaded");
                self.status_message = Some(format!(
                    "Loaded {} testimonials from {}",
                    items.len(),
                    self.source.label()
                ));
                self.engine.on_items_changed(items);
            }
            Err(err) => {
                tracing::warn!("testimonial fetch failed: {err}");
                self.status_message = Some(format!("Load failed: {err}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::core::testimonial::{demo_testimonials, SourceError};

    fn state() -> AppState {
        let config = AppConfig {
            autoplay: false,
            ..AppConfig::default()
        };
        AppState::new(ItemSource::Demo, config, Rect::new(0, 0, 200, 40))
    }

    #[test]
    fn wide_terminal_starts_with_default_page_size() {
        let s = state();
        assert_eq!(s.engine.visible(), 3);
        assert!(s.needs_reload);
        assert_eq!(s.engine.total(), 0);
    }

    #[test]
    fn stale_generations_are_ignored() {
        let mut s = state();
        let first = s.begin_load();
        let second = s.begin_load();

        s.apply_load(LoadUpdate {
            generation: first,
            result: Ok(demo_testimonials()),
        });
        assert_eq!(s.engine.total(), 0);
        assert!(s.loading);

        s.apply_load(LoadUpdate {
            generation: second,
            result: Ok(demo_testimonials()),
        });
        assert_eq!(s.engine.total(), demo_testimonials().len());
        assert!(!s.loading);
    }

    #[test]
    fn failed_reload_keeps_previous_items() {
        let mut s = state();
        let generation = s.begin_load();
        s.apply_load(LoadUpdate {
            generation,
            result: Ok(demo_testimonials()),
        });

        let generation = s.begin_load();
        s.apply_load(LoadUpdate {
            generation,
            result: Err(SourceError::Io {
                path: PathBuf::from("missing.json"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        });
        assert_eq!(s.engine.total(), demo_testimonials().len());
        assert!(s.status_message.as_deref().unwrap_or_default().starts_with("Load failed"));
    }

    #[test]
    fn narrow_terminal_shows_one_card() {
        let mut s = state();
        s.resize(60, 20);
        assert_eq!(s.engine.visible(), 1);
        s.resize(120, 20);
        assert_eq!(s.engine.visible(), 2);
    }
}
