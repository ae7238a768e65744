//! A terminal testimonial carousel.
//!
//! Run the binary to browse the built-in demo testimonials, or point it at a
//! JSON file with `--items`.  Run with `--validate` to check a file and exit.

mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tracing_subscriber::EnvFilter;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler, loader, runtime,
    state::{ActiveView, AppState},
};
use crate::core::engine::Position;
use crate::core::testimonial::ItemSource;
use crate::ui::{
    card::TestimonialCard,
    carousel::{Arrow, ArrowDirection, CarouselStrip},
    layout::AppLayout,
    pagination::Pagination,
    popup,
    spinner::LoadIndicator,
    theme::Theme,
};

/// Poll timeout of the event reader; idle ticks are the animation frames.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Terminal testimonial carousel")]
struct Cli {
    /// JSON file with testimonials (built-in demo list if omitted).
    #[arg(long)]
    items: Option<PathBuf>,

    /// Cards per page on wide terminals (overrides the config file).
    #[arg(long)]
    visible: Option<usize>,

    /// Start with autoplay paused.
    #[arg(long)]
    no_autoplay: bool,

    /// Autoplay interval in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Replace animated steps with instant ones.
    #[arg(long)]
    reduced_motion: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Load and validate the items, print a summary, and exit.
    #[arg(long)]
    validate: bool,
}

impl Cli {
    fn source(&self) -> ItemSource {
        match &self.items {
            Some(path) => ItemSource::File(path.clone()),
            None => ItemSource::Demo,
        }
    }

    /// Command-line flags win over the config file for this run.
    fn apply_overrides(&self, config: &mut config::AppConfig) {
        if let Some(visible) = self.visible {
            config.default_visible = visible.max(1);
        }
        if self.no_autoplay {
            config.autoplay = false;
        }
        if let Some(ms) = self.interval_ms {
            config.autoplay_interval_ms = ms.max(1);
        }
        if self.reduced_motion {
            config.reduced_motion = true;
        }
    }
}

/// Initialise tracing.  Level comes from `RUST_LOG`; output never touches
/// stdout, which the terminal UI owns.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

/// `--validate`: fetch once and print what was found.
fn validate(source: &ItemSource) -> Result<()> {
    let items = source.fetch()?;
    println!("{}: {} testimonials", source.label(), items.len());
    for item in &items {
        let rating = item
            .rating
            .map(|r| format!("{r}/5"))
            .unwrap_or_else(|| "-".into());
        println!("  {:<8} {:<24} {}", item.id.to_string(), item.author, rating);
    }
    Ok(())
}

// ───────────────────────────────────────── drawing ───────────

/// `" · 3/7"` for the card at the left edge; the sentinel reads as item 1.
fn position_label(position: Position, total: usize) -> String {
    if total == 0 {
        return String::new();
    }
    let n = match position {
        Position::Real(i) => i + 1,
        Position::WrapSentinel => 1,
    };
    format!(" · {n}/{total}")
}

fn draw(frame: &mut Frame, state: &AppState) {
    let layout = AppLayout::from_area(frame.area());
    let carousel = state.engine.frame();

    let pane = Block::default()
        .title(Span::styled(
            format!(
                " Testimonials · {}{} ",
                state.source.label(),
                position_label(carousel.position, state.engine.total())
            ),
            Theme::title_style(),
        ))
        .borders(Borders::ALL)
        .border_style(Theme::border_style());
    frame.render_widget(pane, layout.carousel_area);

    let badge = if carousel.autoplay { " ▶ autoplay " } else { " ‖ paused " };
    frame.render_widget(
        Paragraph::new(Span::styled(badge, Theme::badge_style(carousel.autoplay))),
        layout.badge_area,
    );

    if carousel.slots.is_empty() {
        let message = if state.loading { "Loading testimonials…" } else { "No testimonials" };
        let empty = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Theme::hint_style());
        let middle = Rect {
            y: layout.strip_area.y + layout.strip_area.height / 2,
            height: 1.min(layout.strip_area.height),
            ..layout.strip_area
        };
        frame.render_widget(empty, middle);
    } else {
        frame.render_widget(
            CarouselStrip::new(&carousel, state.animator.offset_percent(), &TestimonialCard),
            layout.strip_area,
        );
    }

    frame.render_widget(
        Arrow {
            direction: ArrowDirection::Previous,
            enabled: carousel.can_navigate,
        },
        layout.prev_area,
    );
    frame.render_widget(
        Arrow {
            direction: ArrowDirection::Next,
            enabled: carousel.can_navigate,
        },
        layout.next_area,
    );
    frame.render_widget(
        Pagination {
            num_slides: carousel.num_slides,
            active: carousel.current_slide,
        },
        layout.dots_area,
    );

    let hint = state.config.status_bar_hint();
    let status_text = match state.active_view {
        ActiveView::Carousel => state.status_message.as_deref().unwrap_or(&hint),
        ActiveView::SettingsMenu | ActiveView::ControlsSubmenu => "",
    };
    frame.render_widget(
        Paragraph::new(status_text).style(Theme::status_bar_style()),
        layout.status_area,
    );
    frame.render_widget(
        LoadIndicator {
            visible: state.loading,
            tick: state.tick,
        },
        layout.status_area,
    );

    match state.active_view {
        ActiveView::SettingsMenu => {
            frame.render_widget(popup::SettingsPopup { state }, frame.area());
        }
        ActiveView::ControlsSubmenu => {
            frame.render_widget(
                popup::ControlsPopup {
                    config: &state.config,
                    selected: state.controls_selected,
                    awaiting_rebind: state.awaiting_rebind,
                },
                frame.area(),
            );
        }
        ActiveView::Carousel => {}
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let source = cli.source();

    // ── validate mode ─────────────────────────────────────────
    if cli.validate {
        return validate(&source);
    }

    let mut user_config = config::AppConfig::load();
    cli.apply_overrides(&mut user_config);

    let (cols, rows) = terminal::size()?;
    let mut state = AppState::new(source, user_config, Rect::new(0, 0, cols, rows));
    tracing::debug!(
        visible = state.engine.visible(),
        source = %state.source.label(),
        "starting carousel"
    );

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stdout_handle = stdout();
    execute!(stdout_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader(FRAME_INTERVAL);
    let (load_tx, mut load_rx) = tokio::sync::mpsc::unbounded_channel();
    let clock = Instant::now();

    // ── event loop ────────────────────────────────────────────
    loop {
        if state.needs_reload {
            let generation = state.begin_load();
            loader::spawn_load(load_tx.clone(), generation, state.source.clone());
        }

        // Timers and animation first, then draw, then the frame requests
        // that must only run once this frame is on screen.
        let now = clock.elapsed();
        runtime::advance(&mut state, now);
        terminal.draw(|frame| draw(frame, &state))?;
        runtime::after_commit(&mut state, now);

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Resize(w, h) => state.resize(w, h),
                    AppEvent::Tick => state.tick = state.tick.wrapping_add(1),
                }
            }

            Some(update) = load_rx.recv() => {
                state.apply_load(update);
            }
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    state.engine.unmount();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::app::loader::LoadUpdate;
    use crate::core::testimonial::demo_testimonials;

    fn screen(state: &AppState) -> String {
        let area = state.terminal_area;
        let mut terminal = Terminal::new(TestBackend::new(area.width, area.height)).expect("terminal");
        terminal.draw(|frame| draw(frame, state)).expect("draw");
        let buf = terminal.backend().buffer();
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn state() -> AppState {
        let config = config::AppConfig {
            autoplay: false,
            ..config::AppConfig::default()
        };
        AppState::new(ItemSource::Demo, config, Rect::new(0, 0, 200, 30))
    }

    #[test]
    fn empty_carousel_shows_placeholder() {
        let mut s = state();
        s.begin_load();
        let text = screen(&s);
        assert!(text.contains("Loading testimonials…"));
        assert!(text.contains("‖ paused"));
    }

    #[test]
    fn loaded_carousel_draws_first_page() {
        let mut s = state();
        let generation = s.begin_load();
        s.apply_load(LoadUpdate {
            generation,
            result: Ok(demo_testimonials()),
        });
        runtime::advance(&mut s, Duration::ZERO);

        let items = demo_testimonials();
        let text = screen(&s);
        assert!(text.contains(&items[0].author));
        assert!(text.contains("●"));
        assert!(text.contains("›"));
        assert!(text.contains("· 1/7 "));
    }

    #[test]
    fn title_counts_sentinel_as_first_item() {
        let mut s = state();
        let generation = s.begin_load();
        s.apply_load(LoadUpdate {
            generation,
            result: Ok(demo_testimonials()),
        });
        runtime::advance(&mut s, Duration::ZERO);

        assert!(s.engine.previous());
        runtime::advance(&mut s, Duration::from_millis(10));
        assert_eq!(s.engine.frame().position, Position::WrapSentinel);
        assert!(screen(&s).contains("· 1/7 "));

        runtime::after_commit(&mut s, Duration::from_millis(10));
        assert_eq!(s.engine.frame().position, Position::Real(6));
        assert!(screen(&s).contains("· 7/7 "));
    }

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::parse_from([
            "testimonial-carousel",
            "--visible",
            "2",
            "--no-autoplay",
            "--reduced-motion",
            "--interval-ms",
            "7000",
        ]);
        let mut config = config::AppConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.default_visible, 2);
        assert!(!config.autoplay);
        assert!(config.reduced_motion);
        assert_eq!(config.autoplay_interval_ms, 7000);
        assert_eq!(cli.source(), ItemSource::Demo);
    }
}
