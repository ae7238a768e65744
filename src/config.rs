//! User configuration: carousel settings, keybindings, and persistence.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/testimonial-carousel/config.toml`
//! (default `~/.config/testimonial-carousel/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::transition::{Easing, Timing};

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions in the carousel view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Next,
    Previous,
    ToggleAutoplay,
    Reload,
    OpenSettings,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the controls menu).
    pub const ALL: &[Action] = &[
        Action::Next,
        Action::Previous,
        Action::ToggleAutoplay,
        Action::Reload,
        Action::OpenSettings,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::Next => "Next",
            Action::Previous => "Previous",
            Action::ToggleAutoplay => "Toggle Autoplay",
            Action::Reload => "Reload Testimonials",
            Action::OpenSettings => "Open Settings",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::Next => "next",
            Action::Previous => "previous",
            Action::ToggleAutoplay => "toggle_autoplay",
            Action::Reload => "reload",
            Action::OpenSettings => "open_settings",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// Modifiers that take part in matching; platform keys like SUPER do not.
const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?
    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code && (self.modifiers & MODIFIER_MASK) == (event.modifiers & MODIFIER_MASK)
    }

    /// Create a binding from a raw key event (used during rebinding).
    pub fn from_key_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers & MODIFIER_MASK,
        }
    }

    /// User-friendly display string (e.g. `"Alt+→"`, `"Ctrl+r"`, `"Space"`).
    pub fn display(&self) -> String {
        self.render(true)
    }

    /// Config-file form (e.g. `"Alt+Right"`).
    fn to_config_string(&self) -> String {
        self.render(false)
    }

    fn render(&self, pretty: bool) -> String {
        let mut s = String::new();
        for (flag, name) in [
            (KeyModifiers::CONTROL, "Ctrl+"),
            (KeyModifiers::ALT, "Alt+"),
            (KeyModifiers::SHIFT, "Shift+"),
        ] {
            if self.modifiers.contains(flag) {
                s.push_str(name);
            }
        }
        s.push_str(&key_name(self.code, pretty));
        s
    }

    /// Parse a key string like `"Ctrl+r"`, `"Alt+Right"`, `"l"`, `"Space"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let (key_part, modifier_parts) = parts.split_last()?;

        for part in modifier_parts {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            k if k.starts_with('f') && k.len() > 1 => KeyCode::F(k[1..].parse().ok()?),
            // Single characters keep their case.
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

/// Name of a key code, either with arrow glyphs for the UI or spelled out
/// for the config file.
fn key_name(code: KeyCode, pretty: bool) -> String {
    let name = match code {
        KeyCode::Char(' ') => "Space",
        KeyCode::Char(c) => return c.to_string(),
        KeyCode::Up if pretty => "↑",
        KeyCode::Down if pretty => "↓",
        KeyCode::Left if pretty => "←",
        KeyCode::Right if pretty => "→",
        KeyCode::Up => "Up",
        KeyCode::Down => "Down",
        KeyCode::Left => "Left",
        KeyCode::Right => "Right",
        KeyCode::Enter => "Enter",
        KeyCode::Esc => "Esc",
        KeyCode::Tab => "Tab",
        KeyCode::Backspace => "Backspace",
        KeyCode::Delete => "Delete",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::F(n) => return format!("F{n}"),
        other => return format!("{other:?}"),
    };
    name.to_string()
}

// ───────────────────────────────────────── config ────────────

/// Application configuration: carousel behaviour and keybindings.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Cards per page on wide viewports.
    pub default_visible: usize,
    /// Start with autoplay running.
    pub autoplay: bool,
    pub autoplay_interval_ms: u64,
    /// Length of an animated step.
    pub transition_ms: u64,
    /// Extra time navigation stays locked after a step.
    pub lock_guard_ms: u64,
    /// Pixel width of one terminal column, for the viewport breakpoints.
    pub cell_width_px: u32,
    /// Replace animated steps with instant ones.
    pub reduced_motion: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            default_visible: 3,
            autoplay: true,
            autoplay_interval_ms: 5000,
            transition_ms: 500,
            lock_guard_ms: 50,
            cell_width_px: 8,
            reduced_motion: false,
        }
    }
}

impl AppConfig {
    /// Hard-coded default bindings.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(Next, vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n)]);
        m.insert(Previous, vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n)]);
        m.insert(ToggleAutoplay, vec![KeyBind::new(Char(' '), n), KeyBind::new(Char('p'), n)]);
        m.insert(Reload, vec![KeyBind::new(Char('r'), n)]);
        m.insert(OpenSettings, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Engine timing derived from the current settings.
    pub fn timing(&self) -> Timing {
        let transition = if self.reduced_motion {
            Duration::ZERO
        } else {
            Duration::from_millis(self.transition_ms)
        };
        Timing {
            transition,
            easing: Easing::EaseOut,
            lock_guard: Duration::from_millis(self.lock_guard_ms),
            autoplay_interval: Duration::from_millis(self.autoplay_interval_ms),
        }
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .flat_map(|(&action, binds)| binds.iter().map(move |b| (action, b)))
            .filter(|(_, b)| b.matches(event))
            .max_by_key(|(_, b)| b.modifiers.bits().count_ones())
            .map(|(action, _)| action)
    }

    /// Add a binding for `action`.  Removes this key from any other action
    /// to prevent conflicts, then appends it to `action`'s bindings.
    pub fn add_binding(&mut self, action: Action, bind: KeyBind) {
        for binds in self.bindings.values_mut() {
            binds.retain(|b| b != &bind);
        }
        self.bindings.entry(action).or_default().push(bind);
    }

    /// Restore all bindings to the built-in defaults.
    pub fn reset_defaults(&mut self) {
        self.bindings = Self::default_bindings();
    }

    /// Format the binding list for a given action (e.g. `"→/l"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: browse | 1-9: page | {}: autoplay | {}: reload | {}: settings",
            self.short_binding(Action::Previous),
            self.short_binding(Action::Next),
            self.short_binding(Action::ToggleAutoplay),
            self.short_binding(Action::Reload),
            self.short_binding(Action::OpenSettings),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse_config(&contents),
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), "unreadable config, using defaults: {err}");
                }
                Self::default()
            }
        }
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    /// Save, logging rather than propagating failures (settings toggles).
    pub fn save_or_warn(&self) {
        if let Err(err) = self.save() {
            tracing::warn!("failed to save config: {err:#}");
        }
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            // Carousel settings.  Ranges are clamped for predictable UX.
            match key {
                "default_visible" => {
                    if let Ok(v) = value.parse::<usize>() {
                        config.default_visible = v.clamp(1, 6);
                    }
                    continue;
                }
                "autoplay" => {
                    config.autoplay = value == "true";
                    continue;
                }
                "autoplay_interval_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.autoplay_interval_ms = v.clamp(1000, 60_000);
                    }
                    continue;
                }
                "transition_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.transition_ms = v.min(5000);
                    }
                    continue;
                }
                "lock_guard_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.lock_guard_ms = v.clamp(10, 1000);
                    }
                    continue;
                }
                "cell_width_px" => {
                    if let Ok(v) = value.parse::<u32>() {
                        config.cell_width_px = v.clamp(1, 64);
                    }
                    continue;
                }
                "reduced_motion" => {
                    config.reduced_motion = value == "true";
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# testimonial-carousel configuration".to_string(),
            String::new(),
            "# Carousel".to_string(),
            format!("default_visible = {}", self.default_visible),
            format!("autoplay = {}", self.autoplay),
            format!("autoplay_interval_ms = {}", self.autoplay_interval_ms),
            format!("transition_ms = {}", self.transition_ms),
            format!("lock_guard_ms = {}", self.lock_guard_ms),
            format!("cell_width_px = {}", self.cell_width_px),
            format!("reduced_motion = {}", self.reduced_motion),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path.
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join(env!("CARGO_PKG_NAME")).join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn default_bindings_resolve() {
        let config = AppConfig::default();
        assert_eq!(config.match_key(press(KeyCode::Right, KeyModifiers::NONE)), Some(Action::Next));
        assert_eq!(config.match_key(press(KeyCode::Char('h'), KeyModifiers::NONE)), Some(Action::Previous));
        assert_eq!(
            config.match_key(press(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some(Action::ToggleAutoplay)
        );
        assert_eq!(config.match_key(press(KeyCode::Char('x'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn parses_settings_and_bindings_with_clamping() {
        let text = "\
# comment
[carousel]
default_visible = 12
autoplay = false
autoplay_interval_ms = 10
transition_ms = 300
reduced_motion = true
next = Alt+Right, n
quit = Ctrl+x
bogus = q
";
        let config = AppConfig::parse_config(text);
        assert_eq!(config.default_visible, 6);
        assert!(!config.autoplay);
        assert_eq!(config.autoplay_interval_ms, 1000);
        assert_eq!(config.transition_ms, 300);
        assert!(config.reduced_motion);
        assert_eq!(config.display_bindings(Action::Next), "Alt+→/n");
        assert_eq!(
            config.match_key(press(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        // Untouched actions keep their defaults.
        assert_eq!(config.display_bindings(Action::Reload), "r");
    }

    #[test]
    fn serialised_config_parses_back_to_itself() {
        let mut config = AppConfig::default();
        config.autoplay = false;
        config.cell_width_px = 10;
        config.add_binding(Action::Reload, KeyBind::new(KeyCode::F(5), KeyModifiers::NONE));
        assert_eq!(AppConfig::parse_config(&config.serialise()), config);
    }

    #[test]
    fn rebinding_steals_key_from_other_action() {
        let mut config = AppConfig::default();
        config.add_binding(Action::Quit, KeyBind::new(KeyCode::Char('l'), KeyModifiers::NONE));
        assert_eq!(config.display_bindings(Action::Next), "→");
        assert_eq!(
            config.match_key(press(KeyCode::Char('l'), KeyModifiers::NONE)),
            Some(Action::Quit)
        );
    }

    #[test]
    fn reduced_motion_zeroes_the_transition() {
        let mut config = AppConfig::default();
        assert_eq!(config.timing().transition, Duration::from_millis(500));
        config.reduced_motion = true;
        assert!(config.timing().transition.is_zero());
        assert_eq!(config.timing().lock_guard, Duration::from_millis(50));
    }
}
