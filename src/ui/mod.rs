//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into cells on
//! the terminal.  No I/O or timers live here; the strip offset it draws is
//! whatever the [`slide_animator`] last sampled.

pub mod card;
pub mod carousel;
pub mod layout;
pub mod pagination;
pub mod popup;
pub mod slide_animator;
pub mod spinner;
pub mod theme;
