//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: program text with the next instruction highlighted
//! - [`tape`]: tape cells around the data pointer
//! - [`terminal`]: everything the program has printed so far
//! - [`status`]: status bar with keybindings and execution state
//!
//! Each pane module exports a `render_*` function taking the frame, its area, the data
//! to show and the pane's scroll state.

pub mod source;
pub mod status;
pub mod tape;
pub mod terminal;

pub use source::render_source_pane;
pub use status::{render_status_bar, StatusInfo};
pub use tape::render_tape_pane;
pub use terminal::render_terminal_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};

/// Border style shared by every pane
fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Scroll offset that keeps `row` inside a window of `height` rows
fn follow(scroll: usize, row: usize, height: usize) -> usize {
    let height = height.max(1);
    if row < scroll {
        row
    } else if row >= scroll + height {
        row + 1 - height
    } else {
        scroll
    }
}
