//! Tape pane: one row per cell, following the data pointer

use super::{border_style, follow};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Printable form of a cell for the char column
fn cell_glyph(value: u8) -> String {
    match value {
        b' ' => "' '".to_string(),
        v if v.is_ascii_graphic() => format!("'{}'", v as char),
        b'\n' => "\\n".to_string(),
        b'\t' => "\\t".to_string(),
        0 => String::new(),
        _ => "·".to_string(),
    }
}

fn cell_row(index: usize, value: u8, is_pointer: bool, index_width: usize) -> ListItem<'static> {
    let marker = if is_pointer { "▶ " } else { "  " };
    let value_style = if value == 0 {
        Style::default().fg(DEFAULT_THEME.comment)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    };

    let line = Line::from(vec![
        Span::styled(marker, Style::default().fg(DEFAULT_THEME.pointer)),
        Span::styled(
            format!("{:>width$}  ", index, width = index_width),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::styled(format!("{:>3}  ", value), value_style),
        Span::styled(
            format!("0x{:02x}  ", value),
            Style::default().fg(DEFAULT_THEME.secondary),
        ),
        Span::styled(cell_glyph(value), Style::default().fg(DEFAULT_THEME.success)),
    ]);

    if is_pointer {
        ListItem::new(line).style(
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ListItem::new(line)
    }
}

/// Render the tape pane
#[allow(clippy::too_many_arguments)]
pub fn render_tape_pane(
    frame: &mut Frame,
    area: Rect,
    cells: &[u8],
    data_pointer: usize,
    tape_limit: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
    follow_pointer: bool,
) {
    let block = Block::default()
        .title(format!(
            " Tape ({}/{} cells, ptr {}) ",
            cells.len(),
            tape_limit,
            data_pointer
        ))
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let visible_height = area.height.saturating_sub(2) as usize;
    if follow_pointer {
        *scroll_offset = follow(*scroll_offset, data_pointer, visible_height);
    }
    *scroll_offset = (*scroll_offset).min(cells.len().saturating_sub(1));

    let index_width = cells.len().saturating_sub(1).to_string().len();
    let items: Vec<ListItem> = cells
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(index, &value)| cell_row(index, value, index == data_pointer, index_width))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
