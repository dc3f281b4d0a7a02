//! Program pane with instruction highlighting
//!
//! Shows the source text as written, comments included. Instruction characters are
//! colored by kind, and the instruction the engine will execute next is drawn in
//! reverse video on a highlighted line.

use super::{border_style, follow};
use crate::program::{Instruction, SourceLocation};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn instruction_style(instruction: Instruction) -> Style {
    let color = match instruction {
        Instruction::LoopStart | Instruction::LoopEnd => DEFAULT_THEME.primary,
        Instruction::MoveRight | Instruction::MoveLeft => DEFAULT_THEME.secondary,
        Instruction::Increment | Instruction::Decrement => DEFAULT_THEME.success,
        Instruction::Output | Instruction::Input => DEFAULT_THEME.io,
    };
    Style::default().fg(color)
}

/// Style one source line; `cursor_column` is the 1-based column of the next instruction
fn highlight_line(line: &str, cursor_column: Option<usize>) -> Line<'static> {
    let spans: Vec<Span> = line
        .chars()
        .enumerate()
        .map(|(index, c)| {
            let style = match Instruction::from_char(c) {
                Some(instruction) => instruction_style(instruction),
                None => Style::default().fg(DEFAULT_THEME.comment),
            };
            let style = if cursor_column == Some(index + 1) {
                style.add_modifier(Modifier::REVERSED | Modifier::BOLD)
            } else {
                style
            };
            Span::styled(c.to_string(), style)
        })
        .collect();
    Line::from(spans)
}

/// Render the program pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source: &str,
    cursor: Option<SourceLocation>,
    is_focused: bool,
    scroll_offset: &mut usize,
    follow_cursor: bool,
) {
    let block = Block::default()
        .title(" Program ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let source_lines: Vec<&str> = source.lines().collect();
    let visible_height = area.height.saturating_sub(2) as usize;

    if let Some(location) = cursor.filter(|_| follow_cursor) {
        *scroll_offset = follow(*scroll_offset, location.line - 1, visible_height);
    }
    *scroll_offset = (*scroll_offset).min(source_lines.len().saturating_sub(1));

    let number_width = source_lines.len().to_string().len();
    let lines: Vec<Line> = source_lines
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(index, text)| {
            let line_number = index + 1;
            let cursor_column = cursor
                .filter(|location| location.line == line_number)
                .map(|location| location.column);

            let mut spans = vec![Span::styled(
                format!("{:>width$} ", line_number, width = number_width),
                Style::default().fg(DEFAULT_THEME.comment),
            )];
            spans.extend(highlight_line(text, cursor_column).spans);

            let line = Line::from(spans);
            if cursor_column.is_some() {
                line.style(Style::default().bg(DEFAULT_THEME.current_line_bg))
            } else {
                line
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
