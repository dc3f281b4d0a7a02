//! Main TUI application state and logic

use crate::interpreter::constants::TAPE_LIMIT;
use crate::interpreter::timeline::{Outcome, Timeline};
use crate::snapshot::OutputLog;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Delay between steps in auto-play mode
const PLAY_INTERVAL: Duration = Duration::from_millis(150);

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Tape,
    Output,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> output -> tape)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Tape,
            FocusedPane::Tape => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    pub timeline: Timeline,

    /// The source code being executed
    pub source_code: String,

    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub tape_scroll: usize,
    pub output_scroll: usize,

    /// Whether the source and tape panes track the cursor; manual scrolling turns it off
    /// until the next step
    pub follow_cursor: bool,

    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,
}

impl App {
    pub fn new(timeline: Timeline, source_code: String) -> Self {
        let status_message = match timeline.outcome() {
            Outcome::Halted => String::from("Ready!"),
            Outcome::Faulted(fault) => format!("Run faulted: {}", fault),
            Outcome::Truncated { limit } => {
                format!("History truncated at the {} byte budget", limit)
            }
        };

        App {
            timeline,
            source_code,
            focused_pane: FocusedPane::Source,
            source_scroll: 0,
            tape_scroll: 0,
            output_scroll: 0,
            follow_cursor: true,
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: Instant::now(),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= PLAY_INTERVAL {
                if self.timeline.step_forward().is_ok() {
                    self.after_step("Playing...");
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(30))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// The recorded run faulted and we are looking at the faulting step
    fn at_fault(&self) -> bool {
        matches!(self.timeline.outcome(), Outcome::Faulted(_)) && self.timeline.is_at_end()
    }

    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Left column: Program (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        let empty_output = OutputLog::new();
        let (cells, data_pointer, cursor, output) = match self.timeline.current() {
            Some(snapshot) => (
                snapshot.cells.as_slice(),
                snapshot.data_pointer,
                self.timeline
                    .program()
                    .location(snapshot.instruction_pointer),
                &snapshot.output,
            ),
            None => (&[0u8][..], 0, None, &empty_output),
        };

        super::panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            cursor,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
            self.follow_cursor,
        );

        super::panes::render_terminal_pane(
            frame,
            left_rows[1],
            output,
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        super::panes::render_tape_pane(
            frame,
            columns[1],
            cells,
            data_pointer,
            TAPE_LIMIT,
            self.focused_pane == FocusedPane::Tape,
            &mut self.tape_scroll,
            self.follow_cursor,
        );

        let info = super::panes::StatusInfo {
            message: &self.status_message,
            position: self.timeline.position(),
            total: self.timeline.total_snapshots(),
            is_playing: self.is_playing,
            at_fault: self.at_fault(),
        };
        super::panes::render_status_bar(frame, main_chunks[1], &info);
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1);
                let mut stepped = 0;
                for _ in 0..n {
                    if self.timeline.step_forward().is_err() {
                        break;
                    }
                    stepped += 1;
                }
                self.after_step(&format!("Stepped forward {} step(s)", stepped));
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                self.is_playing = false;
                match self.timeline.step_backward() {
                    Ok(()) => self.after_step("Stepped backward"),
                    Err(e) => self.status_message = format!("Cannot step backward: {}", e),
                }
            }
            KeyCode::Right => {
                self.is_playing = false;
                match self.timeline.step_forward() {
                    Ok(()) => self.after_step("Stepped forward"),
                    Err(e) => self.status_message = format!("Cannot step forward: {}", e),
                }
            }
            KeyCode::Up => {
                self.follow_cursor = false;
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                self.follow_cursor = false;
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            KeyCode::Char(' ') => {
                self.is_playing = !self.is_playing;
                if self.is_playing {
                    self.last_play_time = Instant::now()
                        .checked_sub(PLAY_INTERVAL)
                        .unwrap_or_else(Instant::now);
                    self.status_message = "Playing...".to_string();
                } else {
                    self.status_message = "Paused".to_string();
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.timeline.jump_to_end();
                self.after_step("Jumped to end");
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.timeline.rewind_to_start();
                self.after_step("Jumped to start");
            }
            _ => {}
        }
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Source => &mut self.source_scroll,
            FocusedPane::Tape => &mut self.tape_scroll,
            FocusedPane::Output => &mut self.output_scroll,
        }
    }

    fn after_step(&mut self, message: &str) {
        self.status_message = if self.at_fault() {
            match self.timeline.outcome() {
                Outcome::Faulted(fault) => format!("Fault: {}", fault),
                _ => message.to_string(),
            }
        } else {
            message.to_string()
        };
        self.follow_cursor = true;
        // Auto-scroll output to bottom
        self.output_scroll = usize::MAX;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::constants::DEFAULT_HISTORY_LIMIT;
    use crate::interpreter::io::ScriptedInput;
    use crate::program::Program;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn app(source: &str) -> App {
        let program = Program::load(source).unwrap();
        let timeline = Timeline::record(program, &mut ScriptedInput::empty(), DEFAULT_HISTORY_LIMIT);
        App::new(timeline, source.to_string())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn arrow_keys_move_through_history() {
        let mut app = app("+++");
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.timeline.position(), 2);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.timeline.position(), 1);
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.timeline.position(), 3);
        assert_eq!(app.status_message, "Stepped forward 2 step(s)");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.timeline.position(), 0);
        press(&mut app, KeyCode::Enter);
        assert!(app.timeline.is_at_end());
    }

    #[test]
    fn stepping_past_the_start_reports_it() {
        let mut app = app("+");
        press(&mut app, KeyCode::Left);
        assert!(app.status_message.starts_with("Cannot step backward"));
    }

    #[test]
    fn fault_is_shown_at_the_last_step() {
        let mut app = app("<");
        assert!(app.status_message.starts_with("Run faulted"));
        press(&mut app, KeyCode::Enter);
        assert!(app.at_fault());
        assert!(app.status_message.starts_with("Fault:"));
    }

    #[test]
    fn tab_cycles_focus_and_q_quits() {
        let mut app = app("+");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Output);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Tape);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Source);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn renders_all_panes() {
        let mut app = app("++++++++[>++++++++<-]>+.");
        press(&mut app, KeyCode::Enter);

        let mut terminal = Terminal::new(TestBackend::new(160, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains("Program"));
        assert!(screen.contains("Tape"));
        assert!(screen.contains("Output"));
        assert!(screen.contains("A"));
        assert!(screen.contains("END"));
    }
}
