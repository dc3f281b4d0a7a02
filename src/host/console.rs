use crate::interpreter::io::{InputSource, OutputSink};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, Read, Write};

/// Output sink over any writer, flushed after every character
pub struct WriteSink<W: Write> {
    writer: W,
}

impl<W: Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        WriteSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriteSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> OutputSink for WriteSink<W> {
    fn emit(&mut self, ch: char) -> io::Result<()> {
        let mut buf = [0u8; 4];
        self.writer.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
        self.writer.flush()
    }
}

/// Restores cooked mode when dropped, including on early return
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(RawModeGuard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Reads single key presses from the controlling terminal without waiting for Enter
#[derive(Debug, Default)]
pub struct TerminalInput;

impl TerminalInput {
    pub fn new() -> Self {
        TerminalInput
    }
}

impl InputSource for TerminalInput {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        let _raw = RawModeGuard::enable()?;
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(result) = translate_key(key) {
                    return result;
                }
            }
        }
    }
}

/// Map a key press to the character it feeds to `,`. `None` for keys that carry no
/// character (arrows, function keys), which are skipped.
fn translate_key(key: KeyEvent) -> Option<io::Result<Option<char>>> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Some(Err(io::Error::new(
            io::ErrorKind::Interrupted,
            "interrupted by Ctrl-C",
        ))),
        KeyCode::Char('d') if ctrl => Some(Ok(None)),
        KeyCode::Esc => Some(Ok(None)),
        KeyCode::Char(c) => Some(Ok(Some(c))),
        KeyCode::Enter => Some(Ok(Some('\n'))),
        KeyCode::Tab => Some(Ok(Some('\t'))),
        KeyCode::Backspace => Some(Ok(Some('\u{8}'))),
        _ => None,
    }
}

/// Decodes one UTF-8 character per call from a byte stream
pub struct StreamInput<R: Read> {
    reader: R,
}

impl<R: Read> StreamInput<R> {
    pub fn new(reader: R) -> Self {
        StreamInput { reader }
    }
}

fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7f => Some(1),
        0xc0..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf7 => Some(4),
        _ => None,
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "input is not valid UTF-8")
}

impl<R: Read> InputSource for StreamInput<R> {
    fn read_char(&mut self) -> io::Result<Option<char>> {
        let mut buf = [0u8; 4];
        loop {
            match self.reader.read(&mut buf[..1]) {
                Ok(0) => return Ok(None),
                Ok(_) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        let width = utf8_width(buf[0]).ok_or_else(invalid_utf8)?;
        self.reader
            .read_exact(&mut buf[1..width])
            .map_err(|e| match e.kind() {
                io::ErrorKind::UnexpectedEof => invalid_utf8(),
                _ => e,
            })?;

        let text = std::str::from_utf8(&buf[..width]).map_err(|_| invalid_utf8())?;
        Ok(text.chars().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_sink_encodes_utf8() {
        let mut sink = WriteSink::new(Vec::new());
        sink.emit('A').unwrap();
        sink.emit('\u{e9}').unwrap();
        assert_eq!(sink.into_inner(), "Aé".as_bytes());
    }

    #[derive(Default)]
    struct CountingWriter {
        bytes: Vec<u8>,
        flushes: usize,
    }

    impl Write for CountingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn write_sink_flushes_every_character() {
        let mut sink = WriteSink::new(CountingWriter::default());
        sink.emit('H').unwrap();
        assert_eq!(sink.into_inner().flushes, 1);

        let mut sink = WriteSink::new(CountingWriter::default());
        for c in "Hi☺".chars() {
            sink.emit(c).unwrap();
        }
        let writer = sink.into_inner();
        assert_eq!(writer.flushes, 3);
        assert_eq!(writer.bytes, "Hi☺".as_bytes());
    }

    #[test]
    fn stream_input_decodes_multibyte_characters() {
        let mut input = StreamInput::new("aé☺".as_bytes());
        assert_eq!(input.read_char().unwrap(), Some('a'));
        assert_eq!(input.read_char().unwrap(), Some('é'));
        assert_eq!(input.read_char().unwrap(), Some('☺'));
        assert_eq!(input.read_char().unwrap(), None);
    }

    #[test]
    fn stream_input_rejects_bad_bytes() {
        let mut input = StreamInput::new(&[0xff_u8][..]);
        let err = input.read_char().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let mut truncated = StreamInput::new(&[0xc3_u8][..]);
        assert_eq!(
            truncated.read_char().unwrap_err().kind(),
            io::ErrorKind::InvalidData
        );
    }

    #[test]
    fn keys_translate_to_characters() {
        let key = |code, modifiers| translate_key(KeyEvent::new(code, modifiers));

        assert_eq!(
            key(KeyCode::Char('x'), KeyModifiers::NONE).unwrap().unwrap(),
            Some('x')
        );
        assert_eq!(
            key(KeyCode::Enter, KeyModifiers::NONE).unwrap().unwrap(),
            Some('\n')
        );
        assert_eq!(
            key(KeyCode::Char('d'), KeyModifiers::CONTROL).unwrap().unwrap(),
            None
        );
        assert_eq!(
            key(KeyCode::Char('c'), KeyModifiers::CONTROL)
                .unwrap()
                .unwrap_err()
                .kind(),
            io::ErrorKind::Interrupted
        );
        assert!(key(KeyCode::Left, KeyModifiers::NONE).is_none());
    }
}
