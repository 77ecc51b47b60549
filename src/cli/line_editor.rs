//! Byte-at-a-time line editor for a serial terminal
//!
//! Keys:
//! - `\r` or `\n` submits the line (not echoed; the caller moves to a new line).
//!   A `\n` straight after `\r` is swallowed so CRLF terminals submit once
//! - Backspace (0x08) or DEL (0x7F) removes the last character and echoes `"\b \b"`
//! - Printable ASCII (0x20..=0x7E) is appended and echoed
//! - Anything else is ignored
//!
//! When the buffer is full, further printable input is dropped until the line
//! is submitted.

use heapless::String;

/// Echo sequence that erases the last character on a terminal
pub const ERASE_ECHO: &[u8] = b"\x08 \x08";

/// Outcome of feeding one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent {
    /// Line complete; fetch it with [`LineEditor::take_line`]
    Submit,
    /// Character appended; echo it back
    Echo(u8),
    /// Character removed; echo [`ERASE_ECHO`]
    Erased,
    /// Nothing changed
    Ignored,
}

/// Line buffer holding at most `N` characters
#[derive(Debug, Default)]
pub struct LineEditor<const N: usize> {
    buffer: String<N>,
    after_cr: bool,
}

impl<const N: usize> LineEditor<N> {
    /// Create an empty editor
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            after_cr: false,
        }
    }

    /// Process one input byte
    pub fn feed(&mut self, byte: u8) -> LineEvent {
        let after_cr = core::mem::replace(&mut self.after_cr, byte == b'\r');

        match byte {
            b'\n' if after_cr => LineEvent::Ignored,
            b'\r' | b'\n' => LineEvent::Submit,
            0x08 | 0x7F => match self.buffer.pop() {
                Some(_) => LineEvent::Erased,
                None => LineEvent::Ignored,
            },
            0x20..=0x7E => match self.buffer.push(char::from(byte)) {
                Ok(()) => LineEvent::Echo(byte),
                Err(()) => LineEvent::Ignored,
            },
            _ => LineEvent::Ignored,
        }
    }

    /// Current contents
    pub fn line(&self) -> &str {
        self.buffer.as_str()
    }

    /// Take the current line, leaving the editor empty
    pub fn take_line(&mut self) -> String<N> {
        core::mem::take(&mut self.buffer)
    }

    /// Discard the current contents
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
