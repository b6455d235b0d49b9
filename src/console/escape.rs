//! Raw-byte escape sequence decoder.
//!
//! Classifies input into printable characters, control keys and arrow
//! keys. Key mapping: `0x08` is Backspace, `0x7F` is Delete — older
//! firmware revisions used `0x7F` for both, this decoder does not.

const ESC: u8 = 0x1B;
const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;

/// One decoded keyboard event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Printable ASCII, `' '..='~'`.
    Char(u8),
    Enter,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, PartialEq)]
enum State {
    Normal,
    Escape,  // Got ESC
    Bracket, // Got ESC [
}

/// Three-state decoder for `ESC [ A..D` arrow sequences.
///
/// A lone ESC followed by anything but `[` aborts silently and drops the
/// byte; an unknown final byte after `ESC [` is dropped the same way.
pub struct EscapeDecoder {
    state: State,
}

impl EscapeDecoder {
    pub const fn new() -> Self {
        Self {
            state: State::Normal,
        }
    }

    /// Feed one input byte; returns an event when one completes.
    pub fn feed(&mut self, byte: u8) -> Option<InputEvent> {
        match self.state {
            State::Normal => match byte {
                ESC => {
                    self.state = State::Escape;
                    None
                }
                b'\r' | b'\n' => Some(InputEvent::Enter),
                BACKSPACE => Some(InputEvent::Backspace),
                DELETE => Some(InputEvent::Delete),
                b' '..=b'~' => Some(InputEvent::Char(byte)),
                _ => None,
            },
            State::Escape => {
                if byte == b'[' {
                    self.state = State::Bracket;
                } else {
                    self.state = State::Normal;
                }
                None
            }
            State::Bracket => {
                self.state = State::Normal;
                match byte {
                    b'A' => Some(InputEvent::Up),
                    b'B' => Some(InputEvent::Down),
                    b'C' => Some(InputEvent::Right),
                    b'D' => Some(InputEvent::Left),
                    _ => None,
                }
            }
        }
    }
}

impl Default for EscapeDecoder {
    fn default() -> Self {
        Self::new()
    }
}
