//! Cursor-addressed line input buffer.
//!
//! Pure state mutation; all terminal echo is done by the caller from the
//! post-mutation buffer contents.

use super::CMD_MAX_LEN;

/// In-progress command line with an edit cursor.
///
/// Invariant: `cursor <= len <= CMD_MAX_LEN - 1` (the last cell stays
/// free, matching the original buffer's terminator slot).
pub struct LineBuffer {
    buf: [u8; CMD_MAX_LEN],
    len: usize,
    cursor: usize,
}

impl LineBuffer {
    pub const fn new() -> Self {
        Self {
            buf: [0u8; CMD_MAX_LEN],
            len: 0,
            cursor: 0,
        }
    }

    /// Write `c` at the cursor and advance.
    ///
    /// NOTE: mid-line this OVERWRITES the character under the cursor
    /// instead of shifting the tail right. That matches the shipped
    /// editor behavior, which every revision kept; a shifting insert
    /// would change the operator-visible semantics.
    ///
    /// Returns `false` (no change) when the buffer is full.
    pub fn insert(&mut self, c: u8) -> bool {
        if self.cursor >= CMD_MAX_LEN - 1 {
            return false;
        }
        self.buf[self.cursor] = c;
        if self.cursor >= self.len {
            self.len = self.cursor + 1;
        }
        self.cursor += 1;
        true
    }

    /// Remove the character under the cursor, shifting the tail left.
    pub fn delete_at_cursor(&mut self) -> bool {
        if self.cursor >= self.len {
            return false;
        }
        self.buf.copy_within(self.cursor + 1..self.len, self.cursor);
        self.len -= 1;
        true
    }

    /// Remove the character before the cursor (cursor moves left first).
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        // Same shift as delete at the new cursor position.
        self.buf.copy_within(self.cursor + 1..self.len, self.cursor);
        self.len -= 1;
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Move right; returns the character passed over (for re-echo).
    pub fn move_right(&mut self) -> Option<u8> {
        if self.cursor >= self.len {
            return None;
        }
        let c = self.buf[self.cursor];
        self.cursor += 1;
        Some(c)
    }

    /// Replace the contents (history recall); cursor lands at the end.
    pub fn set(&mut self, s: &str) {
        let bytes = s.as_bytes();
        let copy_len = bytes.len().min(CMD_MAX_LEN - 1);
        self.buf[..copy_len].copy_from_slice(&bytes[..copy_len]);
        self.len = copy_len;
        self.cursor = copy_len;
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.cursor = 0;
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    /// Characters from the cursor to the end of the line.
    pub fn tail(&self) -> &str {
        core::str::from_utf8(&self.buf[self.cursor..self.len]).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
