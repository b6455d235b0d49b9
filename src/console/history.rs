//! Command history, most-recent-first.
//!
//! Static allocation, [`HISTORY_MAX`] entries of [`CMD_MAX_LEN`] bytes.
//! A commit shifts every entry down one slot and writes the new line at
//! slot 0, so browsing position 0 is always the newest line.

use super::{CMD_MAX_LEN, HISTORY_MAX};

pub struct History {
    entries: [[u8; CMD_MAX_LEN]; HISTORY_MAX],
    lengths: [usize; HISTORY_MAX],
    count: usize,
    /// `None` = not browsing; `Some(p)` = showing entry `p` (0 = newest).
    browse_pos: Option<usize>,
}

impl History {
    pub const fn new() -> Self {
        Self {
            entries: [[0u8; CMD_MAX_LEN]; HISTORY_MAX],
            lengths: [0; HISTORY_MAX],
            count: 0,
            browse_pos: None,
        }
    }

    /// Record a completed line and leave browse mode.
    pub fn commit(&mut self, line: &str) {
        for i in (1..HISTORY_MAX).rev() {
            self.entries[i] = self.entries[i - 1];
            self.lengths[i] = self.lengths[i - 1];
        }

        let bytes = line.as_bytes();
        let len = bytes.len().min(CMD_MAX_LEN - 1);
        self.entries[0][..len].copy_from_slice(&bytes[..len]);
        self.lengths[0] = len;

        if self.count < HISTORY_MAX {
            self.count += 1;
        }
        self.browse_pos = None;
    }

    /// Step to the next-older entry, if there is one.
    pub fn browse_up(&mut self) -> Option<&str> {
        let next = match self.browse_pos {
            None => 0,
            Some(p) => p + 1,
        };
        if next >= self.count {
            return None;
        }
        self.browse_pos = Some(next);
        self.entry(next)
    }

    /// Step to the next-newer entry.
    ///
    /// Outer `None`: not browsing, nothing changes. `Some(None)`: stepped
    /// off the newest entry, the line should go back to empty.
    /// `Some(Some(line))`: show this newer entry.
    pub fn browse_down(&mut self) -> Option<Option<&str>> {
        match self.browse_pos? {
            0 => {
                self.browse_pos = None;
                Some(None)
            }
            p => {
                self.browse_pos = Some(p - 1);
                Some(self.entry(p - 1))
            }
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Entry at browse position `pos` (0 = newest).
    pub fn entry(&self, pos: usize) -> Option<&str> {
        if pos >= self.count {
            return None;
        }
        core::str::from_utf8(&self.entries[pos][..self.lengths[pos]]).ok()
    }

    pub fn is_browsing(&self) -> bool {
        self.browse_pos.is_some()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
