//! Interactive monitor: byte-at-a-time input handling with echo,
//! line editing, history recall and command dispatch.

use core::fmt::Write;

use super::commands::{execute, print_banner, CmdContext, CommandEntry, CommandSet};
use super::escape::{EscapeDecoder, InputEvent};
use super::history::History;
use super::line_buffer::LineBuffer;
use super::parser::split_args;
use super::ConsoleError;

/// Monitor tunables.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleConfig {
    /// Check argument counts against the table before dispatch.
    ///
    /// Off by default: handlers carry their own positional checks and
    /// print usage lines with more context than the table can.
    pub validate_arg_counts: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            validate_arg_counts: false,
        }
    }
}

/// The debug command monitor.
///
/// Owns all editing state; peripherals arrive per-call through
/// [`CmdContext`] so the monitor itself stays hardware-free and
/// testable on the host.
pub struct Console {
    line: LineBuffer,
    history: History,
    decoder: EscapeDecoder,
    commands: CommandSet,
    config: ConsoleConfig,
}

impl Console {
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            line: LineBuffer::new(),
            history: History::new(),
            decoder: EscapeDecoder::new(),
            commands: CommandSet::new(),
            config,
        }
    }

    /// Monitor over a custom command table.
    pub fn with_table(entries: &'static [CommandEntry], config: ConsoleConfig) -> Self {
        Self {
            line: LineBuffer::new(),
            history: History::new(),
            decoder: EscapeDecoder::new(),
            commands: CommandSet::with_entries(entries),
            config,
        }
    }

    pub fn print_banner(&self, out: &mut dyn Write) {
        print_banner(out);
    }

    pub fn print_prompt(&self, out: &mut dyn Write) {
        let _ = write!(out, "> ");
    }

    /// Reprint the prompt and the line under edit, then walk the
    /// terminal cursor back to the edit position.
    ///
    /// For use after asynchronous output (an alarm notification) has
    /// clobbered the display.
    pub fn redraw(&self, out: &mut dyn Write) {
        let _ = write!(out, "> {}", self.line.as_str());
        for _ in 0..(self.line.len() - self.line.cursor()) {
            let _ = write!(out, "\x08");
        }
    }

    /// Feed one received byte.
    ///
    /// Returns `None` until a line is accepted and dispatched; then the
    /// dispatch outcome. Blank lines dispatch nothing and yield `None`.
    pub fn process_byte(
        &mut self,
        byte: u8,
        ctx: &mut CmdContext<'_>,
        out: &mut dyn Write,
    ) -> Option<Result<(), ConsoleError>> {
        let event = self.decoder.feed(byte)?;

        match event {
            InputEvent::Char(c) => {
                if self.line.insert(c) {
                    let _ = write!(out, "{}", c as char);
                }
                None
            }
            InputEvent::Enter => self.accept_line(ctx, out),
            InputEvent::Backspace => {
                if self.line.backspace() {
                    let _ = write!(out, "\x08");
                    self.reecho_tail(out);
                }
                None
            }
            InputEvent::Delete => {
                if self.line.delete_at_cursor() {
                    self.reecho_tail(out);
                }
                None
            }
            InputEvent::Left => {
                if self.line.move_left() {
                    let _ = write!(out, "\x08");
                }
                None
            }
            InputEvent::Right => {
                if let Some(c) = self.line.move_right() {
                    let _ = write!(out, "{}", c as char);
                }
                None
            }
            InputEvent::Up => {
                if let Some(entry) = self.history.browse_up() {
                    // Wipe the visible line before painting the recalled one.
                    for _ in 0..self.line.len() {
                        let _ = write!(out, "\x08 \x08");
                    }
                    self.line.set(entry);
                    let _ = write!(out, "{}", entry);
                }
                None
            }
            InputEvent::Down => {
                match self.history.browse_down() {
                    None => {}
                    Some(None) => {
                        for _ in 0..self.line.len() {
                            let _ = write!(out, "\x08 \x08");
                        }
                        self.line.clear();
                    }
                    Some(Some(entry)) => {
                        for _ in 0..self.line.len() {
                            let _ = write!(out, "\x08 \x08");
                        }
                        self.line.set(entry);
                        let _ = write!(out, "{}", entry);
                    }
                }
                None
            }
        }
    }

    fn accept_line(
        &mut self,
        ctx: &mut CmdContext<'_>,
        out: &mut dyn Write,
    ) -> Option<Result<(), ConsoleError>> {
        let _ = writeln!(out);

        if !self.line.is_empty() {
            self.history.commit(self.line.as_str());
        }

        let args = split_args(self.line.as_str());
        let result = if args.argc > 0 {
            Some(execute(&self.commands, &self.config, &args, ctx, out))
        } else {
            None
        };

        self.line.clear();
        self.print_prompt(out);
        result
    }

    /// Repaint the tail after a mid-line deletion: the shifted characters,
    /// a blank over the vacated cell, then backspaces to restore the cursor.
    fn reecho_tail(&self, out: &mut dyn Write) {
        let tail = self.line.tail();
        let _ = write!(out, "{} ", tail);
        for _ in 0..(tail.len() + 1) {
            let _ = write!(out, "\x08");
        }
    }

    /// Current line contents.
    pub fn line(&self) -> &str {
        self.line.as_str()
    }

    pub fn cursor(&self) -> usize {
        self.line.cursor()
    }
}
