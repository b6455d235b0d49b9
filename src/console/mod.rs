//! Interactive debug command monitor.
//!
//! Polled from the foreground loop one byte at a time; no heap, all
//! buffers are fixed arrays inside [`Console`].

pub mod commands;
pub mod console;
pub mod error;
pub mod escape;
pub mod history;
pub mod line_buffer;
pub mod parser;

pub use commands::{execute, CmdContext, CommandEntry, CommandSet, COMMANDS};
pub use console::{Console, ConsoleConfig};
pub use error::ConsoleError;
pub use escape::{EscapeDecoder, InputEvent};
pub use history::History;
pub use line_buffer::LineBuffer;
pub use parser::{parse_dec, parse_hex, split_args, Args};

/// Version string (set by build.rs, includes git hash).
pub const VERSION: &str = env!("VERSION_STRING");

/// Maximum command line length, including the reserved terminator cell.
pub const CMD_MAX_LEN: usize = 32;

/// Maximum number of arguments after the command token.
pub const MAX_ARGS: usize = 4;

/// Command history depth.
pub const HISTORY_MAX: usize = 8;
