//! ANSI escape strings used by the monitor output.

/// Clear screen and home the cursor.
pub const CLS: &str = "\x1b[2J\x1b[H";

/// Red foreground.
pub const FG_RED: &str = "\x1b[31m";

/// Green foreground.
pub const FG_GREEN: &str = "\x1b[32m";

/// Reset all attributes.
pub const RESET: &str = "\x1b[0m";
