//! Line tokenizer and argument parsing helpers.
//!
//! Tokens are runs of non-space characters; only the space character
//! delimits. No quoting, no escaping. At most the command plus
//! [`MAX_ARGS`] arguments are kept, extra input is silently ignored.

use super::MAX_ARGS;

/// Positional tokens of one accepted line.
///
/// Borrows the frozen line buffer; valid only until the next line is
/// accepted. Index 0 is the command name; `MAX_ARGS` counts the
/// arguments after it.
#[derive(Debug, Clone)]
pub struct Args<'a> {
    pub argc: usize,
    argv: [Option<&'a str>; MAX_ARGS + 1],
}

impl<'a> Args<'a> {
    /// The command token, or `""` for a blank line.
    pub fn cmd(&self) -> &'a str {
        self.argv[0].unwrap_or("")
    }

    /// Token by position (0 = command, 1 = first argument).
    pub fn arg(&self, idx: usize) -> Option<&'a str> {
        self.argv.get(idx).copied().flatten()
    }
}

/// Split a line into positional tokens.
pub fn split_args(line: &str) -> Args<'_> {
    let mut argv = [None; MAX_ARGS + 1];
    let mut argc = 0;

    for tok in line.split(' ').filter(|t| !t.is_empty()).take(MAX_ARGS + 1) {
        argv[argc] = Some(tok);
        argc += 1;
    }

    Args { argc, argv }
}

/// Decimal parse with C `atoi` semantics.
///
/// Skips leading whitespace, takes an optional sign and then digits up to
/// the first non-digit. Anything unparsable yields 0, never an error.
/// Values beyond `i32` saturate.
pub fn parse_dec(s: &str) -> i32 {
    let mut chars = s.trim_start().chars().peekable();

    let mut negative = false;
    if let Some(&c) = chars.peek() {
        if c == '+' || c == '-' {
            negative = c == '-';
            chars.next();
        }
    }

    let mut val: i64 = 0;
    while let Some(&c) = chars.peek() {
        let Some(d) = c.to_digit(10) else { break };
        chars.next();
        val = val.saturating_mul(10).saturating_add(d as i64);
    }
    if negative {
        val = -val;
    }
    val.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Parse a `#`-prefixed unsigned hex field (`"#0010"` -> 16).
///
/// Requires the `#` and at least one hex digit; stops at the first
/// non-hex character like `sscanf("%x")` does. Returns `None` on a
/// missing prefix or an empty digit run.
pub fn parse_hex(s: &str) -> Option<u32> {
    let rest = s.strip_prefix('#')?;

    let mut val: u32 = 0;
    let mut digits = 0;
    for c in rest.chars() {
        let Some(d) = c.to_digit(16) else { break };
        val = (val << 4) | d;
        digits += 1;
    }
    if digits == 0 {
        None
    } else {
        Some(val)
    }
}

/// Parse a `#RRGGBB` color literal (exactly 7 characters).
pub fn parse_hex_color(s: &str) -> Option<(u8, u8, u8)> {
    let rest = s.strip_prefix('#')?;
    if rest.len() != 6 || !rest.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&rest[0..2], 16).ok()?;
    let g = u8::from_str_radix(&rest[2..4], 16).ok()?;
    let b = u8::from_str_radix(&rest[4..6], 16).ok()?;
    Some((r, g, b))
}
