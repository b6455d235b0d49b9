//! Byte input abstraction for the monitor loop.

/// How [`ByteSource::read_byte`] waits for input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadMode {
    /// Wait until a byte arrives.
    Blocking,
    /// Poll for up to the given number of microseconds, then give up.
    PollTimeout(u32),
}

/// One-byte-at-a-time input source (UART on the target, stdin on the host).
///
/// The monitor loop calls this between every keystroke, so a `PollTimeout`
/// source keeps the loop responsive to stop requests and watchdog petting
/// even when the operator walks away.
pub trait ByteSource {
    /// Read the next input byte, or `None` on timeout.
    fn read_byte(&mut self, mode: ReadMode) -> Option<u8>;
}
