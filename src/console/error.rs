//! Monitor error types.

/// Command error with code and message.
///
/// Handlers print their own context (usage lines, ranges) and return one
/// of these so callers and tests can tell outcomes apart; none of them
/// terminates the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// E01: No table entry matches the command token
    UnknownCommand,
    /// E02: Argument count outside the entry's min..=max contract
    InvalidArgCount,
    /// E03: Argument value malformed (bad hex prefix, bad mode string)
    InvalidValue,
    /// E04: Argument value out of the accepted range
    OutOfRange,
    /// E05: All hardware alarm slots in use
    TimersExhausted,
    /// E06: Peripheral or driver failure
    HardwareFault,
}

impl ConsoleError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "E01",
            Self::InvalidArgCount => "E02",
            Self::InvalidValue => "E03",
            Self::OutOfRange => "E04",
            Self::TimersExhausted => "E05",
            Self::HardwareFault => "E06",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "unknown command",
            Self::InvalidArgCount => "invalid number of arguments",
            Self::InvalidValue => "invalid value",
            Self::OutOfRange => "out of range",
            Self::TimersExhausted => "all timers in use",
            Self::HardwareFault => "hardware fault",
        }
    }
}

impl core::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}
