//! RP2350 hardware bindings.
//!
//! Everything here exists only in the firmware build; the monitor core
//! never imports from this module.

pub mod board;
pub mod timer;
pub mod uart;

pub use board::{FifoMailbox, RpBoard, RpWatchdog};
pub use timer::{take_prompt_stale, HwAlarmDriver, ALARM_POOL};
pub use uart::{install_writer, with_writer, SharedWriter, UartSource, UartWriter};
