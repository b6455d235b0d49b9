//! # rust-rp2350-eval
//!
//! Evaluation firmware for the RP2350 with an interactive debug command
//! monitor on UART0.
//!
//! ## Architecture
//!
//! The monitor core is hardware-free: input arrives one byte at a time
//! through [`io::ByteSource`], output leaves through `core::fmt::Write`,
//! and every peripheral a command touches sits behind a narrow trait
//! ([`board::Board`], [`board::Mailbox`], [`alarm::AlarmDriver`]). The
//! same [`console::Console`] therefore runs on the chip, on the host
//! REPL, and inside the test suite.
//!
//! The only state shared with interrupt context is the hardware alarm
//! pool; see [`alarm`] for the critical-section discipline around it.

#![cfg_attr(not(test), no_std)]

pub mod alarm;
pub mod ansi;
pub mod board;
pub mod console;
pub mod io;
pub mod mathtest;

#[cfg(all(not(test), target_os = "none"))]
pub mod hal;

pub use alarm::{AlarmDriver, AlarmPool};
pub use board::{Board, Mailbox, Watchdog};
pub use console::{CmdContext, Console, ConsoleConfig};
