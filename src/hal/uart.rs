//! UART0 console transport.
//!
//! The peripheral is split once at init: the reader stays with the
//! foreground loop as a [`ByteSource`], the writer is parked in a global
//! so the alarm interrupts can print their notifications too.

use core::cell::RefCell;
use core::fmt::Write;

use critical_section::Mutex;
use rp235x_hal as hal;

use crate::io::{ByteSource, ReadMode};

type UartPins = (
    hal::gpio::Pin<hal::gpio::bank0::Gpio0, hal::gpio::FunctionUart, hal::gpio::PullDown>,
    hal::gpio::Pin<hal::gpio::bank0::Gpio1, hal::gpio::FunctionUart, hal::gpio::PullDown>,
);

pub type UartReader = hal::uart::Reader<hal::pac::UART0, UartPins>;
pub type UartWriter = hal::uart::Writer<hal::pac::UART0, UartPins>;

type HwTimer = hal::Timer<hal::timer::CopyableTimer0>;

/// Shared TX half. Foreground echo and IRQ notifications both go
/// through [`with_writer`], so their output never interleaves.
static WRITER: Mutex<RefCell<Option<UartWriter>>> = Mutex::new(RefCell::new(None));

pub fn install_writer(writer: UartWriter) {
    critical_section::with(|cs| {
        WRITER.borrow(cs).replace(Some(writer));
    });
}

/// Run `f` with exclusive access to the TX half. No-op before
/// [`install_writer`].
pub fn with_writer(f: impl FnOnce(&mut dyn Write)) {
    critical_section::with(|cs| {
        if let Some(writer) = WRITER.borrow_ref_mut(cs).as_mut() {
            f(writer);
        }
    });
}

/// `Write` proxy over the shared TX half.
///
/// Each `write_str` takes its own short critical section, so a
/// long-running command never masks the alarm interrupts for its whole
/// runtime.
pub struct SharedWriter;

impl Write for SharedWriter {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        with_writer(|w| {
            let _ = w.write_str(s);
        });
        Ok(())
    }
}

/// RX half plus a timebase for poll timeouts.
pub struct UartSource {
    reader: UartReader,
    timer: HwTimer,
}

impl UartSource {
    pub fn new(reader: UartReader, timer: HwTimer) -> Self {
        Self { reader, timer }
    }

    fn try_read(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        let n = match self.reader.read_raw(&mut buf) {
            Ok(n) => n,
            Err(_) => return None,
        };
        if n > 0 {
            Some(buf[0])
        } else {
            None
        }
    }
}

impl ByteSource for UartSource {
    fn read_byte(&mut self, mode: ReadMode) -> Option<u8> {
        match mode {
            ReadMode::Blocking => loop {
                if let Some(b) = self.try_read() {
                    return Some(b);
                }
            },
            ReadMode::PollTimeout(timeout_us) => {
                let deadline = self.timer.get_counter().ticks() + timeout_us as u64;
                while self.timer.get_counter().ticks() < deadline {
                    if let Some(b) = self.try_read() {
                        return Some(b);
                    }
                }
                None
            }
        }
    }
}
