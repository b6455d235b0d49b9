//! Seams between the monitor core and the hardware it drives.
//!
//! Command handlers never touch peripherals directly; they go through
//! [`Board`], [`Mailbox`] and [`crate::alarm::AlarmDriver`]. The firmware
//! binary wires these to RP2350 silicon, the host REPL and the tests wire
//! them to fakes.

/// Highest user GPIO on the RP2350A package.
pub const GPIO_MAX_PIN: u8 = 29;

/// On-board QSPI flash, megabytes.
pub const FLASH_SIZE_MB: u32 = 4;

/// On-chip SRAM, kilobytes.
pub const RAM_SIZE_KB: u32 = 520;

/// MCU identification shown by `sys`.
pub const MCU_NAME: &str = "RP2350A";

/// Board identification shown by `sys`.
pub const PCB_NAME: &str = "RP2350A Eval Board";

/// Opcode sent over the inter-core FIFO by the `mct` command.
pub const MULTI_CORE_TEST_DATA: u32 = 0x9765_4321;

/// Opcode asking the peer core to run the NeoPixel fade effect.
pub const PROC_NEOPIXEL_FADE: u32 = 0x0000_0123;

/// Clock domains reported by the `sys` command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Clock {
    Ref,
    Sys,
    Usb,
    Adc,
}

/// Peripheral operations the command handlers need.
///
/// Each method maps to one hardware demo; their internals (PIO programs,
/// accelerator feeding, bus timing) are the implementor's business.
pub trait Board {
    /// Drive a GPIO pin as output at the given level.
    fn gpio_write(&mut self, pin: u8, level: bool);

    /// Probe one I2C address on the given port; `true` if a device ACKs.
    fn i2c_probe(&mut self, port: u8, addr: u8) -> bool;

    /// One word from the true random number generator.
    fn trng_u32(&mut self) -> u32;

    /// SHA-256 digest of `data` via the hardware accelerator.
    fn sha256(&mut self, data: &[u8]) -> [u8; 32];

    fn mem_read8(&self, addr: u32) -> u8;
    fn mem_read16(&self, addr: u32) -> u16;
    fn mem_read32(&self, addr: u32) -> u32;
    fn mem_write8(&mut self, addr: u32, val: u8);
    fn mem_write16(&mut self, addr: u32, val: u16);
    fn mem_write32(&mut self, addr: u32, val: u32);

    /// Die temperature from the ADC sensor, degrees Celsius.
    fn cpu_temp_c(&mut self) -> f32;

    /// Current frequency of a clock domain, Hz.
    fn clock_hz(&self, clock: Clock) -> u32;

    /// Number of NeoPixels on the board.
    fn pixel_count(&self) -> usize;
    /// Stage one pixel color (0-based index).
    fn pixel_set(&mut self, index: usize, r: u8, g: u8, b: u8);
    /// Stage the same color on every pixel.
    fn pixel_set_all(&mut self, r: u8, g: u8, b: u8);
    /// Stage all pixels off.
    fn pixel_clear(&mut self);
    /// Push staged colors out to the strip.
    fn pixel_show(&mut self);

    /// Request a system reset. On hardware this does not return; host
    /// implementations set a stop flag instead.
    fn reset(&mut self);
}

/// One-word inter-core mailbox (the SIO FIFO on the RP2350).
///
/// At most one word is pending; an unread word is overwritten by the next
/// send. The monitor only ever writes fixed opcodes into it.
pub trait Mailbox {
    fn send(&mut self, opcode: u32);
    fn try_recv(&mut self) -> Option<u32>;
}

/// External reset timer. Pet it inside any loop that can run long.
pub trait Watchdog {
    fn pet(&self);
}

/// No-op watchdog for builds without one configured.
pub struct NullWatchdog;

impl Watchdog for NullWatchdog {
    fn pet(&self) {}
}
