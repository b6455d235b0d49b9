//! RP2350A peripheral implementations of the [`Board`] seams.
//!
//! TRNG, SHA-256, ADC and GPIO are driven at register level (the blocks
//! are simple and the access patterns are a handful of reads and writes);
//! I2C, the inter-core FIFO and the watchdog go through the HAL.

use core::cell::RefCell;
use core::ptr;

use embedded_hal::i2c::I2c;
use rp235x_hal as hal;

use crate::board::{Board, Clock, Mailbox, Watchdog};

// SIO and pad registers used for direct GPIO output control.
const SIO_GPIO_OUT_SET: u32 = 0xd000_0018;
const SIO_GPIO_OUT_CLR: u32 = 0xd000_0020;
const SIO_GPIO_OE_SET: u32 = 0xd000_0038;
const IO_BANK0_BASE: u32 = 0x4002_8000;
const PADS_BANK0_BASE: u32 = 0x4003_8000;
const PADS_ISO_BIT: u32 = 1 << 8;
const FUNCSEL_SIO: u32 = 5;

// TRNG block.
const TRNG_BASE: u32 = 0x400f_0000;
const TRNG_RNG_IMR: u32 = TRNG_BASE + 0x100;
const TRNG_VALID: u32 = TRNG_BASE + 0x110;
const TRNG_EHR_DATA0: u32 = TRNG_BASE + 0x114;
const TRNG_RND_SOURCE_ENABLE: u32 = TRNG_BASE + 0x12c;
const TRNG_SAMPLE_CNT1: u32 = TRNG_BASE + 0x130;

// SHA-256 accelerator.
const SHA256_CSR: u32 = 0x400f_8000;
const SHA256_WDATA: u32 = 0x400f_8004;
const SHA256_SUM0: u32 = 0x400f_8008;
const SHA256_CSR_START: u32 = 1 << 0;
const SHA256_CSR_WDATA_RDY: u32 = 1 << 1;
const SHA256_CSR_SUM_VLD: u32 = 1 << 2;
const SHA256_CSR_BSWAP: u32 = 1 << 12;

// ADC, one-shot mode. The temperature sensor is input 4 on the RP2350A.
const ADC_CS: u32 = 0x400a_0000;
const ADC_RESULT: u32 = 0x400a_0004;
const ADC_CS_EN: u32 = 1 << 0;
const ADC_CS_TS_EN: u32 = 1 << 1;
const ADC_CS_START_ONCE: u32 = 1 << 2;
const ADC_CS_READY: u32 = 1 << 8;
const ADC_TEMP_AINSEL: u32 = 4 << 12;

/// WS2812 chain: data pin and strip length.
const NEOPIXEL_PIN: u8 = 16;
const NEOPIXEL_COUNT: usize = 16;

// WS2812 bit timing in system clock cycles at 150 MHz.
const WS_T1H: u32 = 120;
const WS_T1L: u32 = 68;
const WS_T0H: u32 = 60;
const WS_T0L: u32 = 128;

#[inline]
fn reg_read(addr: u32) -> u32 {
    unsafe { ptr::read_volatile(addr as *const u32) }
}

#[inline]
fn reg_write(addr: u32, val: u32) {
    unsafe { ptr::write_volatile(addr as *mut u32, val) }
}

type I2c0Pins = (
    hal::gpio::Pin<hal::gpio::bank0::Gpio4, hal::gpio::FunctionI2C, hal::gpio::PullUp>,
    hal::gpio::Pin<hal::gpio::bank0::Gpio5, hal::gpio::FunctionI2C, hal::gpio::PullUp>,
);

pub type I2c0Bus = hal::I2C<hal::pac::I2C0, I2c0Pins>;

/// The evaluation board peripherals.
pub struct RpBoard {
    i2c0: I2c0Bus,
    clk_ref_hz: u32,
    clk_sys_hz: u32,
    clk_usb_hz: u32,
    clk_adc_hz: u32,
    pixels: [(u8, u8, u8); NEOPIXEL_COUNT],
    // EHR words left over from the last TRNG generation.
    trng_cache: [u32; 6],
    trng_avail: usize,
}

impl RpBoard {
    pub fn new(i2c0: I2c0Bus, clocks: &hal::clocks::ClocksManager) -> Self {
        // TRNG bring-up: interrupts masked, default sample period,
        // entropy source running.
        reg_write(TRNG_RNG_IMR, 0xf);
        reg_write(TRNG_SAMPLE_CNT1, 0x00ff);
        reg_write(TRNG_RND_SOURCE_ENABLE, 1);

        Self {
            i2c0,
            clk_ref_hz: clocks.reference_clock.freq().to_Hz(),
            clk_sys_hz: clocks.system_clock.freq().to_Hz(),
            clk_usb_hz: clocks.usb_clock.freq().to_Hz(),
            clk_adc_hz: clocks.adc_clock.freq().to_Hz(),
            pixels: [(0, 0, 0); NEOPIXEL_COUNT],
            trng_cache: [0; 6],
            trng_avail: 0,
        }
    }

    /// Wait out one 192-bit entropy harvest and cache its six words.
    fn trng_refill(&mut self) {
        while reg_read(TRNG_VALID) & 1 == 0 {}
        for (i, word) in self.trng_cache.iter_mut().enumerate() {
            // Reading EHR_DATA5 re-arms the generator.
            *word = reg_read(TRNG_EHR_DATA0 + (i as u32) * 4);
        }
        self.trng_avail = self.trng_cache.len();
    }

    fn send_ws_bit(&self, bit: bool) {
        let mask = 1u32 << NEOPIXEL_PIN;
        let (high, low) = if bit { (WS_T1H, WS_T1L) } else { (WS_T0H, WS_T0L) };
        reg_write(SIO_GPIO_OUT_SET, mask);
        cortex_m::asm::delay(high);
        reg_write(SIO_GPIO_OUT_CLR, mask);
        cortex_m::asm::delay(low);
    }
}

impl Board for RpBoard {
    fn gpio_write(&mut self, pin: u8, level: bool) {
        let mask = 1u32 << pin;

        // Un-isolate the pad and hand the pin to SIO as an output.
        let pad = PADS_BANK0_BASE + 4 + (pin as u32) * 4;
        reg_write(pad, reg_read(pad) & !PADS_ISO_BIT);
        reg_write(IO_BANK0_BASE + (pin as u32) * 8 + 4, FUNCSEL_SIO);
        reg_write(SIO_GPIO_OE_SET, mask);

        if level {
            reg_write(SIO_GPIO_OUT_SET, mask);
        } else {
            reg_write(SIO_GPIO_OUT_CLR, mask);
        }
    }

    fn i2c_probe(&mut self, port: u8, addr: u8) -> bool {
        // Only I2C0 is pinned out on this board.
        if port != 0 {
            return false;
        }
        let mut buf = [0u8; 1];
        self.i2c0.read(addr, &mut buf).is_ok()
    }

    fn trng_u32(&mut self) -> u32 {
        if self.trng_avail == 0 {
            self.trng_refill();
        }
        self.trng_avail -= 1;
        self.trng_cache[self.trng_avail]
    }

    fn sha256(&mut self, data: &[u8]) -> [u8; 32] {
        // Hardware does the rounds; padding is ours. BSWAP lets the
        // little-endian core write message words straight from memory.
        reg_write(SHA256_CSR, SHA256_CSR_START | SHA256_CSR_BSWAP);

        let bit_len = (data.len() as u64) * 8;
        let total_blocks = (data.len() + 8) / 64 + 1;

        for blk in 0..total_blocks {
            let mut block = [0u8; 64];
            let start = blk * 64;
            if start < data.len() {
                let n = (data.len() - start).min(64);
                block[..n].copy_from_slice(&data[start..start + n]);
                if n < 64 {
                    block[n] = 0x80;
                }
            } else if start == data.len() {
                block[0] = 0x80;
            }
            if blk == total_blocks - 1 {
                block[56..64].copy_from_slice(&bit_len.to_be_bytes());
            }

            for chunk in block.chunks_exact(4) {
                while reg_read(SHA256_CSR) & SHA256_CSR_WDATA_RDY == 0 {}
                reg_write(
                    SHA256_WDATA,
                    u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
                );
            }
            while reg_read(SHA256_CSR) & SHA256_CSR_SUM_VLD == 0 {}
        }

        let mut digest = [0u8; 32];
        for i in 0..8 {
            let word = reg_read(SHA256_SUM0 + (i as u32) * 4);
            digest[i * 4..i * 4 + 4].copy_from_slice(&word.to_be_bytes());
        }
        digest
    }

    fn mem_read8(&self, addr: u32) -> u8 {
        unsafe { ptr::read_volatile(addr as *const u8) }
    }

    fn mem_read16(&self, addr: u32) -> u16 {
        unsafe { ptr::read_volatile(addr as *const u16) }
    }

    fn mem_read32(&self, addr: u32) -> u32 {
        unsafe { ptr::read_volatile(addr as *const u32) }
    }

    fn mem_write8(&mut self, addr: u32, val: u8) {
        unsafe { ptr::write_volatile(addr as *mut u8, val) }
    }

    fn mem_write16(&mut self, addr: u32, val: u16) {
        unsafe { ptr::write_volatile(addr as *mut u16, val) }
    }

    fn mem_write32(&mut self, addr: u32, val: u32) {
        unsafe { ptr::write_volatile(addr as *mut u32, val) }
    }

    fn cpu_temp_c(&mut self) -> f32 {
        reg_write(ADC_CS, ADC_CS_EN | ADC_CS_TS_EN | ADC_TEMP_AINSEL);
        reg_write(
            ADC_CS,
            ADC_CS_EN | ADC_CS_TS_EN | ADC_TEMP_AINSEL | ADC_CS_START_ONCE,
        );
        while reg_read(ADC_CS) & ADC_CS_READY == 0 {}
        let raw = reg_read(ADC_RESULT) & 0xfff;

        // Conversion from the datasheet's sensor characteristics.
        let voltage = raw as f32 * 3.3 / 4096.0;
        27.0 - (voltage - 0.706) / 0.001721
    }

    fn clock_hz(&self, clock: Clock) -> u32 {
        match clock {
            Clock::Ref => self.clk_ref_hz,
            Clock::Sys => self.clk_sys_hz,
            Clock::Usb => self.clk_usb_hz,
            Clock::Adc => self.clk_adc_hz,
        }
    }

    fn pixel_count(&self) -> usize {
        NEOPIXEL_COUNT
    }

    fn pixel_set(&mut self, index: usize, r: u8, g: u8, b: u8) {
        if let Some(p) = self.pixels.get_mut(index) {
            *p = (r, g, b);
        }
    }

    fn pixel_set_all(&mut self, r: u8, g: u8, b: u8) {
        self.pixels = [(r, g, b); NEOPIXEL_COUNT];
    }

    fn pixel_clear(&mut self) {
        self.pixels = [(0, 0, 0); NEOPIXEL_COUNT];
    }

    fn pixel_show(&mut self) {
        self.gpio_write(NEOPIXEL_PIN, false);

        // The WS2812 waveform cannot tolerate interrupt latency.
        critical_section::with(|_| {
            for &(r, g, b) in &self.pixels {
                // GRB order, MSB first.
                for byte in [g, r, b] {
                    for bit in (0..8).rev() {
                        self.send_ws_bit(byte & (1 << bit) != 0);
                    }
                }
            }
        });

        // Latch: hold the line low for at least 50 us.
        cortex_m::asm::delay(self.clk_sys_hz / 10_000);
    }

    fn reset(&mut self) {
        cortex_m::peripheral::SCB::sys_reset();
    }
}

/// Inter-core mailbox over the SIO FIFO.
pub struct FifoMailbox(pub hal::sio::SioFifo);

impl Mailbox for FifoMailbox {
    fn send(&mut self, opcode: u32) {
        self.0.write(opcode);
    }

    fn try_recv(&mut self) -> Option<u32> {
        self.0.read()
    }
}

/// Hardware watchdog behind the shared [`Watchdog`] seam.
pub struct RpWatchdog(RefCell<hal::Watchdog>);

impl RpWatchdog {
    pub fn new(watchdog: hal::Watchdog) -> Self {
        Self(RefCell::new(watchdog))
    }
}

impl Watchdog for RpWatchdog {
    fn pet(&self) {
        self.0.borrow_mut().feed();
    }
}
