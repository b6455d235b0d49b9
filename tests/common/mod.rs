//! Shared fakes for the integration tests.

// Not every test binary uses every fake.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use rp2350_eval::alarm::{AlarmDriver, AlarmError, AlarmHandle, AlarmPool};
use rp2350_eval::board::{Board, Clock, Mailbox};
use rp2350_eval::console::CmdContext;

pub const FAKE_RAM_SIZE: usize = 256;
pub const FAKE_PIXELS: usize = 8;

/// Scripted board: records writes, serves canned reads.
pub struct FakeBoard {
    pub gpio_log: Vec<(u8, bool)>,
    pub i2c_devices: Vec<u8>,
    pub ram: [u8; FAKE_RAM_SIZE],
    pub pixels: [(u8, u8, u8); FAKE_PIXELS],
    pub shows: usize,
    pub reset_requested: bool,
    trng_next: u32,
}

impl FakeBoard {
    pub fn new() -> Self {
        Self {
            gpio_log: Vec::new(),
            i2c_devices: Vec::new(),
            ram: [0; FAKE_RAM_SIZE],
            pixels: [(0, 0, 0); FAKE_PIXELS],
            shows: 0,
            reset_requested: false,
            trng_next: 1000,
        }
    }
}

impl Board for FakeBoard {
    fn gpio_write(&mut self, pin: u8, level: bool) {
        self.gpio_log.push((pin, level));
    }

    fn i2c_probe(&mut self, port: u8, addr: u8) -> bool {
        port == 0 && self.i2c_devices.contains(&addr)
    }

    fn trng_u32(&mut self) -> u32 {
        self.trng_next += 1;
        self.trng_next
    }

    fn sha256(&mut self, data: &[u8]) -> [u8; 32] {
        // Deterministic stand-in, not a real digest.
        let mut out = [0u8; 32];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = data.get(i % data.len().max(1)).copied().unwrap_or(0) ^ (i as u8);
        }
        out
    }

    fn mem_read8(&self, addr: u32) -> u8 {
        self.ram[addr as usize % FAKE_RAM_SIZE]
    }

    fn mem_read16(&self, addr: u32) -> u16 {
        u16::from_le_bytes([self.mem_read8(addr), self.mem_read8(addr.wrapping_add(1))])
    }

    fn mem_read32(&self, addr: u32) -> u32 {
        u32::from_le_bytes([
            self.mem_read8(addr),
            self.mem_read8(addr.wrapping_add(1)),
            self.mem_read8(addr.wrapping_add(2)),
            self.mem_read8(addr.wrapping_add(3)),
        ])
    }

    fn mem_write8(&mut self, addr: u32, val: u8) {
        self.ram[addr as usize % FAKE_RAM_SIZE] = val;
    }

    fn mem_write16(&mut self, addr: u32, val: u16) {
        for (i, b) in val.to_le_bytes().iter().enumerate() {
            self.mem_write8(addr.wrapping_add(i as u32), *b);
        }
    }

    fn mem_write32(&mut self, addr: u32, val: u32) {
        for (i, b) in val.to_le_bytes().iter().enumerate() {
            self.mem_write8(addr.wrapping_add(i as u32), *b);
        }
    }

    fn cpu_temp_c(&mut self) -> f32 {
        25.0
    }

    fn clock_hz(&self, clock: Clock) -> u32 {
        match clock {
            Clock::Ref => 12_000_000,
            Clock::Sys => 150_000_000,
            Clock::Usb => 48_000_000,
            Clock::Adc => 48_000_000,
        }
    }

    fn pixel_count(&self) -> usize {
        FAKE_PIXELS
    }

    fn pixel_set(&mut self, index: usize, r: u8, g: u8, b: u8) {
        if let Some(p) = self.pixels.get_mut(index) {
            *p = (r, g, b);
        }
    }

    fn pixel_set_all(&mut self, r: u8, g: u8, b: u8) {
        self.pixels = [(r, g, b); FAKE_PIXELS];
    }

    fn pixel_clear(&mut self) {
        self.pixels = [(0, 0, 0); FAKE_PIXELS];
    }

    fn pixel_show(&mut self) {
        self.shows += 1;
    }

    fn reset(&mut self) {
        self.reset_requested = true;
    }
}

/// Controllable-clock alarm driver.
pub struct FakeAlarmDriver {
    pub now: Cell<u64>,
    pub scheduled: RefCell<Vec<(usize, u64)>>,
    pub cancelled: RefCell<Vec<u32>>,
    pub fail_schedule: Cell<bool>,
}

impl FakeAlarmDriver {
    pub fn new() -> Self {
        Self {
            now: Cell::new(0),
            scheduled: RefCell::new(Vec::new()),
            cancelled: RefCell::new(Vec::new()),
            fail_schedule: Cell::new(false),
        }
    }

    pub fn advance_us(&self, us: u64) {
        self.now.set(self.now.get() + us);
    }
}

impl AlarmDriver for FakeAlarmDriver {
    fn now_us(&self) -> u64 {
        self.now.get()
    }

    fn schedule_once(&self, delay_us: u64, slot: usize) -> Result<AlarmHandle, AlarmError> {
        if self.fail_schedule.get() {
            return Err(AlarmError::ScheduleFailed);
        }
        self.scheduled.borrow_mut().push((slot, delay_us));
        Ok(AlarmHandle(slot as u32))
    }

    fn cancel(&self, handle: AlarmHandle) {
        self.cancelled.borrow_mut().push(handle.0);
    }
}

pub struct FakeMailbox {
    pub sent: Vec<u32>,
}

impl FakeMailbox {
    pub fn new() -> Self {
        Self { sent: Vec::new() }
    }
}

impl Mailbox for FakeMailbox {
    fn send(&mut self, opcode: u32) {
        self.sent.push(opcode);
    }

    fn try_recv(&mut self) -> Option<u32> {
        None
    }
}

/// Everything a command dispatch needs, in one bundle.
pub struct Fixture {
    pub board: FakeBoard,
    pub driver: FakeAlarmDriver,
    pub mailbox: FakeMailbox,
    pub pool: AlarmPool,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            board: FakeBoard::new(),
            driver: FakeAlarmDriver::new(),
            mailbox: FakeMailbox::new(),
            pool: AlarmPool::new(),
        }
    }

    pub fn ctx(&mut self) -> CmdContext<'_> {
        CmdContext {
            board: &mut self.board,
            alarms: &self.pool,
            timer: &self.driver,
            mailbox: &mut self.mailbox,
        }
    }
}
