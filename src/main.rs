//! Firmware entry point.
//!
//! On the chip this brings up clocks, UART0, TIMER0 and the watchdog,
//! then polls the monitor forever. Built for the host instead, it runs
//! the same monitor as a line-based REPL against simulated peripherals,
//! which is how most command work gets exercised during development.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
use panic_halt as _;

#[cfg(target_os = "none")]
mod firmware {
    use rp235x_hal as hal;

    use hal::fugit::{ExtU32, RateExtU32};
    use hal::uart::{DataBits, StopBits, UartConfig, UartPeripheral};
    use hal::Clock as _;

    use rp2350_eval::board::Watchdog as _;
    use rp2350_eval::console::{CmdContext, Console, ConsoleConfig};
    use rp2350_eval::hal::{
        FifoMailbox, HwAlarmDriver, RpBoard, RpWatchdog, SharedWriter, UartSource, ALARM_POOL,
    };
    use rp2350_eval::io::{ByteSource, ReadMode};

    /// Tell the boot ROM this is a secure Arm executable.
    #[link_section = ".start_block"]
    #[used]
    pub static IMAGE_DEF: hal::block::ImageDef = hal::block::ImageDef::secure_exe();

    const XTAL_FREQ_HZ: u32 = 12_000_000;

    /// How long one idle poll waits for a byte before petting the
    /// watchdog again.
    const POLL_TIMEOUT_US: u32 = 10_000;

    #[hal::entry]
    fn main() -> ! {
        let mut pac = hal::pac::Peripherals::take().unwrap();

        let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);
        let clocks = hal::clocks::init_clocks_and_plls(
            XTAL_FREQ_HZ,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .unwrap();

        let mut timer = hal::Timer::new_timer0(pac.TIMER0, &mut pac.RESETS, &clocks);
        let sio = hal::Sio::new(pac.SIO);
        let pins = hal::gpio::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        let uart_pins = (pins.gpio0.into_function(), pins.gpio1.into_function());
        let uart = UartPeripheral::new(pac.UART0, uart_pins, &mut pac.RESETS)
            .enable(
                UartConfig::new(115_200.Hz(), DataBits::Eight, None, StopBits::One),
                clocks.peripheral_clock.freq(),
            )
            .unwrap();
        let (reader, writer) = uart.split();
        rp2350_eval::hal::install_writer(writer);
        let mut source = UartSource::new(reader, timer);

        let i2c0 = hal::I2C::i2c0(
            pac.I2C0,
            pins.gpio4.reconfigure(),
            pins.gpio5.reconfigure(),
            400.kHz(),
            &mut pac.RESETS,
            &clocks.system_clock,
        );

        let alarm_driver = HwAlarmDriver::new(&mut timer).unwrap();
        unsafe {
            cortex_m::peripheral::NVIC::unmask(hal::pac::Interrupt::TIMER0_IRQ_0);
            cortex_m::peripheral::NVIC::unmask(hal::pac::Interrupt::TIMER0_IRQ_1);
            cortex_m::peripheral::NVIC::unmask(hal::pac::Interrupt::TIMER0_IRQ_2);
            cortex_m::peripheral::NVIC::unmask(hal::pac::Interrupt::TIMER0_IRQ_3);
        }

        let mut board = RpBoard::new(i2c0, &clocks);
        let mut mailbox = FifoMailbox(sio.fifo);

        watchdog.start(5_000.millis());
        let watchdog = RpWatchdog::new(watchdog);

        let mut console = Console::new(ConsoleConfig::default());
        let mut out = SharedWriter;
        console.print_banner(&mut out);
        console.print_prompt(&mut out);

        loop {
            watchdog.pet();
            if rp2350_eval::hal::take_prompt_stale() {
                console.redraw(&mut out);
            }
            if let Some(byte) = source.read_byte(ReadMode::PollTimeout(POLL_TIMEOUT_US)) {
                let mut ctx = CmdContext {
                    board: &mut board,
                    alarms: &ALARM_POOL,
                    timer: &alarm_driver,
                    mailbox: &mut mailbox,
                };
                let _ = console.process_byte(byte, &mut ctx, &mut out);
            }
        }
    }
}

#[cfg(not(target_os = "none"))]
mod host {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::io::{BufRead, Write as _};
    use std::time::Instant;

    use rp2350_eval::alarm::{AlarmDriver, AlarmError, AlarmHandle, AlarmPool};
    use rp2350_eval::board::{
        Board, Clock, Mailbox, NullWatchdog, Watchdog, MULTI_CORE_TEST_DATA, PROC_NEOPIXEL_FADE,
    };
    use rp2350_eval::console::{CmdContext, Console, ConsoleConfig};
    use rp2350_eval::io::{ByteSource, ReadMode};

    const SIM_RAM_SIZE: usize = 64 * 1024;
    const SIM_PIXELS: usize = 16;

    /// Simulated peripherals, just enough for every command to run.
    struct HostBoard {
        ram: Vec<u8>,
        pixels: Vec<(u8, u8, u8)>,
        rng_state: u64,
        reset_requested: bool,
    }

    impl HostBoard {
        fn new() -> Self {
            Self {
                ram: vec![0; SIM_RAM_SIZE],
                pixels: vec![(0, 0, 0); SIM_PIXELS],
                rng_state: 0x2545_f491_4f6c_dd1d,
                reset_requested: false,
            }
        }

        fn slot(&self, addr: u32) -> usize {
            addr as usize % SIM_RAM_SIZE
        }
    }

    impl Board for HostBoard {
        fn gpio_write(&mut self, _pin: u8, _level: bool) {}

        fn i2c_probe(&mut self, _port: u8, _addr: u8) -> bool {
            false
        }

        fn trng_u32(&mut self) -> u32 {
            // xorshift64*, seeded once; good enough for a simulator.
            let mut x = self.rng_state;
            x ^= x >> 12;
            x ^= x << 25;
            x ^= x >> 27;
            self.rng_state = x;
            (x.wrapping_mul(0x2545_f491_4f6c_dd1d) >> 32) as u32
        }

        fn sha256(&mut self, data: &[u8]) -> [u8; 32] {
            sha256_soft(data)
        }

        fn mem_read8(&self, addr: u32) -> u8 {
            self.ram[self.slot(addr)]
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
            let slot = self.slot(addr);
            self.ram[slot] = val;
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
            27.3
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
            self.pixels.len()
        }

        fn pixel_set(&mut self, index: usize, r: u8, g: u8, b: u8) {
            if let Some(p) = self.pixels.get_mut(index) {
                *p = (r, g, b);
            }
        }

        fn pixel_set_all(&mut self, r: u8, g: u8, b: u8) {
            self.pixels.fill((r, g, b));
        }

        fn pixel_clear(&mut self) {
            self.pixels.fill((0, 0, 0));
        }

        fn pixel_show(&mut self) {}

        fn reset(&mut self) {
            self.reset_requested = true;
        }
    }

    /// Wall-clock alarm driver; expiry is polled between input lines.
    struct HostAlarmDriver {
        epoch: Instant,
        pending: RefCell<Vec<(usize, u64)>>,
    }

    impl HostAlarmDriver {
        fn new() -> Self {
            Self {
                epoch: Instant::now(),
                pending: RefCell::new(Vec::new()),
            }
        }

        /// Slots whose deadline has passed, removed from the pending list.
        fn take_expired(&self) -> Vec<usize> {
            let now = self.now_us();
            let mut pending = self.pending.borrow_mut();
            let mut fired = Vec::new();
            pending.retain(|&(slot, deadline)| {
                if deadline <= now {
                    fired.push(slot);
                    false
                } else {
                    true
                }
            });
            fired
        }
    }

    impl AlarmDriver for HostAlarmDriver {
        fn now_us(&self) -> u64 {
            self.epoch.elapsed().as_micros() as u64
        }

        fn schedule_once(&self, delay_us: u64, slot: usize) -> Result<AlarmHandle, AlarmError> {
            self.pending
                .borrow_mut()
                .push((slot, self.now_us() + delay_us));
            Ok(AlarmHandle(slot as u32))
        }

        fn cancel(&self, handle: AlarmHandle) {
            self.pending
                .borrow_mut()
                .retain(|&(slot, _)| slot != handle.0 as usize);
        }
    }

    struct HostMailbox {
        inbox: VecDeque<u32>,
    }

    impl Mailbox for HostMailbox {
        fn send(&mut self, opcode: u32) {
            self.inbox.push_back(opcode);
        }

        fn try_recv(&mut self) -> Option<u32> {
            self.inbox.pop_front()
        }
    }

    /// Stdin line reader presenting one byte at a time, CR-terminated.
    struct StdinSource {
        queue: VecDeque<u8>,
        eof: bool,
    }

    impl ByteSource for StdinSource {
        fn read_byte(&mut self, _mode: ReadMode) -> Option<u8> {
            if self.queue.is_empty() && !self.eof {
                let mut line = String::new();
                match std::io::stdin().lock().read_line(&mut line) {
                    Ok(0) | Err(_) => self.eof = true,
                    Ok(_) => {
                        self.queue
                            .extend(line.trim_end_matches(['\r', '\n']).bytes());
                        self.queue.push_back(b'\r');
                    }
                }
            }
            self.queue.pop_front()
        }
    }

    /// `core::fmt::Write` over stdout, flushed per write.
    struct StdoutSink;

    impl core::fmt::Write for StdoutSink {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            print!("{}", s);
            let _ = std::io::stdout().flush();
            Ok(())
        }
    }

    pub fn run() {
        let pool = AlarmPool::new();
        let driver = HostAlarmDriver::new();
        let mut board = HostBoard::new();
        let mut mailbox = HostMailbox {
            inbox: VecDeque::new(),
        };
        let mut source = StdinSource {
            queue: VecDeque::new(),
            eof: false,
        };
        let mut out = StdoutSink;
        let watchdog = NullWatchdog;

        let mut console = Console::new(ConsoleConfig::default());
        console.print_banner(&mut out);
        console.print_prompt(&mut out);

        loop {
            watchdog.pet();
            let Some(byte) = source.read_byte(ReadMode::Blocking) else {
                break;
            };

            {
                let mut ctx = CmdContext {
                    board: &mut board,
                    alarms: &pool,
                    timer: &driver,
                    mailbox: &mut mailbox,
                };
                let _ = console.process_byte(byte, &mut ctx, &mut out);
            }

            // Between bytes: play the role of the alarm interrupts and
            // of core 0 draining the FIFO.
            let mut fired_any = false;
            for slot in driver.take_expired() {
                if let Some(fired) = pool.on_fire(slot) {
                    print!(
                        "\nTimer #{} Alarm! (Set time : {})\n",
                        fired.slot_no, fired.requested_s
                    );
                    fired_any = true;
                }
            }
            if fired_any {
                console.redraw(&mut out);
            }
            while let Some(opcode) = mailbox.try_recv() {
                match opcode {
                    MULTI_CORE_TEST_DATA => {
                        println!("[Core 0] RX FIFO Data from Core 1 : 0x{:08X}", opcode)
                    }
                    PROC_NEOPIXEL_FADE => println!("[Core 0] NeoPixel fade requested"),
                    other => println!("[Core 0] RX FIFO Data : 0x{:08X}", other),
                }
            }

            if board.reset_requested {
                println!("(simulated reset; exiting)");
                break;
            }
        }
    }

    /// Plain software SHA-256 standing in for the accelerator.
    fn sha256_soft(data: &[u8]) -> [u8; 32] {
        const K: [u32; 64] = [
            0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4,
            0xab1c5ed5, 0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe,
            0x9bdc06a7, 0xc19bf174, 0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f,
            0x4a7484aa, 0x5cb0a9dc, 0x76f988da, 0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7,
            0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967, 0x27b70a85, 0x2e1b2138, 0x4d2c6dfc,
            0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85, 0xa2bfe8a1, 0xa81a664b,
            0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070, 0x19a4c116,
            0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
            0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7,
            0xc67178f2,
        ];

        let mut h: [u32; 8] = [
            0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab,
            0x5be0cd19,
        ];

        let mut msg = data.to_vec();
        let bit_len = (data.len() as u64) * 8;
        msg.push(0x80);
        while msg.len() % 64 != 56 {
            msg.push(0);
        }
        msg.extend_from_slice(&bit_len.to_be_bytes());

        for block in msg.chunks_exact(64) {
            let mut w = [0u32; 64];
            for (i, chunk) in block.chunks_exact(4).enumerate() {
                w[i] = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            }
            for i in 16..64 {
                let s0 = w[i - 15].rotate_right(7) ^ w[i - 15].rotate_right(18) ^ (w[i - 15] >> 3);
                let s1 = w[i - 2].rotate_right(17) ^ w[i - 2].rotate_right(19) ^ (w[i - 2] >> 10);
                w[i] = w[i - 16]
                    .wrapping_add(s0)
                    .wrapping_add(w[i - 7])
                    .wrapping_add(s1);
            }

            let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut hh] = h;
            for i in 0..64 {
                let s1 = e.rotate_right(6) ^ e.rotate_right(11) ^ e.rotate_right(25);
                let ch = (e & f) ^ (!e & g);
                let t1 = hh
                    .wrapping_add(s1)
                    .wrapping_add(ch)
                    .wrapping_add(K[i])
                    .wrapping_add(w[i]);
                let s0 = a.rotate_right(2) ^ a.rotate_right(13) ^ a.rotate_right(22);
                let maj = (a & b) ^ (a & c) ^ (b & c);
                let t2 = s0.wrapping_add(maj);
                hh = g;
                g = f;
                f = e;
                e = d.wrapping_add(t1);
                d = c;
                c = b;
                b = a;
                a = t1.wrapping_add(t2);
            }

            h[0] = h[0].wrapping_add(a);
            h[1] = h[1].wrapping_add(b);
            h[2] = h[2].wrapping_add(c);
            h[3] = h[3].wrapping_add(d);
            h[4] = h[4].wrapping_add(e);
            h[5] = h[5].wrapping_add(f);
            h[6] = h[6].wrapping_add(g);
            h[7] = h[7].wrapping_add(hh);
        }

        let mut digest = [0u8; 32];
        for (i, word) in h.iter().enumerate() {
            digest[i * 4..i * 4 + 4].copy_from_slice(&word.to_be_bytes());
        }
        digest
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    host::run();
}
